//! 成绩计算模块
//!
//! 等级、百分比、通过判定的唯一出处。写路径在落库前经由 `compute`
//! 得到全部派生字段，读路径从不重算；学年与月份的推导也集中在
//! 这里。全部为纯函数。

use chrono::{DateTime, Datelike, Utc};

use crate::errors::{GradeSystemError, Result};
use crate::models::grades::entities::{GradeStatus, LetterGrade};

/// 一次计算得到的全部派生字段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBreakdown {
    pub percentage: f64,
    pub grade: LetterGrade,
    pub is_passed: bool,
}

impl GradeBreakdown {
    pub fn status(&self) -> GradeStatus {
        GradeStatus::from_passed(self.is_passed)
    }
}

// 等级表，按百分比下限降序，线性扫描取第一个命中档位
const GRADE_BANDS: [(f64, LetterGrade); 7] = [
    (90.0, LetterGrade::APlus),
    (80.0, LetterGrade::A),
    (70.0, LetterGrade::BPlus),
    (60.0, LetterGrade::B),
    (50.0, LetterGrade::CPlus),
    (40.0, LetterGrade::C),
    (35.0, LetterGrade::D),
];

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 由百分比查等级表
pub fn grade_for_percentage(percentage: f64) -> LetterGrade {
    for (floor, grade) in GRADE_BANDS {
        if percentage >= floor {
            return grade;
        }
    }
    LetterGrade::F
}

/// 计算单条成绩的派生字段
///
/// `max_marks` 必须为正；得分必须落在 `[0, max_marks]` 内，越界
/// 一律拒绝，从不截断。通过判定比较的是原始得分与及格线，与
/// 百分比无关。
pub fn compute(marks_obtained: f64, max_marks: f64, passing_marks: f64) -> Result<GradeBreakdown> {
    if max_marks <= 0.0 {
        return Err(GradeSystemError::invalid_test_configuration(format!(
            "满分必须为正数, 当前为 {max_marks}"
        )));
    }
    // NaN 与比较运算永远为 false，需显式排除非有限值
    if !marks_obtained.is_finite() || marks_obtained < 0.0 || marks_obtained > max_marks {
        return Err(GradeSystemError::out_of_range_marks(format!(
            "得分 {marks_obtained} 超出 [0, {max_marks}] 范围"
        )));
    }

    let percentage = round2(marks_obtained / max_marks * 100.0);
    let grade = grade_for_percentage(percentage);
    let is_passed = marks_obtained >= passing_marks;

    Ok(GradeBreakdown {
        percentage,
        grade,
        is_passed,
    })
}

/// 提交时间所在学年，按自然年推导，如 2025 年任意时刻 -> "2025-2026"
pub fn academic_year_for(ts: DateTime<Utc>) -> String {
    let year = ts.year();
    format!("{}-{}", year, year + 1)
}

/// 提交时间所在月份，如 "2026-03"，时间序列聚合的分组键
pub fn month_period_of(ts: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", ts.year(), ts.month())
}
