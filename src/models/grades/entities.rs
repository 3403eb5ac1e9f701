use serde::{Deserialize, Serialize};

// 等级 (八档制)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus, // >= 90%
    #[serde(rename = "A")]
    A, // >= 80%
    #[serde(rename = "B+")]
    BPlus, // >= 70%
    #[serde(rename = "B")]
    B, // >= 60%
    #[serde(rename = "C+")]
    CPlus, // >= 50%
    #[serde(rename = "C")]
    C, // >= 40%
    #[serde(rename = "D")]
    D, // >= 35%
    #[serde(rename = "F")]
    F, // < 35%
}

impl LetterGrade {
    /// 按表格顺序列出全部等级，分布统计按此顺序输出
    pub fn all() -> &'static [LetterGrade] {
        &[
            LetterGrade::APlus,
            LetterGrade::A,
            LetterGrade::BPlus,
            LetterGrade::B,
            LetterGrade::CPlus,
            LetterGrade::C,
            LetterGrade::D,
            LetterGrade::F,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl<'de> Deserialize<'de> for LetterGrade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<LetterGrade>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的等级: '{s}'. 支持的等级: A+, A, B+, B, C+, C, D, F"
            ))
        })
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(LetterGrade::APlus),
            "A" => Ok(LetterGrade::A),
            "B+" => Ok(LetterGrade::BPlus),
            "B" => Ok(LetterGrade::B),
            "C+" => Ok(LetterGrade::CPlus),
            "C" => Ok(LetterGrade::C),
            "D" => Ok(LetterGrade::D),
            "F" => Ok(LetterGrade::F),
            _ => Err(format!("Invalid letter grade: {s}")),
        }
    }
}

// 通过/未通过状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    Passed, // 通过
    Failed, // 未通过
}

impl GradeStatus {
    pub const PASSED: &'static str = "passed";
    pub const FAILED: &'static str = "failed";

    pub fn from_passed(is_passed: bool) -> Self {
        if is_passed {
            GradeStatus::Passed
        } else {
            GradeStatus::Failed
        }
    }
}

impl<'de> Deserialize<'de> for GradeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            GradeStatus::PASSED => Ok(GradeStatus::Passed),
            GradeStatus::FAILED => Ok(GradeStatus::Failed),
            _ => Err(serde::de::Error::custom(format!(
                "无效的成绩状态: '{s}'. 支持的状态: passed, failed"
            ))),
        }
    }
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeStatus::Passed => write!(f, "{}", GradeStatus::PASSED),
            GradeStatus::Failed => write!(f, "{}", GradeStatus::FAILED),
        }
    }
}

impl std::str::FromStr for GradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passed" => Ok(GradeStatus::Passed),
            "failed" => Ok(GradeStatus::Failed),
            _ => Err(format!("Invalid grade status: {s}")),
        }
    }
}

// 查询排序方式，由调用方指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeOrder {
    MarksDesc,   // 按得分降序
    RecentFirst, // 按提交时间降序
}

// 成绩记录实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRecord {
    // 唯一 ID
    pub id: i64,
    // 关联的测验 ID
    pub test_id: i64,
    // 关联的学生 ID
    pub student_id: i64,
    // 实际得分
    pub marks_obtained: f64,
    // 满分 (写入时从测验快照复制)
    pub max_marks: f64,
    // 及格线 (写入时从测验快照复制)
    pub passing_marks: f64,
    // 百分比，保留两位小数
    pub percentage: f64,
    // 等级
    pub grade: LetterGrade,
    // 是否通过
    pub is_passed: bool,
    // 状态字符串，与 is_passed 一致
    pub status: GradeStatus,
    // 评语 (最长 500 字符)
    pub remarks: Option<String>,
    // 评分人 ID (由调用方提供)
    pub graded_by: i64,
    // 最近一次评分时间
    pub graded_at: chrono::DateTime<chrono::Utc>,
    // 首次提交时间 (重复提交时保留)
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    // 学年，如 "2025-2026" (重复提交时保留)
    pub academic_year: String,
    // 软删除标记
    pub is_active: bool,
}
