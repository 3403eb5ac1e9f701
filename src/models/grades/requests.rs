use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::grades::entities::{GradeStatus, LetterGrade};

/// 批量提交中的单个学生分数条目
#[derive(Debug, Clone, Deserialize)]
pub struct MarksEntry {
    pub student_id: i64,
    pub marks_obtained: f64,
    /// 可选评语，最长 500 字符
    pub remarks: Option<String>,
}

// 用于存储层的 upsert 输入，全部派生字段在写入前已算好
#[derive(Debug, Clone)]
pub struct NewGradeRecord {
    pub test_id: i64,
    pub student_id: i64,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub passing_marks: f64,
    pub percentage: f64,
    pub grade: LetterGrade,
    pub is_passed: bool,
    pub status: GradeStatus,
    pub remarks: Option<String>,
    pub graded_by: i64,
    pub graded_at: DateTime<Utc>,
    // 以下两个字段仅在首次插入时生效，更新路径保留原值
    pub submitted_at: DateTime<Utc>,
    pub academic_year: String,
}

// 用于存储层的列表查询参数
#[derive(Debug, Clone, Default)]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub test_id: Option<i64>,
    pub student_id: Option<i64>,
    pub academic_year: Option<String>,
    /// 是否包含已软删除的记录
    pub include_inactive: bool,
}
