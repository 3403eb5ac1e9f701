use serde::{Deserialize, Serialize};

use crate::models::grades::entities::LetterGrade;

/// 班级统计响应
///
/// 该结构会被序列化进对象缓存，因此同时实现 Deserialize。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassStatistics {
    pub test_id: i64,
    pub total_students: i64,
    pub average_marks: f64,
    pub average_percentage: f64,
    pub pass_rate: f64,
    pub highest_marks: f64,
    pub lowest_marks: f64,
    /// 八个等级桶按表格顺序输出，计数可以为 0
    pub grade_distribution: Vec<GradeBucket>,
}

/// 等级分布桶
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeBucket {
    pub grade: LetterGrade,
    pub count: i64,
}

/// 学生表现总评
#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub student_id: i64,
    pub total_tests: i64,
    pub passed_tests: i64,
    pub total_marks: f64,
    pub total_max_marks: f64,
    pub average_score: f64,
}

/// 科目维度表现
#[derive(Debug, Clone, Serialize)]
pub struct SubjectPerformance {
    /// 展示名称，未分类科目使用哨兵名称
    pub subject: String,
    /// 结构化科目才有 ID，自由文本科目为 None
    pub subject_id: Option<i64>,
    pub total_tests: i64,
    pub passed_tests: i64,
    pub total_marks: f64,
    pub total_max_marks: f64,
    pub percentage: f64,
    pub pass_rate: f64,
}

/// 月度进度点
#[derive(Debug, Clone, Serialize)]
pub struct PeriodProgress {
    /// "YYYY-MM"，输出按该字段升序
    pub period: String,
    pub percentage: f64,
    pub tests_count: i64,
}
