use serde::Serialize;

use crate::models::PaginationInfo;
use crate::models::grades::entities::GradeRecord;

/// 批量提交结果
///
/// 不变式: processed.len() + errors.len() == total_entries
#[derive(Debug, Clone, Serialize)]
pub struct BatchSubmitResult {
    /// 本次批量的追踪 ID
    pub batch_id: String,
    pub test_id: i64,
    pub total_entries: usize,
    /// 成功写入的记录
    pub processed: Vec<GradeRecord>,
    /// 失败条目，不影响其余条目的处理
    pub errors: Vec<EntrySubmitError>,
}

/// 单条提交失败信息
#[derive(Debug, Clone, Serialize)]
pub struct EntrySubmitError {
    pub student_id: i64,
    /// 稳定错误码，如 E002
    pub code: &'static str,
    pub reason: String,
}

/// 成绩列表响应
#[derive(Debug, Clone, Serialize)]
pub struct GradeListResponse {
    pub items: Vec<GradeRecord>,
    pub pagination: PaginationInfo,
}
