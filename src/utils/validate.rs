/// 评语长度上限
pub const MAX_REMARKS_CHARS: usize = 500;

/// 评语长度校验
///
/// 按字符数而不是字节数计算，评语允许包含中文。
/// 超长一律拒绝，不做截断。
pub fn validate_remarks(remarks: Option<&str>) -> Result<(), &'static str> {
    match remarks {
        Some(text) if text.chars().count() > MAX_REMARKS_CHARS => {
            Err("Remarks must be at most 500 characters")
        }
        _ => Ok(()),
    }
}
