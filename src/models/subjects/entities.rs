use serde::{Deserialize, Serialize};

// 科目实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub is_active: bool,
}

/// 测验上的科目引用
///
/// 历史数据允许两种形态: 指向 subjects 表的结构化引用，或一段
/// 自由文本。聚合时两种形态都是合法的分组键。
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubjectRef {
    /// 指向 subjects 表的 ID
    Resolved(i64),
    /// 自由文本标签 (已去除首尾空白)
    Unresolved(String),
}

impl SubjectRef {
    /// 从测验行的两个科目列构造引用
    ///
    /// subject_id 优先；其次取非空白的自由文本；两者都没有则
    /// 返回 None，调用方将其归入未分类桶。
    pub fn from_columns(subject_id: Option<i64>, subject_label: Option<&str>) -> Option<Self> {
        if let Some(id) = subject_id {
            return Some(SubjectRef::Resolved(id));
        }
        match subject_label.map(str::trim) {
            Some(label) if !label.is_empty() => Some(SubjectRef::Unresolved(label.to_string())),
            _ => None,
        }
    }
}
