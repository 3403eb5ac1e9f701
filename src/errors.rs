//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 错误代码是对外契约的一部分：批量提交的逐条失败会把代码与
//! 可读原因一起返回给调用方。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gradesystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum GradeSystemError {
            $($variant(String),)*
        }

        impl GradeSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradeSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradeSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradeSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradeSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradeSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradesystem_errors! {
    TestNotFound("E001", "Test Not Found"),
    StudentNotFound("E002", "Student Not Found"),
    InvalidTestConfiguration("E003", "Invalid Test Configuration"),
    OutOfRangeMarks("E004", "Marks Out Of Range"),
    CannotDeleteGradedTest("E005", "Cannot Delete Graded Test"),
    StorageUnavailable("E006", "Storage Unavailable"),
    Validation("E007", "Validation Error"),
    DatabaseConfig("E008", "Database Configuration Error"),
    DatabaseConnection("E009", "Database Connection Error"),
    DatabaseOperation("E010", "Database Operation Error"),
    CacheConnection("E011", "Cache Connection Error"),
    CachePluginNotFound("E012", "Cache Plugin Not Found"),
    Serialization("E013", "Serialization Error"),
}

impl GradeSystemError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否属于批量提交中仅影响单条记录的错误
    ///
    /// 整批失败的错误（测验不存在、测验配置非法）不在此列。
    pub fn is_entry_scoped(&self) -> bool {
        matches!(
            self,
            GradeSystemError::StudentNotFound(_)
                | GradeSystemError::OutOfRangeMarks(_)
                | GradeSystemError::Validation(_)
                | GradeSystemError::StorageUnavailable(_)
                | GradeSystemError::DatabaseOperation(_)
        )
    }
}

impl fmt::Display for GradeSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradeSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradeSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        // 连接类失败视为瞬态的存储不可用，其余归为数据库操作错误
        match &err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                GradeSystemError::StorageUnavailable(err.to_string())
            }
            _ => GradeSystemError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GradeSystemError {
    fn from(err: serde_json::Error) -> Self {
        GradeSystemError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradeSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradeSystemError::test_not_found("test").code(), "E001");
        assert_eq!(GradeSystemError::out_of_range_marks("test").code(), "E004");
        assert_eq!(
            GradeSystemError::cannot_delete_graded_test("test").code(),
            "E005"
        );
        assert_eq!(GradeSystemError::validation("test").code(), "E007");
        assert_eq!(GradeSystemError::cache_connection("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GradeSystemError::invalid_test_configuration("test").error_type(),
            "Invalid Test Configuration"
        );
        assert_eq!(
            GradeSystemError::storage_unavailable("test").error_type(),
            "Storage Unavailable"
        );
    }

    #[test]
    fn test_error_message() {
        let err = GradeSystemError::out_of_range_marks("marks 150 exceed max 100");
        assert_eq!(err.message(), "marks 150 exceed max 100");
    }

    #[test]
    fn test_format_simple() {
        let err = GradeSystemError::student_not_found("student 42 not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Student Not Found"));
        assert!(formatted.contains("42"));
    }

    #[test]
    fn test_entry_scoped_classification() {
        assert!(GradeSystemError::student_not_found("x").is_entry_scoped());
        assert!(GradeSystemError::out_of_range_marks("x").is_entry_scoped());
        assert!(!GradeSystemError::test_not_found("x").is_entry_scoped());
        assert!(!GradeSystemError::invalid_test_configuration("x").is_entry_scoped());
    }
}
