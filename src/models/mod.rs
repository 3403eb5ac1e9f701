//! 业务模型
//!
//! 与 entity 模块的数据库实体分离，服务层和调用方只面对这里的类型。

pub mod analytics;
pub mod common;
pub mod grades;
pub mod students;
pub mod subjects;

pub use common::pagination::PaginationInfo;
