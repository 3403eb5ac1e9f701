//! 外部协作方契约
//!
//! 测验、学生、科目的生命周期由外部系统管理，引擎只通过这些窄
//! 接口读取快照。`SeaOrmStorage` 在同库部署时直接实现它们，
//! 其他部署形态可以接远程服务。

use crate::errors::Result;
use crate::models::students::entities::Student;
use crate::models::subjects::entities::Subject;
use crate::models::tests::entities::TestSnapshot;

#[async_trait::async_trait]
pub trait TestProvider: Send + Sync {
    // 获取活跃测验，提交路径使用；不存在或已停用返回 None
    async fn get_active_test(&self, test_id: i64) -> Result<Option<TestSnapshot>>;
    // 获取任意生命周期状态的测验快照，聚合关联使用；
    // 仅当测验被硬删除时返回 None
    async fn get_test_snapshot(&self, test_id: i64) -> Result<Option<TestSnapshot>>;
    // 回写测验上的反规范化成绩统计 (result_count / last_marks_update)，
    // 尽力而为，失败不影响成绩写入
    async fn record_marks_update(&self, test_id: i64, result_count: i64) -> Result<()>;
}

#[async_trait::async_trait]
pub trait StudentProvider: Send + Sync {
    // 获取活跃学生；不存在或已停用返回 None
    async fn get_active_student(&self, student_id: i64) -> Result<Option<Student>>;
}

#[async_trait::async_trait]
pub trait SubjectProvider: Send + Sync {
    // 解析科目展示信息；科目行已被删除时返回 None，
    // 调用方保留分组桶并使用兜底名称，绝不丢数据
    async fn resolve_subject(&self, subject_id: i64) -> Result<Option<Subject>>;
}
