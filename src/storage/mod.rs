use std::sync::Arc;

use crate::models::grades::{
    entities::{GradeOrder, GradeRecord},
    requests::{GradeListQuery, NewGradeRecord},
    responses::GradeListResponse,
};

use crate::errors::Result;

pub mod memory_storage;
pub mod sea_orm_storage;

/// 成绩记录的持久化契约
///
/// upsert 必须在 (test_id, student_id) 上原子地创建或替换，
/// 并发的同键写入不得产生重复行或半成品行。
#[async_trait::async_trait]
pub trait GradeStore: Send + Sync {
    /// 写路径
    // 原子写入成绩，重复提交保留 submitted_at 与 academic_year
    async fn upsert_grade(&self, record: NewGradeRecord) -> Result<GradeRecord>;
    // 软删除成绩，返回是否有活跃记录被停用；从不硬删除
    async fn deactivate_grade(&self, test_id: i64, student_id: i64) -> Result<bool>;

    /// 读路径
    // 按唯一键读取，包含已停用记录 (is_active 字段可供判断)
    async fn get_grade(&self, test_id: i64, student_id: i64) -> Result<Option<GradeRecord>>;
    // 一个测验的全部活跃成绩，排序由调用方指定
    async fn find_by_test(&self, test_id: i64, order: GradeOrder) -> Result<Vec<GradeRecord>>;
    // 一个学生的全部活跃成绩，排序由调用方指定
    async fn find_by_student(&self, student_id: i64, order: GradeOrder)
    -> Result<Vec<GradeRecord>>;
    // 分页列出成绩
    async fn list_grades(&self, query: GradeListQuery) -> Result<GradeListResponse>;
    // 一个测验的活跃成绩数
    async fn count_active_for_test(&self, test_id: i64) -> Result<i64>;
    // 测验删除守卫：测验是否还有活跃成绩
    async fn has_active_records_for_test(&self, test_id: i64) -> Result<bool>;
}

/// 创建默认的 SeaORM 存储后端并完成迁移
///
/// 返回具体类型：同一个实例同时实现 GradeStore 与三个
/// Provider 契约，由调用方按需要收窄。
pub async fn create_storage() -> Result<Arc<sea_orm_storage::SeaOrmStorage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
