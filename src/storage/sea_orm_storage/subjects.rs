//! 科目快照读取

use super::{SeaOrmStorage, map_db_err};
use crate::entity::subjects::Entity as Subjects;
use crate::errors::Result;
use crate::models::subjects::entities::Subject;
use sea_orm::EntityTrait;

impl SeaOrmStorage {
    /// 解析科目展示信息
    ///
    /// 停用的科目仍可解析（历史成绩要继续展示它的名字），
    /// 只有行被硬删除时才返回 None。
    pub async fn resolve_subject_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询科目失败", e))?;

        Ok(result.map(|m| m.into_subject()))
    }
}
