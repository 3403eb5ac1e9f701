//! 学生快照读取

use super::{SeaOrmStorage, map_db_err};
use crate::entity::students::{Column, Entity as Students};
use crate::errors::Result;
use crate::models::students::entities::Student;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

impl SeaOrmStorage {
    /// 获取活跃学生
    pub async fn get_active_student_impl(&self, student_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }
}
