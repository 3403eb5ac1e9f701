//! 测验快照读取与统计回写

use super::{SeaOrmStorage, map_db_err};
use crate::entity::tests::{Column, Entity as Tests};
use crate::errors::Result;
use crate::models::tests::entities::TestSnapshot;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

impl SeaOrmStorage {
    /// 获取活跃测验，提交路径使用
    pub async fn get_active_test_impl(&self, test_id: i64) -> Result<Option<TestSnapshot>> {
        let result = Tests::find_by_id(test_id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询测验失败", e))?;

        Ok(result.map(|m| m.into_snapshot()))
    }

    /// 获取任意生命周期状态的测验快照，聚合关联使用
    pub async fn get_test_snapshot_impl(&self, test_id: i64) -> Result<Option<TestSnapshot>> {
        let result = Tests::find_by_id(test_id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询测验快照失败", e))?;

        Ok(result.map(|m| m.into_snapshot()))
    }

    /// 回写测验的反规范化成绩统计
    pub async fn record_marks_update_impl(&self, test_id: i64, result_count: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        Tests::update_many()
            .col_expr(
                Column::ResultCount,
                sea_orm::sea_query::Expr::value(result_count),
            )
            .col_expr(
                Column::LastMarksUpdate,
                sea_orm::sea_query::Expr::value(Some(now)),
            )
            .filter(Column::Id.eq(test_id))
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err("更新测验统计失败", e))?;

        Ok(())
    }
}
