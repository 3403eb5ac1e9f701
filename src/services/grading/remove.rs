//! 成绩软删除与测验删除守卫
//!
//! 引擎从不硬删除成绩；停用由外部协作方（如测验管理）触发。

use tracing::warn;

use super::GradingService;
use crate::errors::{GradeSystemError, Result};
use crate::services::analytics::class_stats::class_stats_cache_key;

pub async fn remove_grade(
    service: &GradingService,
    test_id: i64,
    student_id: i64,
) -> Result<bool> {
    let removed = service.store.deactivate_grade(test_id, student_id).await?;

    if removed {
        // 活跃记录集变了，班级统计缓存与测验统计都要刷新
        service
            .cache
            .remove(&class_stats_cache_key(test_id))
            .await;

        match service.store.count_active_for_test(test_id).await {
            Ok(count) => {
                if let Err(e) = service.tests.record_marks_update(test_id, count).await {
                    warn!("回写测验 {test_id} 成绩统计失败: {e}");
                }
            }
            Err(e) => warn!("统计测验 {test_id} 成绩数失败, 跳过统计回写: {e}"),
        }
    }

    Ok(removed)
}

pub async fn has_active_records(service: &GradingService, test_id: i64) -> Result<bool> {
    service.store.has_active_records_for_test(test_id).await
}

/// 测验删除守卫
///
/// 测验管理方删除测验前必须调用；仍有活跃成绩的测验不许删除，
/// 已全部软删除的测验可以删。
pub async fn ensure_test_deletable(service: &GradingService, test_id: i64) -> Result<()> {
    if service.store.has_active_records_for_test(test_id).await? {
        return Err(GradeSystemError::cannot_delete_graded_test(format!(
            "测验 {test_id} 仍有成绩记录, 不能删除"
        )));
    }
    Ok(())
}
