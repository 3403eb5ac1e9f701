pub mod class_stats;
pub mod progress;
pub mod subjects;
pub mod summary;

use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::models::analytics::responses::{
    ClassStatistics, PeriodProgress, StudentSummary, SubjectPerformance,
};
use crate::providers::{SubjectProvider, TestProvider};
use crate::storage::GradeStore;

/// 统计聚合服务
///
/// 全部为只读计算：相同的存储内容得到相同的输出，与调用顺序
/// 无关。没有记录时返回零值默认，从不因除零报错。
#[derive(Clone)]
pub struct AnalyticsService {
    tests: Arc<dyn TestProvider>,
    subjects: Arc<dyn SubjectProvider>,
    store: Arc<dyn GradeStore>,
    cache: Arc<dyn ObjectCache>,
}

impl AnalyticsService {
    pub fn new(
        tests: Arc<dyn TestProvider>,
        subjects: Arc<dyn SubjectProvider>,
        store: Arc<dyn GradeStore>,
        cache: Arc<dyn ObjectCache>,
    ) -> Self {
        Self {
            tests,
            subjects,
            store,
            cache,
        }
    }

    /// 一个测验的班级统计（带缓存）
    pub async fn class_stats(&self, test_id: i64) -> Result<ClassStatistics> {
        class_stats::class_stats(self, test_id).await
    }

    /// 一个学生的表现总评
    pub async fn student_summary(&self, student_id: i64) -> Result<StudentSummary> {
        summary::student_summary(self, student_id).await
    }

    /// 一个学生按科目分组的表现
    pub async fn subject_performance(&self, student_id: i64) -> Result<Vec<SubjectPerformance>> {
        subjects::subject_performance(self, student_id).await
    }

    /// 一个学生按月份分组的进度，按时间升序
    pub async fn monthly_progress(&self, student_id: i64) -> Result<Vec<PeriodProgress>> {
        progress::monthly_progress(self, student_id).await
    }
}
