pub mod list;
pub mod remove;
pub mod submit;

use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::models::grades::{
    entities::{GradeOrder, GradeRecord},
    requests::{GradeListQuery, MarksEntry},
    responses::{BatchSubmitResult, GradeListResponse},
};
use crate::providers::{StudentProvider, TestProvider};
use crate::storage::GradeStore;

/// 成绩提交与查询服务
///
/// 写路径的全部校验与派生计算都发生在这里，存储层只负责
/// 原子落库。
#[derive(Clone)]
pub struct GradingService {
    tests: Arc<dyn TestProvider>,
    students: Arc<dyn StudentProvider>,
    store: Arc<dyn GradeStore>,
    cache: Arc<dyn ObjectCache>,
}

impl GradingService {
    pub fn new(
        tests: Arc<dyn TestProvider>,
        students: Arc<dyn StudentProvider>,
        store: Arc<dyn GradeStore>,
        cache: Arc<dyn ObjectCache>,
    ) -> Self {
        Self {
            tests,
            students,
            store,
            cache,
        }
    }

    /// 批量提交成绩
    pub async fn submit_marks(
        &self,
        test_id: i64,
        entries: Vec<MarksEntry>,
        grader_id: i64,
    ) -> Result<BatchSubmitResult> {
        submit::submit_marks(self, test_id, entries, grader_id).await
    }

    /// 查询单条成绩（已软删除的记录视为不存在）
    pub async fn get_grade(&self, test_id: i64, student_id: i64) -> Result<Option<GradeRecord>> {
        list::get_grade(self, test_id, student_id).await
    }

    /// 一个测验的全部活跃成绩
    pub async fn grades_for_test(
        &self,
        test_id: i64,
        order: GradeOrder,
    ) -> Result<Vec<GradeRecord>> {
        list::grades_for_test(self, test_id, order).await
    }

    /// 一个学生的全部活跃成绩
    pub async fn grades_for_student(
        &self,
        student_id: i64,
        order: GradeOrder,
    ) -> Result<Vec<GradeRecord>> {
        list::grades_for_student(self, student_id, order).await
    }

    /// 分页列出成绩
    pub async fn list_grades(&self, query: GradeListQuery) -> Result<GradeListResponse> {
        list::list_grades(self, query).await
    }

    /// 软删除一条成绩
    pub async fn remove_grade(&self, test_id: i64, student_id: i64) -> Result<bool> {
        remove::remove_grade(self, test_id, student_id).await
    }

    /// 一个测验是否还有活跃成绩
    pub async fn has_active_records_for_test(&self, test_id: i64) -> Result<bool> {
        remove::has_active_records(self, test_id).await
    }

    /// 测验删除守卫：仍有活跃成绩的测验不许删除
    pub async fn ensure_test_deletable(&self, test_id: i64) -> Result<()> {
        remove::ensure_test_deletable(self, test_id).await
    }
}
