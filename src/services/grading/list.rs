//! 成绩查询

use super::GradingService;
use crate::errors::Result;
use crate::models::grades::{
    entities::{GradeOrder, GradeRecord},
    requests::GradeListQuery,
    responses::GradeListResponse,
};

/// 按唯一键查询成绩，已软删除的记录视为不存在
pub async fn get_grade(
    service: &GradingService,
    test_id: i64,
    student_id: i64,
) -> Result<Option<GradeRecord>> {
    let record = service.store.get_grade(test_id, student_id).await?;
    Ok(record.filter(|r| r.is_active))
}

pub async fn grades_for_test(
    service: &GradingService,
    test_id: i64,
    order: GradeOrder,
) -> Result<Vec<GradeRecord>> {
    service.store.find_by_test(test_id, order).await
}

pub async fn grades_for_student(
    service: &GradingService,
    student_id: i64,
    order: GradeOrder,
) -> Result<Vec<GradeRecord>> {
    service.store.find_by_student(student_id, order).await
}

pub async fn list_grades(
    service: &GradingService,
    query: GradeListQuery,
) -> Result<GradeListResponse> {
    service.store.list_grades(query).await
}
