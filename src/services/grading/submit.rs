//! 批量成绩提交
//!
//! 测验快照每批解析一次；逐条独立处理，单条失败只记入该条的
//! 失败信息，不中断其余条目。每条成绩在落库前已算好全部派生
//! 字段，存储层的单语句 upsert 保证不会出现半成品记录。

use chrono::Utc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::GradingService;
use crate::errors::{GradeSystemError, Result};
use crate::grading;
use crate::models::grades::{
    entities::GradeRecord,
    requests::{MarksEntry, NewGradeRecord},
    responses::{BatchSubmitResult, EntrySubmitError},
};
use crate::models::tests::entities::TestSnapshot;
use crate::services::analytics::class_stats::class_stats_cache_key;
use crate::utils::validate_remarks;

pub async fn submit_marks(
    service: &GradingService,
    test_id: i64,
    entries: Vec<MarksEntry>,
    grader_id: i64,
) -> Result<BatchSubmitResult> {
    let batch_id = Uuid::new_v4().to_string();
    let span = info_span!("marks_batch", batch_id = %batch_id, test_id, grader_id);
    run_batch(service, batch_id, test_id, entries, grader_id)
        .instrument(span)
        .await
}

async fn run_batch(
    service: &GradingService,
    batch_id: String,
    test_id: i64,
    entries: Vec<MarksEntry>,
    grader_id: i64,
) -> Result<BatchSubmitResult> {
    // 整批只做一次测验解析；测验不存在或已停用时整批失败
    let test = service
        .tests
        .get_active_test(test_id)
        .await?
        .ok_or_else(|| {
            GradeSystemError::test_not_found(format!("测验 {test_id} 不存在或已停用"))
        })?;

    // 满分非法时任何条目都算不出派生字段，同样整批失败
    if test.max_marks <= 0.0 {
        return Err(GradeSystemError::invalid_test_configuration(format!(
            "测验 {test_id} 的满分必须为正数, 当前为 {}",
            test.max_marks
        )));
    }

    let total_entries = entries.len();
    let mut processed: Vec<GradeRecord> = Vec::with_capacity(total_entries);
    let mut errors: Vec<EntrySubmitError> = Vec::new();

    for entry in entries {
        let student_id = entry.student_id;
        match process_entry(service, &test, entry, grader_id).await {
            Ok(record) => processed.push(record),
            // 整批失败类错误不折叠进单条失败，直接中止批次
            Err(e) if !e.is_entry_scoped() => return Err(e),
            Err(e) => {
                debug!(
                    student_id,
                    code = e.code(),
                    "条目提交失败: {}",
                    e.message()
                );
                errors.push(EntrySubmitError {
                    student_id,
                    code: e.code(),
                    reason: e.message().to_string(),
                });
            }
        }
    }

    if !processed.is_empty() {
        // 有成绩落库后才需要刷新缓存与测验统计
        service
            .cache
            .remove(&class_stats_cache_key(test_id))
            .await;
        refresh_test_stats(service, test_id).await;
    }

    info!(
        total = total_entries,
        processed = processed.len(),
        failed = errors.len(),
        "批量提交完成"
    );

    Ok(BatchSubmitResult {
        batch_id,
        test_id,
        total_entries,
        processed,
        errors,
    })
}

/// 处理单个条目：学生解析 -> 派生计算 -> 评语校验 -> 原子落库
///
/// 任何一步失败都只影响该条目。学生检查先于得分范围检查，
/// 同时违反两者的条目报告 StudentNotFound。
async fn process_entry(
    service: &GradingService,
    test: &TestSnapshot,
    entry: MarksEntry,
    grader_id: i64,
) -> Result<GradeRecord> {
    service
        .students
        .get_active_student(entry.student_id)
        .await?
        .ok_or_else(|| {
            GradeSystemError::student_not_found(format!(
                "学生 {} 不存在或已停用",
                entry.student_id
            ))
        })?;

    let breakdown = grading::compute(entry.marks_obtained, test.max_marks, test.passing_marks)?;

    validate_remarks(entry.remarks.as_deref()).map_err(GradeSystemError::validation)?;

    // submitted_at 与 academic_year 只在首次插入时生效，
    // 更新路径由存储层保留原值
    let now = Utc::now();
    let record = NewGradeRecord {
        test_id: test.id,
        student_id: entry.student_id,
        marks_obtained: entry.marks_obtained,
        max_marks: test.max_marks,
        passing_marks: test.passing_marks,
        percentage: breakdown.percentage,
        grade: breakdown.grade,
        is_passed: breakdown.is_passed,
        status: breakdown.status(),
        remarks: entry.remarks,
        graded_by: grader_id,
        graded_at: now,
        submitted_at: now,
        academic_year: grading::academic_year_for(now),
    };

    service.store.upsert_grade(record).await
}

/// 回写测验上的反规范化统计，尽力而为
async fn refresh_test_stats(service: &GradingService, test_id: i64) {
    let count = match service.store.count_active_for_test(test_id).await {
        Ok(count) => count,
        Err(e) => {
            warn!("统计测验 {test_id} 成绩数失败, 跳过统计回写: {e}");
            return;
        }
    };

    if let Err(e) = service.tests.record_marks_update(test_id, count).await {
        warn!("回写测验 {test_id} 成绩统计失败: {e}");
    }
}
