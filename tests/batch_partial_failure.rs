//! 批量提交的部分失败语义：单条失败不影响其余条目，
//! 整批失败类错误则不写入任何记录。

use rust_gradesystem_core::models::grades::entities::GradeOrder;
use rust_gradesystem_core::models::grades::requests::MarksEntry;
use rust_gradesystem_core::models::subjects::entities::SubjectRef;

mod test_support;
use test_support::{entry, memory_engine, student, test_snapshot};

#[tokio::test]
async fn invalid_entries_fail_alone_and_never_reach_storage() {
    let engine = memory_engine();
    engine.storage.seed_test(test_snapshot(1, None, 100.0, 40.0));
    for id in 1..=3 {
        engine.storage.seed_student(student(id, &format!("学生{id}")));
    }

    // 五条里两条非法：学生 99 不存在，学生 3 得分越界
    let result = engine
        .grading
        .submit_marks(
            1,
            vec![
                entry(1, 85.0),
                entry(99, 70.0),
                entry(2, 40.0),
                entry(3, 150.0),
                entry(3, 33.0),
            ],
            500,
        )
        .await
        .unwrap();

    assert_eq!(result.total_entries, 5);
    assert_eq!(result.processed.len(), 3);
    assert_eq!(result.errors.len(), 2);

    let error_for = |id: i64| result.errors.iter().find(|e| e.student_id == id).unwrap();
    assert_eq!(error_for(99).code, "E002");
    let out_of_range = error_for(3);
    assert_eq!(out_of_range.code, "E004");
    assert!(!out_of_range.reason.is_empty());

    // 非法条目没有落库；学生 3 只有随后那条合法提交
    let records = engine
        .grading
        .grades_for_test(1, GradeOrder::MarksDesc)
        .await
        .unwrap();
    assert_eq!(records.len(), 3);
    let third = records.iter().find(|r| r.student_id == 3).unwrap();
    assert_eq!(third.marks_obtained, 33.0);
    assert!(!third.is_passed);
    assert!(engine.grading.get_grade(1, 99).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_test_aborts_whole_batch() {
    let engine = memory_engine();
    engine.storage.seed_student(student(1, "韩梅梅"));

    let err = engine
        .grading
        .submit_marks(404, vec![entry(1, 60.0)], 500)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E001");
}

#[tokio::test]
async fn inactive_test_aborts_whole_batch() {
    let engine = memory_engine();
    let mut test = test_snapshot(1, None, 100.0, 40.0);
    test.is_active = false;
    engine.storage.seed_test(test);
    engine.storage.seed_student(student(1, "韩梅梅"));

    let err = engine
        .grading
        .submit_marks(1, vec![entry(1, 60.0)], 500)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E001");

    let records = engine
        .grading
        .grades_for_test(1, GradeOrder::MarksDesc)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn non_positive_max_marks_aborts_whole_batch() {
    let engine = memory_engine();
    engine.storage.seed_test(test_snapshot(1, None, 0.0, 0.0));
    engine.storage.seed_student(student(1, "韩梅梅"));

    let err = engine
        .grading
        .submit_marks(1, vec![entry(1, 0.0)], 500)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E003");
}

#[tokio::test]
async fn inactive_student_fails_only_that_entry() {
    let engine = memory_engine();
    engine.storage.seed_test(test_snapshot(1, None, 100.0, 40.0));
    engine.storage.seed_student(student(1, "李雷"));
    let mut dropped_out = student(2, "休学生");
    dropped_out.is_active = false;
    engine.storage.seed_student(dropped_out);

    let result = engine
        .grading
        .submit_marks(1, vec![entry(1, 75.0), entry(2, 80.0)], 500)
        .await
        .unwrap();

    assert_eq!(result.processed.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].student_id, 2);
    assert_eq!(result.errors[0].code, "E002");
}

#[tokio::test]
async fn overlong_remarks_fail_only_that_entry() {
    let engine = memory_engine();
    engine.storage.seed_test(test_snapshot(
        1,
        Some(SubjectRef::Resolved(1)),
        100.0,
        40.0,
    ));
    engine.storage.seed_student(student(1, "李雷"));
    engine.storage.seed_student(student(2, "韩梅梅"));

    let result = engine
        .grading
        .submit_marks(
            1,
            vec![
                MarksEntry {
                    student_id: 1,
                    marks_obtained: 66.0,
                    remarks: Some("评".repeat(501)),
                },
                MarksEntry {
                    student_id: 2,
                    marks_obtained: 77.0,
                    remarks: Some("稳步提升".to_string()),
                },
            ],
            500,
        )
        .await
        .unwrap();

    assert_eq!(result.processed.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].student_id, 1);
    assert_eq!(result.errors[0].code, "E007");

    let stored = engine.grading.get_grade(1, 2).await.unwrap().unwrap();
    assert_eq!(stored.remarks.as_deref(), Some("稳步提升"));
    assert!(engine.grading.get_grade(1, 1).await.unwrap().is_none());
}

#[tokio::test]
async fn batch_result_carries_derived_fields() {
    let engine = memory_engine();
    engine.storage.seed_test(test_snapshot(1, None, 100.0, 40.0));
    engine.storage.seed_student(student(1, "李雷"));

    let result = engine
        .grading
        .submit_marks(1, vec![entry(1, 45.0)], 500)
        .await
        .unwrap();

    assert!(!result.batch_id.is_empty());
    assert_eq!(result.test_id, 1);
    let record = &result.processed[0];
    // 45/100 在及格线 40 之上，落入 C 档
    assert_eq!(record.percentage, 45.0);
    assert_eq!(record.grade.as_str(), "C");
    assert!(record.is_passed);
    assert_eq!(record.status.to_string(), "passed");
    assert_eq!(record.graded_by, 500);
    assert_eq!(record.max_marks, 100.0);
    assert_eq!(record.passing_marks, 40.0);
}
