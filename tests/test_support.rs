//! 集成测试公共设施
//!
//! 服务层场景跑在内存存储上；涉及唯一索引与 upsert 语义的场景
//! 另行连接 sqlite::memory: 走 SeaORM 存储。

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use rust_gradesystem_core::cache::ObjectCache;
use rust_gradesystem_core::cache::object_cache::moka::MokaObjectCache;
use rust_gradesystem_core::grading;
use rust_gradesystem_core::models::grades::requests::{MarksEntry, NewGradeRecord};
use rust_gradesystem_core::models::students::entities::Student;
use rust_gradesystem_core::models::subjects::entities::{Subject, SubjectRef};
use rust_gradesystem_core::models::tests::entities::{TestSnapshot, TestType};
use rust_gradesystem_core::services::{AnalyticsService, GradingService};
use rust_gradesystem_core::storage::memory_storage::MemoryStorage;

/// 内存存储上装配好的引擎，两个服务共享同一个缓存实例
pub struct Engine {
    pub storage: Arc<MemoryStorage>,
    pub cache: Arc<dyn ObjectCache>,
    pub grading: GradingService,
    pub analytics: AnalyticsService,
}

pub fn memory_engine() -> Engine {
    let storage = Arc::new(MemoryStorage::new());
    let cache: Arc<dyn ObjectCache> = Arc::new(MokaObjectCache::new().expect("moka cache"));
    let grading = GradingService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        cache.clone(),
    );
    let analytics = AnalyticsService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        cache.clone(),
    );
    Engine {
        storage,
        cache,
        grading,
        analytics,
    }
}

pub fn test_snapshot(
    id: i64,
    subject: Option<SubjectRef>,
    max_marks: f64,
    passing_marks: f64,
) -> TestSnapshot {
    TestSnapshot {
        id,
        title: format!("测验 {id}"),
        subject,
        test_type: TestType::UnitTest,
        test_date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        max_marks,
        passing_marks,
        result_count: 0,
        last_marks_update: None,
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2026, 2, 20, 9, 0, 0).unwrap(),
    }
}

pub fn student(id: i64, name: &str) -> Student {
    Student {
        id,
        name: name.to_string(),
        roll_number: Some(format!("R{id:03}")),
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
    }
}

pub fn subject(id: i64, name: &str) -> Subject {
    Subject {
        id,
        name: name.to_string(),
        code: None,
        is_active: true,
    }
}

pub fn entry(student_id: i64, marks: f64) -> MarksEntry {
    MarksEntry {
        student_id,
        marks_obtained: marks,
        remarks: None,
    }
}

/// 构造一条直接落库的成绩输入，派生字段一律经计算函数得出
pub fn grade_input(
    test: &TestSnapshot,
    student_id: i64,
    marks: f64,
    submitted: DateTime<Utc>,
) -> NewGradeRecord {
    let breakdown =
        grading::compute(marks, test.max_marks, test.passing_marks).expect("valid marks");
    NewGradeRecord {
        test_id: test.id,
        student_id,
        marks_obtained: marks,
        max_marks: test.max_marks,
        passing_marks: test.passing_marks,
        percentage: breakdown.percentage,
        grade: breakdown.grade,
        is_passed: breakdown.is_passed,
        status: breakdown.status(),
        remarks: None,
        graded_by: 900,
        graded_at: submitted,
        submitted_at: submitted,
        academic_year: grading::academic_year_for(submitted),
    }
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap()
}
