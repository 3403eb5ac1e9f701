//! 内存存储实现
//!
//! DashMap 按键分片加锁，entry API 使同键 upsert 串行化，与
//! SeaORM 实现的唯一索引语义一致。同时实现三个 Provider 契约
//! 并提供播种方法，面向嵌入场景与服务层测试。

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    grades::{
        entities::{GradeOrder, GradeRecord},
        requests::{GradeListQuery, NewGradeRecord},
        responses::GradeListResponse,
    },
    students::entities::Student,
    subjects::entities::Subject,
    tests::entities::TestSnapshot,
};
use crate::providers::{StudentProvider, SubjectProvider, TestProvider};
use crate::storage::GradeStore;

pub struct MemoryStorage {
    grades: DashMap<(i64, i64), GradeRecord>,
    tests: DashMap<i64, TestSnapshot>,
    students: DashMap<i64, Student>,
    subjects: DashMap<i64, Subject>,
    next_grade_id: AtomicI64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            grades: DashMap::new(),
            tests: DashMap::new(),
            students: DashMap::new(),
            subjects: DashMap::new(),
            next_grade_id: AtomicI64::new(1),
        }
    }

    /// 播种测验快照
    pub fn seed_test(&self, test: TestSnapshot) {
        self.tests.insert(test.id, test);
    }

    /// 播种学生
    pub fn seed_student(&self, student: Student) {
        self.students.insert(student.id, student);
    }

    /// 播种科目
    pub fn seed_subject(&self, subject: Subject) {
        self.subjects.insert(subject.id, subject);
    }

    /// 模拟测验被外部系统硬删除
    pub fn remove_test(&self, test_id: i64) {
        self.tests.remove(&test_id);
    }

    /// 模拟科目行被硬删除
    pub fn remove_subject(&self, subject_id: i64) {
        self.subjects.remove(&subject_id);
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_records(records: &mut [GradeRecord], order: GradeOrder) {
    match order {
        GradeOrder::MarksDesc => records.sort_by(|a, b| {
            b.marks_obtained
                .partial_cmp(&a.marks_obtained)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        GradeOrder::RecentFirst => records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at)),
    }
}

#[async_trait]
impl GradeStore for MemoryStorage {
    async fn upsert_grade(&self, record: NewGradeRecord) -> Result<GradeRecord> {
        let key = (record.test_id, record.student_id);

        // entry 持有分片写锁直到返回，同键并发提交串行化
        let stored = match self.grades.entry(key) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get_mut();
                existing.marks_obtained = record.marks_obtained;
                existing.max_marks = record.max_marks;
                existing.passing_marks = record.passing_marks;
                existing.percentage = record.percentage;
                existing.grade = record.grade;
                existing.is_passed = record.is_passed;
                existing.status = record.status;
                existing.remarks = record.remarks;
                existing.graded_by = record.graded_by;
                existing.graded_at = record.graded_at;
                existing.is_active = true;
                // submitted_at 与 academic_year 保留首次提交的值
                existing.clone()
            }
            Entry::Vacant(vacant) => {
                let created = GradeRecord {
                    id: self.next_grade_id.fetch_add(1, Ordering::Relaxed),
                    test_id: record.test_id,
                    student_id: record.student_id,
                    marks_obtained: record.marks_obtained,
                    max_marks: record.max_marks,
                    passing_marks: record.passing_marks,
                    percentage: record.percentage,
                    grade: record.grade,
                    is_passed: record.is_passed,
                    status: record.status,
                    remarks: record.remarks,
                    graded_by: record.graded_by,
                    graded_at: record.graded_at,
                    submitted_at: record.submitted_at,
                    academic_year: record.academic_year,
                    is_active: true,
                };
                vacant.insert(created.clone());
                created
            }
        };

        Ok(stored)
    }

    async fn deactivate_grade(&self, test_id: i64, student_id: i64) -> Result<bool> {
        match self.grades.get_mut(&(test_id, student_id)) {
            Some(mut record) if record.is_active => {
                record.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get_grade(&self, test_id: i64, student_id: i64) -> Result<Option<GradeRecord>> {
        Ok(self
            .grades
            .get(&(test_id, student_id))
            .map(|r| r.value().clone()))
    }

    async fn find_by_test(&self, test_id: i64, order: GradeOrder) -> Result<Vec<GradeRecord>> {
        let mut records: Vec<GradeRecord> = self
            .grades
            .iter()
            .filter(|e| e.value().test_id == test_id && e.value().is_active)
            .map(|e| e.value().clone())
            .collect();
        sort_records(&mut records, order);
        Ok(records)
    }

    async fn find_by_student(
        &self,
        student_id: i64,
        order: GradeOrder,
    ) -> Result<Vec<GradeRecord>> {
        let mut records: Vec<GradeRecord> = self
            .grades
            .iter()
            .filter(|e| e.value().student_id == student_id && e.value().is_active)
            .map(|e| e.value().clone())
            .collect();
        sort_records(&mut records, order);
        Ok(records)
    }

    async fn list_grades(&self, query: GradeListQuery) -> Result<GradeListResponse> {
        let page = query.page.unwrap_or(1).max(1);
        let size = query.size.unwrap_or(20).clamp(1, 100);

        let mut records: Vec<GradeRecord> = self
            .grades
            .iter()
            .map(|e| e.value().clone())
            .filter(|r| query.test_id.is_none_or(|id| r.test_id == id))
            .filter(|r| query.student_id.is_none_or(|id| r.student_id == id))
            .filter(|r| {
                query
                    .academic_year
                    .as_deref()
                    .is_none_or(|year| r.academic_year == year)
            })
            .filter(|r| query.include_inactive || r.is_active)
            .collect();
        records.sort_by(|a, b| b.graded_at.cmp(&a.graded_at));

        let total = records.len() as i64;
        let total_pages = (total as u64).div_ceil(size as u64) as i64;
        let start = ((page - 1) * size) as usize;
        let items: Vec<GradeRecord> = records
            .into_iter()
            .skip(start)
            .take(size as usize)
            .collect();

        Ok(GradeListResponse {
            items,
            pagination: PaginationInfo {
                page,
                page_size: size,
                total,
                total_pages,
            },
        })
    }

    async fn count_active_for_test(&self, test_id: i64) -> Result<i64> {
        let count = self
            .grades
            .iter()
            .filter(|e| e.value().test_id == test_id && e.value().is_active)
            .count();
        Ok(count as i64)
    }

    async fn has_active_records_for_test(&self, test_id: i64) -> Result<bool> {
        Ok(self.count_active_for_test(test_id).await? > 0)
    }
}

#[async_trait]
impl TestProvider for MemoryStorage {
    async fn get_active_test(&self, test_id: i64) -> Result<Option<TestSnapshot>> {
        Ok(self
            .tests
            .get(&test_id)
            .filter(|t| t.value().is_active)
            .map(|t| t.value().clone()))
    }

    async fn get_test_snapshot(&self, test_id: i64) -> Result<Option<TestSnapshot>> {
        Ok(self.tests.get(&test_id).map(|t| t.value().clone()))
    }

    async fn record_marks_update(&self, test_id: i64, result_count: i64) -> Result<()> {
        if let Some(mut test) = self.tests.get_mut(&test_id) {
            test.result_count = result_count;
            test.last_marks_update = Some(chrono::Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl StudentProvider for MemoryStorage {
    async fn get_active_student(&self, student_id: i64) -> Result<Option<Student>> {
        Ok(self
            .students
            .get(&student_id)
            .filter(|s| s.value().is_active)
            .map(|s| s.value().clone()))
    }
}

#[async_trait]
impl SubjectProvider for MemoryStorage {
    async fn resolve_subject(&self, subject_id: i64) -> Result<Option<Subject>> {
        Ok(self.subjects.get(&subject_id).map(|s| s.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::entities::{GradeStatus, LetterGrade};
    use chrono::TimeZone;

    fn sample_record(test_id: i64, student_id: i64, marks: f64) -> NewGradeRecord {
        let submitted = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        NewGradeRecord {
            test_id,
            student_id,
            marks_obtained: marks,
            max_marks: 100.0,
            passing_marks: 40.0,
            percentage: marks,
            grade: LetterGrade::C,
            is_passed: marks >= 40.0,
            status: GradeStatus::from_passed(marks >= 40.0),
            remarks: None,
            graded_by: 1,
            graded_at: submitted,
            submitted_at: submitted,
            academic_year: "2026-2027".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_preserves_creation_fields() {
        let storage = MemoryStorage::new();

        let first = storage.upsert_grade(sample_record(1, 10, 45.0)).await.unwrap();

        let mut second = sample_record(1, 10, 80.0);
        second.graded_at = chrono::Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
        second.submitted_at = second.graded_at;
        second.academic_year = "2099-2100".to_string();
        let updated = storage.upsert_grade(second).await.unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.marks_obtained, 80.0);
        // 首次提交信息不被覆盖
        assert_eq!(updated.submitted_at, first.submitted_at);
        assert_eq!(updated.academic_year, "2026-2027");
        assert!(updated.graded_at > first.graded_at);

        let count = storage.count_active_for_test(1).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_deactivate_then_resubmit_reactivates() {
        let storage = MemoryStorage::new();
        storage.upsert_grade(sample_record(1, 10, 45.0)).await.unwrap();

        assert!(storage.deactivate_grade(1, 10).await.unwrap());
        // 第二次停用没有活跃记录可停
        assert!(!storage.deactivate_grade(1, 10).await.unwrap());
        assert!(!storage.has_active_records_for_test(1).await.unwrap());

        let revived = storage.upsert_grade(sample_record(1, 10, 50.0)).await.unwrap();
        assert!(revived.is_active);
        assert!(storage.has_active_records_for_test(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_grades_pagination_and_filters() {
        let storage = MemoryStorage::new();
        for student_id in 1..=5 {
            storage
                .upsert_grade(sample_record(1, student_id, 50.0))
                .await
                .unwrap();
        }
        storage.upsert_grade(sample_record(2, 1, 70.0)).await.unwrap();
        storage.deactivate_grade(1, 5).await.unwrap();

        let response = storage
            .list_grades(GradeListQuery {
                test_id: Some(1),
                size: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.pagination.total, 4);
        assert_eq!(response.pagination.total_pages, 2);
        assert_eq!(response.items.len(), 3);

        let inactive_included = storage
            .list_grades(GradeListQuery {
                test_id: Some(1),
                include_inactive: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(inactive_included.pagination.total, 5);
    }

    #[tokio::test]
    async fn test_find_by_test_ordering() {
        let storage = MemoryStorage::new();
        storage.upsert_grade(sample_record(1, 1, 30.0)).await.unwrap();
        storage.upsert_grade(sample_record(1, 2, 90.0)).await.unwrap();
        storage.upsert_grade(sample_record(1, 3, 60.0)).await.unwrap();

        let records = storage.find_by_test(1, GradeOrder::MarksDesc).await.unwrap();
        let marks: Vec<f64> = records.iter().map(|r| r.marks_obtained).collect();
        assert_eq!(marks, vec![90.0, 60.0, 30.0]);
    }
}
