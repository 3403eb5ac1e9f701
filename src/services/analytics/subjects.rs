//! 科目维度表现
//!
//! 分组键是成绩记录经由测验快照可达的科目身份。结构化引用与
//! 自由文本标签都是合法的桶；两者皆缺的测验归入未分类哨兵桶；
//! 测验本身已被硬删除的记录无法归属科目，跳过而不是失败。

use std::collections::HashMap;

use futures_util::future::try_join_all;

use super::AnalyticsService;
use crate::errors::Result;
use crate::grading::round2;
use crate::models::analytics::responses::SubjectPerformance;
use crate::models::grades::entities::{GradeOrder, GradeRecord};
use crate::models::subjects::entities::SubjectRef;
use crate::models::tests::entities::TestSnapshot;

/// 未分类科目的哨兵桶名称
pub const UNCATEGORIZED_SUBJECT: &str = "未分类";

#[derive(Default)]
pub(crate) struct SubjectAccumulator {
    pub(crate) total_tests: i64,
    pub(crate) passed_tests: i64,
    pub(crate) total_marks: f64,
    pub(crate) total_max_marks: f64,
}

impl SubjectAccumulator {
    fn add(&mut self, record: &GradeRecord) {
        self.total_tests += 1;
        if record.is_passed {
            self.passed_tests += 1;
        }
        self.total_marks += record.marks_obtained;
        self.total_max_marks += record.max_marks;
    }
}

pub async fn subject_performance(
    service: &AnalyticsService,
    student_id: i64,
) -> Result<Vec<SubjectPerformance>> {
    let records = service
        .store
        .find_by_student(student_id, GradeOrder::RecentFirst)
        .await?;
    if records.is_empty() {
        return Ok(Vec::new());
    }

    // 去重后并发拉取关联的测验快照（含已停用测验，历史成绩仍要归组）
    let mut test_ids: Vec<i64> = records.iter().map(|r| r.test_id).collect();
    test_ids.sort_unstable();
    test_ids.dedup();
    let snapshots = try_join_all(
        test_ids
            .iter()
            .map(|&test_id| service.tests.get_test_snapshot(test_id)),
    )
    .await?;
    let tests: HashMap<i64, TestSnapshot> = test_ids
        .into_iter()
        .zip(snapshots)
        .filter_map(|(test_id, snapshot)| snapshot.map(|s| (test_id, s)))
        .collect();

    let buckets = accumulate_by_subject(&records, &tests);

    let mut performances = Vec::with_capacity(buckets.len());
    for (subject_ref, acc) in buckets {
        let (subject, subject_id) = match subject_ref {
            Some(SubjectRef::Resolved(id)) => {
                // 科目行已被硬删除时保留桶，用兜底名称展示
                let name = service
                    .subjects
                    .resolve_subject(id)
                    .await?
                    .map(|s| s.name)
                    .unwrap_or_else(|| format!("科目#{id}"));
                (name, Some(id))
            }
            Some(SubjectRef::Unresolved(label)) => (label, None),
            None => (UNCATEGORIZED_SUBJECT.to_string(), None),
        };

        let percentage = if acc.total_max_marks > 0.0 {
            round2(acc.total_marks / acc.total_max_marks * 100.0)
        } else {
            0.0
        };
        let pass_rate = if acc.total_tests > 0 {
            round2(acc.passed_tests as f64 / acc.total_tests as f64 * 100.0)
        } else {
            0.0
        };

        performances.push(SubjectPerformance {
            subject,
            subject_id,
            total_tests: acc.total_tests,
            passed_tests: acc.passed_tests,
            total_marks: acc.total_marks,
            total_max_marks: acc.total_max_marks,
            percentage,
            pass_rate,
        });
    }

    // 固定输出顺序：百分比降序，相同时按名称升序
    performances.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.subject.cmp(&b.subject))
    });

    Ok(performances)
}

/// 按科目身份累加成绩
///
/// 同一科目的多场测验合并进一个桶；快照缺失（测验被硬删除）的
/// 记录直接跳过；None 键是未分类哨兵桶。
pub(crate) fn accumulate_by_subject(
    records: &[GradeRecord],
    tests: &HashMap<i64, TestSnapshot>,
) -> HashMap<Option<SubjectRef>, SubjectAccumulator> {
    let mut buckets: HashMap<Option<SubjectRef>, SubjectAccumulator> = HashMap::new();
    for record in records {
        let Some(test) = tests.get(&record.test_id) else {
            continue;
        };
        buckets.entry(test.subject.clone()).or_default().add(record);
    }
    buckets
}
