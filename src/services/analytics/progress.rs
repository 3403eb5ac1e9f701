//! 月度进度时间序列

use std::collections::BTreeMap;

use super::AnalyticsService;
use crate::errors::Result;
use crate::grading::{month_period_of, round2};
use crate::models::analytics::responses::PeriodProgress;
use crate::models::grades::entities::{GradeOrder, GradeRecord};

pub async fn monthly_progress(
    service: &AnalyticsService,
    student_id: i64,
) -> Result<Vec<PeriodProgress>> {
    let records = service
        .store
        .find_by_student(student_id, GradeOrder::RecentFirst)
        .await?;
    Ok(compute_monthly_progress(&records))
}

/// 按首次提交时间的 "YYYY-MM" 分组
///
/// 对该格式，字典序即时间序，BTreeMap 的迭代顺序直接给出
/// 按时间升序的输出。百分比取月内各记录百分比的平均值。
pub(crate) fn compute_monthly_progress(records: &[GradeRecord]) -> Vec<PeriodProgress> {
    let mut periods: BTreeMap<String, (f64, i64)> = BTreeMap::new();
    for record in records {
        let entry = periods
            .entry(month_period_of(record.submitted_at))
            .or_insert((0.0, 0));
        entry.0 += record.percentage;
        entry.1 += 1;
    }

    periods
        .into_iter()
        .map(|(period, (percentage_sum, tests_count))| PeriodProgress {
            period,
            percentage: round2(percentage_sum / tests_count as f64),
            tests_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading;
    use crate::models::grades::entities::GradeStatus;
    use chrono::TimeZone;

    fn record_at(id: i64, marks: f64, year: i32, month: u32) -> GradeRecord {
        let breakdown = grading::compute(marks, 100.0, 40.0).unwrap();
        let submitted = chrono::Utc
            .with_ymd_and_hms(year, month, 15, 10, 0, 0)
            .unwrap();
        GradeRecord {
            id,
            test_id: id,
            student_id: 1,
            marks_obtained: marks,
            max_marks: 100.0,
            passing_marks: 40.0,
            percentage: breakdown.percentage,
            grade: breakdown.grade,
            is_passed: breakdown.is_passed,
            status: GradeStatus::from_passed(breakdown.is_passed),
            remarks: None,
            graded_by: 1,
            graded_at: submitted,
            submitted_at: submitted,
            academic_year: grading::academic_year_for(submitted),
            is_active: true,
        }
    }

    #[test]
    fn test_monthly_grouping_and_ordering() {
        // 输入乱序，输出必须按时间升序且跨年正确
        let records = vec![
            record_at(1, 70.0, 2026, 1),
            record_at(2, 50.0, 2025, 11),
            record_at(3, 90.0, 2026, 1),
            record_at(4, 40.0, 2025, 12),
        ];

        let progress = compute_monthly_progress(&records);
        let periods: Vec<&str> = progress.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2025-11", "2025-12", "2026-01"]);

        // 2026-01 两条记录取平均: (70 + 90) / 2 = 80
        let january = &progress[2];
        assert_eq!(january.tests_count, 2);
        assert_eq!(january.percentage, 80.0);

        let november = &progress[0];
        assert_eq!(november.tests_count, 1);
        assert_eq!(november.percentage, 50.0);
    }

    #[test]
    fn test_monthly_progress_empty() {
        assert!(compute_monthly_progress(&[]).is_empty());
    }

    #[test]
    fn test_monthly_average_rounding() {
        let records = vec![
            record_at(1, 1.0, 2026, 3),
            record_at(2, 2.0, 2026, 3),
            record_at(3, 2.0, 2026, 3),
        ];
        // 得分换算后的百分比: 1.0, 2.0, 2.0 -> 平均 1.67
        let progress = compute_monthly_progress(&records);
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].percentage, 1.67);
    }
}
