//! 学生表现总评

use super::AnalyticsService;
use crate::errors::Result;
use crate::grading::round2;
use crate::models::analytics::responses::StudentSummary;
use crate::models::grades::entities::{GradeOrder, GradeRecord};

pub async fn student_summary(
    service: &AnalyticsService,
    student_id: i64,
) -> Result<StudentSummary> {
    let records = service
        .store
        .find_by_student(student_id, GradeOrder::RecentFirst)
        .await?;
    Ok(compute_student_summary(student_id, &records))
}

/// 对一个学生的全部活跃成绩做求和归约
///
/// average_score 是总得分对总满分的百分比，没有记录时为 0。
pub(crate) fn compute_student_summary(student_id: i64, records: &[GradeRecord]) -> StudentSummary {
    let total_tests = records.len() as i64;
    let passed_tests = records.iter().filter(|r| r.is_passed).count() as i64;
    let total_marks: f64 = records.iter().map(|r| r.marks_obtained).sum();
    let total_max_marks: f64 = records.iter().map(|r| r.max_marks).sum();

    let average_score = if total_max_marks > 0.0 {
        round2(total_marks / total_max_marks * 100.0)
    } else {
        0.0
    };

    StudentSummary {
        student_id,
        total_tests,
        passed_tests,
        total_marks,
        total_max_marks,
        average_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading;
    use crate::models::grades::entities::GradeStatus;

    fn record(test_id: i64, marks: f64, max: f64, passing: f64) -> GradeRecord {
        let breakdown = grading::compute(marks, max, passing).unwrap();
        let now = chrono::Utc::now();
        GradeRecord {
            id: test_id,
            test_id,
            student_id: 1,
            marks_obtained: marks,
            max_marks: max,
            passing_marks: passing,
            percentage: breakdown.percentage,
            grade: breakdown.grade,
            is_passed: breakdown.is_passed,
            status: GradeStatus::from_passed(breakdown.is_passed),
            remarks: None,
            graded_by: 1,
            graded_at: now,
            submitted_at: now,
            academic_year: grading::academic_year_for(now),
            is_active: true,
        }
    }

    #[test]
    fn test_summary_reduction() {
        // 不同满分的测验混合求和
        let records = vec![
            record(1, 80.0, 100.0, 40.0),
            record(2, 30.0, 100.0, 40.0),
            record(3, 15.0, 20.0, 8.0),
        ];
        let summary = compute_student_summary(1, &records);

        assert_eq!(summary.total_tests, 3);
        assert_eq!(summary.passed_tests, 2);
        assert_eq!(summary.total_marks, 125.0);
        assert_eq!(summary.total_max_marks, 220.0);
        // 125 / 220 = 56.818.. -> 56.82
        assert_eq!(summary.average_score, 56.82);
    }

    #[test]
    fn test_summary_empty() {
        let summary = compute_student_summary(42, &[]);
        assert_eq!(summary.student_id, 42);
        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.passed_tests, 0);
        assert_eq!(summary.total_marks, 0.0);
        assert_eq!(summary.total_max_marks, 0.0);
        assert_eq!(summary.average_score, 0.0);
    }
}
