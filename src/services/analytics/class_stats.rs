//! 班级统计
//!
//! 结果缓存在对象缓存中，键为 `class_stats:{test_id}`，
//! 写路径（提交、软删除）负责主动失效。

use tracing::debug;

use super::AnalyticsService;
use crate::cache::CacheResult;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::grading::round2;
use crate::models::analytics::responses::{ClassStatistics, GradeBucket};
use crate::models::grades::entities::{GradeOrder, GradeRecord, LetterGrade};

/// 班级统计的缓存键
pub(crate) fn class_stats_cache_key(test_id: i64) -> String {
    format!("class_stats:{test_id}")
}

pub async fn class_stats(service: &AnalyticsService, test_id: i64) -> Result<ClassStatistics> {
    let cache_key = class_stats_cache_key(test_id);

    // 缓存命中直接返回；反序列化失败按未命中处理并重算
    if let CacheResult::Found(raw) = service.cache.get_raw(&cache_key).await {
        match serde_json::from_str::<ClassStatistics>(&raw) {
            Ok(stats) => return Ok(stats),
            Err(e) => debug!("班级统计缓存损坏，重新计算: {e}"),
        }
    }

    let records = service
        .store
        .find_by_test(test_id, GradeOrder::MarksDesc)
        .await?;
    let stats = compute_class_stats(test_id, &records);

    if let Ok(payload) = serde_json::to_string(&stats) {
        let ttl = AppConfig::get().grading.stats_cache_ttl;
        service.cache.insert_raw(cache_key, payload, ttl).await;
    }

    Ok(stats)
}

/// 由一个测验的活跃成绩计算班级统计
///
/// 没有记录时返回全零默认值，分布桶仍按表格顺序完整输出。
pub(crate) fn compute_class_stats(test_id: i64, records: &[GradeRecord]) -> ClassStatistics {
    let mut distribution: Vec<GradeBucket> = LetterGrade::all()
        .iter()
        .map(|&grade| GradeBucket { grade, count: 0 })
        .collect();

    let total_students = records.len() as i64;
    if total_students == 0 {
        return ClassStatistics {
            test_id,
            total_students: 0,
            average_marks: 0.0,
            average_percentage: 0.0,
            pass_rate: 0.0,
            highest_marks: 0.0,
            lowest_marks: 0.0,
            grade_distribution: distribution,
        };
    }

    let mut marks_sum = 0.0;
    let mut percentage_sum = 0.0;
    let mut passed = 0i64;
    let mut highest = f64::NEG_INFINITY;
    let mut lowest = f64::INFINITY;

    for record in records {
        marks_sum += record.marks_obtained;
        percentage_sum += record.percentage;
        if record.is_passed {
            passed += 1;
        }
        highest = highest.max(record.marks_obtained);
        lowest = lowest.min(record.marks_obtained);

        if let Some(bucket) = distribution.iter_mut().find(|b| b.grade == record.grade) {
            bucket.count += 1;
        }
    }

    let count = total_students as f64;
    ClassStatistics {
        test_id,
        total_students,
        average_marks: round2(marks_sum / count),
        average_percentage: round2(percentage_sum / count),
        pass_rate: round2(passed as f64 / count * 100.0),
        highest_marks: highest,
        lowest_marks: lowest,
        grade_distribution: distribution,
    }
}
