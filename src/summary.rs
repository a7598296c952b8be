use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{CategoryBreakdown, EmployeeRecord, Metric, MetricSummary, PerformanceCategory};

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("column {metric} has no numeric values to summarize")]
    EmptyMetric { metric: &'static str },
    #[error("no employee found with NIPP {worker_id}")]
    NotFound { worker_id: String },
}

/// Compute min/max/mean for each requested metric over the non-null values
/// across all records. A metric with zero numeric values is an error, never
/// a defaulted summary.
pub fn summarize(
    records: &[EmployeeRecord],
    metrics: &[Metric],
) -> Result<BTreeMap<Metric, MetricSummary>, InsightError> {
    let mut summaries = BTreeMap::new();

    for &metric in metrics {
        let mut minimum = f64::INFINITY;
        let mut maximum = f64::NEG_INFINITY;
        let mut total = 0.0;
        let mut count = 0usize;

        for value in records.iter().filter_map(|record| metric.value(record)) {
            minimum = minimum.min(value);
            maximum = maximum.max(value);
            total += value;
            count += 1;
        }

        if count == 0 {
            return Err(InsightError::EmptyMetric {
                metric: metric.column(),
            });
        }

        summaries.insert(
            metric,
            MetricSummary {
                minimum,
                maximum,
                mean: total / count as f64,
            },
        );
    }

    Ok(summaries)
}

/// Band an individual performance score. A null score maps to the
/// Unclassified sentinel, never an error.
pub fn classify(score: Option<f64>) -> PerformanceCategory {
    match score {
        None => PerformanceCategory::Unclassified,
        Some(s) if s > 110.0 => PerformanceCategory::Istimewa,
        Some(s) if s > 105.0 => PerformanceCategory::SangatBaik,
        Some(s) if s >= 90.0 => PerformanceCategory::Baik,
        Some(s) if s >= 80.0 => PerformanceCategory::Cukup,
        Some(_) => PerformanceCategory::Kurang,
    }
}

/// Find one employee by NIPP. When the id repeats, the first record in
/// input order wins.
pub fn lookup<'a>(
    records: &'a [EmployeeRecord],
    worker_id: &str,
) -> Result<&'a EmployeeRecord, InsightError> {
    records
        .iter()
        .find(|record| record.worker_id == worker_id)
        .ok_or_else(|| InsightError::NotFound {
            worker_id: worker_id.to_string(),
        })
}

pub fn breakdown(records: &[EmployeeRecord]) -> CategoryBreakdown {
    let mut counts = CategoryBreakdown::default();

    for record in records {
        match classify(record.individual_performance_score) {
            PerformanceCategory::Istimewa => counts.istimewa += 1,
            PerformanceCategory::SangatBaik => counts.sangat_baik += 1,
            PerformanceCategory::Baik => counts.baik += 1,
            PerformanceCategory::Cukup => counts.cukup += 1,
            PerformanceCategory::Kurang => counts.kurang += 1,
            PerformanceCategory::Unclassified => counts.unclassified += 1,
        }
    }

    counts
}
