use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::Utc;

use crate::histogram;
use crate::models::{EmployeeRecord, Metric, MetricSummary, PerformanceCategory};
use crate::summary;

pub fn build_report(
    source: &str,
    records: &[EmployeeRecord],
    summaries: &BTreeMap<Metric, MetricSummary>,
    narrative: Option<&str>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Performance Score Report");
    let _ = writeln!(
        output,
        "Generated {} from {} ({} employees)",
        Utc::now().date_naive(),
        source,
        records.len()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Metric Summaries");
    let _ = writeln!(output);
    let _ = writeln!(output, "| Metric | Min | Max | Mean |");
    let _ = writeln!(output, "|---|---|---|---|");
    for (metric, summary) in summaries {
        let _ = writeln!(
            output,
            "| {} | {:.2} | {:.2} | {:.2} |",
            metric.label(),
            summary.minimum,
            summary.maximum,
            summary.mean
        );
    }

    let counts = summary::breakdown(records);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Bands");
    let _ = writeln!(output);
    let _ = writeln!(output, "| Band | Employees |");
    let _ = writeln!(output, "|---|---|");
    for (band, count) in counts.counts() {
        let _ = writeln!(output, "| {band} | {count} |");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Distributions");
    for metric in Metric::ALL {
        let values: Vec<f64> = records
            .iter()
            .filter_map(|record| metric.value(record))
            .collect();
        let _ = writeln!(output);
        let _ = writeln!(output, "```");
        output.push_str(&histogram::render(&values, metric.label(), None));
        let _ = writeln!(output, "```");
    }

    if let Some(text) = narrative {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Narrative Analysis");
        let _ = writeln!(output);
        let _ = writeln!(output, "{text}");
    }

    let flagged: Vec<&EmployeeRecord> = records
        .iter()
        .filter(|record| {
            summary::classify(record.individual_performance_score) == PerformanceCategory::Kurang
        })
        .collect();

    let _ = writeln!(output);
    let _ = writeln!(output, "## Employees Below Standard");
    let _ = writeln!(output);
    if flagged.is_empty() {
        let _ = writeln!(output, "No employees in the KURANG band.");
    } else {
        for record in flagged {
            let score = record
                .individual_performance_score
                .map(|s| format!("{s:.2}"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                output,
                "- NIPP {} ({}): individual performance {}",
                record.worker_id, record.position_name, score
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<EmployeeRecord> {
        vec![
            EmployeeRecord {
                worker_id: "1001".to_string(),
                position_name: "Terminal Supervisor".to_string(),
                kpi_final_score: Some(95.0),
                behavior_assessment_score: Some(88.0),
                individual_performance_score: Some(82.0),
            },
            EmployeeRecord {
                worker_id: "1002".to_string(),
                position_name: "Crane Operator".to_string(),
                kpi_final_score: Some(101.0),
                behavior_assessment_score: Some(92.0),
                individual_performance_score: Some(108.0),
            },
            EmployeeRecord {
                worker_id: "1003".to_string(),
                position_name: "Yard Planner".to_string(),
                kpi_final_score: Some(78.0),
                behavior_assessment_score: Some(81.0),
                individual_performance_score: Some(72.0),
            },
        ]
    }

    #[test]
    fn report_carries_summaries_bands_and_distributions() {
        let records = sample_records();
        let summaries = summary::summarize(&records, &Metric::ALL).unwrap();
        let report = build_report("scores.csv", &records, &summaries, None);

        assert!(report.contains("# Performance Score Report"));
        assert!(report.contains("scores.csv"));
        assert!(report.contains("3 employees"));
        assert!(report.contains("| Individual performance score | 72.00 | 108.00 | 87.33 |"));
        assert!(report.contains("| SANGAT BAIK | 1 |"));
        assert!(report.contains("| KURANG | 1 |"));
        assert!(report.contains("## Distributions"));
        assert!(!report.contains("## Narrative Analysis"));
    }

    #[test]
    fn report_embeds_narrative_when_present() {
        let records = sample_records();
        let summaries = summary::summarize(&records, &Metric::ALL).unwrap();
        let report = build_report(
            "scores.csv",
            &records,
            &summaries,
            Some("Scores are broadly healthy with one outlier."),
        );

        assert!(report.contains("## Narrative Analysis"));
        assert!(report.contains("one outlier"));
    }

    #[test]
    fn below_standard_section_lists_kurang_employees() {
        let records = sample_records();
        let summaries = summary::summarize(&records, &Metric::ALL).unwrap();
        let report = build_report("scores.csv", &records, &summaries, None);

        assert!(report.contains("NIPP 1003 (Yard Planner): individual performance 72.00"));
        assert!(!report.contains("NIPP 1002"));
    }
}
