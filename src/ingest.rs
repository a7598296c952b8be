use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::models::EmployeeRecord;

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "NIPP_Pekerja")]
    worker_id: String,
    #[serde(rename = "Nama_Posisi")]
    position_name: String,
    #[serde(rename = "Skor_KPI_Final")]
    kpi_final_score: Option<String>,
    #[serde(rename = "Skor_Assessment")]
    behavior_assessment_score: Option<String>,
    #[serde(rename = "Skor_Kinerja_Individu")]
    individual_performance_score: Option<String>,
}

/// One loaded table. Lives only for the current invocation; nothing is
/// written back anywhere.
#[derive(Debug, Default)]
pub struct LoadedTable {
    pub records: Vec<EmployeeRecord>,
    /// Score cells that held non-numeric text and were coerced to null.
    pub coerced_cells: usize,
    /// NIPPs that appear more than once, in first-seen order.
    pub duplicate_ids: Vec<String>,
}

pub fn load_records(path: &Path) -> anyhow::Result<LoadedTable> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_reader(reader).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_reader<R: Read>(mut reader: csv::Reader<R>) -> anyhow::Result<LoadedTable> {
    let mut table = LoadedTable::default();
    let mut seen = HashSet::new();
    let mut flagged = HashSet::new();

    for result in reader.deserialize::<RawRow>() {
        let row = result?;

        if !seen.insert(row.worker_id.clone()) && flagged.insert(row.worker_id.clone()) {
            table.duplicate_ids.push(row.worker_id.clone());
        }

        let record = EmployeeRecord {
            kpi_final_score: coerce_score(row.kpi_final_score.as_deref(), &mut table.coerced_cells),
            behavior_assessment_score: coerce_score(
                row.behavior_assessment_score.as_deref(),
                &mut table.coerced_cells,
            ),
            individual_performance_score: coerce_score(
                row.individual_performance_score.as_deref(),
                &mut table.coerced_cells,
            ),
            worker_id: row.worker_id,
            position_name: row.position_name,
        };
        table.records.push(record);
    }

    Ok(table)
}

/// Lenient numeric parse: empty cells are simply missing, anything else
/// that fails to parse is coerced to null and counted. The row survives
/// either way.
fn coerce_score(cell: Option<&str>, coerced: &mut usize) -> Option<f64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            *coerced += 1;
            None
        }
    }
}
