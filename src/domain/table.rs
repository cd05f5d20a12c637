// Tabular views of a snapshot: recent records and CSV export
use super::equipment::Equipment;
use super::snapshot::{ParameterSnapshot, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRow {
    pub timestamp: Timestamp,
    /// One cell per requested column, `None` where the snapshot has no value
    pub values: Vec<Option<f64>>,
    pub faults: Vec<(Equipment, bool)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRecords {
    pub columns: Vec<String>,
    pub rows: Vec<RecordRow>,
}

impl RecentRecords {
    pub fn build(snapshot: &ParameterSnapshot, columns: &[String], max_rows: usize) -> Self {
        let start = snapshot.len().saturating_sub(max_rows);
        let rows = (start..snapshot.len())
            .map(|i| RecordRow {
                timestamp: snapshot.timestamps()[i].clone(),
                values: columns
                    .iter()
                    .map(|c| snapshot.series(c).and_then(|s| s.get(i).copied()))
                    .collect(),
                faults: Equipment::ALL
                    .iter()
                    .map(|e| {
                        let faulty = snapshot
                            .series(e.fault_column())
                            .and_then(|s| s.get(i))
                            .is_some_and(|flag| *flag != 0.0);
                        (*e, faulty)
                    })
                    .collect(),
            })
            .collect();

        Self {
            columns: columns.to_vec(),
            rows,
        }
    }
}

/// CSV rendering of the whole snapshot, parameters in snapshot key order
pub fn to_csv(snapshot: &ParameterSnapshot) -> String {
    let names: Vec<&str> = snapshot.parameters().keys().map(String::as_str).collect();

    let mut csv = String::from("Timestamp");
    for name in &names {
        csv.push(',');
        csv.push_str(name);
    }
    csv.push('\n');

    for (i, timestamp) in snapshot.timestamps().iter().enumerate() {
        csv.push_str(&timestamp.to_string());
        for name in &names {
            csv.push(',');
            if let Some(value) = snapshot.series(name).and_then(|s| s.get(i)) {
                csv.push_str(&value.to_string());
            }
        }
        csv.push('\n');
    }

    csv
}

pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("predictive_maintenance_data_{}.csv", date.format("%Y-%m-%d"))
}
