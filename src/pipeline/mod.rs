pub mod aggregate;
pub mod parser;
pub mod projector;

use crate::config::Config;
use crate::db::Database;
use crate::pipeline::parser::OvernightPolicy;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct IngestSummary {
    pub rows: usize,
    pub days: usize,
}

/// Run the batch pipeline: parse the CSV, aggregate per day, persist.
/// With `replace` set, both collections are rebuilt from scratch, including
/// the precomputed historical document; otherwise each day is upserted.
/// Any parse failure aborts before anything is written.
pub fn run_ingest(config: &Config, csv_path: &Path, replace: bool) -> Result<IngestSummary> {
    let content = fs::read_to_string(csv_path)
        .with_context(|| format!("Failed to read activity CSV: {}", csv_path.display()))?;

    let policy = if config.wrap_overnight {
        OvernightPolicy::WrapToNextDay
    } else {
        OvernightPolicy::Reject
    };

    let records = parser::parse_csv(&content, policy)?;
    let days = aggregate::aggregate_daily(&records);

    let mut database = Database::open(&config.db_path)?;
    let now = Utc::now().timestamp();

    if replace {
        let rows = days
            .iter()
            .map(|(date, totals)| (*date, *totals))
            .collect::<Vec<_>>();
        let historical = projector::historical_document(&rows);
        database.replace_all(&rows, &historical, now)?;
    } else {
        days.iter()
            .try_for_each(|(date, totals)| database.upsert_daily(*date, totals, now))?;
    }

    info!(
        rows = records.len(),
        days = days.len(),
        replace,
        "ingest complete"
    );

    Ok(IngestSummary {
        rows: records.len(),
        days: days.len(),
    })
}
