pub mod queries;

use crate::activity::ActivityTotals;
use crate::pipeline::projector::HistoricalDocument;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::fs;
use std::path::Path;

// Dates are stored as ISO `YYYY-MM-DD` strings, so lexicographic ordering
// matches chronological ordering.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize)]
pub struct DailyStatsRow {
    pub date: String,
    pub activities: ActivityTotals,
    pub created_at: i64,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;

        let database = Self { conn };
        database.init_schema()?;

        Ok(database)
    }

    pub fn init_schema(&self) -> Result<()> {
        queries::schema_statements()
            .iter()
            .try_for_each(|statement| {
                self.conn
                    .execute(statement, [])
                    .context("Failed to initialize schema")
                    .map(|_| ())
            })
    }

    /// Upsert one day's aggregate. Only the activities sub-document is
    /// replaced; `created_at` and any other stored fields of the row are
    /// preserved. Applying the same aggregate twice leaves the row unchanged.
    pub fn upsert_daily(
        &self,
        date: NaiveDate,
        activities: &ActivityTotals,
        created_at: i64,
    ) -> Result<()> {
        let date_str = date.format(DATE_FORMAT).to_string();
        let doc = serde_json::to_string(activities)
            .context("Failed to serialize activities document")?;

        self.conn
            .execute(
                "INSERT INTO daily_stats (date, activities, created_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(date)
                 DO UPDATE SET activities=excluded.activities",
                params![date_str, doc, created_at],
            )
            .context("Failed to upsert daily stats")?;

        Ok(())
    }

    /// Clear both collections and insert the full new sets. SQLite supports
    /// multi-statement transactions, so the whole replacement is atomic.
    pub fn replace_all(
        &mut self,
        days: &[(NaiveDate, ActivityTotals)],
        historical: &HistoricalDocument,
        generated_at: i64,
    ) -> Result<()> {
        let transaction = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;

        transaction
            .execute("DELETE FROM daily_stats", [])
            .context("Failed to clear daily stats")?;
        transaction
            .execute("DELETE FROM historical_data", [])
            .context("Failed to clear historical data")?;

        days.iter().try_for_each(|(date, activities)| {
            let doc = serde_json::to_string(activities)
                .context("Failed to serialize activities document")?;
            transaction
                .execute(
                    "INSERT INTO daily_stats (date, activities, created_at) VALUES (?1, ?2, ?3)",
                    params![date.format(DATE_FORMAT).to_string(), doc, generated_at],
                )
                .context("Failed to insert daily stats")
                .map(|_| ())
        })?;

        let doc = serde_json::to_string(historical)
            .context("Failed to serialize historical document")?;
        transaction
            .execute(
                "INSERT INTO historical_data (generated_at, doc) VALUES (?1, ?2)",
                params![generated_at, doc],
            )
            .context("Failed to insert historical document")?;

        transaction.commit().context("Failed to commit replacement")?;
        Ok(())
    }

    pub fn daily_for_date(&self, date: NaiveDate) -> Result<Option<ActivityTotals>> {
        let date_str = date.format(DATE_FORMAT).to_string();
        let doc = self
            .conn
            .query_row(
                "SELECT activities FROM daily_stats WHERE date = ?1",
                params![date_str],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .context("Failed to query daily stats")?;

        doc.map(|raw| {
            serde_json::from_str(&raw).context("Failed to parse activities document")
        })
        .transpose()
    }

    pub fn daily_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, ActivityTotals)>> {
        let mut statement = self.conn.prepare(
            "SELECT date, activities FROM daily_stats
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date ASC",
        )?;

        let rows = statement
            .query_map(
                params![
                    from.format(DATE_FORMAT).to_string(),
                    to.format(DATE_FORMAT).to_string()
                ],
                |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                },
            )?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query daily stats range")?;

        rows.into_iter()
            .map(|(date_str, doc)| {
                let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                    .with_context(|| format!("Invalid stored date: {date_str}"))?;
                let activities = serde_json::from_str(&doc)
                    .context("Failed to parse activities document")?;
                Ok((date, activities))
            })
            .collect()
    }

    pub fn all_daily(&self) -> Result<Vec<DailyStatsRow>> {
        let mut statement = self.conn.prepare(
            "SELECT date, activities, created_at FROM daily_stats ORDER BY date ASC",
        )?;

        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list daily stats")?;

        rows.into_iter()
            .map(|(date, doc, created_at)| {
                let activities = serde_json::from_str(&doc)
                    .context("Failed to parse activities document")?;
                Ok(DailyStatsRow {
                    date,
                    activities,
                    created_at,
                })
            })
            .collect()
    }

    pub fn latest_historical(&self) -> Result<Option<HistoricalDocument>> {
        let doc = self
            .conn
            .query_row(
                "SELECT doc FROM historical_data ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .context("Failed to query historical document")?;

        doc.map(|raw| {
            serde_json::from_str(&raw).context("Failed to parse historical document")
        })
        .transpose()
    }

    pub fn day_count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM daily_stats", [], |row| {
                row.get::<_, i64>(0)
            })
            .context("Failed to count daily stats")?;

        Ok(count.max(0) as u64)
    }

    pub fn latest_date(&self) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT date FROM daily_stats ORDER BY date DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query latest date")
    }
}

#[cfg(test)]
mod tests {
    use super::Database;
    use crate::activity::ActivityTotals;
    use crate::pipeline::projector::historical_document;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date")
    }

    fn totals(reading: u64) -> ActivityTotals {
        ActivityTotals {
            reading_count: reading,
            ..ActivityTotals::default()
        }
    }

    fn open_temp() -> (TempDir, Database) {
        let dir = TempDir::new().expect("temp dir");
        let database = Database::open(&dir.path().join("daytrack.db")).expect("open db");
        (dir, database)
    }

    #[test]
    fn upsert_is_idempotent() {
        let (_dir, database) = open_temp();
        let day = date("2024-01-01");

        database.upsert_daily(day, &totals(30), 100).expect("first upsert");
        database.upsert_daily(day, &totals(30), 100).expect("second upsert");

        assert_eq!(database.day_count().expect("count"), 1);
        assert_eq!(
            database.daily_for_date(day).expect("read"),
            Some(totals(30))
        );
    }

    #[test]
    fn upsert_replaces_activities_but_preserves_created_at() {
        let (_dir, database) = open_temp();
        let day = date("2024-01-01");

        database.upsert_daily(day, &totals(30), 100).expect("insert");
        database.upsert_daily(day, &totals(45), 200).expect("update");

        assert_eq!(
            database.daily_for_date(day).expect("read"),
            Some(totals(45))
        );

        let created_at = database
            .conn
            .query_row(
                "SELECT created_at FROM daily_stats WHERE date = '2024-01-01'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .expect("created_at");
        assert_eq!(created_at, 100);
    }

    #[test]
    fn missing_date_reads_as_none() {
        let (_dir, database) = open_temp();
        assert_eq!(
            database.daily_for_date(date("2024-01-01")).expect("read"),
            None
        );
    }

    #[test]
    fn replace_all_clears_both_collections_and_reinserts() {
        let (_dir, mut database) = open_temp();

        database
            .upsert_daily(date("2023-12-31"), &totals(5), 100)
            .expect("stale row");

        let days = vec![
            (date("2024-01-01"), totals(10)),
            (date("2024-01-02"), totals(20)),
        ];
        let historical = historical_document(&days);
        database
            .replace_all(&days, &historical, 200)
            .expect("replace");

        assert_eq!(database.day_count().expect("count"), 2);
        assert_eq!(
            database.daily_for_date(date("2023-12-31")).expect("read"),
            None
        );

        let stored = database
            .latest_historical()
            .expect("read historical")
            .expect("historical present");
        assert_eq!(stored, historical);
    }

    #[test]
    fn daily_between_honors_inclusive_bounds() {
        let (_dir, database) = open_temp();

        for (day, reading) in [("2024-01-01", 1), ("2024-01-02", 2), ("2024-01-03", 3)] {
            database
                .upsert_daily(date(day), &totals(reading), 100)
                .expect("insert");
        }

        let rows = database
            .daily_between(date("2024-01-01"), date("2024-01-02"))
            .expect("range");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, date("2024-01-01"));
        assert_eq!(rows[1].0, date("2024-01-02"));
    }
}
