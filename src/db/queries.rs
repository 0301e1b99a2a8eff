pub const CREATE_DAILY_STATS: &str = r#"
CREATE TABLE IF NOT EXISTS daily_stats (
  date       TEXT PRIMARY KEY,
  activities TEXT NOT NULL,
  created_at INTEGER NOT NULL
);
"#;

pub const CREATE_HISTORICAL_DATA: &str = r#"
CREATE TABLE IF NOT EXISTS historical_data (
  id           INTEGER PRIMARY KEY AUTOINCREMENT,
  generated_at INTEGER NOT NULL,
  doc          TEXT NOT NULL
);
"#;

pub fn schema_statements() -> Vec<&'static str> {
    vec![CREATE_DAILY_STATS, CREATE_HISTORICAL_DATA]
}
