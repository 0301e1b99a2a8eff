use crate::activity::ActivityKind;
use crate::db::Database;
use crate::error::QueryError;
use crate::pipeline::projector::{self, DailySnapshot, HistoryPoint};
use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Supplies "today" so query logic stays deterministic under test.
pub trait DateProvider {
    fn today(&self) -> NaiveDate;
}

pub struct LocalDates;

impl DateProvider for LocalDates {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub struct QueryService<'a> {
    database: &'a Database,
    dates: &'a dyn DateProvider,
}

impl<'a> QueryService<'a> {
    pub fn new(database: &'a Database, dates: &'a dyn DateProvider) -> Self {
        Self { database, dates }
    }

    /// The current day's snapshot, zero-filled when nothing is stored.
    pub fn today_snapshot(&self) -> Result<DailySnapshot> {
        let today = self.dates.today();
        let activities = self.database.daily_for_date(today)?;

        Ok(projector::snapshot(today, activities.as_ref()))
    }

    /// One kind's series over the inclusive `[today - days, today]` window,
    /// ascending by date and possibly sparse.
    pub fn history(
        &self,
        activity_type: &str,
        days: u32,
    ) -> Result<Vec<HistoryPoint>, QueryError> {
        let kind = ActivityKind::from_field(activity_type)
            .ok_or_else(|| QueryError::InvalidActivityKind(activity_type.to_string()))?;

        let to = self.dates.today();
        let from = to - Duration::days(i64::from(days));
        let rows = self.database.daily_between(from, to)?;

        Ok(projector::history(&rows, kind, from, to))
    }
}
