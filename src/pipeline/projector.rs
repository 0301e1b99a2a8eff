use crate::activity::{ActivityKind, ActivityTotals};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed discriminator the dashboard expects on the current-day payload.
pub const SNAPSHOT_ID: &str = "today";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The current-day view of a daily aggregate, zero-filled when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub id: String,
    pub date: String,
    #[serde(flatten)]
    pub activities: ActivityTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: String,
    pub value: u64,
}

/// One document holding the full series for every kind, as stored in the
/// historical collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoricalDocument {
    pub reading_count: Vec<HistoryPoint>,
    pub water_count: Vec<HistoryPoint>,
    pub exercise_minutes: Vec<HistoryPoint>,
    pub game_minutes: Vec<HistoryPoint>,
    pub sleep_minutes: Vec<HistoryPoint>,
}

impl HistoricalDocument {
    pub fn series(&self, kind: ActivityKind) -> &[HistoryPoint] {
        match kind {
            ActivityKind::Reading => &self.reading_count,
            ActivityKind::Water => &self.water_count,
            ActivityKind::Exercise => &self.exercise_minutes,
            ActivityKind::Game => &self.game_minutes,
            ActivityKind::Sleep => &self.sleep_minutes,
        }
    }
}

/// Direct field copy of an aggregate into the response shape. A missing
/// aggregate yields all-zero fields for the requested date, never an error.
pub fn snapshot(date: NaiveDate, activities: Option<&ActivityTotals>) -> DailySnapshot {
    DailySnapshot {
        id: SNAPSHOT_ID.to_string(),
        date: date.format(DATE_FORMAT).to_string(),
        activities: activities.copied().unwrap_or_default(),
    }
}

/// Extract one kind's series over an inclusive date range, ascending by
/// date. Dates with no stored aggregate are absent from the output, not
/// zero-filled.
pub fn history(
    days: &[(NaiveDate, ActivityTotals)],
    kind: ActivityKind,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<HistoryPoint> {
    let mut points = days
        .iter()
        .filter(|(date, _)| *date >= from && *date <= to)
        .map(|(date, totals)| HistoryPoint {
            date: date.format(DATE_FORMAT).to_string(),
            value: totals.value(kind),
        })
        .collect::<Vec<_>>();

    points.sort_by(|left, right| left.date.cmp(&right.date));
    points
}

/// Build the combined historical document: every kind's full series,
/// each ascending by date.
pub fn historical_document(days: &[(NaiveDate, ActivityTotals)]) -> HistoricalDocument {
    let mut sorted = days.to_vec();
    sorted.sort_by_key(|(date, _)| *date);

    let series = |kind: ActivityKind| {
        sorted
            .iter()
            .map(|(date, totals)| HistoryPoint {
                date: date.format(DATE_FORMAT).to_string(),
                value: totals.value(kind),
            })
            .collect::<Vec<_>>()
    };

    HistoricalDocument {
        reading_count: series(ActivityKind::Reading),
        water_count: series(ActivityKind::Water),
        exercise_minutes: series(ActivityKind::Exercise),
        game_minutes: series(ActivityKind::Game),
        sleep_minutes: series(ActivityKind::Sleep),
    }
}

#[cfg(test)]
mod tests {
    use super::{SNAPSHOT_ID, historical_document, history, snapshot};
    use crate::activity::{ActivityKind, ActivityTotals};
    use chrono::NaiveDate;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date")
    }

    fn totals(reading: u64, water: u64) -> ActivityTotals {
        ActivityTotals {
            reading_count: reading,
            water_count: water,
            ..ActivityTotals::default()
        }
    }

    #[test]
    fn snapshot_is_zero_filled_when_no_aggregate_exists() {
        let view = snapshot(date("2024-01-01"), None);

        assert_eq!(view.id, SNAPSHOT_ID);
        assert_eq!(view.date, "2024-01-01");
        assert_eq!(view.activities, ActivityTotals::default());
    }

    #[test]
    fn snapshot_copies_fields_directly() {
        let stored = totals(30, 2);
        let view = snapshot(date("2024-01-01"), Some(&stored));

        assert_eq!(view.activities, stored);
    }

    #[test]
    fn snapshot_serializes_fields_at_top_level() {
        let view = snapshot(date("2024-01-01"), Some(&totals(30, 2)));
        let json = serde_json::to_value(&view).expect("serialize snapshot");

        assert_eq!(json["id"], "today");
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["readingCount"], 30);
        assert_eq!(json["waterCount"], 2);
    }

    #[test]
    fn history_filters_to_inclusive_range_and_sorts_ascending() {
        let days = vec![
            (date("2024-01-05"), totals(50, 0)),
            (date("2024-01-01"), totals(10, 0)),
            (date("2024-01-09"), totals(90, 0)),
            (date("2024-01-03"), totals(30, 0)),
        ];

        let points = history(
            &days,
            ActivityKind::Reading,
            date("2024-01-03"),
            date("2024-01-05"),
        );

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, "2024-01-03");
        assert_eq!(points[0].value, 30);
        assert_eq!(points[1].date, "2024-01-05");
        assert_eq!(points[1].value, 50);
    }

    #[test]
    fn history_leaves_gaps_for_missing_dates() {
        let days = vec![
            (date("2024-01-01"), totals(10, 0)),
            (date("2024-01-03"), totals(30, 0)),
        ];

        let points = history(
            &days,
            ActivityKind::Reading,
            date("2024-01-01"),
            date("2024-01-03"),
        );

        // 2024-01-02 is absent, not zero-filled.
        let dates = points.iter().map(|point| point.date.as_str()).collect::<Vec<_>>();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn historical_document_holds_every_series_in_date_order() {
        let days = vec![
            (date("2024-01-02"), totals(20, 1)),
            (date("2024-01-01"), totals(10, 3)),
        ];

        let document = historical_document(&days);

        for kind in ActivityKind::ALL {
            let series = document.series(kind);
            assert_eq!(series.len(), 2);
            assert_eq!(series[0].date, "2024-01-01");
            assert_eq!(series[1].date, "2024-01-02");
        }
        assert_eq!(document.water_count[0].value, 3);
        assert_eq!(document.reading_count[1].value, 20);
    }
}
