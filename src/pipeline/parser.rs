use crate::activity::ActivityKind;
use crate::error::PipelineError;
use chrono::{NaiveDate, NaiveTime};

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const SECONDS_PER_DAY: i64 = 86_400;

/// How to treat a row whose end time precedes its start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OvernightPolicy {
    /// Fail the run with `NegativeDuration`.
    Reject,
    /// Treat the end time as belonging to the next day. The record still
    /// aggregates under its start date.
    WrapToNextDay,
}

/// One normalized activity interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub kind: ActivityKind,
    pub duration_minutes: u64,
}

/// Parse a whole CSV file. The header must name the `date`, `activity`,
/// `begentime` and `overtime` columns; any parse failure aborts.
pub fn parse_csv(content: &str, policy: OvernightPolicy) -> Result<Vec<ActivityRecord>, PipelineError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines.next().ok_or_else(|| PipelineError::MalformedRow {
        line: 1,
        reason: "empty file".to_string(),
    })?;
    let columns = header_columns(header_line, header)?;

    lines
        .map(|(line, raw)| parse_row(line, raw, &columns, policy))
        .collect()
}

/// Parse one interval into a normalized record. The date is combined with
/// each time-of-day before subtracting, and the resulting duration is
/// rounded half-up to whole minutes.
pub fn parse_interval(
    date: NaiveDate,
    label: &str,
    start_raw: &str,
    end_raw: &str,
    policy: OvernightPolicy,
) -> Result<ActivityRecord, PipelineError> {
    let kind = ActivityKind::from_label(label)
        .ok_or_else(|| PipelineError::UnknownActivity(label.trim().to_string()))?;

    let start_time = parse_time(start_raw)?;
    let end_time = parse_time(end_raw)?;

    let start = date.and_time(start_time);
    let end = date.and_time(end_time);
    let mut seconds = (end - start).num_seconds();

    if seconds < 0 {
        match policy {
            OvernightPolicy::Reject => {
                return Err(PipelineError::NegativeDuration {
                    start: start_time,
                    end: end_time,
                });
            }
            OvernightPolicy::WrapToNextDay => seconds += SECONDS_PER_DAY,
        }
    }

    Ok(ActivityRecord {
        date,
        kind,
        duration_minutes: round_half_up_minutes(seconds),
    })
}

struct HeaderColumns {
    date: usize,
    activity: usize,
    begentime: usize,
    overtime: usize,
    width: usize,
}

fn header_columns(line: usize, header: &str) -> Result<HeaderColumns, PipelineError> {
    let names = header.split(',').map(str::trim).collect::<Vec<_>>();

    let position = |name: &str| {
        names
            .iter()
            .position(|candidate| *candidate == name)
            .ok_or_else(|| PipelineError::MalformedRow {
                line,
                reason: format!("missing column: {name}"),
            })
    };

    Ok(HeaderColumns {
        date: position("date")?,
        activity: position("activity")?,
        begentime: position("begentime")?,
        overtime: position("overtime")?,
        width: names.len(),
    })
}

fn parse_row(
    line: usize,
    raw: &str,
    columns: &HeaderColumns,
    policy: OvernightPolicy,
) -> Result<ActivityRecord, PipelineError> {
    let fields = raw.split(',').map(str::trim).collect::<Vec<_>>();

    if fields.len() != columns.width {
        return Err(PipelineError::MalformedRow {
            line,
            reason: format!(
                "expected {} fields, found {}",
                columns.width,
                fields.len()
            ),
        });
    }

    let date = NaiveDate::parse_from_str(fields[columns.date], DATE_FORMAT).map_err(|_| {
        PipelineError::MalformedRow {
            line,
            reason: format!("invalid date: {}", fields[columns.date]),
        }
    })?;

    parse_interval(
        date,
        fields[columns.activity],
        fields[columns.begentime],
        fields[columns.overtime],
        policy,
    )
}

fn parse_time(raw: &str) -> Result<NaiveTime, PipelineError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).map_err(|source| {
        PipelineError::MalformedTime {
            value: raw.trim().to_string(),
            source,
        }
    })
}

fn round_half_up_minutes(seconds: i64) -> u64 {
    ((seconds + 30) / 60) as u64
}

#[cfg(test)]
mod tests {
    use super::{ActivityRecord, OvernightPolicy, parse_csv, parse_interval};
    use crate::activity::ActivityKind;
    use crate::error::PipelineError;
    use chrono::NaiveDate;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date")
    }

    #[test]
    fn duration_is_exact_whole_minute_difference() {
        let record = parse_interval(
            date("2024-01-01"),
            "reading",
            "08:00:00",
            "08:30:00",
            OvernightPolicy::Reject,
        )
        .expect("valid interval");

        assert_eq!(
            record,
            ActivityRecord {
                date: date("2024-01-01"),
                kind: ActivityKind::Reading,
                duration_minutes: 30,
            }
        );
    }

    #[test]
    fn fractional_minutes_round_half_up() {
        let up = parse_interval(
            date("2024-01-01"),
            "game",
            "08:00:00",
            "08:30:30",
            OvernightPolicy::Reject,
        )
        .expect("valid interval");
        assert_eq!(up.duration_minutes, 31);

        let down = parse_interval(
            date("2024-01-01"),
            "game",
            "08:00:00",
            "08:30:29",
            OvernightPolicy::Reject,
        )
        .expect("valid interval");
        assert_eq!(down.duration_minutes, 30);
    }

    #[test]
    fn malformed_time_is_rejected() {
        let result = parse_interval(
            date("2024-01-01"),
            "reading",
            "8h00",
            "08:30:00",
            OvernightPolicy::Reject,
        );

        assert!(matches!(
            result,
            Err(PipelineError::MalformedTime { value, .. }) if value == "8h00"
        ));
    }

    #[test]
    fn unknown_activity_is_rejected_not_dropped() {
        let result = parse_interval(
            date("2024-01-01"),
            "juggling",
            "08:00:00",
            "08:30:00",
            OvernightPolicy::Reject,
        );

        assert!(matches!(
            result,
            Err(PipelineError::UnknownActivity(label)) if label == "juggling"
        ));
    }

    #[test]
    fn inverted_interval_fails_under_reject_policy() {
        let result = parse_interval(
            date("2024-01-01"),
            "sleep",
            "09:00:00",
            "08:00:00",
            OvernightPolicy::Reject,
        );

        assert!(matches!(
            result,
            Err(PipelineError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn inverted_interval_wraps_to_next_day_when_selected() {
        let record = parse_interval(
            date("2024-01-01"),
            "sleep",
            "23:30:00",
            "00:30:00",
            OvernightPolicy::WrapToNextDay,
        )
        .expect("wrapped interval");

        assert_eq!(record.duration_minutes, 60);
        // A wrapped record stays on its start date.
        assert_eq!(record.date, date("2024-01-01"));
    }

    #[test]
    fn csv_parses_rows_against_the_header() {
        let content = "date,activity,begentime,overtime\n\
                       2024-01-01,reading,08:00:00,08:30:00\n\
                       2024-01-01,water,08:35:00,08:36:00\n";

        let records = parse_csv(content, OvernightPolicy::Reject).expect("valid csv");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, ActivityKind::Reading);
        assert_eq!(records[0].duration_minutes, 30);
        assert_eq!(records[1].kind, ActivityKind::Water);
    }

    #[test]
    fn csv_header_may_reorder_columns() {
        let content = "activity,overtime,begentime,date\n\
                       reading,08:30:00,08:00:00,2024-01-01\n";

        let records = parse_csv(content, OvernightPolicy::Reject).expect("valid csv");
        assert_eq!(records[0].duration_minutes, 30);
    }

    #[test]
    fn csv_with_missing_column_fails() {
        let content = "date,activity,begentime\n2024-01-01,reading,08:00:00\n";
        let result = parse_csv(content, OvernightPolicy::Reject);

        assert!(matches!(
            result,
            Err(PipelineError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn csv_with_bad_row_reports_its_line_number() {
        let content = "date,activity,begentime,overtime\n\
                       2024-01-01,reading,08:00:00,08:30:00\n\
                       not-a-date,reading,08:00:00,08:30:00\n";

        let result = parse_csv(content, OvernightPolicy::Reject);
        assert!(matches!(
            result,
            Err(PipelineError::MalformedRow { line: 3, .. })
        ));
    }
}
