use serde::{Deserialize, Serialize};

/// The closed set of trackable activities. Each kind carries a fixed
/// aggregation mode and the field name the dashboard expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Reading,
    Water,
    Exercise,
    Game,
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    SumDuration,
    CountOccurrences,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::Reading,
        ActivityKind::Water,
        ActivityKind::Exercise,
        ActivityKind::Game,
        ActivityKind::Sleep,
    ];

    /// Canonical CSV label for this kind.
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Reading => "reading",
            ActivityKind::Water => "water",
            ActivityKind::Exercise => "exercise",
            ActivityKind::Game => "game",
            ActivityKind::Sleep => "sleep",
        }
    }

    /// Output field name. `readingCount` carries minutes; the name is the
    /// dashboard's contract and is kept verbatim.
    pub fn field(self) -> &'static str {
        match self {
            ActivityKind::Reading => "readingCount",
            ActivityKind::Water => "waterCount",
            ActivityKind::Exercise => "exerciseMinutes",
            ActivityKind::Game => "gameMinutes",
            ActivityKind::Sleep => "sleepMinutes",
        }
    }

    pub fn mode(self) -> AggregationMode {
        match self {
            ActivityKind::Water => AggregationMode::CountOccurrences,
            _ => AggregationMode::SumDuration,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == label.trim())
    }

    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field() == field)
    }
}

/// The per-day activities sub-document: one value per kind, minutes for
/// duration kinds and an occurrence count for count kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityTotals {
    pub reading_count: u64,
    pub water_count: u64,
    pub exercise_minutes: u64,
    pub game_minutes: u64,
    pub sleep_minutes: u64,
}

impl ActivityTotals {
    pub fn value(&self, kind: ActivityKind) -> u64 {
        match kind {
            ActivityKind::Reading => self.reading_count,
            ActivityKind::Water => self.water_count,
            ActivityKind::Exercise => self.exercise_minutes,
            ActivityKind::Game => self.game_minutes,
            ActivityKind::Sleep => self.sleep_minutes,
        }
    }

    /// Apply one record according to the kind's aggregation mode.
    pub fn record(&mut self, kind: ActivityKind, duration_minutes: u64) {
        let delta = match kind.mode() {
            AggregationMode::SumDuration => duration_minutes,
            AggregationMode::CountOccurrences => 1,
        };

        match kind {
            ActivityKind::Reading => self.reading_count += delta,
            ActivityKind::Water => self.water_count += delta,
            ActivityKind::Exercise => self.exercise_minutes += delta,
            ActivityKind::Game => self.game_minutes += delta,
            ActivityKind::Sleep => self.sleep_minutes += delta,
        }
    }
}
