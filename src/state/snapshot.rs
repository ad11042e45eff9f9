//! Dashboard snapshot
//!
//! Immutable view of all three slots at one revision.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::slot::Slot;
use crate::model::{HistoricalSeries, Reading};

/// Which slot an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Current,
    Historical,
    Prediction,
}

impl SlotKind {
    pub fn all() -> &'static [SlotKind] {
        &[SlotKind::Current, SlotKind::Historical, SlotKind::Prediction]
    }
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotKind::Current => write!(f, "current"),
            SlotKind::Historical => write!(f, "historical"),
            SlotKind::Prediction => write!(f, "prediction"),
        }
    }
}

/// All dashboard state at one point in time
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    /// Bumped on every slot replacement
    pub revision: u64,
    /// When the last slot replacement happened
    pub updated_at: Option<DateTime<Utc>>,
    pub current: Slot<Reading>,
    pub historical: Slot<HistoricalSeries>,
    pub prediction: Slot<Reading>,
}

impl DashboardSnapshot {
    /// True once no slot is `Loading`
    pub fn is_settled(&self) -> bool {
        self.current.is_settled() && self.historical.is_settled() && self.prediction.is_settled()
    }

    /// Slots currently in the `Error` state
    pub fn failed_slots(&self) -> Vec<SlotKind> {
        SlotKind::all()
            .iter()
            .copied()
            .filter(|kind| self.is_error(*kind))
            .collect()
    }

    fn is_error(&self, kind: SlotKind) -> bool {
        match kind {
            SlotKind::Current => self.current.is_error(),
            SlotKind::Historical => self.historical.is_error(),
            SlotKind::Prediction => self.prediction.is_error(),
        }
    }
}
