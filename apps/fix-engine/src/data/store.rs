//! Rolling bar storage.

use std::collections::HashMap;

use chrono::Duration;
use tracing::info;

use crate::domain::market::{Bar, BarSpecification, BarType};
use crate::domain::shared::Timestamp;

/// Persistence surface for completed bars. Keyed by bar type; reads are
/// time-range queries and old data is pruned by a rolling window.
pub trait BarStore: Send {
    /// Append one completed bar to its series.
    fn add_bar(&mut self, bar_type: &BarType, bar: Bar);

    /// Bars for a series with close timestamps in `[from, to]`.
    fn bars(&self, bar_type: &BarType, from: Timestamp, to: Timestamp) -> Vec<Bar>;

    /// Prune bars older than `now - window_days` for every series whose
    /// specification is in `specifications`. Returns the number pruned.
    fn trim_to_window(
        &mut self,
        specifications: &[BarSpecification],
        window_days: i64,
        now: Timestamp,
    ) -> usize;
}

/// In-memory bar store backing the weekly trim job.
#[derive(Debug, Default)]
pub struct InMemoryBarStore {
    series: HashMap<BarType, Vec<Bar>>,
}

impl InMemoryBarStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bars across all series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// True when no bars are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BarStore for InMemoryBarStore {
    fn add_bar(&mut self, bar_type: &BarType, bar: Bar) {
        self.series.entry(bar_type.clone()).or_default().push(bar);
    }

    fn bars(&self, bar_type: &BarType, from: Timestamp, to: Timestamp) -> Vec<Bar> {
        self.series
            .get(bar_type)
            .map(|bars| {
                bars.iter()
                    .filter(|bar| bar.timestamp() >= from && bar.timestamp() <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn trim_to_window(
        &mut self,
        specifications: &[BarSpecification],
        window_days: i64,
        now: Timestamp,
    ) -> usize {
        let cutoff = now.add(-Duration::days(window_days));
        let mut pruned = 0;
        for (bar_type, bars) in &mut self.series {
            if !specifications.contains(&bar_type.specification) {
                continue;
            }
            let before = bars.len();
            bars.retain(|bar| bar.timestamp() >= cutoff);
            pruned += before - bars.len();
        }
        if pruned > 0 {
            info!(pruned, window_days, "trimmed bar data");
        }
        pruned
    }
}
