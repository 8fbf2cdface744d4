//! Scroll position to active turn resolution.

use super::source::{TurnAnchor, TurnSource};
use crate::config::DEFAULT_BOTTOM_SNAP_THRESHOLD_PX;

/// Tracks the ordered turns of one conversation and which of them is active.
///
/// Turns are kept sorted by ascending offset; that order is the turn
/// numbering. A refresh re-reads the source and may renumber turns when
/// content is inserted above the current position. No turn identity is
/// carried across refreshes.
///
/// Every operation is synchronous and total: empty or out-of-range states
/// degrade to index `0` or `None`.
pub struct IndexResolver<S: TurnSource> {
    source: S,
    turns: Vec<S::Turn>,
    current_index: usize,
    bottom_snap_threshold: f64,
}

impl<S: TurnSource> IndexResolver<S> {
    /// Creates a resolver and performs the initial scan.
    pub fn new(source: S) -> Self {
        Self::with_bottom_snap_threshold(source, DEFAULT_BOTTOM_SNAP_THRESHOLD_PX)
    }

    /// Creates a resolver with a custom bottom snap distance, in pixels.
    pub fn with_bottom_snap_threshold(source: S, bottom_snap_threshold: f64) -> Self {
        let mut resolver = Self {
            source,
            turns: Vec::new(),
            current_index: 0,
            bottom_snap_threshold,
        };
        resolver.refresh();
        resolver
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source, for callers that own the turn list.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Re-reads turn positions from the source and re-sorts them.
    pub fn refresh(&mut self) {
        let mut turns = self.source.scan();
        // Stable: turns sharing an offset keep discovery order.
        turns.sort_by(|a, b| a.top_offset().total_cmp(&b.top_offset()));
        self.turns = turns;
        self.clamp();
        tracing::debug!(
            total = self.turns.len(),
            current = self.current_index,
            "Turn index refreshed"
        );
    }

    /// Returns true when the source currently reports a different number of
    /// turns than the last refresh saw. Does not mutate.
    pub fn needs_refresh(&self) -> bool {
        self.source.count() != self.turns.len()
    }

    /// Refreshes only when the turn count changed.
    ///
    /// # Returns
    ///
    /// Whether a refresh happened.
    pub fn refresh_if_changed(&mut self) -> bool {
        if self.needs_refresh() {
            self.refresh();
            true
        } else {
            false
        }
    }

    pub fn total_count(&self) -> usize {
        self.turns.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Sets the active index, clamped into `[0, n-1]` (`0` when empty).
    pub fn set_current_index(&mut self, index: i64) {
        let last = self.last_index() as i64;
        self.current_index = index.clamp(0, last) as usize;
    }

    /// Returns the turn at `index`, or `None` when out of range.
    pub fn node_at(&self, index: usize) -> Option<&S::Turn> {
        self.turns.get(index)
    }

    /// Returns the currently active turn.
    pub fn current_node(&self) -> Option<&S::Turn> {
        self.node_at(self.current_index)
    }

    /// Steps one turn up.
    ///
    /// # Returns
    ///
    /// `false` when already at the first turn (or there are no turns).
    pub fn move_to_prev(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    /// Steps one turn down.
    ///
    /// # Returns
    ///
    /// `false` when already at the last turn (or there are no turns).
    pub fn move_to_next(&mut self) -> bool {
        if self.turns.is_empty() || self.current_index >= self.last_index() {
            return false;
        }
        self.current_index += 1;
        true
    }

    /// Picks the active turn from the viewport position and returns it.
    ///
    /// Within the bottom snap distance of the document end the last turn is
    /// always selected, since the last answer usually extends well below its
    /// own anchor. Otherwise the turn closest to the viewport center wins,
    /// ties going to the earlier turn.
    pub fn update_index_by_scroll(
        &mut self,
        scroll_y: f64,
        viewport_height: f64,
        document_height: f64,
    ) -> usize {
        if self.turns.is_empty() {
            self.current_index = 0;
            return 0;
        }

        if document_height - (scroll_y + viewport_height) < self.bottom_snap_threshold {
            self.current_index = self.last_index();
            return self.current_index;
        }

        let center = scroll_y + viewport_height / 2.0;
        self.current_index = closest_to(&self.turns, center);
        self.current_index
    }

    fn last_index(&self) -> usize {
        self.turns.len().saturating_sub(1)
    }

    fn clamp(&mut self) {
        self.current_index = self.current_index.min(self.last_index());
    }
}

/// Single forward scan over turns sorted by offset.
///
/// Stops at the first turn below `center` that is no closer than the best
/// candidate. With non-monotonic offsets this can miss the true minimum.
fn closest_to<T: TurnAnchor>(turns: &[T], center: f64) -> usize {
    let mut closest = 0;
    let mut min_distance = f64::INFINITY;

    for (index, turn) in turns.iter().enumerate() {
        let offset = turn.top_offset();
        let distance = (offset - center).abs();
        if distance < min_distance {
            min_distance = distance;
            closest = index;
        } else if offset > center {
            break;
        }
    }

    closest
}
