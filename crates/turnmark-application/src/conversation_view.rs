//! Per-conversation view state.

use crate::pinned_store::PinnedMarkStore;
use turnmark_core::error::Result;
use turnmark_core::navigation::{IndexResolver, TurnSource};
use turnmark_core::pinned::{PinnedSet, turn_id};

/// Everything one open conversation needs: the turn index and its pins.
///
/// Created when a conversation is opened and dropped (via [`close`](Self::close))
/// when the user navigates away. Pins are cached here and written through on
/// every toggle.
pub struct ConversationView<S: TurnSource> {
    conversation_id: String,
    resolver: IndexResolver<S>,
    pins: PinnedMarkStore,
    pinned: PinnedSet,
}

impl<S: TurnSource> ConversationView<S> {
    /// Scans the turns of `source` and loads the conversation's pins.
    pub async fn open(
        conversation_id: impl Into<String>,
        source: S,
        pins: PinnedMarkStore,
        bottom_snap_threshold: f64,
    ) -> Self {
        let conversation_id = conversation_id.into();
        let resolver = IndexResolver::with_bottom_snap_threshold(source, bottom_snap_threshold);
        let pinned = pins.load_pinned(&conversation_id).await;

        tracing::info!(
            conversation_id = %conversation_id,
            turns = resolver.total_count(),
            pinned = pinned.len(),
            "Conversation opened"
        );

        Self {
            conversation_id,
            resolver,
            pins,
            pinned,
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn resolver(&self) -> &IndexResolver<S> {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut IndexResolver<S> {
        &mut self.resolver
    }

    /// Handles a scroll event: rescans when the turn count changed, then
    /// resolves the active turn.
    pub fn on_scroll(&mut self, scroll_y: f64, viewport_height: f64, document_height: f64) -> usize {
        self.resolver.refresh_if_changed();
        self.resolver
            .update_index_by_scroll(scroll_y, viewport_height, document_height)
    }

    /// The turn under the viewport, if the conversation has any.
    pub fn active_turn(&self) -> Option<&S::Turn> {
        self.resolver.current_node()
    }

    pub fn pinned(&self) -> &PinnedSet {
        &self.pinned
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.contains(&turn_id(index))
    }

    /// Flips the pin on the turn at `index`.
    ///
    /// # Returns
    ///
    /// Whether the turn is pinned afterwards. Indexes past the last turn are
    /// ignored and report `false`.
    pub async fn toggle_pin_at(&mut self, index: usize) -> Result<bool> {
        if index >= self.resolver.total_count() {
            tracing::debug!(index, "Ignoring pin toggle on a missing turn");
            return Ok(false);
        }
        let id = turn_id(index);
        let pinned = self.pins.toggle_pinned(&self.conversation_id, &id).await?;
        if pinned {
            self.pinned.insert(id);
        } else {
            self.pinned.remove(&id);
        }
        Ok(pinned)
    }

    /// Flips the pin on the active turn.
    pub async fn toggle_pin_current(&mut self) -> Result<bool> {
        self.toggle_pin_at(self.resolver.current_index()).await
    }

    /// Ends the view and hands the turn source back.
    pub fn close(self) -> S {
        tracing::info!(conversation_id = %self.conversation_id, "Conversation closed");
        self.resolver.into_source()
    }
}
