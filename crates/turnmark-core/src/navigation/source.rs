//! Turn source port.
//!
//! The adapter layer that locates turn elements in a rendered page lives
//! outside this crate. It hands turns to the resolver through these traits.

/// Anything that can report its vertical offset within the document.
pub trait TurnAnchor {
    /// Distance from the top of the document, in pixels.
    fn top_offset(&self) -> f64;
}

impl TurnAnchor for f64 {
    fn top_offset(&self) -> f64 {
        *self
    }
}

/// Plain offset-only turn reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnPosition {
    pub top_offset: f64,
}

impl TurnPosition {
    pub fn new(top_offset: f64) -> Self {
        Self { top_offset }
    }
}

impl TurnAnchor for TurnPosition {
    fn top_offset(&self) -> f64 {
        self.top_offset
    }
}

/// A live view of the turns currently present in a conversation.
///
/// Turns are returned in discovery order, which is not guaranteed to be
/// vertical order.
pub trait TurnSource {
    type Turn: TurnAnchor + Clone;

    /// Returns every turn currently present.
    fn scan(&self) -> Vec<Self::Turn>;

    /// Returns how many turns are currently present.
    ///
    /// Override when counting is cheaper than a full scan.
    fn count(&self) -> usize {
        self.scan().len()
    }
}

impl<T: TurnAnchor + Clone> TurnSource for Vec<T> {
    type Turn = T;

    fn scan(&self) -> Vec<T> {
        self.clone()
    }

    fn count(&self) -> usize {
        self.len()
    }
}
