//! Turn navigation: ordering turns and tracking the active one.

mod resolver;
mod source;

pub use resolver::IndexResolver;
pub use source::{TurnAnchor, TurnPosition, TurnSource};
