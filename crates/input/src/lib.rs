//! Input aggregation: every device folds into one motion intent and one look delta.
//!
//! # Invariants
//! - Consumers see `MotionIntent` and `LookDelta`, never raw device events.
//! - Accumulated look is drained on poll and never applied twice.
//! - Unknown keys are ignored; nothing here can fail.

mod aggregator;
mod event;

pub use aggregator::{InputAggregator, InputConfig};
pub use event::{InputEvent, Key};
