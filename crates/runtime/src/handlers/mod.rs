//! Handlers for session lifecycle events outside the tick loop.
//!
//! The janitor owns every cleanup path that is not a regular tick outcome:
//! client disconnects, tick timeouts and failed ticks. Each path restores
//! `is_fighting ⇔ (monsters engaged ∨ session exists)`.

mod janitor;

pub use janitor::SessionJanitor;
