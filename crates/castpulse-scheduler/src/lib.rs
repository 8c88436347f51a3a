//! # Castpulse Scheduler
//!
//! The periodic-send state machine and its supporting loops.
//!
//! ## Architecture
//! ```text
//! AnnounceScheduler
//!   ├── send loop:    wait (fixed or random, cancellable)
//!   │                   → IDLE → ENSURE_CHANNEL → CHECK_STATUS → {SKIP|SEND} → IDLE
//!   ├── update loop:  drain commands from AppState, apply to private mirror,
//!   │                 part/join on channel switch
//!   └── cleanup loop: periodic sweep of both cache instances
//! ```
//! The update and cleanup loops are two instantiations of one generic
//! poll-loop task; each iteration's failure is caught, logged, and never
//! terminates the loop. Shutdown is cooperative: a stop flag observed at
//! suspension points, then all loop handles are awaited before the chat
//! session is released.

pub mod ban;
pub mod engine;
pub mod gate;
pub mod poll;

pub use engine::AnnounceScheduler;
pub use gate::{GateDecision, SkipReason, gate};
