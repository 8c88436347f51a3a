//! # Castpulse API
//!
//! Remote status checks with bounded retry and caching.
//!
//! ```text
//! StatusChecker (cache-keyed derived checks)
//!   ├── resolve_user_id: login → id, only hits cached
//!   ├── is_live:         fail-closed (unknown ⇒ false)
//!   ├── is_following:    fail-open  (unknown ⇒ true, cached)
//!   └── follow:          best-effort follow-edge creation
//!         │
//!         └── retry_call (2s, 4s, 8s… backoff on timeout/connection)
//!               │
//!               └── StatusProvider (HelixClient over reqwest)
//! ```
//!
//! Ban status is deliberately NOT here — it is a local chat-session
//! heuristic owned by the scheduler, never a network call.

pub mod checks;
pub mod helix;
pub mod retry;

pub use checks::{CachedValue, StatusChecker};
pub use helix::HelixClient;
pub use retry::{DEFAULT_MAX_RETRIES, retry_call};
