//! The send-gate policy, as a pure function so every row of the decision
//! table is directly testable.

use castpulse_core::types::ChannelStatus;

/// What a tick should do after status checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Skip(SkipReason),
    /// Send, but attempt a best-effort follow first (its failure never
    /// blocks the send).
    SendAfterFollow,
    Send,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Banned,
    NotLive,
}

/// Evaluate the gate, in order: banned wins, then the live requirement
/// (unless ignored), then the follow nudge.
pub fn gate(status: &ChannelStatus, ignore_live_status: bool) -> GateDecision {
    if status.is_banned {
        return GateDecision::Skip(SkipReason::Banned);
    }
    if !ignore_live_status && !status.is_live {
        return GateDecision::Skip(SkipReason::NotLive);
    }
    if !status.is_following {
        return GateDecision::SendAfterFollow;
    }
    GateDecision::Send
}
