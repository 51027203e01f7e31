//! the `scanned` event (§5: "`scanLeaves` emits a `scanned` event per
//! chain after the write cursor is persisted")
//!
//! modeled as a `tokio::sync::broadcast` channel per §9's ambient-stack
//! guidance: the spec names an event but not a transport, and this is
//! the mechanism the teacher workspace's own client/server crates use
//! for cross-task notification.

use crate::constants::ChainId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannedEvent {
    pub chain: ChainId,
    pub tree: u32,
    /// `tree_scanned_heights[tree]` after this scan, i.e. the (possibly
    /// off-by-one, see `WalletDetails::record_scan`) persisted cursor
    pub scanned_height: u64,
}

/// default capacity for the per-wallet `scanned` broadcast channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;
