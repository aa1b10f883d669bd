// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fragment chain descriptor - an ordered list of fragments forming one packet

/// Handle to a pooled fragment chain
///
/// Obtained from [`PacketBuffers::alloc_chain`](crate::PacketBuffers::alloc_chain).
/// A handle is invalidated when its chain is merged away, freed, or dequeued;
/// operations on a dead handle return
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainId(pub(crate) usize);

/// Chain lifecycle state
///
/// Open chains accumulate fragments; a chain enters Queued at most once and
/// is destroyed when dequeued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChainState {
    /// Accumulating fragments, owned by the producer
    Open,
    /// Linked into a packet queue, owned by it exclusively
    Queued,
}

/// Chain descriptor
///
/// Invariants: `total_len` equals the sum of member fragment lengths;
/// `head`, `tail` and `total_len == 0` are empty together.
#[derive(Clone, Copy)]
pub(crate) struct Chain {
    /// First fragment, or None while empty
    pub(crate) head: Option<usize>,
    /// Last fragment, or None while empty
    pub(crate) tail: Option<usize>,
    /// Sum of member fragment lengths
    pub(crate) total_len: usize,
    /// Mux channel tag, meaningful once queued
    pub(crate) channel: u8,
    /// Next chain in the owning queue (valid while Queued)
    pub(crate) next: Option<usize>,
    pub(crate) state: ChainState,
}

impl Chain {
    /// A freshly allocated chain: empty, channel 0, not queued
    pub(crate) const fn empty() -> Self {
        Self {
            head: None,
            tail: None,
            total_len: 0,
            channel: 0,
            next: None,
            state: ChainState::Open,
        }
    }
}
