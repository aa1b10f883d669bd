// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fragment - one fixed-capacity slice of an incoming byte stream

/// Handle to a pooled fragment
///
/// Obtained from [`PacketBuffers::alloc_fragment`](crate::PacketBuffers::alloc_fragment).
/// A handle is invalidated when its fragment is consumed or freed; operations
/// on a dead handle return [`Error::InvalidParameter`](crate::Error::InvalidParameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentId(pub(crate) usize);

/// Fragment ownership state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FragState {
    /// Allocated to the producer, not yet part of a chain
    Held,
    /// Linked into a chain, owned by it exclusively
    Chained,
}

/// Pooled fragment: payload bytes plus the forward chain link
#[derive(Clone, Copy)]
pub(crate) struct Fragment<const CAP: usize> {
    /// Valid payload length, always <= CAP
    pub(crate) len: usize,
    /// Inline payload storage
    pub(crate) data: [u8; CAP],
    /// Next fragment in the owning chain
    pub(crate) next: Option<usize>,
    pub(crate) state: FragState,
}

impl<const CAP: usize> Fragment<CAP> {
    /// A freshly allocated fragment: empty, unlinked, held by the producer
    pub(crate) const fn empty() -> Self {
        Self {
            len: 0,
            data: [0u8; CAP],
            next: None,
            state: FragState::Held,
        }
    }
}
