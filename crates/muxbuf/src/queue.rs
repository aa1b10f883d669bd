// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Packet queue - FIFO of completed chains awaiting delivery

use crate::chain::{ChainId, ChainState};
use crate::error::{Error, Result};
use crate::PacketBuffers;

/// FIFO of completed packets
///
/// The queue value itself is plain bookkeeping; the links it threads live in
/// the chain descriptors of the [`PacketBuffers`] instance the chains came
/// from. A queue must only ever hold chains from one instance.
#[derive(Debug)]
pub struct PacketQueue {
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
    pub(crate) count: usize,
}

impl PacketQueue {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            count: 0,
        }
    }

    /// Number of queued packets
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether the queue holds no packets
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for PacketQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a completed delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Every byte of the packet was copied out
    Complete,
    /// The destination was too small; the undelivered tail is lost
    Truncated,
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeliveryStatus {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DeliveryStatus::Complete => defmt::write!(f, "Complete"),
            DeliveryStatus::Truncated => defmt::write!(f, "Truncated"),
        }
    }
}

/// One dequeued packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Bytes copied into the destination
    pub bytes: usize,
    /// Mux channel the packet was tagged with
    pub channel: u8,
    /// Whether the packet was delivered whole
    pub status: DeliveryStatus,
}

impl<const CAP: usize, const FRAGS: usize, const CHAINS: usize>
    PacketBuffers<CAP, FRAGS, CHAINS>
{
    /// Enqueue a completed packet
    ///
    /// O(1). The chain must be open and non-empty; a content-free packet is
    /// rejected. On success the queue takes exclusive ownership: the chain
    /// can no longer be appended to, merged, consumed, or freed through its
    /// handle, and it is destroyed when dequeued.
    pub fn enqueue_packet(&mut self, queue: &mut PacketQueue, chain: ChainId) -> Result<()> {
        {
            let c = self.chains.get(chain.0)?;
            if c.state != ChainState::Open || c.total_len == 0 {
                return Err(Error::InvalidParameter);
            }
        }

        if let Some(tail_idx) = queue.tail {
            self.chains.get_mut(tail_idx)?.next = Some(chain.0);
        } else {
            queue.head = Some(chain.0);
        }

        let c = self.chains.get_mut(chain.0)?;
        c.state = ChainState::Queued;
        c.next = None;
        queue.tail = Some(chain.0);
        queue.count += 1;
        Ok(())
    }

    /// Pop the head packet, copy its bytes into `dest`, and destroy it
    ///
    /// Returns `Error::InvalidParameter` with no side effects on an empty
    /// queue. Otherwise the head chain's bytes are copied in order up to
    /// `dest.len()` and the chain is unconditionally unlinked and freed,
    /// whether or not it fully drained.
    ///
    /// A [`DeliveryStatus::Truncated`] result means bytes beyond `dest.len()`
    /// were irrecoverably discarded; it is informational only, never an
    /// invitation to call again for the rest. Size `dest` to the largest
    /// packet the producer can enqueue, or accept the loss.
    pub fn dequeue_consume(&mut self, queue: &mut PacketQueue, dest: &mut [u8]) -> Result<Delivery> {
        let head = queue.head.ok_or(Error::InvalidParameter)?;

        let (channel, total, next) = {
            let c = self.chains.get(head)?;
            if c.state != ChainState::Queued || c.total_len == 0 {
                return Err(Error::InvalidParameter);
            }
            (c.channel, c.total_len, c.next)
        };

        let bytes = self.drain(head, dest)?;
        let status = if bytes == total {
            DeliveryStatus::Complete
        } else {
            DeliveryStatus::Truncated
        };

        // The packet is removed and destroyed regardless of status
        self.release_chain(head)?;
        queue.head = next;
        if next.is_none() {
            queue.tail = None;
        }
        queue.count -= 1;

        Ok(Delivery {
            bytes,
            channel,
            status,
        })
    }
}
