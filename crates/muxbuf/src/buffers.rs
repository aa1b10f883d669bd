// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! PacketBuffers - the fragment and chain pools plus all chain operations
//!
//! One `PacketBuffers` instance owns the two fixed-block pools of a single
//! transport instance. All fragment and chain handles are scoped to the
//! instance that issued them.

use crate::chain::{Chain, ChainId, ChainState};
use crate::error::{Error, Result};
use crate::fragment::{FragState, Fragment, FragmentId};
use crate::pool::BlockPool;

/// Fragment and chain pools for one transport instance
///
/// Const parameters fix the memory footprint at compile time:
///
/// - `CAP` - payload capacity per fragment, sized to the transport's
///   maximum receive block
/// - `FRAGS` - number of fragment pool slots
/// - `CHAINS` - number of chain descriptor pool slots
///
/// # Example
///
/// ```
/// use muxbuf::{PacketBuffers, PacketQueue};
///
/// let mut buffers: PacketBuffers<32, 8, 4> = PacketBuffers::new();
/// let mut queue = PacketQueue::new();
///
/// let chain = buffers.alloc_chain().unwrap();
/// let frag = buffers.alloc_fragment().unwrap();
/// buffers.fill_fragment(frag, b"hello").unwrap();
/// buffers.append(chain, frag).unwrap();
/// buffers.set_channel(chain, 2).unwrap();
/// buffers.enqueue_packet(&mut queue, chain).unwrap();
///
/// let mut out = [0u8; 32];
/// let delivery = buffers.dequeue_consume(&mut queue, &mut out).unwrap();
/// assert_eq!(&out[..delivery.bytes], b"hello");
/// assert_eq!(delivery.channel, 2);
/// ```
pub struct PacketBuffers<const CAP: usize, const FRAGS: usize, const CHAINS: usize> {
    pub(crate) fragments: BlockPool<Fragment<CAP>, FRAGS>,
    pub(crate) chains: BlockPool<Chain, CHAINS>,
}

impl<const CAP: usize, const FRAGS: usize, const CHAINS: usize>
    PacketBuffers<CAP, FRAGS, CHAINS>
{
    /// Usable payload capacity per fragment
    pub const FRAGMENT_CAPACITY: usize = CAP;

    /// Create an instance with both pools fully free
    pub fn new() -> Self {
        Self {
            fragments: BlockPool::new(Fragment::empty()),
            chains: BlockPool::new(Chain::empty()),
        }
    }

    /// Return every fragment and chain to its pool
    ///
    /// Only valid once the caller holds no live handles and no queue still
    /// references chains from this instance; all outstanding handles become
    /// dead.
    pub fn reset(&mut self) {
        self.fragments.reset();
        self.chains.reset();
    }

    /// Allocate an empty fragment
    ///
    /// The fragment starts with length 0, no link, and
    /// [`FRAGMENT_CAPACITY`](Self::FRAGMENT_CAPACITY) usable payload bytes.
    /// Returns `Error::NoMemory` when the fragment pool is exhausted; the
    /// producer must then drop data or pause the transport.
    pub fn alloc_fragment(&mut self) -> Result<FragmentId> {
        self.fragments.alloc(Fragment::empty()).map(FragmentId)
    }

    /// Allocate an empty chain (no fragments, channel 0)
    ///
    /// Returns `Error::NoMemory` when the chain pool is exhausted.
    pub fn alloc_chain(&mut self) -> Result<ChainId> {
        self.chains.alloc(Chain::empty()).map(ChainId)
    }

    /// Release a held fragment the producer cannot use
    ///
    /// Only fragments not yet appended to a chain can be freed directly;
    /// chained fragments are released through their chain.
    pub fn free_fragment(&mut self, frag: FragmentId) -> Result<()> {
        if self.fragments.get(frag.0)?.state != FragState::Held {
            return Err(Error::InvalidParameter);
        }
        self.fragments.release(frag.0)
    }

    /// Copy `bytes` into a held fragment and set its length
    ///
    /// Returns `Error::BufferTooSmall` if `bytes` exceeds the fragment
    /// capacity, `Error::InvalidParameter` if the fragment is already
    /// chained or dead.
    pub fn fill_fragment(&mut self, frag: FragmentId, bytes: &[u8]) -> Result<()> {
        if bytes.len() > CAP {
            return Err(Error::BufferTooSmall);
        }
        let f = self.fragments.get_mut(frag.0)?;
        if f.state != FragState::Held {
            return Err(Error::InvalidParameter);
        }
        f.data[..bytes.len()].copy_from_slice(bytes);
        f.len = bytes.len();
        Ok(())
    }

    /// Tag an open chain with its mux channel
    pub fn set_channel(&mut self, chain: ChainId, channel: u8) -> Result<()> {
        let c = self.chains.get_mut(chain.0)?;
        if c.state != ChainState::Open {
            return Err(Error::InvalidParameter);
        }
        c.channel = channel;
        Ok(())
    }

    /// Total byte length of an open chain
    pub fn chain_len(&self, chain: ChainId) -> Result<usize> {
        Ok(self.chains.get(chain.0)?.total_len)
    }

    /// Whether a chain holds no bytes
    pub fn chain_is_empty(&self, chain: ChainId) -> Result<bool> {
        Ok(self.chains.get(chain.0)?.total_len == 0)
    }

    /// Append a held fragment to the tail of an open chain
    ///
    /// O(1). The chain takes exclusive ownership of the fragment and its
    /// length is added to the chain total.
    pub fn append(&mut self, chain: ChainId, frag: FragmentId) -> Result<()> {
        let tail = {
            let c = self.chains.get(chain.0)?;
            if c.state != ChainState::Open {
                return Err(Error::InvalidParameter);
            }
            c.tail
        };

        let frag_len = {
            let f = self.fragments.get_mut(frag.0)?;
            if f.state != FragState::Held {
                return Err(Error::InvalidParameter);
            }
            f.state = FragState::Chained;
            f.next = None;
            f.len
        };

        if let Some(tail_idx) = tail {
            self.fragments.get_mut(tail_idx)?.next = Some(frag.0);
        }

        let c = self.chains.get_mut(chain.0)?;
        if tail.is_none() {
            c.head = Some(frag.0);
        }
        c.tail = Some(frag.0);
        c.total_len += frag_len;
        Ok(())
    }

    /// Concatenate `source` onto the tail of `target` and free `source`
    ///
    /// Target bytes precede source bytes. The source descriptor is always
    /// released on success, even when one side is empty: an empty source is
    /// simply freed, and an empty target adopts the source's fragments
    /// wholesale. The `source` handle is dead after this call.
    pub fn merge(&mut self, target: ChainId, source: ChainId) -> Result<()> {
        if target.0 == source.0 {
            return Err(Error::InvalidParameter);
        }

        let (s_head, s_tail, s_total) = {
            let s = self.chains.get(source.0)?;
            if s.state != ChainState::Open {
                return Err(Error::InvalidParameter);
            }
            (s.head, s.tail, s.total_len)
        };

        let t_tail = {
            let t = self.chains.get(target.0)?;
            if t.state != ChainState::Open {
                return Err(Error::InvalidParameter);
            }
            t.tail
        };

        if s_head.is_some() {
            if let Some(tail_idx) = t_tail {
                self.fragments.get_mut(tail_idx)?.next = s_head;
            }
            let t = self.chains.get_mut(target.0)?;
            if t_tail.is_none() {
                t.head = s_head;
            }
            t.tail = s_tail;
            t.total_len += s_total;
        }

        self.chains.release(source.0)
    }

    /// Copy up to `dest.len()` bytes, in order, from the head of an open chain
    ///
    /// Fully consumed head fragments are freed and the head advances; a
    /// partially consumed head keeps its unread bytes shifted to the front of
    /// its buffer. The chain total drops by exactly the number of bytes
    /// copied. Returns the byte count, 0 on an empty chain; safe to call
    /// repeatedly to drain incrementally.
    pub fn consume_bytes(&mut self, chain: ChainId, dest: &mut [u8]) -> Result<usize> {
        if self.chains.get(chain.0)?.state != ChainState::Open {
            return Err(Error::InvalidParameter);
        }
        self.drain(chain.0, dest)
    }

    /// Free an open chain and every fragment it owns
    ///
    /// A queued chain cannot be freed directly; it is destroyed by
    /// [`dequeue_consume`](Self::dequeue_consume). The `chain` handle is dead
    /// after this call.
    pub fn free_chain(&mut self, chain: ChainId) -> Result<()> {
        if self.chains.get(chain.0)?.state != ChainState::Open {
            return Err(Error::InvalidParameter);
        }
        self.release_chain(chain.0)
    }

    /// Number of free fragment slots (backpressure signal)
    pub fn free_fragments(&self) -> usize {
        self.fragments.free_slots()
    }

    /// Number of free chain descriptor slots
    pub fn free_chains(&self) -> usize {
        self.chains.free_slots()
    }

    /// Byte-draining core shared by `consume_bytes` and `dequeue_consume`
    pub(crate) fn drain(&mut self, chain_idx: usize, dest: &mut [u8]) -> Result<usize> {
        let mut copied = 0;

        loop {
            let head = match self.chains.get(chain_idx)?.head {
                Some(h) => h,
                None => break,
            };
            let remaining = dest.len() - copied;
            if remaining == 0 {
                break;
            }

            let (frag_len, frag_next) = {
                let f = self.fragments.get(head)?;
                (f.len, f.next)
            };
            debug_assert!(frag_len <= CAP, "fragment length exceeds capacity");

            if frag_len <= remaining {
                // Whole fragment fits: copy, free it, advance the head
                let f = self.fragments.get(head)?;
                dest[copied..copied + frag_len].copy_from_slice(&f.data[..frag_len]);
                copied += frag_len;

                self.fragments.release(head)?;
                let c = self.chains.get_mut(chain_idx)?;
                c.head = frag_next;
                if frag_next.is_none() {
                    c.tail = None;
                }
                c.total_len -= frag_len;
            } else {
                // Partial: take the front, shift the rest down, stop
                let f = self.fragments.get_mut(head)?;
                dest[copied..copied + remaining].copy_from_slice(&f.data[..remaining]);
                f.data.copy_within(remaining..frag_len, 0);
                f.len = frag_len - remaining;
                copied += remaining;

                self.chains.get_mut(chain_idx)?.total_len -= remaining;
                break;
            }
        }

        Ok(copied)
    }

    /// Free every fragment reachable from the chain head, then the descriptor
    pub(crate) fn release_chain(&mut self, chain_idx: usize) -> Result<()> {
        let mut cursor = self.chains.get(chain_idx)?.head;
        while let Some(idx) = cursor {
            let f = self.fragments.get(idx)?;
            debug_assert!(f.len <= CAP, "fragment length exceeds capacity");
            cursor = f.next;
            self.fragments.release(idx)?;
        }
        self.chains.release(chain_idx)
    }
}

impl<const CAP: usize, const FRAGS: usize, const CHAINS: usize> Default
    for PacketBuffers<CAP, FRAGS, CHAINS>
{
    fn default() -> Self {
        Self::new()
    }
}
