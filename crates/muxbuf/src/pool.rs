// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-block pool primitive
//!
//! `N` equal-size slots with an intrusive free list. Allocation and release
//! are O(1) and never touch the heap. Slots are addressed by index; a live
//! flag per slot rejects double release and access through a stale index.

use crate::error::{Error, Result};

/// One pool slot
#[derive(Clone, Copy)]
struct Slot<T> {
    value: T,
    /// Next slot in the free list (valid while not live)
    next_free: Option<usize>,
    live: bool,
}

/// Fixed-block pool of `N` slots of `T`
pub(crate) struct BlockPool<T, const N: usize> {
    slots: [Slot<T>; N],
    free_head: Option<usize>,
    free: usize,
}

impl<T: Copy, const N: usize> BlockPool<T, N> {
    /// Create a pool with all slots free
    ///
    /// `empty` is the placeholder value stored in free slots.
    pub(crate) fn new(empty: T) -> Self {
        let mut pool = Self {
            slots: [Slot {
                value: empty,
                next_free: None,
                live: false,
            }; N],
            free_head: None,
            free: 0,
        };
        pool.reset();
        pool
    }

    /// Return every slot to the free list
    pub(crate) fn reset(&mut self) {
        let mut i = 0;
        while i < N {
            self.slots[i].live = false;
            self.slots[i].next_free = if i + 1 < N { Some(i + 1) } else { None };
            i += 1;
        }
        self.free_head = if N > 0 { Some(0) } else { None };
        self.free = N;
    }

    /// Allocate a slot, storing `init` in it
    ///
    /// Returns the slot index, or `Error::NoMemory` when exhausted.
    pub(crate) fn alloc(&mut self, init: T) -> Result<usize> {
        let idx = self.free_head.ok_or(Error::NoMemory)?;
        let slot = &mut self.slots[idx];
        self.free_head = slot.next_free;
        slot.next_free = None;
        slot.live = true;
        slot.value = init;
        self.free -= 1;
        Ok(idx)
    }

    /// Release a slot back to the free list
    ///
    /// Rejects out-of-range indices and double release.
    pub(crate) fn release(&mut self, idx: usize) -> Result<()> {
        let slot = self.slots.get_mut(idx).ok_or(Error::InvalidParameter)?;
        if !slot.live {
            return Err(Error::InvalidParameter);
        }
        slot.live = false;
        slot.next_free = self.free_head;
        self.free_head = Some(idx);
        self.free += 1;
        Ok(())
    }

    /// Borrow a live slot's value
    pub(crate) fn get(&self, idx: usize) -> Result<&T> {
        match self.slots.get(idx) {
            Some(slot) if slot.live => Ok(&slot.value),
            _ => Err(Error::InvalidParameter),
        }
    }

    /// Mutably borrow a live slot's value
    pub(crate) fn get_mut(&mut self, idx: usize) -> Result<&mut T> {
        match self.slots.get_mut(idx) {
            Some(slot) if slot.live => Ok(&mut slot.value),
            _ => Err(Error::InvalidParameter),
        }
    }

    /// Number of free slots
    pub(crate) const fn free_slots(&self) -> usize {
        self.free
    }
}
