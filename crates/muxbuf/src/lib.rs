// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # muxbuf - Fixed-pool packet reassembly buffers
//!
//! Reassembles a byte stream arriving in small fixed-size fragments from a
//! serial or radio transport into discrete, channel-tagged packets, with no
//! dynamic heap allocation. It sits beneath a byte-level multiplexing
//! decoder (which finds packet boundaries and channel tags) and above a
//! protocol client consuming whole packets.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------+
//! |  Protocol client (consumes packets)     |
//! +-----------------------------------------+
//!                      ^
//! +-----------------------------------------+
//! |  PacketQueue (FIFO of complete chains)  |
//! +-----------------------------------------+
//!                      ^
//! +-----------------------------------------+
//! |  Fragment chains (accumulating packets) |
//! +-----------------------------------------+
//!                      ^
//! +-----------------------------------------+
//! |  Mux decoder (fills fragments)          |
//! +-----------------------------------------+
//! ```
//!
//! ## Design Constraints
//!
//! - **No heap allocations** (const generics for fixed pools)
//! - **No internal locking** - single producer, single consumer; a
//!   happens-before edge is the caller's responsibility across contexts
//! - **Bounded operations** - everything is O(1) or O(bytes copied)
//! - **`no_std` compatible**
//!
//! Backpressure is expressed solely through pool exhaustion
//! ([`Error::NoMemory`]); the producer must drop data or pause the
//! transport. Framing, flow control, and retransmission belong to the
//! layers around this crate.
//!
//! ## Feature Flags
//!
//! - `std` -- Enable std (for host testing and `std::error::Error`)
//! - `defmt` -- `defmt::Format` for error/status types

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffers;
mod chain;
mod error;
mod fragment;
mod pool;
mod queue;

pub use crate::buffers::PacketBuffers;
pub use crate::chain::ChainId;
pub use crate::error::{Error, Result};
pub use crate::fragment::FragmentId;
pub use crate::queue::{Delivery, DeliveryStatus, PacketQueue};

/// Version of muxbuf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
