// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for muxbuf

use core::fmt;

/// Result type for muxbuf operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for muxbuf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Stale handle, wrong-state handle, or inconsistent arguments
    InvalidParameter,

    /// Pool exhausted, no free block available
    NoMemory,

    /// Data does not fit the fragment payload capacity
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter => write!(f, "Invalid parameter"),
            Error::NoMemory => write!(f, "Pool exhausted"),
            Error::BufferTooSmall => write!(f, "Buffer too small"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidParameter => defmt::write!(f, "InvalidParameter"),
            Error::NoMemory => defmt::write!(f, "NoMemory"),
            Error::BufferTooSmall => defmt::write!(f, "BufferTooSmall"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
