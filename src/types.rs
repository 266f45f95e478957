// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.

use serde::Serialize;

/// Opaque identity of the partition that submitted a record. Attached verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[repr(transparent)]
pub struct OriginatorId(pub i32);

/// Logical timestamp: a per-store counter, not wall-clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[repr(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Wraps at 64 bits. Wraparound is unchecked; treated as practically unreachable.
    pub fn next(&self) -> Self {
        Timestamp(self.0.wrapping_add(1))
    }
}
