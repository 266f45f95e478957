// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Circular byte buffer.

use crate::error::{AuditError, Result};

/// Returns `(offset + delta) mod capacity`.
///
/// Every position in the ring is computed through this helper; raw offset
/// arithmetic anywhere else is a bug.
pub fn advance(offset: usize, delta: usize, capacity: usize) -> usize {
    (offset + delta) % capacity
}

/// A byte array of fixed capacity `CAP`. All positions are interpreted
/// modulo `CAP`; a copy that reaches the end continues from offset 0.
pub struct RingBuffer<const CAP: usize> {
    buf: [u8; CAP],
}

impl<const CAP: usize> RingBuffer<CAP> {
    pub fn new() -> Self {
        Self { buf: [0; CAP] }
    }

    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Copies `src` into the ring starting at `offset`, wrapping at `CAP`.
    pub fn write(&mut self, offset: usize, src: &[u8]) -> Result<()> {
        if src.len() > CAP {
            return Err(AuditError::BufferTooSmall {
                required: src.len(),
                provided: CAP,
            });
        }

        let start = offset % CAP;
        let tail = CAP - start;
        if src.len() <= tail {
            self.buf[start..start + src.len()].copy_from_slice(src);
        } else {
            self.buf[start..].copy_from_slice(&src[..tail]);
            self.buf[..src.len() - tail].copy_from_slice(&src[tail..]);
        }
        Ok(())
    }

    /// Copies `out.len()` bytes out of the ring starting at `offset`.
    ///
    /// The caller guarantees the range holds currently-valid stored bytes;
    /// the length guard only stops a corrupted size field from looping.
    pub fn read(&self, offset: usize, out: &mut [u8]) -> Result<()> {
        if out.len() > CAP {
            return Err(AuditError::BufferTooSmall {
                required: out.len(),
                provided: CAP,
            });
        }

        let start = offset % CAP;
        let tail = CAP - start;
        if out.len() <= tail {
            out.copy_from_slice(&self.buf[start..start + out.len()]);
        } else {
            out[..tail].copy_from_slice(&self.buf[start..]);
            let rest = out.len() - tail;
            out[tail..].copy_from_slice(&self.buf[..rest]);
        }
        Ok(())
    }
}

impl<const CAP: usize> Default for RingBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}
