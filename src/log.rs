// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Circular audit store.
//!
//! Records are appended only at the logical tail and removed only from the
//! logical head, strict FIFO. The state descriptor and the ring contents
//! move together: a mutating operation either commits all four state fields
//! or aborts before touching any of them.
//!
//! # Invariants
//! - `record_count == 0` iff `bytes_used == 0`
//! - records form one contiguous chain from `first_offset`; each header's
//!   `payload_len` locates the next record via modular addition
//! - `bytes_used <= CAP` after every operation

use serde::Serialize;

use crate::config::{MIN_PAYLOAD_SIZE, PAYLOAD_ALIGN};
use crate::error::{AuditError, Result};
use crate::record::{max_payload, wire_size, Record, RecordHeader};
use crate::seal::{PlaceholderSealer, RecordSealer};
use crate::sink::{DiagnosticSink, NullSink};
use crate::storage::{advance, RingBuffer};
use crate::types::{OriginatorId, Timestamp};

/// Byte positions and totals of the stored chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LogState {
    /// Offset of the oldest record's header.
    pub(crate) first_offset: usize,
    /// Offset of the most recently added record's header.
    pub(crate) last_offset: usize,
    pub(crate) record_count: u32,
    pub(crate) bytes_used: usize,
}

/// Snapshot returned by [`AuditLog::get_info`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LogInfo {
    pub record_count: u32,
    pub bytes_used: usize,
}

pub struct AuditLog<const CAP: usize> {
    state: LogState,
    ring: RingBuffer<CAP>,
    timestamp: Timestamp,
    iv_counter: u32,
    sealer: Box<dyn RecordSealer>,
    sink: Box<dyn DiagnosticSink>,
}

impl<const CAP: usize> AuditLog<CAP> {
    pub fn new() -> Self {
        Self::with_parts(Box::new(PlaceholderSealer), Box::new(NullSink))
    }

    /// Builds a store with a caller-supplied sealer and diagnostic sink.
    pub fn with_parts(sealer: Box<dyn RecordSealer>, sink: Box<dyn DiagnosticSink>) -> Self {
        assert!(
            CAP >= wire_size(MIN_PAYLOAD_SIZE),
            "capacity cannot hold a single minimum-size record"
        );
        Self {
            state: LogState::default(),
            ring: RingBuffer::new(),
            timestamp: Timestamp(0),
            iv_counter: 0,
            sealer,
            sink,
        }
    }

    /// Zeroes the state descriptor. Idempotent.
    ///
    /// The timestamp and IV counters are process-lifetime values and are
    /// deliberately not rewound.
    pub fn init(&mut self) {
        self.state = LogState::default();
    }

    // --- Read APIs ---

    /// O(1) view of the state descriptor. Never fails.
    pub fn get_info(&self) -> LogInfo {
        LogInfo {
            record_count: self.state.record_count,
            bytes_used: self.state.bytes_used,
        }
    }

    /// Full wire size of the record at `index` (0 = oldest).
    pub fn get_record_info(&self, index: u32) -> Result<usize> {
        let offset = self.offset_of(index)?;
        Ok(self.wire_size_at(offset))
    }

    /// Copies the complete frame of the record at `index` into `out`.
    ///
    /// Returns the number of bytes copied. If `out` cannot hold the frame
    /// the call fails with `BufferTooSmall` and copies nothing.
    pub fn retrieve_record(&self, index: u32, out: &mut [u8]) -> Result<usize> {
        let offset = self.offset_of(index)?;
        let size = self.wire_size_at(offset);
        if size > out.len() {
            return Err(AuditError::BufferTooSmall {
                required: size,
                provided: out.len(),
            });
        }
        self.ring.read(offset, &mut out[..size])?;
        Ok(size)
    }

    /// Detached copy of the record at `index`.
    pub fn record_at(&self, index: u32) -> Result<Record> {
        let offset = self.offset_of(index)?;
        let size = self.wire_size_at(offset);
        let mut frame = vec![0u8; size];
        self.ring.read(offset, &mut frame)?;
        Record::from_frame(&frame)
    }

    /// Iterates over all stored records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.state.record_count).filter_map(move |i| self.record_at(i).ok())
    }

    /// Re-seals the stored record at `index` and compares trailers.
    pub fn verify_record(&self, index: u32) -> Result<bool> {
        let record = self.record_at(index)?;
        let header_bytes = record.header.to_bytes();
        Ok(self
            .sealer
            .verify(&header_bytes, &record.payload, &record.trailer))
    }

    /// Checks the internal consistency of the stored chain.
    pub fn check_invariants(&self) -> Result<()> {
        if self.state.bytes_used > CAP {
            return Err(AuditError::Corrupted("bytes_used exceeds capacity"));
        }

        // 1. Empty store
        if self.state.record_count == 0 {
            if self.state.bytes_used != 0 {
                return Err(AuditError::Corrupted("empty chain with nonzero bytes_used"));
            }
            return Ok(());
        }

        // 2. Walk the chain and re-derive the totals
        let mut offset = self.state.first_offset;
        let mut last = offset;
        let mut total = 0usize;
        for _ in 0..self.state.record_count {
            let size = self.wire_size_at(offset);
            total += size;
            if total > CAP {
                return Err(AuditError::Corrupted("chain sizes exceed capacity"));
            }
            last = offset;
            offset = advance(offset, size, CAP);
        }

        if total != self.state.bytes_used {
            return Err(AuditError::Corrupted("chain sizes disagree with bytes_used"));
        }
        if last != self.state.last_offset {
            return Err(AuditError::Corrupted("chain does not end at last_offset"));
        }
        Ok(())
    }

    // --- Write APIs ---

    /// Appends a record at the logical tail, evicting oldest records first
    /// if the ring is too full.
    ///
    /// `payload` must be at least 4 bytes and a multiple of 4 (it carries at
    /// least a 32-bit record id). A payload too large to ever fit fails with
    /// `InsufficientMemory` before any state is touched.
    pub fn add_record(&mut self, payload: &[u8], originator: OriginatorId) -> Result<()> {
        if payload.len() < MIN_PAYLOAD_SIZE || payload.len() % PAYLOAD_ALIGN != 0 {
            return Err(AuditError::UnsupportedPayloadSize {
                size: payload.len(),
            });
        }
        if payload.len() > max_payload(CAP) {
            return Err(AuditError::InsufficientMemory {
                required: wire_size(payload.len()),
                capacity: CAP,
            });
        }

        let needed = wire_size(payload.len());
        let write_offset = self.make_room(needed);

        let header = RecordHeader {
            timestamp: self.timestamp,
            iv_counter: self.iv_counter,
            originator,
            payload_len: payload.len() as u32,
        };
        let header_bytes = header.to_bytes();
        let trailer = self.sealer.seal(&header_bytes, payload);

        let mut frame = Vec::with_capacity(needed);
        frame.extend_from_slice(&header_bytes);
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&trailer);
        self.ring.write(write_offset, &frame)?;

        self.state.last_offset = write_offset;
        if self.state.record_count == 0 {
            self.state.first_offset = write_offset;
        }
        self.state.record_count += 1;
        self.state.bytes_used += needed;

        self.timestamp = self.timestamp.next();
        self.iv_counter = self.iv_counter.wrapping_add(1);

        // Best-effort mirror; runs strictly after the state commit.
        self.sink.mirror(&frame);
        Ok(())
    }

    /// Deletes the oldest record. Only index 0 is accepted.
    pub fn delete_record(&mut self, index: u32) -> Result<()> {
        if index != 0 {
            return Err(AuditError::UnsupportedIndex { index });
        }
        if self.state.record_count == 0 {
            return Err(AuditError::IndexOutOfRange { index, count: 0 });
        }
        if self.state.record_count == 1 {
            self.init();
            return Ok(());
        }

        let oldest = self.wire_size_at(self.state.first_offset);
        self.state.bytes_used -= oldest;
        self.state.record_count -= 1;
        self.state.first_offset = advance(self.state.first_offset, oldest, CAP);
        Ok(())
    }

    // --- Internals ---

    /// Evicts oldest records until `needed` bytes fit, then returns the
    /// offset the new record must be written at.
    ///
    /// The caller has already guaranteed `needed <= CAP`, so the loop always
    /// terminates; eviction itself cannot fail.
    fn make_room(&mut self, needed: usize) -> usize {
        while needed > CAP - self.state.bytes_used {
            let oldest = self.wire_size_at(self.state.first_offset);
            self.state.bytes_used -= oldest;
            self.state.record_count -= 1;
            self.state.first_offset = advance(self.state.first_offset, oldest, CAP);
        }

        if self.state.record_count > 0 {
            let last = self.wire_size_at(self.state.last_offset);
            advance(self.state.last_offset, last, CAP)
        } else {
            self.state.first_offset
        }
    }

    /// Walks the chain from the head for `index` steps.
    fn offset_of(&self, index: u32) -> Result<usize> {
        if index >= self.state.record_count {
            return Err(AuditError::IndexOutOfRange {
                index,
                count: self.state.record_count,
            });
        }

        let mut offset = self.state.first_offset;
        for _ in 0..index {
            offset = advance(offset, self.wire_size_at(offset), CAP);
        }
        Ok(offset)
    }

    /// Wrap-aware header read; the header itself may straddle the boundary.
    fn header_at(&self, offset: usize) -> RecordHeader {
        let mut buf = [0u8; RecordHeader::SIZE];
        self.ring
            .read(offset, &mut buf)
            .expect("a header always fits: capacity is asserted at construction");
        RecordHeader::from_bytes(&buf)
    }

    fn wire_size_at(&self, offset: usize) -> usize {
        wire_size(self.header_at(offset).payload_len as usize)
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> LogState {
        self.state
    }
}

impl<const CAP: usize> Default for AuditLog<CAP> {
    fn default() -> Self {
        Self::new()
    }
}
