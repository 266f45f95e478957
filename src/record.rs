// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! On-wire record layout.
//!
//! Every stored record is one contiguous frame (modulo wraparound):
//! fixed header, caller payload, fixed trailer. The header `payload_len`
//! field is what lets a reader locate the next record, so it must never
//! disagree with the bytes actually written.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::{AuditError, Result};
use crate::types::{OriginatorId, Timestamp};

/// Size in bytes of the integrity trailer appended to every record.
pub const TRAILER_SIZE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RecordHeader {
    /// Monotone logical timestamp assigned at append time.
    pub timestamp: Timestamp,
    /// Reserved for future encryption; bumped per record like the timestamp.
    pub iv_counter: u32,
    pub originator: OriginatorId,
    /// Length of the variable body only, excluding header and trailer.
    pub payload_len: u32,
}

impl RecordHeader {
    pub const SIZE: usize = 8 + 4 + 4 + 4; // 20 bytes

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        LittleEndian::write_u64(&mut buf[0..8], self.timestamp.0);
        LittleEndian::write_u32(&mut buf[8..12], self.iv_counter);
        LittleEndian::write_i32(&mut buf[12..16], self.originator.0);
        LittleEndian::write_u32(&mut buf[16..20], self.payload_len);
        buf
    }

    pub fn from_bytes(buf: &[u8; Self::SIZE]) -> Self {
        Self {
            timestamp: Timestamp(LittleEndian::read_u64(&buf[0..8])),
            iv_counter: LittleEndian::read_u32(&buf[8..12]),
            originator: OriginatorId(LittleEndian::read_i32(&buf[12..16])),
            payload_len: LittleEndian::read_u32(&buf[16..20]),
        }
    }
}

/// Total bytes a record with the given payload occupies in the ring.
pub fn wire_size(payload_len: usize) -> usize {
    RecordHeader::SIZE + payload_len + TRAILER_SIZE
}

/// Largest payload a log of `capacity` bytes can ever hold.
pub const fn max_payload(capacity: usize) -> usize {
    capacity - RecordHeader::SIZE - TRAILER_SIZE
}

/// A fully decoded record, detached from the ring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub header: RecordHeader,
    pub payload: Vec<u8>,
    pub trailer: [u8; TRAILER_SIZE],
}

impl Record {
    /// Parses one complete frame. The slice must be exactly one record.
    pub fn from_frame(frame: &[u8]) -> Result<Self> {
        if frame.len() < RecordHeader::SIZE + TRAILER_SIZE {
            return Err(AuditError::MalformedFrame {
                expected: RecordHeader::SIZE + TRAILER_SIZE,
                found: frame.len(),
            });
        }

        let header = RecordHeader::from_bytes(frame[..RecordHeader::SIZE].try_into().unwrap());

        let expected = wire_size(header.payload_len as usize);
        if frame.len() != expected {
            return Err(AuditError::MalformedFrame {
                expected,
                found: frame.len(),
            });
        }

        let body_end = RecordHeader::SIZE + header.payload_len as usize;
        Ok(Self {
            header,
            payload: frame[RecordHeader::SIZE..body_end].to_vec(),
            trailer: frame[body_end..].try_into().unwrap(),
        })
    }

    pub fn to_frame(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.wire_size());
        frame.extend_from_slice(&self.header.to_bytes());
        frame.extend_from_slice(&self.payload);
        frame.extend_from_slice(&self.trailer);
        frame
    }

    pub fn wire_size(&self) -> usize {
        wire_size(self.payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = RecordHeader {
            timestamp: Timestamp(77),
            iv_counter: 3,
            originator: OriginatorId(-9),
            payload_len: 8,
        };

        let bytes = header.to_bytes();
        let decoded = RecordHeader::from_bytes(&bytes);

        assert_eq!(header, decoded);
    }

    #[test]
    fn test_frame_rejects_length_mismatch() {
        let header = RecordHeader {
            timestamp: Timestamp(0),
            iv_counter: 0,
            originator: OriginatorId(1),
            payload_len: 8,
        };

        // Frame claims 8 payload bytes but carries 4.
        let mut frame = Vec::new();
        frame.extend_from_slice(&header.to_bytes());
        frame.extend_from_slice(&[0xAA; 4]);
        frame.extend_from_slice(&[0; TRAILER_SIZE]);

        match Record::from_frame(&frame) {
            Err(AuditError::MalformedFrame { expected: 32, found: 28 }) => (),
            other => panic!("Expected MalformedFrame, got {:?}", other),
        }
    }

    #[test]
    fn test_wire_size() {
        assert_eq!(wire_size(4), 28);
        assert_eq!(wire_size(1000), 1024);
        assert_eq!(max_payload(1024), 1000);
    }
}
