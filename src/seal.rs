// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Record sealing.
//!
//! The trailer of every record is produced by a [`RecordSealer`]. The default
//! implementation emits a fixed pattern, NOT a cryptographic MAC: a deployment
//! with a key store substitutes its own sealer without touching the ring logic.

use crate::record::TRAILER_SIZE;

/// The pattern emitted by [`PlaceholderSealer`].
pub const SEAL_PLACEHOLDER: [u8; TRAILER_SIZE] = [0xA5, 0x5A, 0xA5, 0x5A];

/// Produces and checks record trailers over the encoded header and payload.
pub trait RecordSealer {
    fn seal(&self, header: &[u8], payload: &[u8]) -> [u8; TRAILER_SIZE];

    fn verify(&self, header: &[u8], payload: &[u8], trailer: &[u8; TRAILER_SIZE]) -> bool {
        self.seal(header, payload) == *trailer
    }
}

/// Writes [`SEAL_PLACEHOLDER`] unconditionally.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderSealer;

impl RecordSealer for PlaceholderSealer {
    fn seal(&self, _header: &[u8], _payload: &[u8]) -> [u8; TRAILER_SIZE] {
        SEAL_PLACEHOLDER
    }
}

/// CRC32 over header and payload. Detects corruption, not tampering.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Sealer;

impl RecordSealer for Crc32Sealer {
    fn seal(&self, header: &[u8], payload: &[u8]) -> [u8; TRAILER_SIZE] {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(header);
        hasher.update(payload);
        hasher.finalize().to_le_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_deterministic() {
        let sealer = PlaceholderSealer;
        assert_eq!(sealer.seal(b"header", b"payload"), SEAL_PLACEHOLDER);
        assert_eq!(sealer.seal(b"other", b"bytes"), SEAL_PLACEHOLDER);
        assert!(sealer.verify(b"x", b"y", &SEAL_PLACEHOLDER));
    }

    #[test]
    fn test_crc32_covers_header_and_payload() {
        let sealer = Crc32Sealer;
        let tag = sealer.seal(b"header", b"payload");

        assert!(sealer.verify(b"header", b"payload", &tag));
        assert!(!sealer.verify(b"header", b"tampered", &tag));
        assert!(!sealer.verify(b"tampered", b"payload", &tag));
    }
}
