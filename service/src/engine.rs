//! Synchronous request dispatcher.

use vigil_log::config::LOG_CAPACITY;
use vigil_log::{AuditLog, OriginatorId};

use crate::error::{Result, ServiceError};
use crate::request::Request;
use crate::response::Response;

/// Owns the store and services one request frame at a time.
///
/// The caller serializes access; the engine itself holds no lock and never
/// suspends. Malformed frames are rejected here and never reach the store.
pub struct Engine<const CAP: usize> {
    log: AuditLog<CAP>,
}

pub type StandardEngine = Engine<LOG_CAPACITY>;

impl<const CAP: usize> Engine<CAP> {
    pub fn new() -> Self {
        Self {
            log: AuditLog::new(),
        }
    }

    /// Wraps an already-configured store (custom sealer or sink).
    pub fn with_log(log: AuditLog<CAP>) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &AuditLog<CAP> {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut AuditLog<CAP> {
        &mut self.log
    }

    /// Services one request frame and returns the encoded response frame.
    pub fn handle(&mut self, frame: &[u8]) -> Vec<u8> {
        match self.dispatch(frame) {
            Ok(body) => Response::ok(body).encode(),
            Err(e) => {
                tracing::warn!(error = %e, status = e.status(), "request failed");
                Response::failure(e.status()).encode()
            }
        }
    }

    fn dispatch(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        match Request::decode(frame)? {
            Request::AddRecord(req) => {
                self.log
                    .add_record(&req.payload, OriginatorId(req.originator))?;
                tracing::debug!(
                    originator = req.originator,
                    len = req.payload.len(),
                    "record added"
                );
                Ok(Vec::new())
            }
            Request::RetrieveRecord(req) => {
                let size = self.log.get_record_info(req.index)?;
                if size > req.max_len as usize {
                    return Err(ServiceError::Audit(vigil_log::AuditError::BufferTooSmall {
                        required: size,
                        provided: req.max_len as usize,
                    }));
                }

                let mut out = vec![0u8; size];
                self.log.retrieve_record(req.index, &mut out)?;
                Ok(out)
            }
            Request::RecordInfo(req) => {
                let size = self.log.get_record_info(req.index)?;
                Ok((size as u32).to_le_bytes().to_vec())
            }
            Request::LogInfo => {
                let info = self.log.get_info();
                let mut body = Vec::with_capacity(12);
                body.extend_from_slice(&info.record_count.to_le_bytes());
                body.extend_from_slice(&(info.bytes_used as u64).to_le_bytes());
                Ok(body)
            }
            Request::DeleteRecord(req) => {
                self.log.delete_record(req.index)?;
                tracing::debug!(index = req.index, "record deleted");
                Ok(Vec::new())
            }
        }
    }
}

impl<const CAP: usize> Default for Engine<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{
        AddRecordRequest, DeleteRecordRequest, RecordInfoRequest, RetrieveRecordRequest,
        CMD_LOG_INFO,
    };
    use crate::response::{
        Response, STATUS_BUFFER_TOO_SMALL, STATUS_MALFORMED_REQUEST, STATUS_NOT_SUPPORTED,
        STATUS_OUT_OF_RANGE,
    };
    use vigil_log::record::{Record, RecordHeader, TRAILER_SIZE};

    fn add_frame(originator: i32, payload: &[u8]) -> Vec<u8> {
        AddRecordRequest {
            originator,
            payload: payload.to_vec(),
        }
        .to_bytes()
    }

    fn handled(engine: &mut StandardEngine, frame: &[u8]) -> Response {
        Response::decode(&engine.handle(frame)).unwrap()
    }

    #[test]
    fn test_add_then_retrieve() {
        let mut engine = StandardEngine::new();

        let response = handled(&mut engine, &add_frame(4, &[1, 2, 3, 4]));
        assert!(response.is_ok());
        assert!(response.body.is_empty());

        let retrieve = RetrieveRecordRequest {
            index: 0,
            max_len: 1024,
        };
        let response = handled(&mut engine, &retrieve.to_bytes());
        assert!(response.is_ok());

        let record = Record::from_frame(&response.body).unwrap();
        assert_eq!(record.payload, vec![1, 2, 3, 4]);
        assert_eq!(record.header.originator.0, 4);
    }

    #[test]
    fn test_log_info_body_layout() {
        let mut engine = StandardEngine::new();
        handled(&mut engine, &add_frame(0, &[0; 4]));

        let response = handled(&mut engine, &[CMD_LOG_INFO]);
        assert!(response.is_ok());
        assert_eq!(response.body.len(), 12);

        let count = u32::from_le_bytes(response.body[0..4].try_into().unwrap());
        let bytes = u64::from_le_bytes(response.body[4..12].try_into().unwrap());
        assert_eq!(count, 1);
        assert_eq!(bytes, (RecordHeader::SIZE + 4 + TRAILER_SIZE) as u64);
    }

    #[test]
    fn test_record_info_body() {
        let mut engine = StandardEngine::new();
        handled(&mut engine, &add_frame(0, &[0; 8]));

        let response = handled(&mut engine, &RecordInfoRequest { index: 0 }.to_bytes());
        assert!(response.is_ok());
        assert_eq!(
            u32::from_le_bytes(response.body[..].try_into().unwrap()),
            32
        );

        let response = handled(&mut engine, &RecordInfoRequest { index: 9 }.to_bytes());
        assert_eq!(response.status, STATUS_OUT_OF_RANGE);
    }

    #[test]
    fn test_retrieve_respects_max_len() {
        let mut engine = StandardEngine::new();
        handled(&mut engine, &add_frame(0, &[0; 4]));

        let retrieve = RetrieveRecordRequest {
            index: 0,
            max_len: 27,
        };
        let response = handled(&mut engine, &retrieve.to_bytes());
        assert_eq!(response.status, STATUS_BUFFER_TOO_SMALL);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_delete_status_mapping() {
        let mut engine = StandardEngine::new();

        let response = handled(&mut engine, &DeleteRecordRequest { index: 0 }.to_bytes());
        assert_eq!(response.status, STATUS_OUT_OF_RANGE);

        handled(&mut engine, &add_frame(0, &[0; 4]));
        let response = handled(&mut engine, &DeleteRecordRequest { index: 3 }.to_bytes());
        assert_eq!(response.status, STATUS_NOT_SUPPORTED);

        let response = handled(&mut engine, &DeleteRecordRequest { index: 0 }.to_bytes());
        assert!(response.is_ok());
    }

    #[test]
    fn test_misaligned_payload_status() {
        let mut engine = StandardEngine::new();
        let response = handled(&mut engine, &add_frame(0, &[0; 3]));
        assert_eq!(response.status, STATUS_NOT_SUPPORTED);
    }

    #[test]
    fn test_malformed_frames_never_reach_the_store() {
        let mut engine = StandardEngine::new();

        for frame in [&[][..], &[0xFF][..], &[CMD_LOG_INFO, 0, 0][..]] {
            let response = handled(&mut engine, frame);
            assert_eq!(response.status, STATUS_MALFORMED_REQUEST);
        }

        assert_eq!(engine.log().get_info().record_count, 0);
    }
}
