//! Bulk-append through the service boundary to show eviction in action.

use anyhow::{bail, Result};
use serde::Serialize;
use vigil_service::request::{AddRecordRequest, CMD_LOG_INFO};
use vigil_service::response::Response;
use vigil_service::StandardEngine;

#[derive(Debug, Serialize)]
struct StressReport {
    records_submitted: usize,
    records_retained: u32,
    records_evicted: usize,
    bytes_used: u64,
}

pub fn run(records: usize, payload_size: usize) -> Result<()> {
    let mut engine = StandardEngine::new();

    for i in 0..records {
        let mut payload = vec![0u8; payload_size];
        let id = (i as u32).to_le_bytes();
        for chunk in payload.chunks_mut(4) {
            chunk.copy_from_slice(&id[..chunk.len()]);
        }

        let frame = AddRecordRequest {
            originator: 0,
            payload,
        }
        .to_bytes();
        let response = Response::decode(&engine.handle(&frame))?;
        if !response.is_ok() {
            bail!(
                "add of record {} rejected with status {}",
                i,
                response.status
            );
        }
    }

    let response = Response::decode(&engine.handle(&[CMD_LOG_INFO]))?;
    if !response.is_ok() {
        bail!("info request rejected with status {}", response.status);
    }
    if response.body.len() != 12 {
        bail!("info response has unexpected length {}", response.body.len());
    }

    let retained = u32::from_le_bytes(response.body[0..4].try_into()?);
    let bytes_used = u64::from_le_bytes(response.body[4..12].try_into()?);

    engine.log().check_invariants()?;

    let report = StressReport {
        records_submitted: records,
        records_retained: retained,
        records_evicted: records - retained as usize,
        bytes_used,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
