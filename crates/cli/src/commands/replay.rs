//! Replay a scripted operation sequence against a fresh store.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use vigil_log::{OriginatorId, StandardAuditLog};

/// One scripted operation. Adds carry either a bare 32-bit `record_id`
/// or an explicit `payload_hex` body.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    Add {
        originator: i32,
        #[serde(default)]
        record_id: Option<u32>,
        #[serde(default)]
        payload_hex: Option<String>,
    },
    DeleteOldest,
    Init,
}

#[derive(Debug, Serialize)]
struct RecordReport {
    index: u32,
    timestamp: u64,
    iv_counter: u32,
    originator: i32,
    payload_hex: String,
    trailer_hex: String,
    verified: bool,
}

pub fn run(script_path: &Path, dump: bool) -> Result<()> {
    let text = fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {:?}", script_path))?;
    let ops: Vec<ScriptOp> =
        serde_json::from_str(&text).context("Script is not a JSON operation list")?;

    let mut log = StandardAuditLog::new();

    for (step, op) in ops.iter().enumerate() {
        let outcome = match op {
            ScriptOp::Add {
                originator,
                record_id,
                payload_hex,
            } => {
                let payload = resolve_payload(*record_id, payload_hex.as_deref())
                    .with_context(|| format!("Bad add operation at step {}", step))?;
                log.add_record(&payload, OriginatorId(*originator))
            }
            ScriptOp::DeleteOldest => log.delete_record(0),
            ScriptOp::Init => {
                log.init();
                Ok(())
            }
        };

        // A rejected operation is part of the forensic picture, not a
        // reason to stop the replay.
        if let Err(e) = outcome {
            tracing::warn!(step, error = %e, "operation rejected");
        }
    }

    log.check_invariants()?;

    println!("{}", serde_json::to_string_pretty(&log.get_info())?);

    if dump {
        let reports: Vec<RecordReport> = log
            .iter()
            .enumerate()
            .map(|(index, record)| RecordReport {
                index: index as u32,
                timestamp: record.header.timestamp.0,
                iv_counter: record.header.iv_counter,
                originator: record.header.originator.0,
                payload_hex: to_hex(&record.payload),
                trailer_hex: to_hex(&record.trailer),
                verified: log.verify_record(index as u32).unwrap_or(false),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}

fn resolve_payload(record_id: Option<u32>, payload_hex: Option<&str>) -> Result<Vec<u8>> {
    match (record_id, payload_hex) {
        (_, Some(hex)) => from_hex(hex),
        (Some(id), None) => Ok(id.to_le_bytes().to_vec()),
        (None, None) => bail!("add needs either record_id or payload_hex"),
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        bail!("payload_hex has odd length {}", hex.len());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("payload_hex is not hex at offset {}", i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(to_hex(&bytes), "deadbeef");
        assert_eq!(from_hex("deadbeef").unwrap(), bytes);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
    }

    #[test]
    fn test_resolve_payload_prefers_hex() {
        let payload = resolve_payload(Some(7), Some("01020304")).unwrap();
        assert_eq!(payload, vec![1, 2, 3, 4]);

        let payload = resolve_payload(Some(7), None).unwrap();
        assert_eq!(payload, 7u32.to_le_bytes().to_vec());

        assert!(resolve_payload(None, None).is_err());
    }
}
