//! Request frame parsing.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::error::{Result, ServiceError};

pub const CMD_ADD_RECORD: u8 = 1;
pub const CMD_RETRIEVE_RECORD: u8 = 2;
pub const CMD_RECORD_INFO: u8 = 3;
pub const CMD_LOG_INFO: u8 = 4;
pub const CMD_DELETE_RECORD: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRecordRequest {
    pub originator: i32,
    pub payload: Vec<u8>,
}

impl AddRecordRequest {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        // 1. Command (u8)
        let cmd = cursor.read_u8()?;
        if cmd != CMD_ADD_RECORD {
            return Err(ServiceError::UnknownCommand(cmd));
        }

        // 2. Originator (i32)
        let originator = cursor.read_i32::<LittleEndian>()?;

        // 3. Payload length (u32), then exactly that many payload bytes.
        // Already read: 1 (cmd) + 4 (originator) + 4 (len) = 9 bytes.
        let payload_len = cursor.read_u32::<LittleEndian>()? as usize;
        let expected = 9 + payload_len;
        if data.len() != expected {
            return Err(ServiceError::MalformedRequest {
                expected,
                found: data.len(),
            });
        }

        Ok(Self {
            originator,
            payload: data[9..].to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wtr = Vec::with_capacity(9 + self.payload.len());
        wtr.push(CMD_ADD_RECORD);
        wtr.write_i32::<LittleEndian>(self.originator).unwrap();
        wtr.write_u32::<LittleEndian>(self.payload.len() as u32)
            .unwrap();
        wtr.extend_from_slice(&self.payload);
        wtr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrieveRecordRequest {
    pub index: u32,
    pub max_len: u32,
}

impl RetrieveRecordRequest {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        // 1 (cmd) + 4 (index) + 4 (max_len) = 9 bytes, exactly.
        if data.len() != 9 {
            return Err(ServiceError::MalformedRequest {
                expected: 9,
                found: data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let cmd = cursor.read_u8()?;
        if cmd != CMD_RETRIEVE_RECORD {
            return Err(ServiceError::UnknownCommand(cmd));
        }

        Ok(Self {
            index: cursor.read_u32::<LittleEndian>()?,
            max_len: cursor.read_u32::<LittleEndian>()?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wtr = Vec::with_capacity(9);
        wtr.push(CMD_RETRIEVE_RECORD);
        wtr.write_u32::<LittleEndian>(self.index).unwrap();
        wtr.write_u32::<LittleEndian>(self.max_len).unwrap();
        wtr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInfoRequest {
    pub index: u32,
}

impl RecordInfoRequest {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        // 1 (cmd) + 4 (index) = 5 bytes, exactly.
        if data.len() != 5 {
            return Err(ServiceError::MalformedRequest {
                expected: 5,
                found: data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let cmd = cursor.read_u8()?;
        if cmd != CMD_RECORD_INFO {
            return Err(ServiceError::UnknownCommand(cmd));
        }

        Ok(Self {
            index: cursor.read_u32::<LittleEndian>()?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wtr = Vec::with_capacity(5);
        wtr.push(CMD_RECORD_INFO);
        wtr.write_u32::<LittleEndian>(self.index).unwrap();
        wtr
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRecordRequest {
    pub index: u32,
}

impl DeleteRecordRequest {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != 5 {
            return Err(ServiceError::MalformedRequest {
                expected: 5,
                found: data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let cmd = cursor.read_u8()?;
        if cmd != CMD_DELETE_RECORD {
            return Err(ServiceError::UnknownCommand(cmd));
        }

        Ok(Self {
            index: cursor.read_u32::<LittleEndian>()?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wtr = Vec::with_capacity(5);
        wtr.push(CMD_DELETE_RECORD);
        wtr.write_u32::<LittleEndian>(self.index).unwrap();
        wtr
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    AddRecord(AddRecordRequest),
    RetrieveRecord(RetrieveRecordRequest),
    RecordInfo(RecordInfoRequest),
    LogInfo,
    DeleteRecord(DeleteRecordRequest),
}

impl Request {
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(ServiceError::MalformedRequest {
                expected: 1,
                found: 0,
            });
        }

        match data[0] {
            CMD_ADD_RECORD => Ok(Request::AddRecord(AddRecordRequest::from_bytes(data)?)),
            CMD_RETRIEVE_RECORD => Ok(Request::RetrieveRecord(
                RetrieveRecordRequest::from_bytes(data)?,
            )),
            CMD_RECORD_INFO => Ok(Request::RecordInfo(RecordInfoRequest::from_bytes(data)?)),
            CMD_LOG_INFO => {
                if data.len() != 1 {
                    return Err(ServiceError::MalformedRequest {
                        expected: 1,
                        found: data.len(),
                    });
                }
                Ok(Request::LogInfo)
            }
            CMD_DELETE_RECORD => Ok(Request::DeleteRecord(DeleteRecordRequest::from_bytes(
                data,
            )?)),
            cmd => Err(ServiceError::UnknownCommand(cmd)),
        }
    }
}
