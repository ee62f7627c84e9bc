// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! `.rd` capture files: a flat stream of `{ u32 type, u32 size, payload }`
//! records written by the command-stream recorder.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::section::read_u32;

const RECORD_HEADER_BYTES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    None,
    Test,
    Cmd,
    GpuAddr,
    Context,
    CmdStream,
    CmdStreamAddr,
    Param,
    Flush,
    Program,
    VertShader,
    FragShader,
    BufferContents,
    GpuId,
    Unknown(u32),
}

impl From<u32> for RecordType {
    fn from(value: u32) -> Self {
        match value {
            0 => RecordType::None,
            1 => RecordType::Test,
            2 => RecordType::Cmd,
            3 => RecordType::GpuAddr,
            4 => RecordType::Context,
            5 => RecordType::CmdStream,
            6 => RecordType::CmdStreamAddr,
            7 => RecordType::Param,
            8 => RecordType::Flush,
            9 => RecordType::Program,
            10 => RecordType::VertShader,
            11 => RecordType::FragShader,
            12 => RecordType::BufferContents,
            13 => RecordType::GpuId,
            other => RecordType::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdRecord {
    pub kind: RecordType,
    pub payload: Vec<u8>,
}

impl RdRecord {
    /// Payload as text, up to the first NUL.
    pub fn text(&self) -> String {
        let end = self
            .payload
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.payload.len());
        String::from_utf8_lossy(&self.payload[..end]).into_owned()
    }

    pub fn gpu_id(&self) -> u32 {
        read_u32(&self.payload, 0)
    }
}

pub fn read_rd(path: &Path) -> Result<Vec<RdRecord>> {
    let buffer =
        fs::read(path).with_context(|| format!("Failed to read capture file: {:?}", path))?;
    Ok(parse_rd_bytes(&buffer))
}

pub fn parse_rd_bytes(buffer: &[u8]) -> Vec<RdRecord> {
    let mut records = Vec::new();
    let mut offset = 0;

    while buffer.len() - offset >= RECORD_HEADER_BYTES {
        let kind = RecordType::from(read_u32(buffer, offset));
        let size = read_u32(buffer, offset + 4) as usize;
        offset += RECORD_HEADER_BYTES;

        let available = buffer.len() - offset;
        if size > available {
            warn!(
                "Record {:?} declares {} bytes but only {} remain",
                kind, size, available
            );
        }
        let len = size.min(available);
        debug!("Record {:?}: {} bytes at {:#x}", kind, len, offset);
        records.push(RdRecord {
            kind,
            payload: buffer[offset..offset + len].to_vec(),
        });
        offset += len;
    }

    if offset < buffer.len() {
        warn!(
            "Ignoring {} trailing bytes after the last record",
            buffer.len() - offset
        );
    }

    records
}
