// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Splitting of PROGRAM payloads into marker-terminated sections.

/// Dword terminating every section of a program container.
pub const SECTION_MARKER: u32 = 0xba5e_ba11;
const MARKER_BYTES: [u8; 4] = SECTION_MARKER.to_le_bytes();

/// Byte offset of the first section marker, which need not be aligned.
pub fn find_section_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(MARKER_BYTES.len()).position(|w| w == MARKER_BYTES)
}

/// Little-endian dword at byte `offset`; 0 when it would read past the end.
pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    offset
        .checked_add(4)
        .and_then(|end| bytes.get(offset..end))
        .map_or(0, |b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

pub fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    read_u32(bytes, offset) as i32
}

pub fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_bits(read_u32(bytes, offset))
}

/// Whole little-endian dwords of `bytes`; a trailing partial dword is dropped.
pub fn dwords(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Decodes a symbol name. Names are stored with every byte inverted.
pub fn decode_name(bytes: &[u8]) -> String {
    let plain: Vec<u8> = bytes
        .iter()
        .map(|b| b ^ 0xff)
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&plain).into_owned()
}

/// Cursor over the sections of a program payload.
#[derive(Debug, Clone)]
pub struct SectionScanner<'a> {
    rest: &'a [u8],
}

impl<'a> SectionScanner<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { rest: bytes }
    }

    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Returns the bytes up to the next marker and steps over the marker.
    /// Without a marker the rest of the buffer is the last section.
    pub fn next_section(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }
        let rest = self.rest;
        match find_section_end(rest) {
            Some(end) => {
                self.rest = &rest[end + MARKER_BYTES.len()..];
                Some(&rest[..end])
            }
            None => {
                self.rest = &[];
                Some(rest)
            }
        }
    }
}

impl<'a> Iterator for SectionScanner<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.next_section()
    }
}
