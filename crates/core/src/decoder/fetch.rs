// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! FETCH instruction slot (vertex attribute loads and texture samples).
//!
//! ```text
//! dword0:  0..4   fetch opcode         dword1:  0..11  dest swizzle, 3 bits/channel
//!          5..10  src register                    12   signed (VERTEX)
//!         12..17  dest register               16..21  element format (VERTEX)
//!         20..23  const index
//!         25..26  src channel (VERTEX) dword2:  0..7   stride in bytes (VERTEX)
//!         26..31  src swizzle (SAMPLE)
//! ```
//!
//! VERTEX fetches are patched by the driver at draw time to match the bound
//! attribute layout, so the format and stride reflect the capture, not the
//! compiled shader.

use super::field::Slot;
use super::operand::{Channel, REG_MASK};
use super::tables::{self, FetchKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexFormat {
    /// Index into the surface format table.
    pub format: u32,
    pub signed: bool,
    pub stride: u32,
}

impl VertexFormat {
    pub fn format_name(&self) -> Option<&'static str> {
        tables::vertex_format(self.format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchInstruction {
    pub opcode: u32,
    pub dest_register: u8,
    pub dest_swizzle: [Channel; 4],
    pub src_register: u8,
    /// Source selectors; only the first `src_count` are meaningful.
    pub src_swizzle: [Channel; 3],
    /// One channel for VERTEX, three (texture coordinates) otherwise.
    pub src_count: usize,
    pub const_index: u8,
    /// Element layout, present on VERTEX fetches only.
    pub vertex: Option<VertexFormat>,
}

impl FetchInstruction {
    pub fn kind(&self) -> Option<FetchKind> {
        tables::fetch_op(self.opcode)
    }

    pub fn src_channels(&self) -> &[Channel] {
        &self.src_swizzle[..self.src_count]
    }
}

pub fn decode_fetch(slot: &Slot) -> FetchInstruction {
    let opcode = slot.field(0, 0, 5);
    let dst_swiz = slot.field(1, 0, 12);
    let dest_swizzle = std::array::from_fn(|i| Channel::from_fetch_code(dst_swiz >> (3 * i)));

    let (src_swiz, src_count, vertex) = match tables::fetch_op(opcode) {
        Some(FetchKind::Vertex) => (
            slot.field(0, 25, 2),
            1,
            Some(VertexFormat {
                format: slot.field(1, 16, 6),
                signed: slot.flag(1, 12),
                stride: slot.field(2, 0, 8),
            }),
        ),
        _ => (slot.field(0, 26, 6), 3, None),
    };
    let src_swizzle = std::array::from_fn(|i| Channel::from_code(src_swiz >> (2 * i)));

    FetchInstruction {
        opcode,
        dest_register: (slot.field(0, 12, 6) & REG_MASK) as u8,
        dest_swizzle,
        src_register: (slot.field(0, 5, 6) & REG_MASK) as u8,
        src_swizzle,
        src_count,
        const_index: slot.field(0, 20, 4) as u8,
        vertex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Channel::*;

    fn decode(words: [u32; 3]) -> FetchInstruction {
        decode_fetch(&Slot::new(&words))
    }

    #[test]
    fn test_decode_vertex_fetch_from_capture() {
        // R2.xyz1 = R0.x FMT_32_32_32_FLOAT SIGNED STRIDE(12) CONST(4)
        let fetch = decode([0x0048_2000, 0x4039_3a88, 0x0000_000c]);
        assert_eq!(fetch.kind(), Some(FetchKind::Vertex));
        assert_eq!(fetch.dest_register, 2);
        assert_eq!(fetch.dest_swizzle, [X, Y, Z, One]);
        assert_eq!(fetch.src_register, 0);
        assert_eq!(fetch.src_channels(), [X]);
        assert_eq!(fetch.const_index, 4);
        let vertex = fetch.vertex.unwrap();
        assert_eq!(vertex.format_name(), Some("FMT_32_32_32_FLOAT"));
        assert!(vertex.signed);
        assert_eq!(vertex.stride, 12);
    }

    #[test]
    fn test_vertex_src_channel() {
        // src channel lives in bits 25..26
        let fetch = decode([0x0400_0000 | (3 << 5), 0, 0]);
        assert_eq!(fetch.src_register, 3);
        assert_eq!(fetch.src_channels(), [Z]);
    }

    #[test]
    fn test_decode_sample_fetch() {
        // SAMPLE R1.xyzw = R3.yzx CONST(2)
        let src_swiz = 1 | (2 << 2); // y, z, x
        let dword0 = (src_swiz << 26) | (2 << 20) | (1 << 12) | (3 << 5) | 0x01;
        let dst_swiz = (3 << 9) | (2 << 6) | (1 << 3);
        let fetch = decode([dword0, dst_swiz | (1 << 12), 0xffff_ffff]);
        assert_eq!(fetch.kind(), Some(FetchKind::Sample));
        assert_eq!(fetch.dest_register, 1);
        assert_eq!(fetch.dest_swizzle, [X, Y, Z, W]);
        assert_eq!(fetch.src_register, 3);
        assert_eq!(fetch.src_channels(), [Y, Z, X]);
        assert_eq!(fetch.const_index, 2);
        assert!(fetch.vertex.is_none());
    }

    #[test]
    fn test_masked_and_literal_dest_channels() {
        let dst_swiz = 7 | (4 << 3) | (5 << 6) | (6 << 9);
        let fetch = decode([0, dst_swiz, 0]);
        assert_eq!(fetch.dest_swizzle, [Masked, Zero, One, Unknown]);
    }

    #[test]
    fn test_unknown_opcode_decodes() {
        let fetch = decode([0x0000_001f, 0, 0]);
        assert_eq!(fetch.opcode, 0x1f);
        assert_eq!(fetch.kind(), None);
        assert_eq!(fetch.src_channels().len(), 3);
        assert!(fetch.vertex.is_none());
    }
}
