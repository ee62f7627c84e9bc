// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::ShaderKind;

/// Register index mask. The real register file size is not known.
pub const REG_MASK: u32 = 0x3f;

/// Channel selector. The last four only appear in FETCH destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    X,
    Y,
    Z,
    W,
    Zero,
    One,
    Unknown,
    Masked,
}

impl Channel {
    /// Decodes a 3-bit FETCH destination selector.
    pub fn from_fetch_code(code: u32) -> Self {
        match code & 0x7 {
            0 => Channel::X,
            1 => Channel::Y,
            2 => Channel::Z,
            3 => Channel::W,
            4 => Channel::Zero,
            5 => Channel::One,
            6 => Channel::Unknown,
            _ => Channel::Masked,
        }
    }

    /// Decodes a source selector; only the low two bits are significant.
    pub fn from_code(code: u32) -> Self {
        Self::from_fetch_code(code & 0x3)
    }

    pub fn as_char(self) -> char {
        match self {
            Channel::X => 'x',
            Channel::Y => 'y',
            Channel::Z => 'z',
            Channel::W => 'w',
            Channel::Zero => '0',
            Channel::One => '1',
            Channel::Unknown => '?',
            Channel::Masked => '_',
        }
    }
}

pub const XYZW: [Channel; 4] = [Channel::X, Channel::Y, Channel::Z, Channel::W];

/// ALU source operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOperand {
    pub register: u8,
    /// `R` register when set, `C` constant otherwise.
    pub is_register: bool,
    /// Packed selectors, two bits per channel starting with x. Zero means
    /// the operand carries no swizzle.
    pub swizzle: u8,
    pub negate: bool,
    pub abs: bool,
}

impl SourceOperand {
    // Selectors are absolute: 0xE4 reads xyzw. The freedreno tool adds the
    // channel index to each selector instead, so the same capture prints
    // different swizzles there.
    pub fn channels(&self) -> Option<[Channel; 4]> {
        if self.swizzle == 0 {
            return None;
        }
        let swizzle = u32::from(self.swizzle);
        Some(std::array::from_fn(|i| {
            Channel::from_code(swizzle >> (2 * i))
        }))
    }
}

/// ALU destination operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestOperand {
    pub register: u8,
    /// One bit per channel, bit 0 = x.
    pub write_mask: u8,
    pub export: bool,
}

impl DestOperand {
    pub const FULL_MASK: u8 = 0xf;

    pub fn is_full_write(&self) -> bool {
        self.write_mask & 0xf == Self::FULL_MASK
    }

    /// Per-channel view of the write mask, `None` for masked-off channels.
    pub fn written_channels(&self) -> [Option<Channel>; 4] {
        std::array::from_fn(|i| ((self.write_mask >> i) & 1 != 0).then_some(XYZW[i]))
    }
}

/// Symbolic name of a fixed-function output written through an export.
pub fn export_name(kind: ShaderKind, register: u8) -> Option<&'static str> {
    match (kind, register) {
        (ShaderKind::Vertex, 62) => Some("gl_Position"),
        (ShaderKind::Vertex, 63) => Some("gl_PointSize"),
        (ShaderKind::Fragment, 0) => Some("gl_FragColor"),
        _ => None,
    }
}
