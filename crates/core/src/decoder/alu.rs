// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! ALU instruction slot.
//!
//! One slot encodes a vector op and, optionally, a scalar op co-issued with
//! it. Field layout:
//!
//! ```text
//! dword0:  0..5   vector dest         dword1:  0..7   src3 swizzle
//!          8..13  scalar dest                  8..15  src2 swizzle
//!            15   export                      16..23  src1 swizzle
//!         16..19  vector write mask           24..26  src3/src2/src1 negate
//!         20..23  scalar write mask           27..28  predicate select
//!         26..31  scalar opcode
//!
//! dword2:  0..5   src3 reg, 7 abs      8..13  src2 reg, 15 abs
//!         16..21  src1 reg, 23 abs    24..28  vector opcode
//!         29..31  src3/src2/src1 select (1 = register, 0 = constant)
//! ```

use super::field::Slot;
use super::operand::{DestOperand, SourceOperand, REG_MASK};
use super::tables::{self, AluOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Eq,
    Ne,
}

impl Predicate {
    pub fn suffix(self) -> &'static str {
        match self {
            Predicate::Eq => "EQ",
            Predicate::Ne => "NE",
        }
    }
}

/// Scalar op sharing a slot with a vector op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarOp {
    pub opcode: u32,
    pub dest: DestOperand,
    /// Always the slot's third source operand.
    pub src: SourceOperand,
}

impl ScalarOp {
    pub fn op(&self) -> Option<&'static AluOp> {
        tables::scalar_op(self.opcode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluInstruction {
    pub vector_opcode: u32,
    pub vector_dest: DestOperand,
    /// `[src1, src2, src3]` in encoding order.
    pub srcs: [SourceOperand; 3],
    pub predicate: Option<Predicate>,
    pub scalar: Option<ScalarOp>,
    pub export: bool,
}

impl AluInstruction {
    pub fn vector_op(&self) -> Option<&'static AluOp> {
        tables::vector_op(self.vector_opcode)
    }

    /// Source count of the vector op. Unknown opcodes show a single source.
    pub fn num_srcs(&self) -> u8 {
        self.vector_op().map_or(1, |op| op.num_srcs)
    }

    /// Vector sources in print order: three-source ops lead with src3.
    pub fn vector_sources(&self) -> impl ExactSizeIterator<Item = SourceOperand> {
        let [src1, src2, src3] = self.srcs;
        let (ordered, count) = match self.num_srcs() {
            3 => ([src3, src1, src2], 3),
            2 => ([src1, src2, src3], 2),
            _ => ([src1, src2, src3], 1),
        };
        ordered.into_iter().take(count)
    }
}

fn decode_src(slot: &Slot, index: u32) -> SourceOperand {
    // index 0..3 maps to src1..src3
    let reg_shift = 16 - 8 * index;
    SourceOperand {
        register: slot.field(2, reg_shift, 6) as u8,
        is_register: slot.flag(2, 31 - index),
        swizzle: slot.field(1, 16 - 8 * index, 8) as u8,
        negate: slot.flag(1, 26 - index),
        abs: slot.flag(2, reg_shift + 7),
    }
}

pub fn decode_alu(slot: &Slot) -> AluInstruction {
    let export = slot.flag(0, 15);
    let vector_write_mask = slot.field(0, 16, 4) as u8;
    let scalar_write_mask = slot.field(0, 20, 4) as u8;

    let srcs = [decode_src(slot, 0), decode_src(slot, 1), decode_src(slot, 2)];

    let pred_select = slot.field(1, 27, 2);
    let predicate = if pred_select & 0x2 != 0 {
        Some(if pred_select & 0x1 != 0 {
            Predicate::Eq
        } else {
            Predicate::Ne
        })
    } else {
        None
    };

    let vector_dest = DestOperand {
        register: (slot.field(0, 0, 6) & REG_MASK) as u8,
        write_mask: vector_write_mask,
        export,
    };

    // A slot with no vector writes always carries a scalar op.
    let scalar = (scalar_write_mask != 0 || vector_write_mask == 0).then(|| ScalarOp {
        opcode: slot.field(0, 26, 6),
        dest: DestOperand {
            register: (slot.field(0, 8, 6) & REG_MASK) as u8,
            write_mask: scalar_write_mask,
            export,
        },
        src: srcs[2],
    });

    AluInstruction {
        vector_opcode: slot.field(2, 24, 5),
        vector_dest,
        srcs,
        predicate,
        scalar,
        export,
    }
}
