// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Opcode tables for the a2xx instruction set.
//!
//! Every table is a sparse array indexed directly by the encoded value.
//! Missing entries are `None` and get a numeric fallback when rendered.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOp {
    pub name: &'static str,
    /// Number of vector source operands rendered for this opcode.
    pub num_srcs: u8,
}

const fn alu(name: &'static str, num_srcs: u8) -> Option<AluOp> {
    Some(AluOp { name, num_srcs })
}

pub const VECTOR_OPCODE_COUNT: usize = 0x20;
pub const SCALAR_OPCODE_COUNT: usize = 0x40;
pub const FETCH_OPCODE_COUNT: usize = 0x20;
pub const VERTEX_FORMAT_COUNT: usize = 0x40;
pub const CF_OPCODE_COUNT: usize = 0x100;

static VECTOR_OPS: [Option<AluOp>; VECTOR_OPCODE_COUNT] = [
    alu("ADDv", 2),             // 0x00
    alu("MULv", 2),             // 0x01
    alu("MAXv", 2),             // 0x02
    alu("MINv", 2),             // 0x03
    alu("SETEv", 2),            // 0x04
    alu("SETGTv", 2),           // 0x05
    alu("SETGTEv", 2),          // 0x06
    alu("SETNEv", 2),           // 0x07
    alu("FRACv", 1),            // 0x08
    alu("TRUNCv", 1),           // 0x09
    alu("FLOORv", 1),           // 0x0a
    alu("MULADDv", 3),          // 0x0b
    alu("CNDEv", 2),            // 0x0c
    alu("CNDGTEv", 2),          // 0x0d
    alu("CNDGTv", 2),           // 0x0e
    alu("DOT4v", 2),            // 0x0f
    alu("DOT3v", 2),            // 0x10
    alu("DOT2ADDv", 3),         // 0x11
    alu("CUBEv", 2),            // 0x12
    alu("MAX4v", 1),            // 0x13
    alu("PRED_SETE_PUSHv", 2),  // 0x14
    alu("PRED_SETNE_PUSHv", 2), // 0x15
    alu("PRED_SETGT_PUSHv", 2), // 0x16
    alu("PRED_SETGTE_PUSHv", 2), // 0x17
    alu("KILLEv", 2),           // 0x18
    alu("KILLGTv", 2),          // 0x19
    alu("KILLGTEv", 2),         // 0x1a
    alu("KILLNEv", 2),          // 0x1b
    alu("DSTv", 2),             // 0x1c
    alu("MOVAv", 1),            // 0x1d
    None,
    None,
];

const SCALAR_NAMES: [&str; 50] = [
    "ADDs",
    "ADD_PREVs",
    "MULs",
    "MUL_PREVs",
    "MUL_PREV2s",
    "MAXs",
    "MINs",
    "SETEs",
    "SETGTs",
    "SETGTEs",
    "SETNEs",
    "FRACs",
    "TRUNCs",
    "FLOORs",
    "EXP_IEEE",
    "LOG_CLAMP",
    "LOG_IEEE",
    "RECIP_CLAMP",
    "RECIP_FF",
    "RECIP_IEEE",
    "RECIPSQ_CLAMP",
    "RECIPSQ_FF",
    "RECIPSQ_IEEE",
    "MOVAs",
    "MOVA_FLOORs",
    "SUBs",
    "SUB_PREVs",
    "PRED_SETEs",
    "PRED_SETNEs",
    "PRED_SETGTs",
    "PRED_SETGTEs",
    "PRED_SET_INVs",
    "PRED_SET_POPs",
    "PRED_SET_CLRs",
    "PRED_SET_RESTOREs",
    "KILLEs",
    "KILLGTs",
    "KILLGTEs",
    "KILLNEs",
    "KILLONEs",
    "SQRT_IEEE",
    "MUL_CONST_0",
    "MUL_CONST_1",
    "ADD_CONST_0",
    "ADD_CONST_1",
    "SUB_CONST_0",
    "SUB_CONST_1",
    "SIN",
    "COS",
    "RETAIN_PREV",
];

// Scalar ops take their single operand from the slot's third source.
static SCALAR_OPS: [Option<AluOp>; SCALAR_OPCODE_COUNT] = {
    let mut table = [None; SCALAR_OPCODE_COUNT];
    let mut i = 0;
    while i < SCALAR_NAMES.len() {
        table[i] = alu(SCALAR_NAMES[i], 1);
        i += 1;
    }
    table
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Vertex attribute load.
    Vertex,
    /// Texture sample.
    Sample,
}

impl FetchKind {
    pub fn name(self) -> &'static str {
        match self {
            FetchKind::Vertex => "VERTEX",
            FetchKind::Sample => "SAMPLE",
        }
    }
}

static FETCH_OPS: [Option<FetchKind>; FETCH_OPCODE_COUNT] = {
    let mut table = [None; FETCH_OPCODE_COUNT];
    table[0x00] = Some(FetchKind::Vertex);
    table[0x01] = Some(FetchKind::Sample);
    table
};

static VERTEX_FORMATS: [Option<&str>; VERTEX_FORMAT_COUNT] = [
    Some("FMT_1_REVERSE"),                 // 0
    Some("FMT_1"),                         // 1
    Some("FMT_8"),                         // 2
    Some("FMT_1_5_5_5"),                   // 3
    Some("FMT_5_6_5"),                     // 4
    Some("FMT_6_5_5"),                     // 5
    Some("FMT_8_8_8_8"),                   // 6
    Some("FMT_2_10_10_10"),                // 7
    Some("FMT_8_A"),                       // 8
    Some("FMT_8_B"),                       // 9
    Some("FMT_8_8"),                       // 10
    Some("FMT_Cr_Y1_Cb_Y0"),               // 11
    Some("FMT_Y1_Cr_Y0_Cb"),               // 12
    Some("FMT_5_5_5_1"),                   // 13
    Some("FMT_8_8_8_8_A"),                 // 14
    Some("FMT_4_4_4_4"),                   // 15
    Some("FMT_10_11_11"),                  // 16
    Some("FMT_11_11_10"),                  // 17
    Some("FMT_DXT1"),                      // 18
    Some("FMT_DXT2_3"),                    // 19
    Some("FMT_DXT4_5"),                    // 20
    None,                                  // 21
    Some("FMT_24_8"),                      // 22
    Some("FMT_24_8_FLOAT"),                // 23
    Some("FMT_16"),                        // 24
    Some("FMT_16_16"),                     // 25
    Some("FMT_16_16_16_16"),               // 26
    Some("FMT_16_EXPAND"),                 // 27
    Some("FMT_16_16_EXPAND"),              // 28
    Some("FMT_16_16_16_16_EXPAND"),        // 29
    Some("FMT_16_FLOAT"),                  // 30
    Some("FMT_16_16_FLOAT"),               // 31
    Some("FMT_16_16_16_16_FLOAT"),         // 32
    Some("FMT_32"),                        // 33
    Some("FMT_32_32"),                     // 34
    Some("FMT_32_32_32_32"),               // 35
    Some("FMT_32_FLOAT"),                  // 36
    Some("FMT_32_32_FLOAT"),               // 37
    Some("FMT_32_32_32_32_FLOAT"),         // 38
    Some("FMT_32_AS_8"),                   // 39
    Some("FMT_32_AS_8_8"),                 // 40
    Some("FMT_16_MPEG"),                   // 41
    Some("FMT_16_16_MPEG"),                // 42
    Some("FMT_8_INTERLACED"),              // 43
    Some("FMT_32_AS_8_INTERLACED"),        // 44
    Some("FMT_32_AS_8_8_INTERLACED"),      // 45
    Some("FMT_16_INTERLACED"),             // 46
    Some("FMT_16_MPEG_INTERLACED"),        // 47
    Some("FMT_16_16_MPEG_INTERLACED"),     // 48
    Some("FMT_DXN"),                       // 49
    Some("FMT_8_8_8_8_AS_16_16_16_16"),    // 50
    Some("FMT_DXT1_AS_16_16_16_16"),       // 51
    Some("FMT_DXT2_3_AS_16_16_16_16"),     // 52
    Some("FMT_DXT4_5_AS_16_16_16_16"),     // 53
    Some("FMT_2_10_10_10_AS_16_16_16_16"), // 54
    Some("FMT_10_11_11_AS_16_16_16_16"),   // 55
    Some("FMT_11_11_10_AS_16_16_16_16"),   // 56
    Some("FMT_32_32_32_FLOAT"),            // 57
    Some("FMT_DXT3A"),                     // 58
    Some("FMT_DXT5A"),                     // 59
    Some("FMT_CTX1"),                      // 60
    Some("FMT_DXT3A_AS_1_1_1_1"),          // 61
    None,                                  // 62
    None,                                  // 63
];

/// Operands printed after a CF mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfOperands {
    None,
    /// `ADDR(0x..) CNT(0x..)`
    AddrCount,
    /// `SIZE(0x..)`, carried in the address field.
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfOp {
    pub name: &'static str,
    /// EXEC-class clauses own a run of ALU/FETCH slots.
    pub exec: bool,
    pub operands: CfOperands,
}

const fn cf(name: &'static str, exec: bool, operands: CfOperands) -> Option<CfOp> {
    Some(CfOp {
        name,
        exec,
        operands,
    })
}

static CF_OPS: [Option<CfOp>; CF_OPCODE_COUNT] = {
    let mut table = [None; CF_OPCODE_COUNT];
    table[0x00] = cf("NOP", false, CfOperands::None);
    table[0x10] = cf("EXEC", true, CfOperands::AddrCount);
    table[0x20] = cf("EXEC_END", true, CfOperands::AddrCount);
    table[0xc2] = cf("ALLOC COORD", false, CfOperands::Size);
    table[0xc4] = cf("ALLOC PARAM/PIXEL", false, CfOperands::Size);
    table
};

fn lookup<T>(table: &'static [Option<T>], index: u32) -> Option<&'static T> {
    table.get(index as usize).and_then(Option::as_ref)
}

pub fn vector_op(opcode: u32) -> Option<&'static AluOp> {
    lookup(&VECTOR_OPS, opcode)
}

pub fn scalar_op(opcode: u32) -> Option<&'static AluOp> {
    lookup(&SCALAR_OPS, opcode)
}

pub fn fetch_op(opcode: u32) -> Option<FetchKind> {
    lookup(&FETCH_OPS, opcode).copied()
}

pub fn vertex_format(format: u32) -> Option<&'static str> {
    lookup(&VERTEX_FORMATS, format).copied()
}

pub fn cf_op(opcode: u32) -> Option<&'static CfOp> {
    lookup(&CF_OPS, opcode)
}
