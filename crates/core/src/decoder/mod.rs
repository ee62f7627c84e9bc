// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Decoders for the a2xx shader microcode.
//!
//! A compiled program starts with a CF (control-flow) table whose clauses
//! reference the 96-bit ALU and FETCH instruction slots that follow it.

pub mod alu;
pub mod cf;
pub mod fetch;
pub mod field;
pub mod operand;
pub mod tables;

pub use alu::{decode_alu, AluInstruction};
pub use cf::{parse_cf, CfClause, CfProgram};
pub use fetch::{decode_fetch, FetchInstruction};
pub use field::{extract, Slot};
pub use operand::{export_name, Channel, DestOperand, SourceOperand};
