// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod program;
pub mod raw;
pub mod rd;
pub mod section;

pub use program::{parse_program, Program, ProgramEntry, ProgramHeader, ShaderBlock};
pub use raw::{load_raw_shader, raw_kind};
pub use rd::{parse_rd_bytes, read_rd, RdRecord, RecordType};
