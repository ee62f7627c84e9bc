// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Text rendering of decoded CF clauses and instructions.

use std::fmt;
use std::io::{self, Write};

use crate::config::DisasmConfig;
use crate::decoder::alu::AluInstruction;
use crate::decoder::cf::CfClause;
use crate::decoder::fetch::FetchInstruction;
use crate::decoder::operand::{export_name, Channel, DestOperand, SourceOperand};
use crate::decoder::tables::CfOperands;
use crate::ShaderKind;

/// Deepest nesting rendered as tabs; anything deeper prints [`DEPTH_MARKER`].
pub const MAX_INDENT_DEPTH: usize = 9;
pub const DEPTH_MARKER: &str = "x";

/// Stands in for the `%08x %08x %08x\t` raw column on lines with no dwords.
const RAW_PADDING: &str = "                          \t";

pub fn indent(depth: usize) -> String {
    if depth > MAX_INDENT_DEPTH {
        DEPTH_MARKER.to_string()
    } else {
        "\t".repeat(depth)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Display for SourceOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            f.write_str("-")?;
        }
        if self.abs {
            f.write_str("|")?;
        }
        write!(f, "{}{}", if self.is_register { 'R' } else { 'C' }, self.register)?;
        if let Some(channels) = self.channels() {
            f.write_str(".")?;
            for channel in channels {
                write!(f, "{}", channel)?;
            }
        }
        if self.abs {
            f.write_str("|")?;
        }
        Ok(())
    }
}

impl fmt::Display for DestOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.export { "export" } else { "R" }, self.register)?;
        if !self.is_full_write() {
            f.write_str(".")?;
            for channel in self.written_channels() {
                write!(f, "{}", channel.unwrap_or(Channel::Masked))?;
            }
        }
        Ok(())
    }
}

fn write_channels<W: Write + ?Sized>(out: &mut W, channels: &[Channel]) -> io::Result<()> {
    for channel in channels {
        write!(out, "{}", channel)?;
    }
    Ok(())
}

fn sync_marker(sync: bool) -> &'static str {
    if sync {
        "(S)"
    } else {
        "   "
    }
}

/// Writes one line per clause or instruction, honouring the indent depth
/// and debug flags of a [`DisasmConfig`].
pub struct Renderer<'c> {
    config: &'c DisasmConfig,
    indent: String,
}

impl<'c> Renderer<'c> {
    pub fn new(config: &'c DisasmConfig) -> Self {
        Self {
            config,
            indent: indent(config.indent_depth),
        }
    }

    fn line_prefix<W: Write + ?Sized>(&self, out: &mut W, raw: Option<&[u32]>) -> io::Result<()> {
        out.write_all(self.indent.as_bytes())?;
        if self.config.raw() {
            match raw {
                Some([d0, d1, d2, ..]) => write!(out, "{:08x} {:08x} {:08x}\t", d0, d1, d2)?,
                _ => out.write_all(RAW_PADDING.as_bytes())?,
            }
        }
        Ok(())
    }

    fn export_comment<W: Write + ?Sized>(
        &self,
        out: &mut W,
        dest: &DestOperand,
        kind: ShaderKind,
    ) -> io::Result<()> {
        if dest.export {
            if let Some(name) = export_name(kind, dest.register) {
                write!(out, "\t; {}", name)?;
            }
        }
        Ok(())
    }

    pub fn cf_clause<W: Write + ?Sized>(&self, out: &mut W, clause: &CfClause) -> io::Result<()> {
        self.line_prefix(out, clause.dwords)?;
        match clause.op() {
            Some(op) => {
                write!(out, "CF: {}", op.name)?;
                match op.operands {
                    CfOperands::None => {}
                    CfOperands::AddrCount => write!(
                        out,
                        " ADDR(0x{:x}) CNT(0x{:x})",
                        clause.address, clause.count
                    )?,
                    CfOperands::Size => write!(out, " SIZE(0x{:x})", clause.address)?,
                }
                if op.exec && self.config.verbose() {
                    write!(out, "\t; SEQ(0x{:04x})", clause.sequence)?;
                }
            }
            None => write!(
                out,
                "CF(0x{:x}) ADDR(0x{:x}) CNT(0x{:x})",
                clause.opcode, clause.address, clause.count
            )?,
        }
        writeln!(out)
    }

    pub fn alu<W: Write + ?Sized>(
        &self,
        out: &mut W,
        words: &[u32],
        alu: &AluInstruction,
        sync: bool,
        kind: ShaderKind,
    ) -> io::Result<()> {
        self.line_prefix(out, Some(words))?;
        write!(out, "{}ALU:\t", sync_marker(sync))?;
        match alu.vector_op() {
            Some(op) => out.write_all(op.name.as_bytes())?,
            None => write!(out, "OP({})", alu.vector_opcode)?,
        }
        if let Some(predicate) = alu.predicate {
            out.write_all(predicate.suffix().as_bytes())?;
        }
        write!(out, "\t{} = ", alu.vector_dest)?;
        for (i, src) in alu.vector_sources().enumerate() {
            if i > 0 {
                out.write_all(b", ")?;
            }
            write!(out, "{}", src)?;
        }
        self.export_comment(out, &alu.vector_dest, kind)?;
        writeln!(out)?;

        if let Some(scalar) = &alu.scalar {
            self.line_prefix(out, None)?;
            out.write_all(b"\t    \t")?;
            match scalar.op() {
                Some(op) => out.write_all(op.name.as_bytes())?,
                None => write!(out, "OP({})", scalar.opcode)?,
            }
            write!(out, "\t{} = {}", scalar.dest, scalar.src)?;
            self.export_comment(out, &scalar.dest, kind)?;
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn fetch<W: Write + ?Sized>(
        &self,
        out: &mut W,
        words: &[u32],
        fetch: &FetchInstruction,
        sync: bool,
    ) -> io::Result<()> {
        self.line_prefix(out, Some(words))?;
        write!(out, "{}FETCH:\t", sync_marker(sync))?;
        match fetch.kind() {
            Some(kind) => out.write_all(kind.name().as_bytes())?,
            None => write!(out, "OP({})", fetch.opcode)?,
        }
        write!(out, "\tR{}.", fetch.dest_register)?;
        write_channels(out, &fetch.dest_swizzle)?;
        write!(out, " = R{}.", fetch.src_register)?;
        write_channels(out, fetch.src_channels())?;
        if let Some(vertex) = &fetch.vertex {
            match vertex.format_name() {
                Some(name) => write!(out, " {}", name)?,
                None => write!(out, " TYPE(0x{:x})", vertex.format)?,
            }
            write!(
                out,
                " {} STRIDE({})",
                if vertex.signed { "SIGNED" } else { "UNSIGNED" },
                vertex.stride
            )?;
        }
        writeln!(out, " CONST({})", fetch.const_index)
    }
}
