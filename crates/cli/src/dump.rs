// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use pgmdump_core::{DebugFlags, DisasmConfig, DisasmError, Disassembler, ShaderKind};
use pgmdump_loader::program::{
    Attribute, Constant, Output, Sampler, Section, Uniform, Varying,
};
use pgmdump_loader::{
    parse_program, Program, ProgramEntry, ProgramHeader, RdRecord, RecordType, ShaderBlock,
};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::hexdump::{dump_ascii, dump_float, dump_hex, dump_hex_ascii};

const RECORD_RULE: &str = "############################################################";
const BLOCK_RULE: &str = "#######################################################";

#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Symbol summary and disassembly only.
    pub short: bool,
    /// Write each shader's instructions next to the input file.
    pub dump_shaders: bool,
    pub flags: DebugFlags,
    pub input: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShaderSummary {
    pub label: String,
    pub kind: ShaderKind,
    pub dwords: usize,
    pub clauses: usize,
    pub alu: usize,
    pub fetch: usize,
    pub diagnostics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramSummary {
    pub gpu_id: u32,
    pub header: Option<ProgramHeader>,
    pub attributes: Vec<Attribute>,
    pub uniforms: Vec<Uniform>,
    pub samplers: Vec<Sampler>,
    pub varyings: Vec<Varying>,
    pub outputs: Vec<Output>,
    pub constants: Vec<Constant>,
    pub shaders: Vec<ShaderSummary>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DumpSummary {
    pub input: PathBuf,
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_id: Option<u32>,
    pub programs: Vec<ProgramSummary>,
    /// Shaders loaded directly from a raw `.vo`/`.fo` file.
    pub shaders: Vec<ShaderSummary>,
}

impl DumpSummary {
    /// Shaders whose disassembly was aborted.
    pub fn failed(&self) -> usize {
        self.programs
            .iter()
            .flat_map(|p| p.shaders.iter())
            .chain(self.shaders.iter())
            .filter(|s| s.error.is_some())
            .count()
    }
}

/// Prints `.rd` captures and raw shaders, collecting a [`DumpSummary`].
pub struct Dumper<W: Write> {
    out: W,
    options: DumpOptions,
    gpu_id: u32,
    summary: DumpSummary,
}

impl<W: Write> Dumper<W> {
    pub fn new(out: W, options: DumpOptions) -> Self {
        let summary = DumpSummary {
            input: options.input.clone(),
            ..Default::default()
        };
        Self {
            out,
            options,
            gpu_id: 0,
            summary,
        }
    }

    pub fn set_sha256(&mut self, hash: String) {
        self.summary.sha256 = hash;
    }

    pub fn finish(mut self) -> Result<DumpSummary> {
        self.out.flush().context("Failed to flush output")?;
        Ok(self.summary)
    }

    fn full(&self) -> bool {
        !self.options.short
    }

    pub fn dump_records(&mut self, records: &[RdRecord]) -> Result<()> {
        for record in records {
            match record.kind {
                RecordType::Test => {
                    if self.full() {
                        writeln!(self.out, "test: {}", record.text())?;
                    }
                }
                RecordType::VertShader => {
                    writeln!(self.out, "vertex shader:\n{}", record.text())?;
                }
                RecordType::FragShader => {
                    writeln!(self.out, "fragment shader:\n{}", record.text())?;
                }
                RecordType::GpuId => {
                    self.gpu_id = record.gpu_id();
                    self.summary.gpu_id = Some(self.gpu_id);
                    info!("GPU id {}", self.gpu_id);
                    writeln!(self.out, "gpu_id: {}", self.gpu_id)?;
                }
                RecordType::Program => {
                    writeln!(self.out, "{}", RECORD_RULE)?;
                    writeln!(self.out, "program:")?;
                    match parse_program(&record.payload, self.gpu_id) {
                        Ok(program) => self.dump_program(&program)?,
                        Err(e) => {
                            warn!("{:#}", e);
                            writeln!(self.out, "; warning: {:#}", e)?;
                        }
                    }
                    writeln!(self.out, "{}", RECORD_RULE)?;
                }
                other => debug!("Skipping {:?} record ({} bytes)", other, record.payload.len()),
            }
        }
        Ok(())
    }

    /// Disassembles a shader loaded from a raw `.vo`/`.fo` file.
    pub fn dump_raw(&mut self, kind: ShaderKind, dwords: &[u32]) -> Result<()> {
        let label = match kind {
            ShaderKind::Vertex => "VS",
            ShaderKind::Fragment => "FS",
            ShaderKind::Compute => "CS",
        };
        let summary = self.disassemble(label.to_string(), kind, dwords, 0)?;
        self.summary.shaders.push(summary);
        Ok(())
    }

    fn dump_program(&mut self, program: &Program) -> Result<()> {
        let mut shaders = Vec::new();
        let full = self.full();

        for entry in &program.entries {
            match entry {
                ProgramEntry::Header(section) => self.dump_header(section)?,
                ProgramEntry::HeaderExtra(bytes)
                | ProgramEntry::Skipped(bytes)
                | ProgramEntry::SamplerExtra(bytes) => {
                    if full {
                        dump_hex_ascii(&mut self.out, bytes)?;
                    }
                }
                ProgramEntry::Attribute(s) => {
                    self.symbol_block("ATTRIBUTE", &s.bytes, |out| write_attribute(out, &s.value))?
                }
                ProgramEntry::Uniform(s) => {
                    self.symbol_block("UNIFORM", &s.bytes, |out| write_uniform(out, &s.value))?
                }
                ProgramEntry::Sampler(s) => {
                    self.symbol_block("SAMPLER", &s.bytes, |out| write_sampler(out, &s.value))?
                }
                ProgramEntry::Varying(s) => {
                    self.symbol_block("VARYING", &s.bytes, |out| write_varying(out, &s.value))?
                }
                ProgramEntry::Output(s) => self.symbol_block("OUTPUT", &s.bytes, |out| {
                    writeln!(out, "\tR?: {}", s.value.name)
                })?,
                ProgramEntry::Shader(block) => shaders.push(self.dump_shader(program, block)?),
                ProgramEntry::Source(section) => {
                    if full {
                        writeln!(self.out, "\n{}", BLOCK_RULE)?;
                        writeln!(self.out, "######## SHADER SRC: (size={})", section.bytes.len())?;
                        dump_ascii(&mut self.out, &section.bytes)?;
                    }
                }
                ProgramEntry::Trailing(bytes) => {
                    if full {
                        writeln!(self.out, "######## section (size={})", bytes.len())?;
                        writeln!(self.out, "as hex:")?;
                        dump_hex(&mut self.out, bytes)?;
                        writeln!(self.out, "as float:")?;
                        dump_float(&mut self.out, bytes)?;
                        writeln!(self.out, "as ascii:")?;
                        dump_ascii(&mut self.out, bytes)?;
                    }
                }
            }
        }

        self.summary.programs.push(ProgramSummary {
            gpu_id: program.gpu_id,
            header: program.header().copied(),
            attributes: program.attributes().cloned().collect(),
            uniforms: program.uniforms().cloned().collect(),
            samplers: program.samplers().cloned().collect(),
            varyings: program.varyings().cloned().collect(),
            outputs: program.outputs().cloned().collect(),
            constants: program
                .shaders()
                .flat_map(|s| s.constants.iter().map(|c| c.value.clone()))
                .collect(),
            shaders,
        });
        Ok(())
    }

    fn dump_header(&mut self, section: &Section<ProgramHeader>) -> Result<()> {
        let h = &section.value;
        writeln!(self.out, "######## HEADER: (size {})", section.bytes.len())?;
        writeln!(self.out, "\tsize:       {}", h.size)?;
        writeln!(self.out, "\trevision:   {}", h.revision)?;
        writeln!(self.out, "\tattributes: {}", h.num_attribs)?;
        writeln!(self.out, "\tuniforms:   {}", h.num_uniforms)?;
        writeln!(self.out, "\tsamplers:   {}", h.num_samplers)?;
        writeln!(self.out, "\tvaryings:   {}", h.num_varyings)?;
        if self.full() {
            dump_hex(&mut self.out, &section.bytes)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn symbol_block(
        &mut self,
        title: &str,
        bytes: &[u8],
        line: impl FnOnce(&mut W) -> std::io::Result<()>,
    ) -> Result<()> {
        if self.full() {
            writeln!(self.out, "######## {}: (size {})", title, bytes.len())?;
            line(&mut self.out)?;
            dump_hex(&mut self.out, bytes)?;
        }
        Ok(())
    }

    fn dump_shader(&mut self, program: &Program, block: &ShaderBlock) -> Result<ShaderSummary> {
        let label = block.label();
        writeln!(self.out)?;

        if self.full() {
            writeln!(self.out, "{}", BLOCK_RULE)?;
            writeln!(self.out, "######## {} HEADER: (size {})", label, block.header.len())?;
            dump_hex(&mut self.out, &block.header)?;
            for constant in &block.constants {
                writeln!(self.out, "######## {} CONST: (size={})", label, constant.bytes.len())?;
                write_constant(&mut self.out, &constant.value)?;
                dump_hex(&mut self.out, &constant.bytes)?;
            }
        }

        writeln!(self.out, "######## {} SHADER: (size={})", label, block.section.len())?;
        let depth = if self.full() {
            dump_hex(&mut self.out, &block.section)?;
            2
        } else {
            self.short_summary(program, block)?;
            1
        };

        let instructions = block.instructions();
        let summary = self.disassemble(label.clone(), block.kind, &instructions, depth)?;
        if self.options.dump_shaders {
            self.write_raw_shader(block, &instructions)?;
        }

        if self.full() {
            for section in &block.trailing {
                writeln!(self.out, "######## {} CONST?: (size={})", label, section.len())?;
                dump_hex(&mut self.out, section)?;
            }
        }
        Ok(summary)
    }

    fn short_summary(&mut self, program: &Program, block: &ShaderBlock) -> Result<()> {
        for varying in program.varyings() {
            write_varying(&mut self.out, varying)?;
        }
        for attribute in program.attributes() {
            write_attribute(&mut self.out, attribute)?;
        }
        for uniform in program.uniforms() {
            write_uniform(&mut self.out, uniform)?;
        }
        for sampler in program.samplers() {
            write_sampler(&mut self.out, sampler)?;
        }
        for constant in block.constants.iter().filter(|c| c.value.unknown2 == 0) {
            write_constant(&mut self.out, &constant.value)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn disassemble(
        &mut self,
        label: String,
        kind: ShaderKind,
        dwords: &[u32],
        depth: usize,
    ) -> Result<ShaderSummary> {
        let config = DisasmConfig::default()
            .with_indent(depth)
            .with_flags(self.options.flags);
        let mut summary = ShaderSummary {
            label,
            kind,
            dwords: dwords.len(),
            clauses: 0,
            alu: 0,
            fetch: 0,
            diagnostics: Vec::new(),
            error: None,
        };

        match Disassembler::new(config).disassemble(dwords, kind, &mut self.out) {
            Ok(report) => {
                for diagnostic in &report.diagnostics {
                    writeln!(self.out, "; warning: {}", diagnostic)?;
                }
                summary.clauses = report.clauses;
                summary.alu = report.alu;
                summary.fetch = report.fetch;
                summary.diagnostics = report.diagnostics.iter().map(|d| d.to_string()).collect();
            }
            Err(DisasmError::Io(e)) => {
                return Err(e).context("Failed to write disassembly");
            }
            Err(e) => {
                warn!("{}: {}", summary.label, e);
                writeln!(self.out, "; error: {}", e)?;
                summary.error = Some(e.to_string());
            }
        }
        Ok(summary)
    }

    fn write_raw_shader(&self, block: &ShaderBlock, dwords: &[u32]) -> Result<()> {
        let path = raw_shader_path(&self.options.input, block.index, block.raw_extension());
        let bytes: Vec<u8> = dwords.iter().flat_map(|d| d.to_le_bytes()).collect();
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write shader dump: {:?}", path))?;
        info!("Wrote {} ({} dwords) to {:?}", block.label(), dwords.len(), path);
        Ok(())
    }
}

/// `<dir>/<stem>-<index>.<ext>` beside the input capture.
pub fn raw_shader_path(input: &Path, index: usize, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}-{}.{}", stem, index, ext))
}

fn write_attribute<W: Write + ?Sized>(out: &mut W, a: &Attribute) -> std::io::Result<()> {
    writeln!(out, "\tR{}, CONST({}): {}", a.reg, a.const_idx, a.name)
}

fn write_uniform<W: Write + ?Sized>(out: &mut W, u: &Uniform) -> std::io::Result<()> {
    if u.spans_registers() {
        writeln!(out, "\tC{}+: {}", u.const_base, u.name)
    } else {
        writeln!(out, "\tC{}: {}", u.const_reg, u.name)
    }
}

fn write_sampler<W: Write + ?Sized>(out: &mut W, s: &Sampler) -> std::io::Result<()> {
    writeln!(out, "\tCONST({}): {}", s.const_idx, s.name)
}

fn write_varying<W: Write + ?Sized>(out: &mut W, v: &Varying) -> std::io::Result<()> {
    writeln!(out, "\tR{}: {}", v.reg, v.name)
}

fn write_constant<W: Write + ?Sized>(out: &mut W, c: &Constant) -> std::io::Result<()> {
    let [x, y, z, w] = c.values;
    writeln!(out, "\tC{}: {:.6}, {:.6}, {:.6}, {:.6}", c.const_idx, x, y, z, w)
}
