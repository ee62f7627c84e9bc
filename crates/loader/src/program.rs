// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! The PROGRAM record: a linked program as the blob driver hands it to the
//! kernel. A header, the symbol table, the compiled shaders and their
//! constants, and the GLSL source it was compiled from, each in its own section.

use anyhow::{bail, Result};
use pgmdump_core::ShaderKind;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::section::{decode_name, dwords, read_f32, read_i32, read_u32, SectionScanner};

/// First GPU generation whose shaders use the a3xx instruction set.
pub const A3XX_GPU_ID: u32 = 300;

/// Vertex shader variants the driver emits per program.
pub const VERTEX_SHADER_COUNT: usize = 3;
pub const FRAGMENT_SHADER_COUNT: usize = 1;

/// Bytes of driver state preceding the instructions in a shader section.
pub const SHADER_PREAMBLE_BYTES: usize = 32;

// Type bytes of symbol sections: vector and float.
const SYMBOL_TYPES: [u32; 2] = [0x8b, 0x14];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgramHeader {
    pub size: u32,
    pub revision: u32,
    pub num_attribs: u32,
    pub num_uniforms: u32,
    pub num_samplers: u32,
    pub num_varyings: u32,
}

impl ProgramHeader {
    fn parse(bytes: &[u8]) -> Self {
        Self {
            size: read_u32(bytes, 0),
            revision: read_u32(bytes, 12),
            num_attribs: read_u32(bytes, 36),
            num_uniforms: read_u32(bytes, 40),
            num_samplers: read_u32(bytes, 44),
            num_varyings: read_u32(bytes, 48),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Register the VERTEX fetch loads into.
    pub reg: u32,
    /// `CONST()` index of the fetch.
    pub const_idx: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uniform {
    /// First constant register of a multi-register uniform (matrices).
    pub const_base: u32,
    /// Constant register holding the value, or -1 for multi-register uniforms.
    pub const_reg: i32,
    pub name: String,
}

impl Uniform {
    pub fn spans_registers(&self) -> bool {
        self.const_reg == -1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sampler {
    pub const_idx: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Varying {
    /// Register holding the value on entry to the fragment shader.
    pub reg: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    pub name: String,
}

/// Compiler-generated constant uploaded with a shader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constant {
    pub unknown2: u32,
    pub const_idx: u32,
    pub values: [f32; 4],
}

impl Constant {
    fn parse(bytes: &[u8]) -> Self {
        Self {
            unknown2: read_u32(bytes, 4),
            const_idx: read_u32(bytes, 12),
            values: std::array::from_fn(|i| read_f32(bytes, 16 + 4 * i)),
        }
    }
}

/// A decoded value together with the section it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub value: T,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl<T> Section<T> {
    fn new(value: T, bytes: &[u8]) -> Self {
        Self {
            value,
            bytes: bytes.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderBlock {
    pub kind: ShaderKind,
    /// Position among the shaders of the same kind.
    pub index: usize,
    #[serde(skip)]
    pub header: Vec<u8>,
    pub constants: Vec<Section<Constant>>,
    /// Shader section, preamble included.
    #[serde(skip)]
    pub section: Vec<u8>,
    /// Sections following a vertex shader, of unknown purpose.
    #[serde(skip)]
    pub trailing: Vec<Vec<u8>>,
}

impl ShaderBlock {
    /// Instruction dwords, i.e. the shader section minus its preamble.
    pub fn instructions(&self) -> Vec<u32> {
        dwords(self.section.get(SHADER_PREAMBLE_BYTES..).unwrap_or(&[]))
    }

    /// `VS0`..`VS2`, `FS0`.
    pub fn label(&self) -> String {
        let prefix = match self.kind {
            ShaderKind::Vertex => "VS",
            ShaderKind::Fragment => "FS",
            ShaderKind::Compute => "CS",
        };
        format!("{}{}", prefix, self.index)
    }

    /// File extension used when the raw instructions are written out.
    pub fn raw_extension(&self) -> &'static str {
        match self.kind {
            ShaderKind::Vertex => "vo",
            ShaderKind::Fragment => "fo",
            ShaderKind::Compute => "co",
        }
    }
}

/// One step of the capture, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramEntry {
    Header(Section<ProgramHeader>),
    /// Second header section, printed as hex and ASCII.
    HeaderExtra(Vec<u8>),
    /// Non-symbol section found where a symbol was expected.
    Skipped(Vec<u8>),
    Attribute(Section<Attribute>),
    Uniform(Section<Uniform>),
    Sampler(Section<Sampler>),
    /// Extra section after each sampler from revision 7 on.
    SamplerExtra(Vec<u8>),
    Varying(Section<Varying>),
    Output(Section<Output>),
    Shader(ShaderBlock),
    Source(Section<String>),
    /// Anything left over, including every shader of unsupported generations.
    Trailing(Vec<u8>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub gpu_id: u32,
    pub entries: Vec<ProgramEntry>,
}

impl Program {
    pub fn header(&self) -> Option<&ProgramHeader> {
        self.entries.iter().find_map(|e| match e {
            ProgramEntry::Header(h) => Some(&h.value),
            _ => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter().filter_map(|e| match e {
            ProgramEntry::Attribute(s) => Some(&s.value),
            _ => None,
        })
    }

    pub fn uniforms(&self) -> impl Iterator<Item = &Uniform> {
        self.entries.iter().filter_map(|e| match e {
            ProgramEntry::Uniform(s) => Some(&s.value),
            _ => None,
        })
    }

    pub fn samplers(&self) -> impl Iterator<Item = &Sampler> {
        self.entries.iter().filter_map(|e| match e {
            ProgramEntry::Sampler(s) => Some(&s.value),
            _ => None,
        })
    }

    pub fn varyings(&self) -> impl Iterator<Item = &Varying> {
        self.entries.iter().filter_map(|e| match e {
            ProgramEntry::Varying(s) => Some(&s.value),
            _ => None,
        })
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Output> {
        self.entries.iter().filter_map(|e| match e {
            ProgramEntry::Output(s) => Some(&s.value),
            _ => None,
        })
    }

    pub fn shaders(&self) -> impl Iterator<Item = &ShaderBlock> {
        self.entries.iter().filter_map(|e| match e {
            ProgramEntry::Shader(s) => Some(s),
            _ => None,
        })
    }

    pub fn source(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            ProgramEntry::Source(s) => Some(s.value.as_str()),
            _ => None,
        })
    }
}

fn is_symbol_section(bytes: &[u8]) -> bool {
    SYMBOL_TYPES.contains(&((read_u32(bytes, 0) >> 8) & 0xff))
}

fn name_at(bytes: &[u8], offset: usize) -> String {
    decode_name(bytes.get(offset..).unwrap_or(&[]))
}

fn parse_attribute(bytes: &[u8]) -> Attribute {
    Attribute {
        reg: read_u32(bytes, 4),
        const_idx: read_u32(bytes, 8),
        name: name_at(bytes, 28),
    }
}

fn parse_uniform(bytes: &[u8]) -> Uniform {
    // Newer drivers insert three dwords before the name, the first always 0.
    let name_offset = if read_u32(bytes, 40) == 0 { 52 } else { 40 };
    Uniform {
        const_base: read_u32(bytes, 16),
        const_reg: read_i32(bytes, 24),
        name: name_at(bytes, name_offset),
    }
}

fn parse_sampler(bytes: &[u8]) -> Sampler {
    Sampler {
        const_idx: read_u32(bytes, 24),
        name: name_at(bytes, 32),
    }
}

fn parse_varying(bytes: &[u8]) -> Varying {
    Varying {
        reg: read_u32(bytes, 12),
        name: name_at(bytes, 16),
    }
}

struct ProgramParser<'a> {
    scanner: SectionScanner<'a>,
    entries: Vec<ProgramEntry>,
}

impl<'a> ProgramParser<'a> {
    /// Next section that carries a symbol, recording skipped ones.
    fn next_symbol(&mut self) -> Option<&'a [u8]> {
        loop {
            let section = self.scanner.next_section()?;
            if is_symbol_section(section) {
                return Some(section);
            }
            debug!("Skipping non-symbol section of {} bytes", section.len());
            self.entries.push(ProgramEntry::Skipped(section.to_vec()));
        }
    }

    fn symbols(&mut self, count: u32, what: &str, mut emit: impl FnMut(&mut Self, &'a [u8])) {
        for i in 0..count {
            if self.scanner.is_empty() {
                warn!("Program ends after {} of {} {}", i, count, what);
                return;
            }
            match self.next_symbol() {
                Some(section) => emit(self, section),
                None => {
                    warn!("Program ends after {} of {} {}", i, count, what);
                    return;
                }
            }
        }
    }

    /// Reads one shader. Returns false when the program ran out of sections.
    fn shader(&mut self, kind: ShaderKind, index: usize) -> bool {
        let Some(header) = self.scanner.next_section() else {
            return false;
        };
        let mut block = ShaderBlock {
            kind,
            index,
            header: header.to_vec(),
            constants: Vec::new(),
            section: Vec::new(),
            trailing: Vec::new(),
        };

        let num_constants = read_u32(header, 0).saturating_sub(1);
        for _ in 0..num_constants {
            let Some(section) = self.scanner.next_section() else {
                return self.abandon(block);
            };
            block.constants.push(Section::new(Constant::parse(section), section));
        }

        let Some(section) = self.scanner.next_section() else {
            return self.abandon(block);
        };
        block.section = section.to_vec();

        if kind == ShaderKind::Vertex {
            for _ in 0..read_u32(header, 32) {
                match self.scanner.next_section() {
                    Some(section) => block.trailing.push(section.to_vec()),
                    None => break,
                }
            }
        }

        debug!(
            "{}: {} constants, {} instruction dwords",
            block.label(),
            block.constants.len(),
            block.instructions().len()
        );
        self.entries.push(ProgramEntry::Shader(block));
        true
    }

    /// Keeps the sections of a shader cut short by the end of the program.
    fn abandon(&mut self, block: ShaderBlock) -> bool {
        warn!("Program ends inside shader {}", block.label());
        self.entries.push(ProgramEntry::Trailing(block.header));
        self.entries.extend(
            block
                .constants
                .into_iter()
                .map(|c| ProgramEntry::Trailing(c.bytes)),
        );
        false
    }

    fn trailing(&mut self) {
        while let Some(section) = self.scanner.next_section() {
            self.entries.push(ProgramEntry::Trailing(section.to_vec()));
        }
    }
}

/// Splits a PROGRAM payload into its entries.
///
/// Parsing is best effort: a payload that ends early yields everything read
/// up to that point. Only an empty payload is an error.
pub fn parse_program(payload: &[u8], gpu_id: u32) -> Result<Program> {
    let mut parser = ProgramParser {
        scanner: SectionScanner::new(payload),
        entries: Vec::new(),
    };

    let Some(header_bytes) = parser.scanner.next_section() else {
        bail!("Program payload is empty");
    };
    let header = ProgramHeader::parse(header_bytes);
    info!(
        "Program rev {}: {} attributes, {} uniforms, {} samplers, {} varyings",
        header.revision,
        header.num_attribs,
        header.num_uniforms,
        header.num_samplers,
        header.num_varyings
    );
    parser
        .entries
        .push(ProgramEntry::Header(Section::new(header, header_bytes)));

    if let Some(extra) = parser.scanner.next_section() {
        parser.entries.push(ProgramEntry::HeaderExtra(extra.to_vec()));
    }

    parser.symbols(header.num_attribs, "attributes", |p, s| {
        p.entries
            .push(ProgramEntry::Attribute(Section::new(parse_attribute(s), s)));
    });
    parser.symbols(header.num_uniforms, "uniforms", |p, s| {
        p.entries
            .push(ProgramEntry::Uniform(Section::new(parse_uniform(s), s)));
    });
    parser.symbols(header.num_samplers, "samplers", |p, s| {
        p.entries
            .push(ProgramEntry::Sampler(Section::new(parse_sampler(s), s)));
        if header.revision >= 7 {
            if let Some(extra) = p.scanner.next_section() {
                p.entries.push(ProgramEntry::SamplerExtra(extra.to_vec()));
            }
        }
    });
    parser.symbols(header.num_varyings, "varyings", |p, s| {
        p.entries
            .push(ProgramEntry::Varying(Section::new(parse_varying(s), s)));
    });

    if header.revision >= 7 {
        if let Some(section) = parser.scanner.next_section() {
            let output = Output {
                name: name_at(section, 32),
            };
            parser
                .entries
                .push(ProgramEntry::Output(Section::new(output, section)));
        }
    }

    if gpu_id >= A3XX_GPU_ID {
        warn!(
            "gpu_id {} uses the a3xx instruction set; shaders are kept undecoded",
            gpu_id
        );
        parser.trailing();
        return Ok(Program {
            gpu_id,
            entries: parser.entries,
        });
    }

    let shaders = std::iter::repeat(ShaderKind::Vertex)
        .take(VERTEX_SHADER_COUNT)
        .enumerate()
        .chain(
            std::iter::repeat(ShaderKind::Fragment)
                .take(FRAGMENT_SHADER_COUNT)
                .enumerate(),
        );
    let mut complete = true;
    for (index, kind) in shaders {
        if !parser.shader(kind, index) {
            complete = false;
            break;
        }
    }

    if complete {
        if let Some(section) = parser.scanner.next_section() {
            parser
                .entries
                .push(ProgramEntry::Source(Section::new(decode_name(section), section)));
        }
    }
    parser.trailing();

    Ok(Program {
        gpu_id,
        entries: parser.entries,
    })
}
