// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod dump;
mod hexdump;

use clap::Parser;
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use dump::{DumpOptions, DumpSummary, Dumper};
use pgmdump_core::DebugFlags;

const EXIT_PASS: u8 = 0;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Adreno a2xx shader program dumper",
    long_about = None
)]
struct Cli {
    /// Prefix every line with its raw dwords and show CF sequence bits
    #[arg(long)]
    verbose: bool,

    /// Only the symbol table, constants and disassembly
    #[arg(long)]
    short: bool,

    /// Write each shader's instructions to <input>-<n>.vo / .fo
    #[arg(long)]
    dump_shaders: bool,

    /// Print a JSON summary instead of the text dump
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    trace: bool,

    /// Capture (.rd) or raw shader (.vo, .fo) to dump
    input: PathBuf,
}

enum Input {
    Capture(Vec<pgmdump_loader::RdRecord>),
    Shader(pgmdump_core::ShaderKind, Vec<u32>),
}

fn load_input(path: &Path) -> anyhow::Result<Input> {
    if path.extension().and_then(|e| e.to_str()) == Some("rd") {
        Ok(Input::Capture(pgmdump_loader::read_rd(path)?))
    } else {
        let (kind, dwords) = pgmdump_loader::load_raw_shader(path)?;
        Ok(Input::Shader(kind, dwords))
    }
}

fn input_hash(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            format!("{:x}", hasher.finalize())
        }
        Err(e) => {
            error!("Failed to read input for hash {:?}: {}", path, e);
            String::new()
        }
    }
}

fn run<W: Write>(
    out: W,
    options: DumpOptions,
    input: &Input,
    json: bool,
) -> anyhow::Result<DumpSummary> {
    let mut dumper = Dumper::new(out, options.clone());
    if json {
        dumper.set_sha256(input_hash(&options.input));
    }
    match input {
        Input::Capture(records) => dumper.dump_records(records)?,
        Input::Shader(kind, dwords) => dumper.dump_raw(*kind, dwords)?,
    }
    dumper.finish()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level based on --trace flag
    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    info!("Loading {:?}", cli.input);
    let input = match load_input(&cli.input) {
        Ok(input) => input,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let options = DumpOptions {
        short: cli.short,
        dump_shaders: cli.dump_shaders,
        flags: if cli.verbose {
            DebugFlags::PRINT_RAW | DebugFlags::PRINT_VERBOSE
        } else {
            DebugFlags::empty()
        },
        input: cli.input.clone(),
    };

    let result = if cli.json {
        run(io::sink(), options, &input, true)
    } else {
        run(io::stdout().lock(), options, &input, false)
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize summary: {}", e);
                return ExitCode::from(EXIT_RUNTIME_ERROR);
            }
        }
    }

    let failed = summary.failed();
    if failed > 0 {
        error!("{} shader(s) could not be disassembled", failed);
        return ExitCode::from(EXIT_RUNTIME_ERROR);
    }
    ExitCode::from(EXIT_PASS)
}
