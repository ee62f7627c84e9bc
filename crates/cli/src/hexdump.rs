// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Printers for raw program sections.
//!
//! Sections are not always a whole number of dwords; the last partial dword
//! is read as if the section were zero padded.

use std::io::{self, Write};

const ASCII_SEPARATOR: &str = "-----------------------------------";
const HEX_ASCII_RULE: &str = "-----------------------------------------------";

fn padded_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    for (i, b) in word.iter_mut().enumerate() {
        *b = bytes.get(offset + i).copied().unwrap_or(0);
    }
    u32::from_le_bytes(word)
}

fn padded_byte(bytes: &[u8], offset: usize) -> u8 {
    bytes.get(offset).copied().unwrap_or(0)
}

/// Writes `count` dwords eight per line, each line led by a tab.
fn dump_columns<W, F>(out: &mut W, count: usize, mut cell: F) -> io::Result<()>
where
    W: Write + ?Sized,
    F: FnMut(&mut W, usize) -> io::Result<()>,
{
    for i in 0..count {
        out.write_all(if i % 8 == 0 { b"\t" } else { b" " })?;
        cell(out, i)?;
        if i % 8 == 7 {
            writeln!(out)?;
        }
    }
    if count % 8 != 0 {
        writeln!(out)?;
    }
    Ok(())
}

pub fn dump_hex<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    dump_columns(out, bytes.len().div_ceil(4), |out, i| {
        write!(out, "{:08x}", padded_u32(bytes, 4 * i))
    })
}

/// Like [`dump_hex`] but each whole dword printed as an `f32`.
pub fn dump_float<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    dump_columns(out, bytes.len() / 4, |out, i| {
        write!(out, "{:8.6}", f32::from_bits(padded_u32(bytes, 4 * i)))
    })
}

fn is_printable(c: u8) -> bool {
    c.is_ascii() && !c.is_ascii_control()
}

/// Prints XOR-obfuscated text such as the shader source section.
pub fn dump_ascii<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(b"\t")?;
    for &b in bytes {
        match b ^ 0xff {
            b'\n' => out.write_all(b"\n\t")?,
            0 => write!(out, "\n\t{}\n\t", ASCII_SEPARATOR)?,
            c if c == b'\t' || is_printable(c) => out.write_all(&[c])?,
            _ => out.write_all(b"?")?,
        }
    }
    writeln!(out)
}

fn ascii_column<W: Write + ?Sized>(out: &mut W, bytes: impl Iterator<Item = u8>) -> io::Result<()> {
    out.write_all(b"\t|")?;
    for b in bytes {
        let c = b ^ 0xff;
        out.write_all(&[if is_printable(c) { c } else { b'.' }])?;
    }
    out.write_all(b"|\n")
}

/// Hex dump four dwords per line with the decoded ASCII alongside.
pub fn dump_hex_ascii<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    writeln!(out, "{}", HEX_ASCII_RULE)?;
    writeln!(out, "{} (0x{:x}) bytes", bytes.len(), bytes.len())?;

    let count = bytes.len().div_ceil(4);
    for i in 0..count {
        out.write_all(if i % 4 == 0 { b"\t" } else { b" " })?;
        write!(out, "{:08x}", padded_u32(bytes, 4 * i))?;
        if i % 4 == 3 {
            let start = 16 * (i / 4);
            ascii_column(out, (start..start + 16).map(|o| padded_byte(bytes, o)))?;
        }
    }
    if count % 4 != 0 {
        let start = 16 * (count / 4);
        ascii_column(out, bytes[start..].iter().copied())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl Fn(&mut Vec<u8>, &[u8]) -> io::Result<()>, bytes: &[u8]) -> String {
        let mut out = Vec::new();
        f(&mut out, bytes).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn le(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_hex_rows_of_eight() {
        let bytes = le(&(0..10).collect::<Vec<u32>>());
        assert_eq!(
            render(|o, b| dump_hex(o, b), &bytes),
            "\t00000000 00000001 00000002 00000003 00000004 00000005 00000006 00000007\n\
             \t00000008 00000009\n"
        );
        assert_eq!(render(|o, b| dump_hex(o, b), &[]), "");
    }

    #[test]
    fn test_hex_zero_fills_partial_dword() {
        assert_eq!(
            render(|o, b| dump_hex(o, b), &[0x11, 0x22, 0x33, 0x44, 0x55]),
            "\t44332211 00000055\n"
        );
    }

    #[test]
    fn test_float_skips_partial_dword() {
        let mut bytes = le(&[1.0f32.to_bits(), (-0.5f32).to_bits()]);
        bytes.push(0x3f);
        assert_eq!(render(|o, b| dump_float(o, b), &bytes), "\t1.000000 -0.500000\n");
    }

    #[test]
    fn test_ascii_decoding() {
        let plain = b"a\tb\nc\0d\x01";
        let bytes: Vec<u8> = plain.iter().map(|b| b ^ 0xff).collect();
        assert_eq!(
            render(|o, b| dump_ascii(o, b), &bytes),
            format!("\ta\tb\n\tc\n\t{}\n\td?\n", ASCII_SEPARATOR)
        );
    }

    #[test]
    fn test_hex_ascii_columns() {
        let plain = b"abcdefghijklmnopqrs";
        let bytes: Vec<u8> = plain.iter().map(|b| b ^ 0xff).collect();
        let text = render(|o, b| dump_hex_ascii(o, b), &bytes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEX_ASCII_RULE);
        assert_eq!(lines[1], "19 (0x13) bytes");
        assert!(lines[2].ends_with("\t|abcdefghijklmnop|"));
        assert!(lines[3].starts_with("\t008c8d8e\t|"));
        assert!(lines[3].ends_with("\t|qrs|"));
        assert_eq!(lines.len(), 4);
    }
}
