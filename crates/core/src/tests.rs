// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#[cfg(test)]
mod integration_tests {
    use crate::decoder::alu::decode_alu;
    use crate::decoder::fetch::decode_fetch;
    use crate::decoder::field::Slot;
    use crate::decoder::tables;
    use crate::render::Renderer;
    use crate::{DebugFlags, Diagnostic, DisasmConfig, DisasmError, Disassembler, ShaderKind};
    use proptest::prelude::*;

    const ADDV: [u32; 3] = [0x000F_0000, 0x0000_E400, 0x4000_0100];
    const VERTEX_FETCH: [u32; 3] = [0x0048_2000, 0x4039_3a88, 0x0000_000c];

    fn disasm(dwords: &[u32], kind: ShaderKind) -> (String, crate::DisasmReport) {
        Disassembler::default()
            .disassemble_to_string(dwords, kind)
            .unwrap()
    }

    fn cf_pair(addr_a: u32, cnt_a: u32, seq_a: u32, op_a: u32, op_b: u32) -> [u32; 3] {
        [addr_a | (cnt_a << 12) | (seq_a << 16), op_a << 8, op_b << 24]
    }

    #[test]
    fn test_end_to_end_alu_line() {
        let mut dwords = cf_pair(1, 1, 0, 0x10, 0x00).to_vec();
        dwords.extend_from_slice(&ADDV);
        let (text, report) = disasm(&dwords, ShaderKind::Vertex);
        assert_eq!(
            text,
            "CF: EXEC ADDR(0x1) CNT(0x1)\n   ALU:\tADDv\tR0 = C0, R1.xyzw\nCF: NOP\n"
        );
        assert_eq!((report.clauses, report.alu, report.fetch), (2, 1, 0));
        assert!(report.is_complete());
    }

    #[test]
    fn test_end_to_end_fetch_line() {
        let mut dwords = cf_pair(1, 1, 0b01, 0x10, 0x00).to_vec();
        dwords.extend_from_slice(&VERTEX_FETCH);
        let (text, report) = disasm(&dwords, ShaderKind::Vertex);
        let fetch_line = text.lines().nth(1).unwrap();
        assert_eq!(
            fetch_line,
            "   FETCH:\tVERTEX\tR2.xyz1 = R0.x FMT_32_32_32_FLOAT SIGNED STRIDE(12) CONST(4)"
        );
        assert_eq!(report.fetch, 1);
    }

    #[test]
    fn test_sequence_bits_pick_decoder_per_slot() {
        // slot 0 ALU, slot 1 FETCH with sync
        let mut dwords = cf_pair(1, 2, 0b11_00, 0x10, 0x00).to_vec();
        dwords.extend_from_slice(&ADDV);
        dwords.extend_from_slice(&VERTEX_FETCH);
        let (text, report) = disasm(&dwords, ShaderKind::Vertex);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("   ALU:\tADDv"));
        assert!(lines[2].starts_with("(S)FETCH:\tVERTEX"));
        assert_eq!(lines[3], "CF: NOP");
        assert_eq!((report.alu, report.fetch), (1, 1));
    }

    #[test]
    fn test_three_pair_program() {
        // EXEC ADDR(3) CNT(2) | EXEC ADDR(5) CNT(1)
        // EXEC_END ADDR(6) CNT(1) | ALLOC COORD
        // ALLOC PARAM/PIXEL | NOP
        let mut dwords = vec![
            0x0001_2003,
            (5 << 16) | (1 << 28) | (0x10 << 8),
            0x10 << 24,
            0x0000_1006,
            0x20 << 8,
            0xc2 << 24,
            0x0000_0000,
            0xc4 << 8,
            0x0000_0000,
        ];
        dwords.extend_from_slice(&VERTEX_FETCH); // slot 3
        dwords.extend_from_slice(&ADDV); // slot 4
        dwords.extend_from_slice(&ADDV); // slot 5
        dwords.extend_from_slice(&ADDV); // slot 6

        let config = DisasmConfig::default().with_indent(1);
        let (text, report) = Disassembler::new(config)
            .disassemble_to_string(&dwords, ShaderKind::Vertex)
            .unwrap();
        let cf_lines: Vec<&str> = text.lines().filter(|l| l.contains("CF")).collect();
        assert_eq!(
            cf_lines,
            vec![
                "\tCF: EXEC ADDR(0x3) CNT(0x2)",
                "\tCF: EXEC ADDR(0x5) CNT(0x1)",
                "\tCF: EXEC_END ADDR(0x6) CNT(0x1)",
                "\tCF: ALLOC COORD SIZE(0x0)",
                "\tCF: ALLOC PARAM/PIXEL SIZE(0x0)",
                "\tCF: NOP",
            ]
        );
        assert_eq!(report.clauses, 6);
        assert_eq!((report.alu, report.fetch), (3, 1));
        assert!(report.is_complete());
    }

    #[test]
    fn test_declared_table_over_capacity_is_an_error() {
        let dwords = cf_pair(40, 0, 0, 0x10, 0x00);
        let err = Disassembler::default()
            .disassemble(&dwords, ShaderKind::Vertex, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            DisasmError::ClauseCapacityExceeded {
                needed: 80,
                capacity: 64
            }
        ));
    }

    #[test]
    fn test_truncated_table_renders_what_is_there() {
        // declares 2 pairs, holds 1
        let dwords = cf_pair(2, 0, 0, 0x00, 0x00);
        let (text, report) = disasm(&dwords, ShaderKind::Fragment);
        assert_eq!(text, "CF: NOP\nCF: NOP\n");
        assert!(matches!(
            report.diagnostics.as_slice(),
            [Diagnostic::TruncatedCfTable {
                expected: 2,
                parsed: 1,
                ..
            }]
        ));
    }

    #[test]
    fn test_exec_past_end_of_buffer() {
        let dwords = cf_pair(9, 3, 0, 0x20, 0x00);
        let (text, report) = disasm(&dwords, ShaderKind::Vertex);
        assert_eq!(text, "CF: EXEC_END ADDR(0x9) CNT(0x3)\n");
        assert!(!report.is_complete());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::SlotOutOfBounds { slot: 9, .. })));
    }

    proptest! {
        #[test]
        fn prop_every_slot_renders(words in any::<[u32; 3]>(), raw in any::<bool>()) {
            let config = if raw {
                DisasmConfig::default()
                    .with_indent(12)
                    .with_flags(DebugFlags::PRINT_RAW | DebugFlags::PRINT_VERBOSE)
            } else {
                DisasmConfig::default()
            };
            let renderer = Renderer::new(&config);
            let slot = Slot::new(&words);
            let mut out = Vec::new();
            renderer
                .alu(&mut out, &words, &decode_alu(&slot), false, ShaderKind::Vertex)
                .unwrap();
            renderer
                .fetch(&mut out, &words, &decode_fetch(&slot), true)
                .unwrap();
            let text = String::from_utf8(out).unwrap();
            prop_assert!(text.ends_with('\n'));
            prop_assert!(text.contains("ALU:\t") && text.contains("FETCH:\t"));
        }

        #[test]
        fn prop_programs_never_fail(mut dwords in prop::collection::vec(any::<u32>(), 0..40)) {
            // keep the inferred table inside the default capacity
            if let Some(first) = dwords.first_mut() {
                *first &= 0xffff_f01f;
            }
            if let Some(second) = dwords.get_mut(1) {
                *second &= 0xf01f_ffff;
            }
            let mut out = Vec::new();
            let report = Disassembler::default()
                .disassemble(&dwords, ShaderKind::Fragment, &mut out)
                .unwrap();
            prop_assert!(report.clauses <= 64);
        }
    }

    #[test]
    fn test_every_vector_mnemonic_renders() {
        for opcode in 0..tables::VECTOR_OPCODE_COUNT as u32 {
            let words = [0x000F_0000, 0, opcode << 24];
            let mut out = Vec::new();
            Renderer::new(&DisasmConfig::default())
                .alu(&mut out, &words, &decode_alu(&Slot::new(&words)), false, ShaderKind::Vertex)
                .unwrap();
            let text = String::from_utf8(out).unwrap();
            let expected = match tables::vector_op(opcode) {
                Some(op) => format!("\t{}\t", op.name),
                None => format!("\tOP({})\t", opcode),
            };
            assert!(text.contains(&expected), "opcode {:#x}: {}", opcode, text);
        }
    }

    #[test]
    fn test_every_scalar_mnemonic_renders() {
        for opcode in 0..tables::SCALAR_OPCODE_COUNT as u32 {
            // vector mask empty so the scalar half is always present
            let words = [opcode << 26, 0, 0];
            let mut out = Vec::new();
            Renderer::new(&DisasmConfig::default())
                .alu(&mut out, &words, &decode_alu(&Slot::new(&words)), false, ShaderKind::Vertex)
                .unwrap();
            let text = String::from_utf8(out).unwrap();
            let scalar_line = text.lines().nth(1).unwrap();
            let expected = match tables::scalar_op(opcode) {
                Some(op) => op.name.to_string(),
                None => format!("OP({})", opcode),
            };
            assert_eq!(scalar_line, format!("\t    \t{}\tR0.____ = C0", expected));
        }
    }

    #[test]
    fn test_export_names_follow_shader_kind() {
        // MULv export0 = R1, R2 in a fragment shader
        let words = [
            (1 << 15) | (0xF << 16),
            0,
            (0x01 << 24) | (0b11 << 30) | (1 << 16) | (2 << 8),
        ];
        let mut dwords = cf_pair(1, 1, 0, 0x20, 0x00).to_vec();
        dwords.extend_from_slice(&words);

        let (frag, _) = disasm(&dwords, ShaderKind::Fragment);
        assert!(frag.contains("export0 = R1, R2\t; gl_FragColor\n"));

        let (vert, _) = disasm(&dwords, ShaderKind::Vertex);
        assert!(vert.contains("export0 = R1, R2\n"));
    }
}
