// PgmDump - Adreno Shader Program Dumper
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// Number of dwords in one ALU/FETCH instruction slot or CF clause pair.
pub const SLOT_DWORDS: usize = 3;

/// Extracts the zero-extended `width`-bit field starting at `low_bit`.
#[inline]
pub fn extract(word: u32, low_bit: u32, width: u32) -> u32 {
    debug_assert!(width <= 32, "field width {} exceeds a dword", width);
    debug_assert!(
        low_bit + width <= 32,
        "field [{}, {}) runs past bit 31",
        low_bit,
        low_bit + width
    );
    if width == 32 {
        word >> low_bit
    } else {
        (word >> low_bit) & ((1u32 << width) - 1)
    }
}

#[inline]
pub fn bit(word: u32, index: u32) -> bool {
    extract(word, index, 1) != 0
}

/// One 96-bit encoding unit, borrowed from the caller's dword buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<'a> {
    words: &'a [u32; SLOT_DWORDS],
}

impl<'a> Slot<'a> {
    pub fn new(words: &'a [u32; SLOT_DWORDS]) -> Self {
        Self { words }
    }

    /// Borrows the slot starting at dword `offset`, or `None` if it would run
    /// past the end of `dwords`.
    pub fn from_dwords(dwords: &'a [u32], offset: usize) -> Option<Self> {
        let end = offset.checked_add(SLOT_DWORDS)?;
        let words: &[u32; SLOT_DWORDS] = dwords.get(offset..end)?.try_into().ok()?;
        Some(Self { words })
    }

    pub fn words(&self) -> &'a [u32; SLOT_DWORDS] {
        self.words
    }

    #[inline]
    pub fn field(&self, dword: usize, low_bit: u32, width: u32) -> u32 {
        extract(self.words[dword], low_bit, width)
    }

    #[inline]
    pub fn flag(&self, dword: usize, index: u32) -> bool {
        bit(self.words[dword], index)
    }
}
