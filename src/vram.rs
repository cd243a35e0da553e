//! The simulated VRAM surface: 1024x512 16-bit pixels, addressed with
//! wraparound, plus the packed 15-bit-color-plus-mask-bit pixel format.

use crate::error::RasterizerError;
use proc_bitfield::bitfield;

pub const VRAM_WIDTH: usize = 1024;
pub const VRAM_HEIGHT: usize = 512;
pub const VRAM_LEN: usize = VRAM_WIDTH * VRAM_HEIGHT;

bitfield! {
    /// A single VRAM halfword: 5 bits each of blue/green/red, plus the mask
    /// bit in the top position (`mbbbbbgggggrrrrr`).
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct VramPixel(u16): Debug, IntoRaw, FromRaw {
        pub r: u8 @ 0..=4,
        pub g: u8 @ 5..=9,
        pub b: u8 @ 10..=14,
        pub mask: bool @ 15,
    }
}

impl VramPixel {
    pub fn new(r: u8, g: u8, b: u8, mask: bool) -> Self {
        Self(0).with_r(r).with_g(g).with_b(b).with_mask(mask)
    }

    #[must_use]
    pub fn raw(self) -> u16 {
        self.0
    }
}

/// Owns the 1 MiB VRAM buffer. Heap-allocated directly (never built up on
/// the stack), the same way the emulator avoids stack-allocating its large
/// buffers.
#[derive(Debug, Clone)]
pub struct VramSurface {
    words: Box<[u16; VRAM_LEN]>,
}

impl VramSurface {
    pub fn new() -> Self {
        Self { words: vec![0u16; VRAM_LEN].into_boxed_slice().try_into().unwrap() }
    }

    /// Wraps an externally-owned buffer as a `VramSurface` without copying.
    ///
    /// # Errors
    ///
    /// Returns [`RasterizerError::WrongVramLength`] if `words` is not
    /// exactly [`VRAM_LEN`] halfwords.
    pub fn from_boxed_slice(words: Box<[u16]>) -> Result<Self, RasterizerError> {
        let actual = words.len();
        let words: Box<[u16; VRAM_LEN]> = words.try_into().map_err(|_| {
            RasterizerError::WrongVramLength { actual, expected: VRAM_LEN }
        })?;
        Ok(Self { words })
    }

    #[inline]
    fn addr(x: i32, y: i32) -> usize {
        let x = (x as u32 as usize) & (VRAM_WIDTH - 1);
        let y = (y as u32 as usize) & (VRAM_HEIGHT - 1);
        y * VRAM_WIDTH + x
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> VramPixel {
        VramPixel(self.words[Self::addr(x, y)])
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, pixel: VramPixel) {
        self.words[Self::addr(x, y)] = pixel.0;
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        self.words.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [u16] {
        self.words.as_mut_slice()
    }

    /// Borrows the buffer as raw little-endian bytes, for handing off to a
    /// display/output layer without an intermediate copy.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.words.as_slice())
    }
}

impl Default for VramSurface {
    fn default() -> Self {
        Self::new()
    }
}

// Box<[u16; N]> is plain data: a VramSurface can cross thread boundaries
// freely, though this crate never spawns threads itself. An embedder that
// wants to split a frame into disjoint row strips across a worker pool can
// do so through `as_mut_slice`.
#[allow(dead_code)]
fn assert_send_sync() {
    fn is_send_sync<T: Send + Sync>() {}
    is_send_sync::<VramSurface>();
}
