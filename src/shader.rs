//! The pixel shader: the one routine every rasterizer funnels through.
//!
//! Specialized per draw command by four const-generic flags exactly the way
//! the teacher's fixed-point type specializes on `FRACTION_BITS`: no flag
//! check ever happens inside a per-pixel loop, because the loop itself calls
//! a monomorphized instance chosen ahead of time (see `dispatch.rs`).

use crate::command::{
    Color, MaskParams, PaletteLocation, RasterContext, SemiTransparencyMode, TextureColorDepth,
    TexturePage, TextureWindow,
};
use crate::dither::{DitherLut, NO_DITHER_COL, NO_DITHER_ROW};
use crate::vram::{VramPixel, VramSurface};

/// Samples one texel through the texture page/palette chain, applying the
/// PS1's texel-zero-is-transparent rule. Texture coordinates are expected to
/// already have the texture window applied.
fn sample_texel(
    vram: &VramSurface,
    page: TexturePage,
    palette: PaletteLocation,
    tcx: u8,
    tcy: u8,
) -> Option<VramPixel> {
    let texel = match page.color_depth {
        TextureColorDepth::Palette4Bit => {
            let word = vram.get(page.base_x + i32::from(tcx) / 4, page.base_y + i32::from(tcy));
            let nibble_shift = (u32::from(tcx) % 4) * 4;
            let index = (word.raw() >> nibble_shift) & 0xF;
            vram.get(palette.base_x + index as i32, palette.base_y)
        }
        TextureColorDepth::Palette8Bit => {
            let word = vram.get(page.base_x + i32::from(tcx) / 2, page.base_y + i32::from(tcy));
            let byte_shift = (u32::from(tcx) % 2) * 8;
            let index = (word.raw() >> byte_shift) & 0xFF;
            vram.get(palette.base_x + index as i32, palette.base_y)
        }
        TextureColorDepth::Direct15Bit => {
            vram.get(page.base_x + i32::from(tcx), page.base_y + i32::from(tcy))
        }
    };
    (texel.raw() != 0).then_some(texel)
}

#[inline]
fn dither_coords(dither: bool, x: i32, y: i32) -> (usize, usize) {
    if dither {
        (y as usize & 3, x as usize & 3)
    } else {
        (NO_DITHER_ROW, NO_DITHER_COL)
    }
}

/// `(texel5 * mod8) >> 4`, routed through the dither LUT; used when a
/// texture is sampled and not drawn raw.
#[inline]
fn modulated_channel(lut: &DitherLut, row: usize, col: usize, texel5: u8, mod8: u8) -> u8 {
    let preval = (u16::from(texel5) * u16::from(mod8)) >> 4;
    lut.lookup(row, col, preval)
}

/// `mod8 << 1`, routed through the dither LUT; used for flat/Gouraud shading
/// with no texture, where `mod8` is the shading color itself rather than a
/// multiplier against a sampled texel.
#[inline]
fn shaded_channel(lut: &DitherLut, row: usize, col: usize, mod8: u8) -> u8 {
    lut.lookup(row, col, u16::from(mod8) << 1)
}

/// Computes and conditionally writes the final VRAM pixel at `(x, y)`.
///
/// `modulation` is either the texture modulation color (when `TEXTURE`) or
/// the flat/Gouraud shading color (when not). `tc` is the unwindowed texture
/// coordinate; ignored when `!TEXTURE`.
#[allow(clippy::too_many_arguments)]
pub fn shade_pixel<
    const TEXTURE: bool,
    const RAW_TEXTURE: bool,
    const TRANSPARENT: bool,
    const DITHER: bool,
>(
    vram: &mut VramSurface,
    ctx: &RasterContext,
    page: TexturePage,
    window: TextureWindow,
    palette: PaletteLocation,
    transparency_mode: SemiTransparencyMode,
    mask: MaskParams,
    x: i32,
    y: i32,
    modulation: Color,
    tc: (u8, u8),
) {
    if ctx.interlace.skips_row(y) || !ctx.drawing_area.contains(x, y) {
        return;
    }

    let (row, col) = dither_coords(DITHER, x, y);

    let fg: u16 = if TEXTURE {
        let (tcx, tcy) = window.apply(tc.0, tc.1);
        let Some(texel) = sample_texel(vram, page, palette, tcx, tcy) else {
            return;
        };
        if RAW_TEXTURE {
            texel.raw()
        } else {
            let r = modulated_channel(ctx.dither_lut, row, col, texel.r(), modulation.r);
            let g = modulated_channel(ctx.dither_lut, row, col, texel.g(), modulation.g);
            let b = modulated_channel(ctx.dither_lut, row, col, texel.b(), modulation.b);
            VramPixel::new(r, g, b, texel.mask()).raw()
        }
    } else {
        let r = shaded_channel(ctx.dither_lut, row, col, modulation.r);
        let g = shaded_channel(ctx.dither_lut, row, col, modulation.g);
        let b = shaded_channel(ctx.dither_lut, row, col, modulation.b);
        VramPixel::new(r, g, b, TRANSPARENT).raw()
    };

    let bg = vram.get(x, y).raw();

    let mut color =
        if TRANSPARENT && (fg & 0x8000 != 0 || !TEXTURE) { transparency_mode.blend(fg, bg) } else { fg };

    if !TEXTURE {
        color &= !0x8000;
    }

    if bg & mask.and != 0 {
        log::trace!("mask test suppressed write at ({x}, {y})");
        return;
    }

    vram.set(x, y, VramPixel::from(color | mask.or));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DrawingArea, InterlaceParams};
    use crate::dither;

    fn ctx(lut: &DitherLut) -> RasterContext<'_> {
        RasterContext {
            drawing_area: DrawingArea { left: 0, top: 0, right: 1023, bottom: 511 },
            interlace: InterlaceParams::default(),
            dither_lut: lut,
        }
    }

    fn flat_page() -> (TexturePage, TextureWindow, PaletteLocation) {
        (
            TexturePage { base_x: 0, base_y: 0, color_depth: TextureColorDepth::Direct15Bit },
            TextureWindow::default(),
            PaletteLocation::default(),
        )
    }

    #[test]
    fn opaque_flat_pixel_writes_expected_word() {
        let lut = dither::shared();
        let c = ctx(lut);
        let mut vram = VramSurface::new();
        let (page, win, pal) = flat_page();
        shade_pixel::<false, false, false, false>(
            &mut vram,
            &c,
            page,
            win,
            pal,
            SemiTransparencyMode::HalfHalf,
            MaskParams::default(),
            10,
            20,
            Color { r: 255, g: 0, b: 0 },
            (0, 0),
        );
        assert_eq!(vram.get(10, 20).raw(), 0x001F);
    }

    #[test]
    fn mask_test_blocks_write() {
        let lut = dither::shared();
        let c = ctx(lut);
        let mut vram = VramSurface::new();
        vram.set(5, 5, VramPixel::from(0x8000));
        let (page, win, pal) = flat_page();
        shade_pixel::<false, false, false, false>(
            &mut vram,
            &c,
            page,
            win,
            pal,
            SemiTransparencyMode::HalfHalf,
            MaskParams { and: 0x8000, or: 0 },
            5,
            5,
            Color { r: 255, g: 255, b: 255 },
            (0, 0),
        );
        assert_eq!(vram.get(5, 5).raw(), 0x8000);
    }

    #[test]
    fn texel_zero_is_discarded() {
        let lut = dither::shared();
        let c = ctx(lut);
        let mut vram = VramSurface::new();
        // Palette: entry 0 = 0x0000 (transparent), entry 1 = 0x7FFF.
        vram.set(0, 500, VramPixel::from(0x0000));
        vram.set(1, 500, VramPixel::from(0x7FFF));
        let page = TexturePage { base_x: 0, base_y: 0, color_depth: TextureColorDepth::Palette4Bit };
        let palette = PaletteLocation { base_x: 0, base_y: 500 };
        let before = vram.get(100, 100);
        shade_pixel::<true, true, false, false>(
            &mut vram,
            &c,
            page,
            TextureWindow::default(),
            palette,
            SemiTransparencyMode::HalfHalf,
            MaskParams::default(),
            100,
            100,
            Color::default(),
            (0, 0),
        );
        assert_eq!(vram.get(100, 100), before);
    }

    #[test]
    fn half_half_blend_worked_example() {
        let lut = dither::shared();
        let c = ctx(lut);
        let mut vram = VramSurface::new();
        vram.set(50, 50, VramPixel::from(0x7FFF));
        let (page, win, pal) = flat_page();
        shade_pixel::<false, false, true, false>(
            &mut vram,
            &c,
            page,
            win,
            pal,
            SemiTransparencyMode::HalfHalf,
            MaskParams::default(),
            50,
            50,
            Color { r: 255, g: 255, b: 255 },
            (0, 0),
        );
        assert_eq!(vram.get(50, 50).raw(), 0x7FFF);
    }

    #[test]
    fn interlace_skips_wrong_parity_row() {
        let lut = dither::shared();
        let mut c = ctx(lut);
        c.interlace = InterlaceParams { enabled: true, active_line_lsb: 0 };
        let mut vram = VramSurface::new();
        let (page, win, pal) = flat_page();
        shade_pixel::<false, false, false, false>(
            &mut vram,
            &c,
            page,
            win,
            pal,
            SemiTransparencyMode::HalfHalf,
            MaskParams::default(),
            0,
            1,
            Color { r: 255, g: 255, b: 255 },
            (0, 0),
        );
        assert_eq!(vram.get(0, 1).raw(), 0);
    }

    #[test]
    fn raw_texture_bypasses_modulation_and_dither() {
        let lut = dither::shared();
        let c = ctx(lut);
        let mut vram = VramSurface::new();
        vram.set(0, 0, VramPixel::from(0x1234));
        let (page, win, pal) = flat_page();
        shade_pixel::<true, true, false, false>(
            &mut vram,
            &c,
            page,
            win,
            pal,
            SemiTransparencyMode::HalfHalf,
            MaskParams::default(),
            10,
            10,
            Color { r: 1, g: 2, b: 3 },
            (0, 0),
        );
        assert_eq!(vram.get(10, 10).raw(), 0x1234);
    }
}
