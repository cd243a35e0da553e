//! Line rasterizer: single-pixel-wide DDA in fixed point with optional
//! Gouraud color interpolation. Lines never texture.

use crate::command::{Color, LineCommand, LineVertex, RasterContext};
use crate::num::div_round_away_from_zero;
use crate::shader::shade_pixel;
use crate::vram::VramSurface;

const MAX_PRIMITIVE_WIDTH: i64 = 1024;
const MAX_PRIMITIVE_HEIGHT: i64 = 512;

pub fn draw_line_segment<const SHADING: bool, const TRANSPARENT: bool, const DITHER: bool>(
    vram: &mut VramSurface,
    ctx: &RasterContext,
    cmd: &LineCommand,
    p0: LineVertex,
    p1: LineVertex,
) {
    let dx = (p1.x - p0.x).unsigned_abs() as i64;
    let dy = (p1.y - p0.y).unsigned_abs() as i64;
    let k = dx.max(dy);

    if dx >= MAX_PRIMITIVE_WIDTH || dy >= MAX_PRIMITIVE_HEIGHT {
        log::trace!("line segment rejected: dx={dx} dy={dy} exceeds primitive limits");
        return;
    }

    let (p0, p1) = if p0.x >= p1.x && k > 0 { (p1, p0) } else { (p0, p1) };

    let (step_x, step_y, step_r, step_g, step_b) = if k == 0 {
        (0, 0, 0, 0, 0)
    } else {
        (
            div_round_away_from_zero((i64::from(p1.x) - i64::from(p0.x)) << 32, k),
            div_round_away_from_zero((i64::from(p1.y) - i64::from(p0.y)) << 32, k),
            div_round_away_from_zero((i64::from(p1.color.r) - i64::from(p0.color.r)) << 12, k),
            div_round_away_from_zero((i64::from(p1.color.g) - i64::from(p0.color.g)) << 12, k),
            div_round_away_from_zero((i64::from(p1.color.b) - i64::from(p0.color.b)) << 12, k),
        )
    };

    let mut fx = (i64::from(p0.x) << 32) + (1i64 << 31) - 1024;
    let mut fy = (i64::from(p0.y) << 32) + (1i64 << 31) - if step_y < 0 { 1024 } else { 0 };
    let mut fr = i64::from(p0.color.r) << 12;
    let mut fg = i64::from(p0.color.g) << 12;
    let mut fb = i64::from(p0.color.b) << 12;

    for _ in 0..=k {
        let x = ((fx >> 32) & 2047) as i32;
        let y = ((fy >> 32) & 2047) as i32;

        let color = if SHADING {
            Color { r: (fr >> 12) as u8, g: (fg >> 12) as u8, b: (fb >> 12) as u8 }
        } else {
            p0.color
        };

        shade_pixel::<false, false, TRANSPARENT, DITHER>(
            vram,
            ctx,
            crate::command::TexturePage {
                base_x: 0,
                base_y: 0,
                color_depth: crate::command::TextureColorDepth::Direct15Bit,
            },
            crate::command::TextureWindow::default(),
            crate::command::PaletteLocation::default(),
            cmd.transparency_mode,
            cmd.mask,
            x,
            y,
            color,
            (0, 0),
        );

        fx += step_x;
        fy += step_y;
        fr += step_r;
        fg += step_g;
        fb += step_b;
    }
}

/// Draws a polyline as a sequence of segments, one `draw_line_segment` call
/// per consecutive vertex pair.
pub fn draw_line<const SHADING: bool, const TRANSPARENT: bool, const DITHER: bool>(
    vram: &mut VramSurface,
    ctx: &RasterContext,
    cmd: &LineCommand,
    vertices: &[LineVertex],
) {
    for pair in vertices.windows(2) {
        draw_line_segment::<SHADING, TRANSPARENT, DITHER>(vram, ctx, cmd, pair[0], pair[1]);
    }
}
