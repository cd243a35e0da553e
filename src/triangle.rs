//! Triangle rasterizer: fixed-point edge-walking with a gradient-matrix
//! attribute interpolator, the most intricate module in the crate.
//!
//! Implementation departs from a literal row-to-row incremental accumulator
//! in one respect: every row's attribute values and x-bounds are evaluated
//! directly as an affine function of `(x, y)` relative to a fixed origin,
//! rather than carried forward from the previous row. Both give bit-identical
//! per-pixel results (integer addition is associative and no intermediate
//! rounding occurs before the final 24-bit truncation), but evaluating from
//! the origin sidesteps needing a `dec_mode`-style direction flag per half.

use crate::command::{Color, PolygonCommand, RasterContext, Vertex};
use crate::num::div_round_away_from_zero;
use crate::vram::VramSurface;

const MAX_PRIMITIVE_WIDTH: i64 = 1024;
const MAX_PRIMITIVE_HEIGHT: i64 = 512;

fn swap_mask_bits(mask: u8, i: u32, j: u32) -> u8 {
    let bi = (mask >> i) & 1;
    let bj = (mask >> j) & 1;
    let cleared = mask & !(1 << i) & !(1 << j);
    cleared | (bi << j) | (bj << i)
}

/// Sorts `verts` by ascending `y` (ties broken by ascending `x`), permuting a
/// bitmask that starts pointing at whichever vertex has the smallest `x` in
/// lockstep with every swap. Returns the index of that vertex after sorting.
fn sort_with_core_vertex(verts: &mut [Vertex; 3]) -> usize {
    let min_x = verts.iter().map(|v| v.x).min().unwrap();
    let mut mask: u8 = 0;
    for (i, v) in verts.iter().enumerate() {
        if v.x == min_x {
            mask = 1 << i;
            break;
        }
    }

    let mut cmp_swap = |verts: &mut [Vertex; 3], mask: &mut u8, i: usize, j: usize| {
        if (verts[i].y, verts[i].x) > (verts[j].y, verts[j].x) {
            verts.swap(i, j);
            *mask = swap_mask_bits(*mask, i as u32, j as u32);
        }
    };
    cmp_swap(verts, &mut mask, 0, 1);
    cmp_swap(verts, &mut mask, 1, 2);
    cmp_swap(verts, &mut mask, 0, 1);

    mask.trailing_zeros() as usize
}

/// Per-unit-x / per-unit-y deltas for one interpolated attribute, scaled by
/// `<< 12` twice (the "12-bit fraction, 12-bit padding" split called for in
/// the fixed-point design notes), plus the value at `(0, 0)` with a
/// half-unit rounding bias already folded in and re-based to the core
/// vertex's position.
struct Gradient {
    dx: i64,
    dy: i64,
    origin: i64,
}

fn gradient(v0: Vertex, v1: Vertex, v2: Vertex, a0: i64, a1: i64, a2: i64, denom: i64, core: Vertex, core_a: i64) -> Gradient {
    let v01y = i64::from(v2.y) - i64::from(v1.y);
    let v12y = i64::from(v1.y) - i64::from(v0.y);
    let numer_dx = (a1 - a0) * v01y - (a2 - a1) * v12y;
    let numer_dy = (i64::from(v1.x) - i64::from(v0.x)) * (a2 - a1)
        - (i64::from(v2.x) - i64::from(v1.x)) * (a1 - a0);
    let dx = div_round_away_from_zero(numer_dx << 12, denom) << 12;
    let dy = div_round_away_from_zero(numer_dy << 12, denom) << 12;
    let origin = (core_a << 24) + (1 << 23) - (i64::from(core.x) * dx + i64::from(core.y) * dy);
    Gradient { dx, dy, origin }
}

impl Gradient {
    #[inline]
    fn value_at(&self, x: i32, y: i32) -> u8 {
        ((self.origin + i64::from(x) * self.dx + i64::from(y) * self.dy) >> 24) as u8
    }
}

#[allow(clippy::too_many_arguments)]
fn walk_half<const SHADING: bool, const TEXTURE: bool, const RAW_TEXTURE: bool, const TRANSPARENT: bool, const DITHER: bool>(
    vram: &mut VramSurface,
    ctx: &RasterContext,
    cmd: &PolygonCommand,
    core_color: Color,
    grads: &[Gradient; 5],
    y0: i32,
    y1_exclusive: i32,
    base_x0: i64,
    base_y0: i32,
    base_step: i64,
    bound_x0: i64,
    bound_y0: i32,
    bound_step: i64,
    right_facing: bool,
) {
    for y in y0..y1_exclusive {
        if y < ctx.drawing_area.top || y > ctx.drawing_area.bottom || ctx.interlace.skips_row(y) {
            continue;
        }

        let base_x = base_x0 + i64::from(y - base_y0) * base_step;
        let bound_x = bound_x0 + i64::from(y - bound_y0) * bound_step;
        let (left, right) = if right_facing { (base_x, bound_x) } else { (bound_x, base_x) };

        let x_start = ((left >> 32) as i32).max(ctx.drawing_area.left);
        let x_end = ((right >> 32) as i32).min(ctx.drawing_area.right + 1);
        if x_start >= x_end {
            continue;
        }

        for x in x_start..x_end {
            let color = if SHADING {
                Color { r: grads[0].value_at(x, y), g: grads[1].value_at(x, y), b: grads[2].value_at(x, y) }
            } else {
                core_color
            };
            let tc = if TEXTURE { (grads[3].value_at(x, y), grads[4].value_at(x, y)) } else { (0, 0) };

            crate::shader::shade_pixel::<TEXTURE, RAW_TEXTURE, TRANSPARENT, DITHER>(
                vram,
                ctx,
                cmd.texture_page,
                cmd.window,
                cmd.palette,
                cmd.transparency_mode,
                cmd.mask,
                x,
                y,
                color,
                tc,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn draw_triangle<const SHADING: bool, const TEXTURE: bool, const RAW_TEXTURE: bool, const TRANSPARENT: bool, const DITHER: bool>(
    vram: &mut VramSurface,
    ctx: &RasterContext,
    cmd: &PolygonCommand,
    vertices: [Vertex; 3],
) {
    let mut v = vertices;
    let core_idx = sort_with_core_vertex(&mut v);
    let (v0, v1, v2) = (v[0], v[1], v[2]);

    if v0.y == v2.y {
        log::trace!("triangle rejected: zero height after sort");
        return;
    }

    for (a, b) in [(v0, v1), (v1, v2), (v0, v2)] {
        let dx = (b.x - a.x).unsigned_abs() as i64;
        let dy = (b.y - a.y).unsigned_abs() as i64;
        if dx >= MAX_PRIMITIVE_WIDTH || dy >= MAX_PRIMITIVE_HEIGHT {
            log::trace!("triangle rejected: oversized edge dx={dx} dy={dy}");
            return;
        }
    }

    let base_step =
        div_round_away_from_zero((i64::from(v2.x) - i64::from(v0.x)) << 32, i64::from(v2.y - v0.y));
    // A flat top edge has no finite slope. After the x-tiebreak sort
    // v0.x <= v1.x, so it behaves as +infinity rather than 0: treat that
    // half as right-facing outright instead of comparing against a zeroed
    // slope.
    let flat_top = v1.y == v0.y;
    let bound_us = if flat_top {
        0
    } else {
        div_round_away_from_zero((i64::from(v1.x) - i64::from(v0.x)) << 32, i64::from(v1.y - v0.y))
    };
    let bound_ls = if v2.y == v1.y {
        0
    } else {
        div_round_away_from_zero((i64::from(v2.x) - i64::from(v1.x)) << 32, i64::from(v2.y - v1.y))
    };
    let right_facing = if flat_top { true } else { bound_us > base_step };

    let denom = (i64::from(v1.x) - i64::from(v0.x)) * (i64::from(v2.y) - i64::from(v1.y))
        - (i64::from(v2.x) - i64::from(v1.x)) * (i64::from(v1.y) - i64::from(v0.y));
    if denom == 0 {
        log::trace!("triangle rejected: collinear vertices");
        return;
    }

    let core = v[core_idx];
    let grads = [
        gradient(v0, v1, v2, i64::from(v0.color.r), i64::from(v1.color.r), i64::from(v2.color.r), denom, core, i64::from(core.color.r)),
        gradient(v0, v1, v2, i64::from(v0.color.g), i64::from(v1.color.g), i64::from(v2.color.g), denom, core, i64::from(core.color.g)),
        gradient(v0, v1, v2, i64::from(v0.color.b), i64::from(v1.color.b), i64::from(v2.color.b), denom, core, i64::from(core.color.b)),
        gradient(v0, v1, v2, i64::from(v0.u), i64::from(v1.u), i64::from(v2.u), denom, core, i64::from(core.u)),
        gradient(v0, v1, v2, i64::from(v0.v), i64::from(v1.v), i64::from(v2.v), denom, core, i64::from(core.v)),
    ];

    let v0x0 = i64::from(v0.x) << 32;
    let v1x0 = i64::from(v1.x) << 32;

    walk_half::<SHADING, TEXTURE, RAW_TEXTURE, TRANSPARENT, DITHER>(
        vram, ctx, cmd, v0.color, &grads, v0.y, v1.y, v0x0, v0.y, base_step, v0x0, v0.y, bound_us,
        right_facing,
    );
    walk_half::<SHADING, TEXTURE, RAW_TEXTURE, TRANSPARENT, DITHER>(
        vram, ctx, cmd, v0.color, &grads, v1.y, v2.y + 1, v0x0, v0.y, base_step, v1x0, v1.y, bound_ls,
        right_facing,
    );
}

/// Splits a 4-vertex polygon into two triangles sharing the `v1-v2` edge,
/// matching the real hardware's quad decomposition.
#[must_use]
pub fn quad_to_triangles(v: [Vertex; 4]) -> [[Vertex; 3]; 2] {
    [[v[0], v[1], v[2]], [v[1], v[2], v[3]]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{
        DrawingArea, InterlaceParams, MaskParams, PaletteLocation, PolygonFlags,
        SemiTransparencyMode, TextureColorDepth, TexturePage, TextureWindow,
    };

    fn ctx() -> RasterContext<'static> {
        RasterContext::new(
            DrawingArea { left: 0, top: 0, right: 1023, bottom: 511 },
            InterlaceParams::default(),
        )
    }

    fn cmd() -> PolygonCommand {
        PolygonCommand {
            vertices: crate::command::PolygonVertices::Triangle([Vertex::default(); 3]),
            texture_page: TexturePage { base_x: 0, base_y: 0, color_depth: TextureColorDepth::Direct15Bit },
            window: TextureWindow::default(),
            palette: PaletteLocation::default(),
            transparency_mode: SemiTransparencyMode::HalfHalf,
            mask: MaskParams::default(),
            flags: PolygonFlags { shading: true, texture: false, raw_texture: false, transparent: false, dithering: false },
        }
    }

    #[test]
    fn flat_horizontal_triangle_draws_nothing() {
        let mut vram = VramSurface::new();
        let c = ctx();
        let verts = [
            Vertex { x: 0, y: 0, ..Vertex::default() },
            Vertex { x: 5, y: 0, ..Vertex::default() },
            Vertex { x: 10, y: 0, ..Vertex::default() },
        ];
        draw_triangle::<true, false, false, false, false>(&mut vram, &c, &cmd(), verts);
        assert!(vram.as_slice().iter().all(|&w| w == 0));
    }

    #[test]
    fn oversized_triangle_rejected() {
        let mut vram = VramSurface::new();
        let c = ctx();
        let verts = [
            Vertex { x: 0, y: 0, ..Vertex::default() },
            Vertex { x: 0, y: 0, ..Vertex::default() },
            Vertex { x: 1024, y: 0, ..Vertex::default() },
        ];
        draw_triangle::<true, false, false, false, false>(&mut vram, &c, &cmd(), verts);
        assert!(vram.as_slice().iter().all(|&w| w == 0));
    }

    #[test]
    fn gouraud_triangle_interpolates_red_channel() {
        let mut vram = VramSurface::new();
        let c = ctx();
        let verts = [
            Vertex { x: 0, y: 0, color: Color { r: 255, g: 0, b: 0 }, ..Vertex::default() },
            Vertex { x: 10, y: 0, color: Color { r: 0, g: 0, b: 0 }, ..Vertex::default() },
            Vertex { x: 0, y: 10, color: Color { r: 0, g: 0, b: 0 }, ..Vertex::default() },
        ];
        draw_triangle::<true, false, false, false, false>(&mut vram, &c, &cmd(), verts);
        let near_origin = vram.get(1, 1).raw() & 0x1F;
        let near_edge = vram.get(8, 1).raw() & 0x1F;
        assert!(near_origin > near_edge);
    }

    #[test]
    fn quad_splits_into_two_triangles_sharing_an_edge() {
        let v = [Vertex::default(); 4];
        let tris = quad_to_triangles(v);
        assert_eq!(tris[0][1], tris[1][0]);
        assert_eq!(tris[0][2], tris[1][1]);
    }
}
