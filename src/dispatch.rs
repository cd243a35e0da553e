//! Function-table dispatch: maps a command's runtime boolean flags to a
//! monomorphized rasterizer/shader function, built once and reused. No
//! per-pixel branching on these flags happens anywhere downstream of this
//! module.

use crate::command::{
    Color, LineCommand, LineFlags, LineVertex, PaletteLocation, PolygonCommand, PolygonFlags,
    RasterContext, SemiTransparencyMode, SpriteFlags, TexturePage, TextureWindow, Vertex,
};
use crate::line::{draw_line, draw_line_segment};
use crate::shader::shade_pixel;
use crate::triangle::draw_triangle;
use crate::vram::VramSurface;

pub type ShaderFn = fn(
    &mut VramSurface,
    &RasterContext,
    TexturePage,
    TextureWindow,
    PaletteLocation,
    SemiTransparencyMode,
    crate::command::MaskParams,
    i32,
    i32,
    Color,
    (u8, u8),
);

/// `Rectangle[texture][raw_texture][transparent]`: 8 nominal entries,
/// collapsed to 4 distinct functions since `raw_texture` is meaningless when
/// `texture` is false. Sprites never dither, so `DITHER` is always `false`.
#[must_use]
pub fn rectangle_fn(flags: SpriteFlags) -> ShaderFn {
    let raw_texture = flags.raw_texture && flags.texture;
    match (flags.texture, raw_texture, flags.transparent) {
        (false, _, false) => shade_pixel::<false, false, false, false>,
        (false, _, true) => shade_pixel::<false, false, true, false>,
        (true, false, false) => shade_pixel::<true, false, false, false>,
        (true, false, true) => shade_pixel::<true, false, true, false>,
        (true, true, false) => shade_pixel::<true, true, false, false>,
        (true, true, true) => shade_pixel::<true, true, true, false>,
    }
}

pub type LineSegmentFn =
    fn(&mut VramSurface, &RasterContext, &LineCommand, LineVertex, LineVertex);
pub type LineFn = fn(&mut VramSurface, &RasterContext, &LineCommand, &[LineVertex]);

/// `Line[shading][transparent][dithering]`: 8 entries, no collapsing (lines
/// never texture, so there's nothing to force off).
#[must_use]
pub fn line_segment_fn(flags: LineFlags) -> LineSegmentFn {
    match (flags.shading, flags.transparent, flags.dithering) {
        (false, false, false) => draw_line_segment::<false, false, false>,
        (false, false, true) => draw_line_segment::<false, false, true>,
        (false, true, false) => draw_line_segment::<false, true, false>,
        (false, true, true) => draw_line_segment::<false, true, true>,
        (true, false, false) => draw_line_segment::<true, false, false>,
        (true, false, true) => draw_line_segment::<true, false, true>,
        (true, true, false) => draw_line_segment::<true, true, false>,
        (true, true, true) => draw_line_segment::<true, true, true>,
    }
}

#[must_use]
pub fn line_fn(flags: LineFlags) -> LineFn {
    match (flags.shading, flags.transparent, flags.dithering) {
        (false, false, false) => draw_line::<false, false, false>,
        (false, false, true) => draw_line::<false, false, true>,
        (false, true, false) => draw_line::<false, true, false>,
        (false, true, true) => draw_line::<false, true, true>,
        (true, false, false) => draw_line::<true, false, false>,
        (true, false, true) => draw_line::<true, false, true>,
        (true, true, false) => draw_line::<true, true, false>,
        (true, true, true) => draw_line::<true, true, true>,
    }
}

pub type TriangleFn = fn(&mut VramSurface, &RasterContext, &PolygonCommand, [Vertex; 3]);

/// `Triangle[shading][texture][raw_texture][transparent][dithering]`: 32
/// nominal entries. `raw_texture` is forced off (and therefore so is
/// `dithering`, transitively) when `texture` is false; `dithering` is also
/// forced off whenever `raw_texture` is set, since a raw-sampled texel skips
/// the dither LUT entirely. 16 distinct functions remain after collapsing.
#[must_use]
pub fn triangle_fn(flags: PolygonFlags) -> TriangleFn {
    let texture = flags.texture;
    let raw_texture = flags.raw_texture && texture;
    let dithering = flags.dithering && texture && !raw_texture;
    match (flags.shading, texture, raw_texture, flags.transparent, dithering) {
        (false, false, false, false, false) => draw_triangle::<false, false, false, false, false>,
        (false, false, false, true, false) => draw_triangle::<false, false, false, true, false>,
        (true, false, false, false, false) => draw_triangle::<true, false, false, false, false>,
        (true, false, false, true, false) => draw_triangle::<true, false, false, true, false>,
        (false, true, false, false, false) => draw_triangle::<false, true, false, false, false>,
        (false, true, false, false, true) => draw_triangle::<false, true, false, false, true>,
        (false, true, false, true, false) => draw_triangle::<false, true, false, true, false>,
        (false, true, false, true, true) => draw_triangle::<false, true, false, true, true>,
        (true, true, false, false, false) => draw_triangle::<true, true, false, false, false>,
        (true, true, false, false, true) => draw_triangle::<true, true, false, false, true>,
        (true, true, false, true, false) => draw_triangle::<true, true, false, true, false>,
        (true, true, false, true, true) => draw_triangle::<true, true, false, true, true>,
        (false, true, true, false, false) => draw_triangle::<false, true, true, false, false>,
        (false, true, true, true, false) => draw_triangle::<false, true, true, true, false>,
        (true, true, true, false, false) => draw_triangle::<true, true, true, false, false>,
        (true, true, true, true, false) => draw_triangle::<true, true, true, true, false>,
        // `texture=false` forces `raw_texture`/`dithering` false above, and
        // `raw_texture=true` forces `dithering` false, so every reachable
        // combination is one of the sixteen arms above.
        _ => unreachable!("flags normalized before dispatch"),
    }
}
