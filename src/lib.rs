//! Pixel-exact fixed-point software rasterizer core for a PS1 GPU emulator.
//!
//! This crate draws sprites, triangles, and lines into a simulated 1 MiB
//! VRAM buffer, reproducing the original console's 15-bit color, ordered
//! dithering, semi-transparency blending, texture windowing, palette
//! indirection, mask-bit handling, and interlaced-field skipping. It accepts
//! already-decoded draw commands from an upstream GPU command processor
//! (not part of this crate) and owns no state of its own between calls.
//!
//! The crate is single-threaded and synchronous: one call draws one
//! primitive to completion. [`vram::VramSurface`] is a plain boxed array and
//! is `Send + Sync`, so an embedder wanting to parallelize across disjoint
//! VRAM row strips can do so above this layer; this crate does not provide
//! that partitioning itself.
//!
//! Malformed or out-of-range primitives (oversized edges, collinear
//! triangles, zero-size sprites, out-of-area pixels, zero texels, masked
//! pixels) are silently dropped to match the reference hardware's behavior;
//! the only fallible operation in the public API is constructing a
//! [`vram::VramSurface`] from an externally-owned buffer of the wrong size.

pub mod command;
pub mod dispatch;
pub mod dither;
pub mod error;
mod line;
mod num;
mod rect;
mod shader;
mod triangle;
pub mod vram;

pub use command::{
    Color, DrawingArea, InterlaceParams, LineCommand, LineFlags, LineVertex, MaskParams,
    PaletteLocation, PolygonCommand, PolygonFlags, PolygonVertices, RasterContext,
    SemiTransparencyMode, SpriteCommand, SpriteFlags, TextureColorDepth, TexturePage,
    TextureWindow, Vertex,
};
pub use error::RasterizerError;
pub use vram::{VramPixel, VramSurface};

/// Draws a rectangle (sprite) primitive.
pub fn draw_rectangle(vram: &mut VramSurface, ctx: &RasterContext, cmd: &SpriteCommand) {
    rect::draw_rectangle(vram, ctx, cmd);
}

/// Draws one line segment.
pub fn draw_line_segment(
    vram: &mut VramSurface,
    ctx: &RasterContext,
    cmd: &LineCommand,
    p0: LineVertex,
    p1: LineVertex,
) {
    let f = dispatch::line_segment_fn(cmd.flags);
    f(vram, ctx, cmd, p0, p1);
}

/// Draws a polyline as a sequence of segments between consecutive vertices.
pub fn draw_line(vram: &mut VramSurface, ctx: &RasterContext, cmd: &LineCommand, vertices: &[LineVertex]) {
    let f = dispatch::line_fn(cmd.flags);
    f(vram, ctx, cmd, vertices);
}

/// Draws a 3- or 4-vertex polygon. A 4-vertex polygon is rasterized as two
/// triangles, `(v0, v1, v2)` and `(v1, v2, v3)`.
pub fn draw_polygon(vram: &mut VramSurface, ctx: &RasterContext, cmd: &PolygonCommand) {
    let f = dispatch::triangle_fn(cmd.flags);
    match cmd.vertices {
        PolygonVertices::Triangle(v) => f(vram, ctx, cmd, v),
        PolygonVertices::Quad(v) => {
            for tri in triangle::quad_to_triangles(v) {
                f(vram, ctx, cmd, tri);
            }
        }
    }
}
