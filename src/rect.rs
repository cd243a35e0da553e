//! Rectangle (sprite) rasterizer: two nested scans over the footprint,
//! calling into the shared pixel shader. Sprites never dither and never
//! shade (flat color only).

use crate::command::{RasterContext, SpriteCommand};
use crate::shader::shade_pixel;
use crate::vram::VramSurface;

pub fn draw_rectangle(vram: &mut VramSurface, ctx: &RasterContext, cmd: &SpriteCommand) {
    if cmd.width <= 0 || cmd.height <= 0 {
        return;
    }

    log::trace!(
        "rectangle at ({}, {}) {}x{}, texture={}",
        cmd.x,
        cmd.y,
        cmd.width,
        cmd.height,
        cmd.flags.texture
    );

    let shader = crate::dispatch::rectangle_fn(cmd.flags);

    for offset_y in 0..cmd.height {
        let y = cmd.y + offset_y;
        if y < ctx.drawing_area.top || y > ctx.drawing_area.bottom {
            continue;
        }
        if ctx.interlace.skips_row(y) {
            continue;
        }
        let tcy = (cmd.texcoord.1.wrapping_add(offset_y as u8)) & 0xFF;
        for offset_x in 0..cmd.width {
            let x = cmd.x + offset_x;
            if x < ctx.drawing_area.left || x > ctx.drawing_area.right {
                continue;
            }
            let tcx = (cmd.texcoord.0.wrapping_add(offset_x as u8)) & 0xFF;
            shader(
                vram,
                ctx,
                cmd.texture_page,
                cmd.window,
                cmd.palette,
                cmd.transparency_mode,
                cmd.mask,
                x,
                y,
                cmd.color,
                (tcx, tcy),
            );
        }
    }
}
