//! Rasterizes a presented tile grid into a grayscale image.

use image::GrayImage;

use tvp_core::platform::DisplayControl;
use tvp_core::profile::Profile;
use tvp_core::screen::TileGrid;

const TILE_PX: u32 = 8;
const BORDER_PX: u32 = 8;
const VISIBLE_COLS: u32 = 24;
const VISIBLE_ROWS: u32 = 18;

/// The two screen palettes the player programs at bring-up: palette 1 is
/// palette 0 inverted, selected per cell by the tile word's palette bit.
/// Entries are 3-bit gray levels, 0 lightest.
const PALETTES: [[u8; 4]; 2] = [[0, 2, 5, 7], [7, 5, 2, 0]];

fn level_to_luma(level: u8) -> u8 {
    255 - (level as u32 * 255 / 7) as u8
}

/// Draw the 24x18 window with an 8-pixel frame in the border shade.
pub fn render_frame(
    profile: &Profile,
    grid: &TileGrid,
    tile_memory: &[u8],
    control: DisplayControl,
) -> GrayImage {
    let width = VISIBLE_COLS * TILE_PX + 2 * BORDER_PX;
    let height = VISIBLE_ROWS * TILE_PX + 2 * BORDER_PX;
    let border = level_to_luma(control.border());
    let mut img = GrayImage::from_pixel(width, height, image::Luma([border]));

    let block = profile.tile_block_bytes() as usize;
    for ty in 0..VISIBLE_ROWS {
        for tx in 0..VISIBLE_COLS {
            let cell = grid.get(((ty << profile.row_shift) | tx) as u16);
            let tile = &tile_memory[cell.tile_index() as usize * block..][..block];
            let palette = &PALETTES[cell.palette() as usize];

            for y in 0..TILE_PX {
                for x in 0..TILE_PX {
                    let sx = if cell.hflip() { 7 - x } else { x };
                    let sy = if cell.vflip() { 7 - y } else { y };
                    let luma = match profile.asset_offset_shift {
                        // 2bpp: two planes per row, value indexes a palette
                        4 => {
                            let p0 = tile[sy as usize * 2];
                            let p1 = tile[sy as usize * 2 + 1];
                            let bit = 7 - sx;
                            let v = ((p0 >> bit) & 1) | (((p1 >> bit) & 1) << 1);
                            level_to_luma(palette[v as usize])
                        }
                        // 4bpp: four planes per row; the color build's
                        // palette RAM is out of scope, so map the value
                        // straight onto 16 gray levels
                        _ => {
                            let bit = 7 - sx;
                            let mut v = 0u8;
                            for plane in 0..4 {
                                v |= ((tile[sy as usize * 4 + plane] >> bit) & 1) << plane;
                            }
                            255 - v * 17
                        }
                    };
                    img.put_pixel(
                        BORDER_PX + tx * TILE_PX + x,
                        BORDER_PX + ty * TILE_PX + y,
                        image::Luma([luma]),
                    );
                }
            }
        }
    }

    img
}
