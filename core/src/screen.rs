//! The two tile grids and the flip between them.

use bytemuck::{Pod, Zeroable};
use core::fmt::{Debug, Formatter};

use crate::codec::TileData;

/// Cells in one tile grid: the 24x18 visible window lives inside 32-cell
/// map rows, so 17 full rows plus the 24 visible cells of the last one.
pub const GRID_CELLS: usize = 32 * 17 + 24;

/// A fixed-size grid of tile cells in display format.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(transparent)]
pub struct TileGrid(pub [u16; GRID_CELLS]);

impl TileGrid {
    pub fn get(&self, index: u16) -> TileData {
        TileData(self.0[index as usize])
    }

    pub fn set(&mut self, index: u16, tile: TileData) {
        self.0[index as usize] = tile.0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Debug for TileGrid {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        let occupied = self.0.iter().filter(|cell| **cell != 0).count();
        write!(f, "TileGrid({occupied}/{GRID_CELLS} cells set)")
    }
}

/// Exactly two grids exist for the whole run: the displayed one and the
/// one being built. Roles swap only at a flip, so the decoder never
/// touches what the display is reading.
#[derive(Debug)]
pub struct Screens {
    grids: [TileGrid; 2],
    front: usize,
}

impl Screens {
    pub fn new() -> Self {
        Self {
            grids: [TileGrid::zeroed(); 2],
            front: 0,
        }
    }

    /// The displayed grid.
    pub fn front(&self) -> &TileGrid {
        &self.grids[self.front]
    }

    /// The grid being built for the next frame. Decoder-only.
    pub fn back_mut(&mut self) -> &mut TileGrid {
        &mut self.grids[self.front ^ 1]
    }

    /// Swap roles; the just-built grid becomes the displayed one.
    pub fn flip(&mut self) {
        self.front ^= 1;
    }

    /// Carry the displayed frame into the build grid, so cells the next
    /// frame leaves untouched keep their content.
    pub fn begin_frame(&mut self) {
        self.grids[self.front ^ 1] = self.grids[self.front];
    }
}

impl Default for Screens {
    fn default() -> Self {
        Self::new()
    }
}
