/// Build-time constants for one target variant.
///
/// The two shipping profiles differ in tile color depth, which changes the
/// tile block size and therefore how many bits of a copy instruction go to
/// the asset offset versus the asset bank. Window geometry is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,

    /// log2 of the tile block size in bytes; also the shift that turns the
    /// packed asset offset of a copy instruction back into a byte offset.
    pub asset_offset_shift: u32,

    /// Columns of the visible window. Packed positions count in these.
    pub visible_cols: u16,

    /// log2 of the tile map's row stride in cells.
    pub row_shift: u32,

    /// Last visible column; the cursor hops from here to the next row.
    pub boundary_col: u16,

    /// Cells skipped at the row boundary. 23 + 9 lands on column 0 of the
    /// next 32-cell row; do not touch without re-checking the display
    /// window registers.
    pub boundary_skip: u16,
}

impl Profile {
    pub const fn tile_block_bytes(&self) -> u16 {
        1 << self.asset_offset_shift
    }

    pub const fn row_stride(&self) -> u16 {
        1 << self.row_shift
    }

    /// Map a packed position (row-major over the visible window) onto the
    /// tile map's wider rows.
    pub fn grid_index(&self, packed: u16) -> u16 {
        ((packed / self.visible_cols) << self.row_shift) | (packed % self.visible_cols)
    }

    /// Step the cursor one cell to the right, hopping the cropped columns
    /// at the end of each visible row.
    pub fn advance(&self, cursor: u16) -> u16 {
        if (cursor & (self.row_stride() - 1)) == self.boundary_col {
            cursor + self.boundary_skip
        } else {
            cursor + 1
        }
    }
}

/// 2bpp grayscale build: 16-byte tile blocks.
pub static PROFILE_2BPP: Profile = Profile {
    name: "2bpp",
    asset_offset_shift: 4,
    visible_cols: 24,
    row_shift: 5,
    boundary_col: 23,
    boundary_skip: 9,
};

/// 4bpp color build: 32-byte tile blocks, one fewer offset bit left for
/// the bank field.
pub static PROFILE_4BPP: Profile = Profile {
    name: "4bpp",
    asset_offset_shift: 5,
    visible_cols: 24,
    row_shift: 5,
    boundary_col: 23,
    boundary_skip: 9,
};
