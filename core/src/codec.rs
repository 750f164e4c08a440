//! Bit-field reconstruction of the command stream's packed operands.
//!
//! Each opcode class carries its operands in a fixed bit layout; the
//! functions here are the binary contract with the offline packer and are
//! pure so they can be pinned by golden vectors. The packer authors a
//! 12-bit tile word (index 8:0, palette 9, h-flip 10, v-flip 11) and the
//! instruction encodings relocate the two flip bits to 14:15, where the
//! display hardware expects them.

use bit_field::BitField;
use bitfield::bitfield;

use crate::profile::Profile;

bitfield! {
    /// One frame-buffer cell in display format.
    #[derive(Copy, Clone, PartialEq, Eq)]
    pub struct TileData(u16);
    impl Debug;
    pub u16, tile_index, set_tile_index: 8, 0;
    pub palette, set_palette: 9;
    pub hflip, set_hflip: 14;
    pub vflip, set_vflip: 15;
}

/// Opcode classes, by byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// 0x00..=0x7F: fetch a tile block from the asset stream, then place.
    Copy,
    /// 0x80..=0xDF: place a tile word at an absolute position.
    Place,
    /// 0xE0..=0xEF: place a tile word at the current cursor.
    Inline,
    /// 0xF0: stop consuming commands for good.
    EndOfStream,
    /// 0xF1: advance to the next command bank, offset 0.
    SwitchBank,
    /// 0xF6: request a white border at the next flip.
    BorderWhite,
    /// 0xF7: request a black border at the next flip.
    BorderBlack,
    /// 0xF8..=0xFF: end the frame, holding it for `op & 7` ticks.
    EndOfFrame,
    /// 0xF2..=0xF5: never authored; skipped like the original fall-through.
    Unassigned,
}

impl Opcode {
    pub fn classify(byte: u8) -> Opcode {
        match byte {
            0x00..=0x7F => Opcode::Copy,
            0x80..=0xDF => Opcode::Place,
            0xE0..=0xEF => Opcode::Inline,
            0xF0 => Opcode::EndOfStream,
            0xF1 => Opcode::SwitchBank,
            0xF6 => Opcode::BorderWhite,
            0xF7 => Opcode::BorderBlack,
            0xF8..=0xFF => Opcode::EndOfFrame,
            _ => Opcode::Unassigned,
        }
    }
}

/// Decoded operands of a copy instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOp {
    pub asset_bank: u8,
    pub asset_offset: u16,
    pub tile: TileData,
    /// Packed absolute position; see [`Profile::grid_index`].
    pub position: u16,
}

/// Decoded operands of a place instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOp {
    pub tile: TileData,
    pub position: u16,
}

/// Copy instructions address the asset stream by an 18-bit global tile
/// number split across `b3..b5`; the profile's offset shift decides how
/// many of its low bits stay in the 16-bit in-bank offset and how many
/// spill into the bank field.
pub fn decode_copy(profile: &Profile, op: u8, w: [u8; 4]) -> CopyOp {
    let [b2, b3, b4, b5] = w;
    let s = profile.asset_offset_shift as usize;

    let asset_bank = b4.get_bits((8 - s)..8) | (b3.get_bits(0..2) << s);
    let asset_offset = ((b5 as u16) << s) | ((b4 as u16) << (8 + s));

    let tile = TileData(
        (b3.get_bits(2..8) as u16)
            | ((b2.get_bits(0..4) as u16) << 6)
            | ((b2.get_bits(4..6) as u16) << 14),
    );
    let position = ((op as u16) << 2) | (b2.get_bits(6..8) as u16);

    CopyOp {
        asset_bank,
        asset_offset,
        tile,
        position,
    }
}

pub fn decode_place(op: u8, w: [u8; 2]) -> PlaceOp {
    let [b2, b3] = w;

    let tile = TileData(
        (b3 as u16) | ((b2.get_bits(0..2) as u16) << 8) | ((b2.get_bits(2..4) as u16) << 14),
    );
    let position = (b2.get_bits(4..8) as u16) | ((op.get_bits(0..5) as u16) << 4);

    PlaceOp { tile, position }
}

pub fn decode_inline(op: u8, b2: u8) -> TileData {
    TileData((b2 as u16) | ((op.get_bits(0..2) as u16) << 8) | ((op.get_bits(2..4) as u16) << 14))
}
