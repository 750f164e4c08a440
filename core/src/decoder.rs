//! The command stream interpreter.

use log::debug;

use crate::codec::{self, Opcode};
use crate::platform::{BankedStorage, DisplayControl, Platform, StreamId};
use crate::profile::Profile;
use crate::screen::TileGrid;

/// Outcome of decoding one frame's worth of commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameResult {
    /// End-of-frame reached; hold the flipped frame for `hold` ticks.
    MoreFrames { hold: u16 },
    /// End-of-stream reached; no further tile updates will occur.
    StreamDone,
}

/// All decoder registers in one place: the command stream's bank context
/// and the write cursor into the build grid.
#[derive(Debug)]
pub struct Decoder {
    profile: &'static Profile,
    command_bank: u8,
    command_pos: u16,
    asset_base_bank: u8,
    cursor: u16,
}

impl Decoder {
    pub fn new(profile: &'static Profile, command_bank: u8, asset_base_bank: u8) -> Self {
        Self {
            profile,
            command_bank,
            command_pos: 0,
            asset_base_bank,
            cursor: 0,
        }
    }

    /// Run commands into `back` until an end-of-frame or end-of-stream
    /// opcode. `control` picks up border requests; the player applies it
    /// at the next flip.
    ///
    /// The stream is authored offline by a trusted packer; nothing here
    /// validates it.
    pub fn decode_frame<P: Platform>(
        &mut self,
        platform: &mut P,
        back: &mut TileGrid,
        control: &mut DisplayControl,
    ) -> FrameResult {
        platform.select_bank(StreamId::Commands, self.command_bank);
        self.cursor = 0;

        loop {
            let op = self.next_byte(platform);
            match Opcode::classify(op) {
                Opcode::Copy => {
                    let operands = [
                        self.next_byte(platform),
                        self.next_byte(platform),
                        self.next_byte(platform),
                        self.next_byte(platform),
                    ];
                    let copy = codec::decode_copy(self.profile, op, operands);
                    self.fetch_tile(
                        platform,
                        copy.asset_bank,
                        copy.asset_offset,
                        copy.tile.tile_index(),
                    );
                    self.cursor = self.profile.grid_index(copy.position);
                    back.set(self.cursor, copy.tile);
                    self.cursor = self.profile.advance(self.cursor);
                }
                Opcode::Place => {
                    let operands = [self.next_byte(platform), self.next_byte(platform)];
                    let place = codec::decode_place(op, operands);
                    self.cursor = self.profile.grid_index(place.position);
                    back.set(self.cursor, place.tile);
                    self.cursor = self.profile.advance(self.cursor);
                }
                Opcode::Inline => {
                    let tile = codec::decode_inline(op, self.next_byte(platform));
                    back.set(self.cursor, tile);
                    self.cursor = self.profile.advance(self.cursor);
                }
                Opcode::SwitchBank => {
                    self.command_bank = self.command_bank.wrapping_add(1);
                    self.command_pos = 0;
                    platform.select_bank(StreamId::Commands, self.command_bank);
                    debug!("command stream moved to bank {}", self.command_bank);
                }
                Opcode::BorderWhite => {
                    *control = DisplayControl::with_border(DisplayControl::BORDER_WHITE);
                }
                Opcode::BorderBlack => {
                    *control = DisplayControl::with_border(DisplayControl::BORDER_BLACK);
                }
                Opcode::EndOfFrame => {
                    return FrameResult::MoreFrames {
                        hold: (op & 0x07) as u16,
                    };
                }
                Opcode::EndOfStream => {
                    platform.enter_display_only();
                    return FrameResult::StreamDone;
                }
                Opcode::Unassigned => {}
            }
        }
    }

    fn next_byte<P: BankedStorage>(&mut self, platform: &mut P) -> u8 {
        let byte = platform.read_byte(StreamId::Commands, self.command_pos);
        self.command_pos = self.command_pos.wrapping_add(1);
        byte
    }

    /// Copy one tile block out of the asset stream into tile memory.
    ///
    /// The storage window is shared between both streams, so the asset
    /// bank is mapped only for the duration of the guard; its `Drop`
    /// re-selects the command bank on every exit path, leaving command
    /// reads exactly where they were.
    fn fetch_tile<P: Platform>(&mut self, platform: &mut P, bank: u8, offset: u16, dest_slot: u16) {
        let mut window = AssetWindow::map(
            platform,
            self.asset_base_bank.wrapping_add(bank),
            self.command_bank,
        );
        window.copy_tile_block(offset, dest_slot);
    }
}

struct AssetWindow<'a, P: Platform> {
    platform: &'a mut P,
    command_bank: u8,
}

impl<'a, P: Platform> AssetWindow<'a, P> {
    fn map(platform: &'a mut P, asset_bank: u8, command_bank: u8) -> Self {
        platform.select_bank(StreamId::Assets, asset_bank);
        Self {
            platform,
            command_bank,
        }
    }

    fn copy_tile_block(&mut self, offset: u16, dest_slot: u16) {
        self.platform.copy_tile_block(offset, dest_slot);
    }
}

impl<P: Platform> Drop for AssetWindow<'_, P> {
    fn drop(&mut self) {
        self.platform
            .select_bank(StreamId::Commands, self.command_bank);
    }
}
