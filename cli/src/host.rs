//! Host-side implementation of the playback core's platform traits,
//! backed by in-memory copies of the two streams.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::{debug, error};

use tvp_core::platform::{BankedStorage, Display, DisplayControl, StreamId, TickWait, TileSink};
use tvp_core::profile::Profile;
use tvp_core::screen::TileGrid;
use tvp_core::timing::VblankTicks;

use crate::render;

/// The in-bank offset is 16 bits wide.
pub const BANK_SIZE: usize = 0x1_0000;

/// Tile memory slots addressable by the 9-bit tile index.
pub const TILE_SLOTS: usize = 512;

pub enum Pacing {
    /// A ticker thread raises the counter; idling sleeps a fraction of a
    /// tick (a real halt would wake on the interrupt itself).
    RealTime(Duration),
    /// Idling raises the tick counter directly, so holds resolve
    /// immediately.
    FreeRun,
}

pub struct HostPlatform {
    profile: &'static Profile,
    commands: Vec<u8>,
    tiles: Vec<u8>,
    /// The single physical bank window, like the real accessor's.
    window: (StreamId, u8),
    tile_memory: Vec<u8>,
    pacing: Pacing,
    ticks: &'static VblankTicks,
    dump: Option<PathBuf>,
    frames: u64,
}

impl HostPlatform {
    pub fn new(
        profile: &'static Profile,
        commands: Vec<u8>,
        tiles: Vec<u8>,
        pacing: Pacing,
        ticks: &'static VblankTicks,
        dump: Option<PathBuf>,
    ) -> Self {
        let block = profile.tile_block_bytes() as usize;
        let mut tile_memory = vec![0u8; TILE_SLOTS * block];
        // slot 0 starts out solid, matching the device bring-up
        tile_memory[..block].fill(0xFF);

        Self {
            profile,
            commands,
            tiles,
            window: (StreamId::Commands, 0),
            tile_memory,
            pacing,
            ticks,
            dump,
            frames: 0,
        }
    }
}

impl BankedStorage for HostPlatform {
    fn select_bank(&mut self, stream: StreamId, bank: u8) {
        self.window = (stream, bank);
    }

    fn read_byte(&mut self, stream: StreamId, offset: u16) -> u8 {
        debug_assert_eq!(self.window.0, stream, "read through an unmapped stream");
        let (_, bank) = self.window;
        let blob = match stream {
            StreamId::Commands => &self.commands,
            StreamId::Assets => &self.tiles,
        };
        let index = bank as usize * BANK_SIZE + offset as usize;
        // past the end of the blob reads like unprogrammed flash
        blob.get(index).copied().unwrap_or(0xFF)
    }
}

impl TileSink for HostPlatform {
    fn copy_tile_block(&mut self, source_offset: u16, dest_slot: u16) {
        debug_assert_eq!(self.window.0, StreamId::Assets);
        let (_, bank) = self.window;
        let block = self.profile.tile_block_bytes() as usize;
        let src = bank as usize * BANK_SIZE + source_offset as usize;
        let dest = dest_slot as usize * block;
        self.tile_memory[dest..dest + block].copy_from_slice(&self.tiles[src..src + block]);
    }
}

impl Display for HostPlatform {
    fn present(&mut self, screen: &TileGrid, control: DisplayControl) {
        if let Some(dir) = &self.dump {
            let img = render::render_frame(self.profile, screen, &self.tile_memory, control);
            let path = dir.join(format!("frame_{:05}.png", self.frames));
            if let Err(e) = img.save(&path) {
                error!("writing {}: {e}", path.display());
            }
        }
        self.frames += 1;
    }

    fn enter_display_only(&mut self) {
        debug!("display-only mode armed after {} frames", self.frames);
    }
}

impl TickWait for HostPlatform {
    fn idle(&self) {
        match self.pacing {
            Pacing::RealTime(period) => thread::sleep(period / 8),
            Pacing::FreeRun => self.ticks.raise(),
        }
    }
}
