//! In-memory platform double for exercising the playback core without
//! hardware.

use std::cell::Cell;

use tvp_core::platform::{BankedStorage, Display, DisplayControl, StreamId, TickWait, TileSink};
use tvp_core::screen::TileGrid;
use tvp_core::timing::VblankTicks;

/// Models the real accessor faithfully: one physical bank window shared by
/// both streams. Every read asserts that the window is mapped to the
/// stream the caller believes it is, so a missed bank restoration fails
/// the test instead of silently decoding garbage.
pub struct TestPlatform<'t> {
    commands: Vec<Vec<u8>>,
    assets: Vec<Vec<u8>>,
    window: (StreamId, u8),
    block: usize,

    pub tile_memory: Vec<Vec<u8>>,
    /// Every command byte consumed, as (bank, offset).
    pub command_reads: Vec<(u8, u16)>,
    /// One entry per flip: the presented cells and control word.
    pub presents: Vec<(Vec<u16>, DisplayControl)>,
    pub idles: Cell<u32>,
    pub display_only: bool,

    ticks: &'t VblankTicks,
}

impl<'t> TestPlatform<'t> {
    pub fn new(
        block: usize,
        commands: Vec<Vec<u8>>,
        assets: Vec<Vec<u8>>,
        ticks: &'t VblankTicks,
    ) -> Self {
        Self {
            commands,
            assets,
            window: (StreamId::Commands, 0),
            block,
            tile_memory: vec![vec![0; block]; 512],
            command_reads: Vec::new(),
            presents: Vec::new(),
            idles: Cell::new(0),
            display_only: false,
            ticks,
        }
    }

    pub fn presented_cell(&self, frame: usize, index: u16) -> u16 {
        self.presents[frame].0[index as usize]
    }
}

impl BankedStorage for TestPlatform<'_> {
    fn select_bank(&mut self, stream: StreamId, bank: u8) {
        self.window = (stream, bank);
    }

    fn read_byte(&mut self, stream: StreamId, offset: u16) -> u8 {
        let (mapped, bank) = self.window;
        assert_eq!(
            mapped, stream,
            "bank window desynchronized: read from {stream:?} while {mapped:?} is mapped"
        );
        let blob = match stream {
            StreamId::Commands => {
                self.command_reads.push((bank, offset));
                &self.commands
            }
            StreamId::Assets => &self.assets,
        };
        blob[bank as usize][offset as usize]
    }
}

impl TileSink for TestPlatform<'_> {
    fn copy_tile_block(&mut self, source_offset: u16, dest_slot: u16) {
        let (mapped, bank) = self.window;
        assert_eq!(
            mapped,
            StreamId::Assets,
            "tile fetch without the asset window mapped"
        );
        let start = source_offset as usize;
        let block = self.assets[bank as usize][start..start + self.block].to_vec();
        self.tile_memory[dest_slot as usize] = block;
    }
}

impl Display for TestPlatform<'_> {
    fn present(&mut self, screen: &TileGrid, control: DisplayControl) {
        self.presents.push((screen.0.to_vec(), control));
    }

    fn enter_display_only(&mut self) {
        self.display_only = true;
    }
}

impl TickWait for TestPlatform<'_> {
    /// A halt wakes on the next tick interrupt; the double models that by
    /// raising one tick per idle.
    fn idle(&self) {
        self.idles.set(self.idles.get() + 1);
        self.ticks.raise();
    }
}
