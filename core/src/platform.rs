//! Hardware collaborator seams. The playback core is generic over these,
//! so it runs against the real device drivers or an in-memory double.

use bitfield::bitfield;

use crate::screen::TileGrid;

/// Which banked read-only stream a storage access targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamId {
    Commands,
    Assets,
}

bitfield! {
    /// Display-control word, applied at flip time together with the active
    /// screen.
    #[derive(Copy, Clone, PartialEq, Eq)]
    pub struct DisplayControl(u16);
    impl Debug;
    pub screen_enable, set_screen_enable: 1;
    pub window_inside, set_window_inside: 5;
    pub u8, border, set_border: 11, 8;
}

impl DisplayControl {
    pub const BORDER_WHITE: u8 = 0;
    pub const BORDER_BLACK: u8 = 7;

    /// Screen on, window crop on, border in the given shade.
    pub fn with_border(border: u8) -> Self {
        let mut control = DisplayControl(0);
        control.set_screen_enable(true);
        control.set_window_inside(true);
        control.set_border(border);
        control
    }
}

/// Byte-addressable reads through a bank-selectable window.
///
/// There is a single physical window: selecting a bank for one stream
/// unmaps the other stream until its bank is selected again. Callers that
/// borrow the window (the tile fetch path) must restore the command
/// stream's bank before the next command read.
pub trait BankedStorage {
    fn select_bank(&mut self, stream: StreamId, bank: u8);
    fn read_byte(&mut self, stream: StreamId, offset: u16) -> u8;
}

/// Destination for fetched tile graphics.
pub trait TileSink {
    /// Copy one tile block from the currently selected asset bank window
    /// into tile memory at `dest_slot`.
    fn copy_tile_block(&mut self, source_offset: u16, dest_slot: u16);
}

/// The video output. Both calls happen only between frames.
pub trait Display {
    /// Hand the freshly flipped screen and its control word to the
    /// hardware.
    fn present(&mut self, screen: &TileGrid, control: DisplayControl);

    /// The stream is done: keep the display running but drop every other
    /// interrupt source.
    fn enter_display_only(&mut self);
}

/// Low-power wait for the next tick interrupt. Never a busy-poll.
pub trait TickWait {
    fn idle(&self);
}

pub trait Platform: BankedStorage + TileSink + Display + TickWait {}

impl<T: BankedStorage + TileSink + Display + TickWait> Platform for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_control_packs_the_border_shade() {
        let control = DisplayControl::with_border(DisplayControl::BORDER_BLACK);
        assert!(control.screen_enable());
        assert!(control.window_inside());
        assert_eq!(control.border(), 7);
        assert_eq!(control.0, 0b0111_0010_0010);
    }
}
