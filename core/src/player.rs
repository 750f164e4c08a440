//! The double-buffered presentation loop and its timing governor.

use log::info;

use crate::decoder::{Decoder, FrameResult};
use crate::platform::{DisplayControl, Platform};
use crate::profile::{Profile, PROFILE_2BPP};
use crate::screen::Screens;
use crate::timing::VblankTicks;

/// Startup state: which banks hold the two streams and the display
/// control word in effect before the stream overrides it.
#[derive(Debug, Clone, Copy)]
pub struct PlayerConfig {
    pub profile: &'static Profile,
    /// First bank of the command stream.
    pub command_bank: u8,
    /// Added to every copy instruction's bank field.
    pub asset_base_bank: u8,
    pub initial_control: DisplayControl,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            profile: &PROFILE_2BPP,
            command_bank: 0,
            asset_base_bank: 0,
            initial_control: DisplayControl::with_border(DisplayControl::BORDER_BLACK),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Flipping,
    Decoding,
    Waiting { hold: u16 },
    Done,
}

/// Owns the whole interpreter state for one playback: decoder registers,
/// both screens, and the pending display control. The tick counter is
/// borrowed, since the interrupt side holds the other reference.
pub struct Player<'t, P: Platform> {
    pub platform: P,
    decoder: Decoder,
    screens: Screens,
    ticks: &'t VblankTicks,
    next_control: DisplayControl,
    frames: u64,
}

impl<'t, P: Platform> Player<'t, P> {
    pub fn new(config: PlayerConfig, platform: P, ticks: &'t VblankTicks) -> Self {
        Self {
            platform,
            decoder: Decoder::new(config.profile, config.command_bank, config.asset_base_bank),
            screens: Screens::new(),
            ticks,
            next_control: config.initial_control,
            frames: 0,
        }
    }

    /// Play the stream to the end. One flip per loop: present what the
    /// previous iteration built, decode the next frame into the back
    /// grid, then block until the frame's tick budget has elapsed.
    pub fn run(&mut self) {
        let mut phase = Phase::Flipping;
        loop {
            phase = match phase {
                Phase::Flipping => {
                    self.flip();
                    Phase::Decoding
                }
                Phase::Decoding => match self.decoder.decode_frame(
                    &mut self.platform,
                    self.screens.back_mut(),
                    &mut self.next_control,
                ) {
                    FrameResult::MoreFrames { hold } => Phase::Waiting { hold },
                    FrameResult::StreamDone => Phase::Done,
                },
                Phase::Waiting { hold } => {
                    self.wait_ticks(hold);
                    Phase::Flipping
                }
                Phase::Done => break,
            };
        }
        info!("stream done after {} frames", self.frames);
    }

    /// Block until `hold` ticks have arrived, then consume exactly that
    /// many; a hold of zero proceeds immediately. Public because the
    /// post-playback sequence reuses it as its wait primitive.
    pub fn wait_ticks(&mut self, hold: u16) {
        while self.ticks.pending() < hold {
            self.platform.idle();
        }
        self.ticks.consume(hold);
    }

    fn flip(&mut self) {
        self.screens.flip();
        self.platform
            .present(self.screens.front(), self.next_control);
        self.screens.begin_frame();
        self.frames += 1;
    }

    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }
}
