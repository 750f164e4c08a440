//! The tick counter shared with the vblank interrupt context.

use core::sync::atomic::{AtomicU16, Ordering};

/// Single-producer/single-consumer: the interrupt side only increments,
/// the playback loop only reads and consumes.
#[derive(Debug, Default)]
pub struct VblankTicks(AtomicU16);

impl VblankTicks {
    pub const fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    /// Called from the tick interrupt context.
    pub fn raise(&self) {
        self.0.fetch_add(1, Ordering::Release);
    }

    pub fn pending(&self) -> u16 {
        self.0.load(Ordering::Acquire)
    }

    /// Consume `n` ticks in one read-modify-write, so increments arriving
    /// concurrently are kept rather than lost. This is the critical
    /// section the original guarded by masking interrupts.
    pub fn consume(&self, n: u16) {
        self.0.fetch_sub(n, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_keeps_ticks_raised_in_between() {
        let ticks = VblankTicks::new();
        for _ in 0..5 {
            ticks.raise();
        }
        ticks.consume(3);
        assert_eq!(ticks.pending(), 2);
    }
}
