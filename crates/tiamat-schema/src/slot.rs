/// Identity of one buffer in the double-buffered particle store.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Index of this slot in a two-element storage array.
    pub const fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Read/write slot assignment for one tick.
///
/// The two fields always name different slots, so a pass planned from a
/// `SlotPair` cannot alias its input and output buffers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotPair {
    pub read: Slot,
    pub write: Slot,
}

/// Slot assignment for `tick`.
///
/// Pure parity: even ticks read A and write B, odd ticks read B and write A.
/// The write slot of tick `k` is the read slot of tick `k + 1`, which is how
/// particle state carries across frames. Callers that skip a tick number
/// (the frame driver does, when a submission fails) re-read the state from
/// two ticks back on the next pass; the alternation itself never breaks.
pub const fn for_tick(tick: u64) -> SlotPair {
    if tick % 2 == 0 {
        SlotPair { read: Slot::A, write: Slot::B }
    } else {
        SlotPair { read: Slot::B, write: Slot::A }
    }
}
