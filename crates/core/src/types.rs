/// Monotonic simulation tick counter. Tick 0 is the state before the first step.
pub type Tick = u64;

pub type PlayerId = u8;

pub type ActionId = u64;
