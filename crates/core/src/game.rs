use crate::envelope::ActionEnvelope;
use crate::types::{PlayerId, Tick};

/// How a finished session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Win,
    Lose,
}

/// A tick-driven simulation the host can step.
///
/// `step` owns every mutation of the game state; between calls the state is
/// only read through `observe` and `is_terminal`. No wall-clock time enters
/// the simulation: durations are converted to tick deadlines up front.
pub trait Game: Sized {
    type Config: Clone + Send + Sync + 'static;
    type Action: Clone + Send + Sync + 'static;
    type Observation: Clone + Send + Sync + 'static;
    type Event: Clone + Send + Sync + 'static;

    fn new(config: Self::Config, seed: u64) -> Self;

    /// Applies `actions` (already sorted by player and action id) and then
    /// advances the world by one tick, appending notifications to `out_events`.
    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    );

    /// Read-only snapshot for presentation layers.
    fn observe(&self, tick: Tick, player: PlayerId) -> Self::Observation;

    fn is_terminal(&self) -> Option<TerminalOutcome>;

    fn is_running(&self) -> bool {
        self.is_terminal().is_none()
    }
}
