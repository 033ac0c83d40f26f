use crate::actions::TdAction;
use crate::config::{TdConfig, TurretKind};
use crate::events::TdEvent;
use crate::systems::{self, TickLedger};
use crate::world::{TdState, TurretId};
use glam::Vec2;
use sim_core::{ActionEnvelope, Game, PlayerId, TerminalOutcome, Tick};

pub struct TdGame {
    state: TdState,
}

impl TdGame {
    pub fn state(&self) -> &TdState {
        &self.state
    }

    /// True when `(x, y)` lies within the path's no-build buffer.
    pub fn is_on_path(&self, x: f32, y: f32) -> bool {
        self.state.is_on_path(Vec2::new(x, y))
    }

    /// Placement preview: the site is legal and `kind` is affordable.
    pub fn can_place(&self, kind: TurretKind, x: f32, y: f32) -> bool {
        systems::check_placement(&self.state, Vec2::new(x, y)).is_ok()
            && self.state.economy.can_afford(self.state.config.spec(kind).cost)
    }

    /// The placed turret under `(x, y)`, if any.
    pub fn turret_at(&self, x: f32, y: f32) -> Option<TurretId> {
        self.state
            .world
            .turret_at(Vec2::new(x, y), self.state.config.tile_size / 2.0)
    }

    fn apply_action(&mut self, tick: Tick, action: &TdAction, ledger: &mut TickLedger, out_events: &mut Vec<TdEvent>) {
        let state = &mut self.state;
        match action {
            TdAction::SelectTurretType { kind } => {
                systems::select_turret_type(state, *kind, out_events);
            }
            TdAction::PlaceTurret { x, y } => {
                if let Err(reason) = systems::place_turret(state, *x, *y, out_events) {
                    tracing::warn!(%reason, "placement rejected");
                    out_events.push(TdEvent::PlacementRejected { reason });
                }
            }
            TdAction::SelectPlacedTurret { turret_id } => {
                if let Err(reason) = systems::select_placed_turret(state, *turret_id, out_events) {
                    tracing::warn!(%reason, "selection rejected");
                    out_events.push(TdEvent::SelectionRejected { reason });
                }
            }
            TdAction::UpgradeSelectedTurret => {
                if let Err(reason) = systems::upgrade_selected(state, out_events) {
                    tracing::warn!(%reason, "upgrade rejected");
                    out_events.push(TdEvent::UpgradeRejected { reason });
                }
            }
            TdAction::UseSpecialWeapon { kind } => {
                if let Err(reason) = systems::use_special_weapon(state, *kind, tick, ledger, out_events) {
                    tracing::warn!(%reason, weapon = kind.name(), "special weapon rejected");
                    out_events.push(TdEvent::SpecialWeaponRejected { kind: *kind, reason });
                }
            }
            TdAction::SelectMap { index } => {
                if let Err(reason) = systems::select_map(state, *index, out_events) {
                    tracing::warn!(%reason, "map change rejected");
                    out_events.push(TdEvent::MapSelectRejected { reason });
                }
            }
        }
    }
}

impl Game for TdGame {
    type Config = TdConfig;
    type Action = TdAction;
    type Observation = turret_td_types::TdObservation;
    type Event = TdEvent;

    fn new(config: Self::Config, seed: u64) -> Self {
        Self {
            state: TdState::new(config, seed),
        }
    }

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        self.state.tick = tick;
        if !self.is_running() {
            return;
        }

        let mut ledger = TickLedger::default();

        // 0. Player commands
        for action in actions {
            self.apply_action(tick, &action.payload, &mut ledger, out_events);
        }

        let state = &mut self.state;

        // 1. Spawns, movement, leaks
        systems::update_wave(state, tick, out_events);
        systems::move_enemies(state, &mut ledger, out_events);

        // 2. Turrets retarget and fire
        systems::turret_attacks(state, tick, &mut ledger, out_events);

        // 3. Projectile flight and collisions
        systems::advance_projectiles(state, &mut ledger);

        // 4. Kill credit and wave completion
        systems::settle_economy(state, tick, &mut ledger, out_events);

        // 5. Game over
        systems::check_game_over(state, &ledger, out_events);
    }

    fn observe(&self, tick: Tick, _player: PlayerId) -> Self::Observation {
        crate::observe::build_observation(&self.state, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        if self.state.economy.is_game_over() {
            return Some(TerminalOutcome::Lose);
        }
        if self.state.director.is_finished() {
            return Some(TerminalOutcome::Win);
        }
        None
    }
}
