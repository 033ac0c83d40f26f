use crate::config::{EnemyKind, SpecialWeaponKind, TurretKind};
use crate::enemy::{DamageOutcome, Enemy, EnemyStep};
use crate::errors::{MapSelectError, PlacementError, SelectError, SpecialWeaponError, UpgradeError};
use crate::events::TdEvent;
use crate::projectile::{splash_damage, Projectile, ProjectileEffect};
use crate::turret::{Turret, TurretAction};
use crate::world::{load_path, EnemyId, TdState, TurretId, World};
use glam::Vec2;
use sim_core::Tick;
use slotmap::SlotMap;

/// A kill waiting to be credited.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kill {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub money: u32,
    pub score: u64,
}

/// Side effects gathered while entities act, settled once per tick.
#[derive(Debug, Default)]
pub struct TickLedger {
    pub kills: Vec<Kill>,
    /// Set by the leak that took lives to zero.
    pub game_over: bool,
}

impl TickLedger {
    fn record_kill(&mut self, id: EnemyId, enemy: &Enemy) {
        self.kills.push(Kill {
            id,
            kind: enemy.kind,
            money: enemy.money_reward,
            score: enemy.score_reward,
        });
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn select_turret_type(state: &mut TdState, kind: TurretKind, events: &mut Vec<TdEvent>) {
    state.selection.turret_type = Some(kind);
    state.selection.turret = None;
    events.push(TdEvent::TurretTypeSelected { kind });
}

pub fn select_placed_turret(
    state: &mut TdState,
    id: TurretId,
    events: &mut Vec<TdEvent>,
) -> Result<(), SelectError> {
    if !state.world.turrets.contains_key(id) {
        return Err(SelectError::UnknownTurret);
    }
    state.selection.turret = Some(id);
    state.selection.turret_type = None;
    events.push(TdEvent::TurretSelected { id });
    Ok(())
}

/// Checks a placement site without charging anything.
pub fn check_placement(state: &TdState, point: Vec2) -> Result<(), PlacementError> {
    let (x, y) = (point.x, point.y);
    if !state.in_bounds(point) {
        return Err(PlacementError::OutOfBounds { x, y });
    }
    if state.is_on_path(point) {
        return Err(PlacementError::OnPath { x, y });
    }
    if state
        .world
        .turret_at(point, state.config.turret_spacing)
        .is_some()
    {
        return Err(PlacementError::Overlaps { x, y });
    }
    Ok(())
}

/// Places the selected turret type at `(x, y)` and clears the type selection.
pub fn place_turret(
    state: &mut TdState,
    x: f32,
    y: f32,
    events: &mut Vec<TdEvent>,
) -> Result<TurretId, PlacementError> {
    let kind = state
        .selection
        .turret_type
        .ok_or(PlacementError::NoTurretSelected)?;
    let point = Vec2::new(x, y);
    check_placement(state, point)?;

    let cost = state.config.spec(kind).cost;
    state.economy.spend(cost)?;

    let id = state
        .world
        .turrets
        .insert(Turret::new(kind, point, 1, &state.config));
    state.selection.turret_type = None;

    tracing::debug!(kind = kind.name(), x, y, cost, "turret placed");
    events.push(TdEvent::TurretPlaced {
        id,
        kind,
        x,
        y,
        cost,
    });
    Ok(id)
}

/// Upgrades the selected turret, charging `upgrade_cost * level`.
pub fn upgrade_selected(state: &mut TdState, events: &mut Vec<TdEvent>) -> Result<u8, UpgradeError> {
    let id = state.selection.turret.ok_or(UpgradeError::NoSelection)?;
    let turret = state
        .world
        .turrets
        .get(id)
        .ok_or(UpgradeError::UnknownTurret)?;
    let cost = state
        .config
        .upgrade_cost(turret.kind, turret.level())
        .ok_or(UpgradeError::MaxLevel {
            level: turret.level(),
        })?;

    state.economy.spend(cost)?;
    let turret = state
        .world
        .turrets
        .get_mut(id)
        .ok_or(UpgradeError::UnknownTurret)?;
    let level = turret.upgrade(&state.config)?;

    tracing::debug!(kind = turret.kind.name(), level, cost, "turret upgraded");
    events.push(TdEvent::TurretUpgraded { id, level, cost });
    Ok(level)
}

/// Fires a special weapon. Returns how many entities it affected.
pub fn use_special_weapon(
    state: &mut TdState,
    kind: SpecialWeaponKind,
    tick: Tick,
    ledger: &mut TickLedger,
    events: &mut Vec<TdEvent>,
) -> Result<usize, SpecialWeaponError> {
    let ready_at = state.weapon_ready_at[kind.index()];
    if tick < ready_at {
        return Err(SpecialWeaponError::CoolingDown { ready_at });
    }

    let spec = state.config.weapon(kind).clone();
    state.economy.spend(spec.cost)?;
    state.weapon_ready_at[kind.index()] = tick + state.config.duration_to_ticks(spec.cooldown);

    let affected = match kind {
        SpecialWeaponKind::Bomb => {
            let mut affected = 0;
            for (id, enemy) in state.world.enemies.iter_mut() {
                match enemy.apply_damage(spec.damage) {
                    DamageOutcome::Ignored => continue,
                    DamageOutcome::Hit => {}
                    DamageOutcome::Killed => ledger.record_kill(id, enemy),
                }
                affected += 1;
            }
            affected
        }
        SpecialWeaponKind::FreezeField => {
            let ticks = state.config.duration_to_ticks(state.config.freeze_duration);
            let mut affected = 0;
            for enemy in state.world.enemies.values_mut().filter(|e| e.is_alive()) {
                enemy.apply_freeze(ticks);
                affected += 1;
            }
            affected
        }
        SpecialWeaponKind::RepairAll => {
            for turret in state.world.turrets.values_mut() {
                turret.repair();
            }
            state.world.turrets.len()
        }
    };

    tracing::info!(weapon = kind.name(), affected, "special weapon used");
    events.push(TdEvent::SpecialWeaponUsed { kind, affected });
    Ok(affected)
}

/// Switches to another map. Turrets standing on the new path are removed
/// without refund.
pub fn select_map(state: &mut TdState, index: usize, events: &mut Vec<TdEvent>) -> Result<(), MapSelectError> {
    if state.director.in_progress() {
        return Err(MapSelectError::WaveInProgress);
    }
    let alive = state.world.live_enemy_count();
    if alive > 0 {
        return Err(MapSelectError::EnemiesAlive { alive });
    }

    let path = load_path(&state.config, index)?;
    state.path = path;
    state.map_index = index;
    state.world.projectiles.clear();

    let buffer = state.config.path_buffer();
    let blocked: Vec<TurretId> = state
        .world
        .turrets
        .iter()
        .filter(|(_, t)| state.path.is_on_path(t.pos, buffer))
        .map(|(id, _)| id)
        .collect();
    for id in &blocked {
        state.world.turrets.remove(*id);
    }
    if state.selection.turret.is_some_and(|id| blocked.contains(&id)) {
        state.selection.turret = None;
    }

    let name = state.map_name().to_string();
    tracing::info!(index, name = %name, removed_turrets = blocked.len(), "map selected");
    events.push(TdEvent::MapSelected {
        index,
        name,
        removed_turrets: blocked.len(),
    });
    Ok(())
}

// ---------------------------------------------------------------------------
// Tick phases
// ---------------------------------------------------------------------------

/// Starts the next wave when due and spawns every enemy whose time has come.
pub fn update_wave(state: &mut TdState, tick: Tick, events: &mut Vec<TdEvent>) {
    if let Some((wave, size)) = state.director.poll_start(&state.config, tick) {
        events.push(TdEvent::WaveStarted { wave, size });
    }

    let wave = state.director.current_wave();
    let start = state.path.start();
    for kind in state.director.due_spawns(tick) {
        let profile = state.config.enemy(kind);
        let max_health = state.config.enemy_max_health(kind, wave);
        let id = state
            .world
            .enemies
            .insert(Enemy::new(kind, profile, start, max_health));
        tracing::debug!(kind = kind.name(), wave, max_health, "enemy spawned");
        events.push(TdEvent::EnemySpawned { id, kind });
    }
}

/// Advances every enemy, resolves leaks and siege damage, then compacts.
pub fn move_enemies(state: &mut TdState, ledger: &mut TickLedger, events: &mut Vec<TdEvent>) {
    let explosion_frames = state.config.explosion_frames;
    let mut leaked: Vec<(EnemyId, EnemyKind)> = Vec::new();

    for (id, enemy) in state.world.enemies.iter_mut() {
        match enemy.advance(&state.path, explosion_frames) {
            EnemyStep::Leaked => leaked.push((id, enemy.kind)),
            EnemyStep::Died => tracing::debug!(kind = enemy.kind.name(), "enemy removed"),
            _ => {}
        }
    }

    for (id, kind) in leaked {
        let loss = state.economy.lose_life();
        if loss.game_over {
            ledger.game_over = true;
        }
        tracing::debug!(kind = kind.name(), lives_left = loss.remaining, "enemy leaked");
        events.push(TdEvent::EnemyLeaked {
            id,
            kind,
            lives_left: loss.remaining,
        });
    }

    apply_siege(state, events);
    state.world.enemies.retain(|_, e| !e.is_removable());
}

/// Heavy enemies wear down nearby turrets; destroyed turrets are removed.
fn apply_siege(state: &mut TdState, events: &mut Vec<TdEvent>) {
    let range = state.config.siege_range;
    let sieges: Vec<(Vec2, f32)> = state
        .world
        .enemies
        .values()
        .filter(|e| e.is_alive() && e.siege_damage > 0.0)
        .map(|e| (e.pos, e.siege_damage))
        .collect();
    if sieges.is_empty() {
        return;
    }

    for turret in state.world.turrets.values_mut() {
        for &(pos, damage) in &sieges {
            if turret.pos.distance(pos) <= range {
                turret.take_damage(damage);
            }
        }
    }

    let destroyed: Vec<(TurretId, TurretKind)> = state
        .world
        .turrets
        .iter()
        .filter(|(_, t)| t.is_destroyed())
        .map(|(id, t)| (id, t.kind))
        .collect();
    for (id, kind) in destroyed {
        state.world.turrets.remove(id);
        if state.selection.turret == Some(id) {
            state.selection.turret = None;
        }
        tracing::debug!(kind = kind.name(), "turret destroyed");
        events.push(TdEvent::TurretDestroyed { id, kind });
    }
}

/// Every turret retargets and acts against the enemy positions after movement.
pub fn turret_attacks(state: &mut TdState, tick: Tick, ledger: &mut TickLedger, events: &mut Vec<TdEvent>) {
    let World {
        turrets,
        enemies,
        projectiles,
    } = &mut state.world;
    let config = &state.config;

    // Each turret sees the damage dealt by the ones before it.
    for (turret, t) in turrets.iter_mut() {
        let kind = t.kind;
        match t.tick(tick, enemies, config) {
            TurretAction::Idle => {}
            TurretAction::Fire(request) => {
                let projectile = Projectile::new(request, config.projectile_speed, config.chain_max_hits);
                events.push(TdEvent::ShotFired {
                    turret,
                    kind,
                    projectile: Some(projectile.kind()),
                });
                projectiles.insert(projectile);
            }
            TurretAction::Strike { target, damage } => {
                damage_enemy(enemies, target, damage, ledger);
                events.push(TdEvent::ShotFired {
                    turret,
                    kind,
                    projectile: None,
                });
            }
            TurretAction::Beam { target, damage } => {
                damage_enemy(enemies, target, damage, ledger);
            }
        }
    }
}

/// Moves projectiles, resolves hits, and drops spent or escaped ones.
pub fn advance_projectiles(state: &mut TdState, ledger: &mut TickLedger) {
    let bounds = state.bounds();
    let config = &state.config;
    let freeze_ticks = config.duration_to_ticks(config.freeze_duration);
    let slow_ticks = config.duration_to_ticks(config.slow_duration);
    let World {
        enemies,
        projectiles,
        ..
    } = &mut state.world;

    for projectile in projectiles.values_mut() {
        projectile.advance();

        let mut hits: Vec<(EnemyId, f32)> = enemies
            .iter()
            .filter(|(id, e)| projectile.test_collision(*id, e, config.hit_radius))
            .map(|(id, e)| (id, projectile.pos.distance(e.pos)))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (id, _) in hits {
            if projectile.is_spent() {
                break;
            }
            projectile.register_hit(id);
            resolve_hit(
                enemies,
                id,
                projectile.damage,
                &projectile.effect,
                HitTuning {
                    min_speed: config.min_enemy_speed,
                    slow_ticks,
                    freeze_ticks,
                },
                ledger,
            );
        }
    }

    projectiles.retain(|_, p| !p.is_spent() && !p.is_out_of_bounds(bounds));
}

#[derive(Clone, Copy)]
struct HitTuning {
    min_speed: f32,
    slow_ticks: u64,
    freeze_ticks: u64,
}

/// Damages the primary target, splashes its neighbors, and applies status
/// effects to the primary only.
fn resolve_hit(
    enemies: &mut SlotMap<EnemyId, Enemy>,
    primary: EnemyId,
    damage: f32,
    effect: &ProjectileEffect,
    tuning: HitTuning,
    ledger: &mut TickLedger,
) {
    let Some(center) = enemies.get(primary).map(|e| e.pos) else {
        return;
    };

    damage_enemy(enemies, primary, damage, ledger);
    if let Some(enemy) = enemies.get_mut(primary) {
        if effect.freezes {
            enemy.apply_freeze(tuning.freeze_ticks);
        } else if effect.slow_fraction > 0.0 {
            enemy.apply_slow(effect.slow_fraction, tuning.min_speed, tuning.slow_ticks);
        }
    }

    if effect.splash_radius <= 0.0 {
        return;
    }
    let splashed: Vec<(EnemyId, f32)> = enemies
        .iter()
        .filter(|(id, e)| *id != primary && e.is_alive())
        .filter_map(|(id, e)| {
            let amount = splash_damage(damage, e.pos.distance(center), effect.splash_radius);
            (amount > 0.0).then_some((id, amount))
        })
        .collect();
    for (id, amount) in splashed {
        damage_enemy(enemies, id, amount, ledger);
    }
}

fn damage_enemy(
    enemies: &mut SlotMap<EnemyId, Enemy>,
    id: EnemyId,
    amount: f32,
    ledger: &mut TickLedger,
) -> DamageOutcome {
    let Some(enemy) = enemies.get_mut(id) else {
        return DamageOutcome::Ignored;
    };
    let outcome = enemy.apply_damage(amount);
    if outcome == DamageOutcome::Killed {
        ledger.record_kill(id, enemy);
    }
    outcome
}

/// Credits this tick's kills and closes the wave once the field is empty.
pub fn settle_economy(state: &mut TdState, tick: Tick, ledger: &mut TickLedger, events: &mut Vec<TdEvent>) {
    for kill in ledger.kills.drain(..) {
        state.economy.credit_kill(kill.money, kill.score);
        tracing::debug!(kind = kill.kind.name(), money = kill.money, "enemy killed");
        events.push(TdEvent::EnemyKilled {
            id: kill.id,
            kind: kill.kind,
            money: kill.money,
            score: kill.score,
        });
    }

    if state.economy.is_game_over() {
        return;
    }
    let live = state.world.live_enemy_count();
    if let Some(cleared) = state.director.on_wave_cleared(&state.config, tick, live) {
        events.push(TdEvent::WaveCleared {
            wave: cleared.wave,
            next_wave_tick: cleared.next_wave_tick,
        });
        if cleared.next_wave_tick.is_none() {
            events.push(TdEvent::Victory {
                score: state.economy.score(),
                wave: cleared.wave,
            });
        }
    }
}

pub fn check_game_over(state: &TdState, ledger: &TickLedger, events: &mut Vec<TdEvent>) {
    if !ledger.game_over {
        return;
    }
    let score = state.economy.score();
    let wave = state.director.current_wave();
    tracing::info!(score, wave, "game over");
    events.push(TdEvent::GameOver { score, wave });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TdConfig;
    use crate::errors::SpendError;

    fn state() -> TdState {
        TdState::new(TdConfig::default(), 1)
    }

    fn spawn(state: &mut TdState, kind: EnemyKind, pos: Vec2) -> EnemyId {
        let profile = state.config.enemy(kind).clone();
        state
            .world
            .enemies
            .insert(Enemy::new(kind, &profile, pos, profile.health))
    }

    fn tuning() -> HitTuning {
        HitTuning {
            min_speed: 0.5,
            slow_ticks: 120,
            freeze_ticks: 90,
        }
    }

    #[test]
    fn splash_falls_off_and_slows_only_the_primary() {
        let mut state = state();
        let primary = spawn(&mut state, EnemyKind::Regular, Vec2::new(200.0, 200.0));
        let near = spawn(&mut state, EnemyKind::Regular, Vec2::new(225.0, 200.0));
        let far = spawn(&mut state, EnemyKind::Regular, Vec2::new(260.0, 200.0));
        let effect = ProjectileEffect {
            splash_radius: 50.0,
            slow_fraction: 0.3,
            ..ProjectileEffect::default()
        };

        let mut ledger = TickLedger::default();
        resolve_hit(&mut state.world.enemies, primary, 20.0, &effect, tuning(), &mut ledger);

        let enemies = &state.world.enemies;
        assert_eq!(enemies[primary].health, 80.0);
        assert_eq!(enemies[near].health, 90.0);
        assert_eq!(enemies[far].health, 100.0);
        assert!(enemies[primary].is_slowed());
        assert!(!enemies[near].is_slowed());
        assert!(ledger.kills.is_empty());
    }

    #[test]
    fn splash_kills_are_recorded() {
        let mut state = state();
        let primary = spawn(&mut state, EnemyKind::Regular, Vec2::new(200.0, 200.0));
        let near = spawn(&mut state, EnemyKind::Regular, Vec2::new(200.0, 205.0));
        state.world.enemies[near].health = 5.0;
        let effect = ProjectileEffect {
            splash_radius: 50.0,
            ..ProjectileEffect::default()
        };

        let mut ledger = TickLedger::default();
        resolve_hit(&mut state.world.enemies, primary, 20.0, &effect, tuning(), &mut ledger);

        assert_eq!(ledger.kills.len(), 1);
        assert_eq!(ledger.kills[0].id, near);
        assert!(state.world.enemies[near].is_exploding());
    }

    #[test]
    fn freeze_shot_freezes_only_the_primary_and_refreshes() {
        let mut state = state();
        let primary = spawn(&mut state, EnemyKind::Regular, Vec2::new(200.0, 200.0));
        let near = spawn(&mut state, EnemyKind::Regular, Vec2::new(225.0, 200.0));
        let effect = ProjectileEffect {
            splash_radius: 50.0,
            slow_fraction: 0.3,
            freezes: true,
            ..ProjectileEffect::default()
        };

        let mut ledger = TickLedger::default();
        resolve_hit(&mut state.world.enemies, primary, 20.0, &effect, tuning(), &mut ledger);

        let enemies = &state.world.enemies;
        assert!(enemies[primary].is_frozen());
        assert!(!enemies[primary].is_slowed());
        assert_eq!(enemies[primary].speed, 0.0);
        assert_eq!(enemies[near].health, 90.0);
        assert!(!enemies[near].is_frozen());

        // Burn most of the freeze, then a second hit restarts it.
        for _ in 0..80 {
            state.world.enemies[primary].advance(&state.path, 10);
        }
        resolve_hit(&mut state.world.enemies, primary, 20.0, &effect, tuning(), &mut ledger);
        for _ in 0..80 {
            assert_eq!(state.world.enemies[primary].advance(&state.path, 10), EnemyStep::Frozen);
        }
        assert_eq!(state.world.enemies[primary].health, 60.0);
    }

    #[test]
    fn later_turrets_skip_enemies_already_struck() {
        let mut state = state();
        let first = spawn(&mut state, EnemyKind::Regular, Vec2::new(300.0, 300.0));
        let second = spawn(&mut state, EnemyKind::Regular, Vec2::new(300.0, 360.0));
        for x in [300.0, 310.0] {
            state.world.turrets.insert(Turret::new(
                TurretKind::InstantKill,
                Vec2::new(x, 290.0),
                1,
                &state.config,
            ));
        }

        let mut ledger = TickLedger::default();
        let mut events = Vec::new();
        turret_attacks(&mut state, 1, &mut ledger, &mut events);

        let shots = events
            .iter()
            .filter(|e| matches!(e, TdEvent::ShotFired { .. }))
            .count();
        assert_eq!(shots, 2);
        assert_eq!(ledger.kills.len(), 2);
        assert!(state.world.enemies[first].is_exploding());
        assert!(state.world.enemies[second].is_exploding());
    }

    #[test]
    fn spawns_carry_wave_health_bonus() {
        let mut state = state();
        let config = state.config.clone();
        assert_eq!(state.director.start_wave(&config, 3, 0), Some(11));

        let mut events = Vec::new();
        update_wave(&mut state, 0, &mut events);

        let [TdEvent::EnemySpawned { id, kind }] = events.as_slice() else {
            panic!("expected one spawn, got {events:?}");
        };
        let enemy = &state.world.enemies[*id];
        assert_eq!(enemy.max_health, config.enemy(*kind).health + 40.0);
        assert_eq!(enemy.health, enemy.max_health);
        if *kind == EnemyKind::Regular {
            assert_eq!(enemy.max_health, 140.0);
        }
    }

    #[test]
    fn siege_destroys_nearby_turrets() {
        let mut state = state();
        spawn(&mut state, EnemyKind::Heavy, Vec2::new(100.0, 100.0));
        let near = state.world.turrets.insert(Turret::new(
            TurretKind::Basic,
            Vec2::new(130.0, 100.0),
            1,
            &state.config,
        ));
        let far = state.world.turrets.insert(Turret::new(
            TurretKind::Basic,
            Vec2::new(300.0, 100.0),
            1,
            &state.config,
        ));
        state.world.turrets[near].hp = 0.1;
        state.selection.turret = Some(near);

        let mut events = Vec::new();
        apply_siege(&mut state, &mut events);

        assert!(!state.world.turrets.contains_key(near));
        assert_eq!(state.world.turrets[far].hp, 100.0);
        assert_eq!(state.selection.turret, None);
        assert!(matches!(events.as_slice(), [TdEvent::TurretDestroyed { id, .. }] if *id == near));
    }

    #[test]
    fn freeze_field_stops_every_live_enemy() {
        let mut state = state();
        let a = spawn(&mut state, EnemyKind::Regular, Vec2::new(100.0, 100.0));
        let b = spawn(&mut state, EnemyKind::Fast, Vec2::new(300.0, 100.0));

        let mut ledger = TickLedger::default();
        let mut events = Vec::new();
        let affected =
            use_special_weapon(&mut state, SpecialWeaponKind::FreezeField, 10, &mut ledger, &mut events);

        assert_eq!(affected, Ok(2));
        assert!(state.world.enemies[a].is_frozen());
        assert!(state.world.enemies[b].is_frozen());
        assert_eq!(state.economy.money(), 300 - 100);
        assert_eq!(state.weapon_ready_at[SpecialWeaponKind::FreezeField.index()], 10 + 900);
    }

    #[test]
    fn repair_restores_turrets_and_respects_funds() {
        let mut state = state();
        let id = state.world.turrets.insert(Turret::new(
            TurretKind::Basic,
            Vec2::new(60.0, 60.0),
            1,
            &state.config,
        ));
        state.world.turrets[id].hp = 10.0;

        let mut ledger = TickLedger::default();
        let mut events = Vec::new();
        assert_eq!(
            use_special_weapon(&mut state, SpecialWeaponKind::RepairAll, 0, &mut ledger, &mut events),
            Ok(1)
        );
        assert_eq!(state.world.turrets[id].hp, 100.0);

        state.economy = crate::economy::Economy::new(10, 10);
        assert_eq!(
            use_special_weapon(&mut state, SpecialWeaponKind::RepairAll, 10_000, &mut ledger, &mut events),
            Err(SpecialWeaponError::Funds(SpendError::InsufficientFunds { cost: 80, have: 10 }))
        );
    }

    #[test]
    fn kills_are_credited_when_settled() {
        let mut state = state();
        let id = spawn(&mut state, EnemyKind::Armored, Vec2::new(100.0, 100.0));
        let mut ledger = TickLedger::default();

        // Armor 2.0 halves incoming damage.
        assert_eq!(damage_enemy(&mut state.world.enemies, id, 100.0, &mut ledger), DamageOutcome::Hit);
        assert_eq!(state.world.enemies[id].health, 100.0);
        assert_eq!(damage_enemy(&mut state.world.enemies, id, 200.0, &mut ledger), DamageOutcome::Killed);
        assert_eq!(damage_enemy(&mut state.world.enemies, id, 200.0, &mut ledger), DamageOutcome::Ignored);

        let mut events = Vec::new();
        settle_economy(&mut state, 1, &mut ledger, &mut events);
        assert_eq!(state.economy.money(), 300 + 35);
        assert_eq!(state.economy.score(), 30);
        assert!(ledger.kills.is_empty());
    }
}
