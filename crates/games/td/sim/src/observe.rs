use crate::config::{SpecialWeaponKind, TurretKind};
use crate::wave::WavePhase;
use crate::world::{EnemyId, TdState, TurretId};
use sim_core::Tick;
use slotmap::{Key, KeyData};
use turret_td_types::{
    EnemyInfo, Point, ProjectileInfo, ShopEntry, SpecialWeaponInfo, TdObservation, TurretInfo, WaveStatus,
};

pub fn turret_id_to_string(id: TurretId) -> String {
    id.data().as_ffi().to_string()
}

pub fn string_to_turret_id(s: &str) -> Result<TurretId, String> {
    let ffi: u64 = s.parse().map_err(|_| format!("Invalid turret_id: {}", s))?;
    Ok(TurretId::from(KeyData::from_ffi(ffi)))
}

pub fn enemy_id_to_string(id: EnemyId) -> String {
    id.data().as_ffi().to_string()
}

fn wave_status(state: &TdState) -> WaveStatus {
    match state.director.phase() {
        WavePhase::Pause { until_tick } => WaveStatus::Pause {
            until_tick: *until_tick,
            next_wave_size: state.config.wave_size(state.director.current_wave() + 1),
        },
        WavePhase::InWave {
            spawned, wave_size, ..
        } => WaveStatus::InWave {
            spawned: *spawned,
            wave_size: *wave_size,
            next_spawn_tick: state.director.next_spawn_tick(),
        },
        WavePhase::Finished => WaveStatus::Finished,
    }
}

pub fn build_observation(state: &TdState, tick: Tick) -> TdObservation {
    let config = &state.config;
    let economy = &state.economy;

    TdObservation {
        tick,
        ticks_per_second: config.tick_hz,

        world_width: config.world_width,
        world_height: config.world_height,
        tile_size: config.tile_size,
        map_index: state.map_index,
        map_name: state.map_name().to_string(),
        path: state
            .path
            .waypoints()
            .iter()
            .map(|p| Point { x: p.x, y: p.y })
            .collect(),

        money: economy.money(),
        score: economy.score(),
        lives: economy.lives(),
        game_over: economy.is_game_over(),

        current_wave: state.director.current_wave(),
        wave_in_progress: state.director.in_progress(),
        wave_status: wave_status(state),

        selected_turret_type: state.selection.turret_type.map(|k| k.name().to_string()),
        selected_turret: state.selection.turret.map(turret_id_to_string),

        shop: TurretKind::ALL
            .into_iter()
            .map(|kind| {
                let spec = config.spec(kind);
                ShopEntry {
                    kind: kind.name().to_string(),
                    cost: spec.cost,
                    range: spec.range,
                    affordable: economy.can_afford(spec.cost),
                }
            })
            .collect(),
        special_weapons: SpecialWeaponKind::ALL
            .into_iter()
            .map(|kind| SpecialWeaponInfo {
                kind: kind.name().to_string(),
                cost: config.weapon(kind).cost,
                ready_in_ticks: state.weapon_ready_at[kind.index()].saturating_sub(tick),
            })
            .collect(),

        enemies: state
            .world
            .enemies
            .iter()
            .map(|(id, e)| EnemyInfo {
                id: enemy_id_to_string(id),
                kind: e.kind.name().to_string(),
                x: e.pos.x,
                y: e.pos.y,
                health: e.health.max(0.0),
                max_health: e.max_health,
                exploding: e.is_exploding(),
                explosion_progress: e.explosion_progress(config.explosion_frames),
                frozen: e.is_frozen(),
                slowed: e.is_slowed(),
            })
            .collect(),
        turrets: state
            .world
            .turrets
            .iter()
            .map(|(id, t)| TurretInfo {
                id: turret_id_to_string(id),
                kind: t.kind.name().to_string(),
                x: t.pos.x,
                y: t.pos.y,
                rotation: t.rotation,
                level: t.level(),
                max_level: config.max_level,
                range: t.stats().range,
                damage: t.stats().damage,
                hp: t.hp,
                max_hp: t.max_hp,
                muzzle_flash: t.muzzle_flash(tick),
                ability_ready: t.ability_ready(tick),
                upgrade_cost: config.upgrade_cost(t.kind, t.level()),
            })
            .collect(),
        projectiles: state
            .world
            .projectiles
            .values()
            .map(|p| ProjectileInfo {
                kind: p.kind().name().to_string(),
                x: p.pos.x,
                y: p.pos.y,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TdConfig;
    use crate::turret::Turret;
    use glam::Vec2;

    #[test]
    fn turret_ids_survive_the_string_round_trip() {
        let mut state = TdState::new(TdConfig::default(), 1);
        let id = state.world.turrets.insert(Turret::new(
            TurretKind::Basic,
            Vec2::new(100.0, 40.0),
            1,
            &state.config,
        ));
        assert_eq!(string_to_turret_id(&turret_id_to_string(id)), Ok(id));
        assert!(string_to_turret_id("not-a-number").is_err());
    }

    #[test]
    fn fresh_state_reports_shop_and_pause() {
        let state = TdState::new(TdConfig::default(), 1);
        let obs = build_observation(&state, 0);

        assert_eq!(obs.money, 300);
        assert_eq!(obs.lives, 10);
        assert_eq!(obs.map_name, "Serpentine");
        assert_eq!(obs.path.len(), 6);
        assert_eq!(obs.shop.len(), TurretKind::ALL.len());
        assert!(obs.shop.iter().find(|s| s.kind == "basic").is_some_and(|s| s.affordable));
        assert!(obs.shop.iter().find(|s| s.kind == "instant_kill").is_some_and(|s| !s.affordable));
        assert_eq!(
            obs.wave_status,
            WaveStatus::Pause {
                until_tick: 180,
                next_wave_size: 7
            }
        );
        assert!(obs.special_weapons.iter().all(|w| w.ready_in_ticks == 0));
    }
}
