use crate::config::{AttackMode, EnemyKind, TdConfig, TurretAbility, TurretKind};
use crate::enemy::Enemy;
use crate::errors::UpgradeError;
use crate::projectile::{ProjectileEffect, ProjectileRequest};
use crate::world::EnemyId;
use glam::Vec2;
use sim_core::Tick;
use slotmap::SlotMap;

/// Stats derived from the turret spec and current level.
#[derive(Clone, Debug, PartialEq)]
pub struct TurretStats {
    pub damage: f32,
    pub range: f32,
    pub fire_interval_ticks: u64,
    pub attack: AttackMode,
    pub splash_radius: f32,
    pub slow_fraction: f32,
    pub freezes: bool,
    pub ability: Option<TurretAbility>,
}

impl TurretStats {
    /// Damage and range scale up with the level multiplier; the fire interval
    /// scales down, floored at `min_fire_interval`.
    pub fn derive(config: &TdConfig, kind: TurretKind, level: u8) -> Self {
        let spec = config.spec(kind);
        let multiplier = config.level_multiplier(level);
        let base_interval = config.duration_to_ticks(spec.fire_interval) as f32;
        let min_interval = config.duration_to_ticks(config.min_fire_interval);
        let fire_interval_ticks = match spec.attack {
            AttackMode::Continuous => 0,
            _ => ((base_interval / multiplier).floor() as u64).max(min_interval),
        };

        Self {
            damage: spec.damage * multiplier,
            range: spec.range * multiplier,
            fire_interval_ticks,
            attack: spec.attack,
            splash_radius: spec.splash_radius,
            slow_fraction: spec.slow_fraction,
            freezes: spec.freezes,
            ability: spec.ability,
        }
    }
}

/// What a turret did this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TurretAction {
    Idle,
    /// Launch a projectile.
    Fire(ProjectileRequest),
    /// Immediate damage to the target (execute turrets).
    Strike { target: EnemyId, damage: f32 },
    /// Continuous damage to the target for this tick.
    Beam { target: EnemyId, damage: f32 },
}

#[derive(Clone, Debug)]
pub struct Turret {
    pub kind: TurretKind,
    pub pos: Vec2,
    level: u8,
    stats: TurretStats,
    pub last_fired: Option<Tick>,
    /// Re-resolved every tick; never trusted across ticks.
    pub target: Option<EnemyId>,
    /// Facing angle in radians from +x.
    pub rotation: f32,
    ability_ready_at: Tick,
    muzzle_flash_until: Tick,
    pub hp: f32,
    pub max_hp: f32,
}

impl Turret {
    pub fn new(kind: TurretKind, pos: Vec2, level: u8, config: &TdConfig) -> Self {
        let level = level.clamp(1, config.max_level.max(1));
        let hp = config.spec(kind).hp;
        Self {
            kind,
            pos,
            level,
            stats: TurretStats::derive(config, kind, level),
            last_fired: None,
            target: None,
            rotation: 0.0,
            ability_ready_at: 0,
            muzzle_flash_until: 0,
            hp,
            max_hp: hp,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn stats(&self) -> &TurretStats {
        &self.stats
    }

    /// Raises the level by one and recomputes stats. Does not charge money.
    pub fn upgrade(&mut self, config: &TdConfig) -> Result<u8, UpgradeError> {
        if self.level >= config.max_level {
            return Err(UpgradeError::MaxLevel { level: self.level });
        }
        self.level += 1;
        self.stats = TurretStats::derive(config, self.kind, self.level);
        Ok(self.level)
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
    }

    pub fn repair(&mut self) {
        self.hp = self.max_hp;
    }

    pub fn ability_ready(&self, now: Tick) -> bool {
        self.stats.ability.is_some() && now >= self.ability_ready_at
    }

    pub fn muzzle_flash(&self, now: Tick) -> bool {
        now < self.muzzle_flash_until
    }

    pub fn can_fire(&self, now: Tick) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.stats.fire_interval_ticks,
        }
    }

    /// Nearest live enemy within range. Ties keep the first one iterated.
    pub fn acquire_target(&self, enemies: &SlotMap<EnemyId, Enemy>) -> Option<EnemyId> {
        let mut best: Option<(EnemyId, f32)> = None;
        for (id, enemy) in enemies.iter() {
            if !enemy.is_alive() {
                continue;
            }
            let distance = self.pos.distance(enemy.pos);
            if distance > self.stats.range {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn tick(&mut self, now: Tick, enemies: &SlotMap<EnemyId, Enemy>, config: &TdConfig) -> TurretAction {
        if self.is_destroyed() {
            self.target = None;
            return TurretAction::Idle;
        }

        self.target = self.acquire_target(enemies);
        let Some((target_id, target)) = self.target.and_then(|id| enemies.get(id).map(|e| (id, e))) else {
            return TurretAction::Idle;
        };

        let to_target = target.pos - self.pos;
        self.rotation = to_target.y.atan2(to_target.x);

        if self.stats.attack == AttackMode::Continuous {
            self.last_fired = Some(now);
            return TurretAction::Beam {
                target: target_id,
                damage: self.stats.damage,
            };
        }

        if !self.can_fire(now) {
            return TurretAction::Idle;
        }

        self.last_fired = Some(now);
        self.muzzle_flash_until = now + config.duration_to_ticks(config.muzzle_flash);

        match self.stats.attack {
            AttackMode::Execute => {
                let damage = if target.kind == EnemyKind::Boss {
                    self.stats.damage
                } else {
                    target.lethal_damage().max(self.stats.damage)
                };
                TurretAction::Strike {
                    target: target_id,
                    damage,
                }
            }
            _ => {
                let ability = self.consume_ability(now, config);
                TurretAction::Fire(ProjectileRequest {
                    origin: self.pos,
                    target: target.pos,
                    damage: self.stats.damage,
                    effect: ProjectileEffect {
                        splash_radius: self.stats.splash_radius,
                        slow_fraction: self.stats.slow_fraction,
                        freezes: self.stats.freezes,
                        piercing: ability == Some(TurretAbility::Piercing),
                        chain: ability == Some(TurretAbility::Chain),
                    },
                })
            }
        }
    }

    fn consume_ability(&mut self, now: Tick, config: &TdConfig) -> Option<TurretAbility> {
        if !self.ability_ready(now) {
            return None;
        }
        self.ability_ready_at = now + config.duration_to_ticks(config.ability_cooldown);
        self.stats.ability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemies_at(points: &[Vec2]) -> (SlotMap<EnemyId, Enemy>, Vec<EnemyId>) {
        let config = TdConfig::default();
        let profile = config.enemy(EnemyKind::Regular);
        let mut enemies = SlotMap::with_key();
        let ids = points
            .iter()
            .map(|&p| enemies.insert(Enemy::new(EnemyKind::Regular, profile, p, profile.health)))
            .collect();
        (enemies, ids)
    }

    #[test]
    fn level_multiplier_scales_stats() {
        let config = TdConfig::default();
        let l1 = TurretStats::derive(&config, TurretKind::Basic, 1);
        let l3 = TurretStats::derive(&config, TurretKind::Basic, 3);
        assert_eq!(l1.damage, 25.0);
        assert_eq!(l1.range, 150.0);
        assert_eq!(l1.fire_interval_ticks, 60);
        assert_eq!(l3.damage, 50.0);
        assert_eq!(l3.range, 300.0);
        assert_eq!(l3.fire_interval_ticks, 30);
    }

    #[test]
    fn fire_interval_is_floored() {
        let config = TdConfig::default();
        let rapid = TurretStats::derive(&config, TurretKind::Rapid, 3);
        // 24 ticks / 2.0 = 12, above the 6-tick floor.
        assert_eq!(rapid.fire_interval_ticks, 12);

        let mut fast = config.clone();
        fast.turrets.rapid.fire_interval = sim_core::Micros::from_millis(150);
        assert_eq!(TurretStats::derive(&fast, TurretKind::Rapid, 3).fire_interval_ticks, 6);
    }

    #[test]
    fn upgrade_stops_at_max_level_without_changing_stats() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::Sniper, Vec2::ZERO, 1, &config);
        assert_eq!(turret.upgrade(&config), Ok(2));
        assert_eq!(turret.upgrade(&config), Ok(3));
        let stats = turret.stats().clone();
        assert_eq!(turret.upgrade(&config), Err(UpgradeError::MaxLevel { level: 3 }));
        assert_eq!(turret.level(), 3);
        assert_eq!(turret.stats(), &stats);
    }

    #[test]
    fn targets_nearest_live_enemy_in_range() {
        let config = TdConfig::default();
        let turret = Turret::new(TurretKind::Basic, Vec2::ZERO, 1, &config);
        let (mut enemies, ids) = enemies_at(&[
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(200.0, 0.0),
        ]);
        assert_eq!(turret.acquire_target(&enemies), Some(ids[2]));

        enemies[ids[2]].apply_damage(1000.0);
        assert_eq!(turret.acquire_target(&enemies), Some(ids[1]));
    }

    #[test]
    fn equal_distance_keeps_first_iterated() {
        let config = TdConfig::default();
        let turret = Turret::new(TurretKind::Basic, Vec2::ZERO, 1, &config);
        let (enemies, ids) = enemies_at(&[Vec2::new(0.0, 40.0), Vec2::new(40.0, 0.0)]);
        assert_eq!(turret.acquire_target(&enemies), Some(ids[0]));
    }

    #[test]
    fn no_target_out_of_range() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::Basic, Vec2::ZERO, 1, &config);
        let (enemies, _) = enemies_at(&[Vec2::new(151.0, 0.0)]);
        assert_eq!(turret.tick(1, &enemies, &config), TurretAction::Idle);
        assert_eq!(turret.target, None);
        assert_eq!(turret.last_fired, None);
    }

    #[test]
    fn fire_rate_never_bursts() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::Basic, Vec2::ZERO, 1, &config);
        let (enemies, _) = enemies_at(&[Vec2::new(30.0, 40.0)]);

        let shots: Vec<Tick> = (1..=200)
            .filter(|&t| matches!(turret.tick(t, &enemies, &config), TurretAction::Fire(_)))
            .collect();
        assert_eq!(shots, vec![1, 61, 121, 181]);
        assert!(shots.windows(2).all(|w| w[1] - w[0] >= 60));
    }

    #[test]
    fn facing_follows_target() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::Basic, Vec2::ZERO, 1, &config);
        let (enemies, _) = enemies_at(&[Vec2::new(0.0, 100.0)]);
        turret.tick(1, &enemies, &config);
        assert!((turret.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(turret.muzzle_flash(1));
        assert!(!turret.muzzle_flash(7));
    }

    #[test]
    fn piercing_ability_has_its_own_cooldown() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::Sniper, Vec2::ZERO, 1, &config);
        let (enemies, _) = enemies_at(&[Vec2::new(100.0, 0.0)]);

        let piercing_at = |action: TurretAction| match action {
            TurretAction::Fire(req) => Some(req.effect.piercing),
            _ => None,
        };

        // Fires every 120 ticks; ability refreshes after 300.
        assert_eq!(piercing_at(turret.tick(1, &enemies, &config)), Some(true));
        assert_eq!(piercing_at(turret.tick(121, &enemies, &config)), Some(false));
        assert_eq!(piercing_at(turret.tick(241, &enemies, &config)), Some(false));
        assert!(turret.ability_ready(301));
        assert_eq!(piercing_at(turret.tick(361, &enemies, &config)), Some(true));
    }

    #[test]
    fn laser_damages_every_tick() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::Laser, Vec2::ZERO, 1, &config);
        let (enemies, ids) = enemies_at(&[Vec2::new(50.0, 0.0)]);
        for t in 1..=5 {
            assert_eq!(
                turret.tick(t, &enemies, &config),
                TurretAction::Beam {
                    target: ids[0],
                    damage: config.spec(TurretKind::Laser).damage
                }
            );
        }
    }

    #[test]
    fn execute_kills_regular_but_not_boss() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::InstantKill, Vec2::ZERO, 1, &config);
        let (mut enemies, ids) = enemies_at(&[Vec2::new(50.0, 0.0)]);

        let TurretAction::Strike { damage, .. } = turret.tick(1, &enemies, &config) else {
            panic!("expected a strike");
        };
        assert!(enemies[ids[0]].apply_damage(damage) == crate::enemy::DamageOutcome::Killed);

        let boss = config.enemy(EnemyKind::Boss);
        let boss_id = enemies.insert(Enemy::new(EnemyKind::Boss, boss, Vec2::new(20.0, 0.0), boss.health));
        let mut turret = Turret::new(TurretKind::InstantKill, Vec2::ZERO, 1, &config);
        assert_eq!(
            turret.tick(1, &enemies, &config),
            TurretAction::Strike {
                target: boss_id,
                damage: 100.0
            }
        );
    }

    #[test]
    fn destroyed_turret_is_idle() {
        let config = TdConfig::default();
        let mut turret = Turret::new(TurretKind::Basic, Vec2::ZERO, 1, &config);
        let (enemies, _) = enemies_at(&[Vec2::new(10.0, 0.0)]);
        turret.take_damage(150.0);
        assert!(turret.is_destroyed());
        assert_eq!(turret.tick(1, &enemies, &config), TurretAction::Idle);
        turret.repair();
        assert_eq!(turret.hp, turret.max_hp);
    }
}
