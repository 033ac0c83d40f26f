use crate::config::{EnemyKind, EnemyProfile};
use crate::path::Path;
use glam::Vec2;

/// Lifecycle of an enemy.
///
/// `Alive -> Exploding -> Dead` for kills, `Alive -> Leaked` for enemies that
/// reach the end of the path. `Dead` and `Leaked` are removed at the end of
/// the movement phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStatus {
    Alive,
    Exploding { frame: u32 },
    Dead,
    Leaked,
}

/// Result of `Enemy::apply_damage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Enemy was not alive; nothing changed.
    Ignored,
    Hit,
    /// This hit started the explosion. Reported exactly once per enemy.
    Killed,
}

/// What happened to an enemy during `advance`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStep {
    Moved,
    Frozen,
    Exploding,
    /// Explosion finished this tick.
    Died,
    /// Passed the last waypoint this tick.
    Leaked,
    /// Already dead or leaked.
    Inert,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Current per-tick speed after freeze/slow.
    pub speed: f32,
    pub original_speed: f32,
    pub armor: f32,
    pub money_reward: u32,
    pub score_reward: u64,
    pub siege_damage: f32,
    /// Index of the waypoint currently being walked toward.
    pub path_index: usize,
    pub status: EnemyStatus,
    slow_speed: f32,
    slow_ticks: u64,
    freeze_ticks: u64,
}

impl Enemy {
    /// Builds an enemy from its profile at `start`, walking toward the first waypoint.
    pub fn new(kind: EnemyKind, profile: &EnemyProfile, start: Vec2, max_health: f32) -> Self {
        let max_health = max_health.max(1.0);
        Self {
            kind,
            pos: start,
            health: max_health,
            max_health,
            speed: profile.speed,
            original_speed: profile.speed,
            armor: if profile.armor > 0.0 { profile.armor } else { 1.0 },
            money_reward: profile.money_reward,
            score_reward: profile.score_reward,
            siege_damage: profile.siege_damage,
            path_index: 0,
            status: EnemyStatus::Alive,
            slow_speed: profile.speed,
            slow_ticks: 0,
            freeze_ticks: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == EnemyStatus::Alive
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.status, EnemyStatus::Exploding { .. })
    }

    /// Dead or leaked: ready to be compacted out of the arena.
    pub fn is_removable(&self) -> bool {
        matches!(self.status, EnemyStatus::Dead | EnemyStatus::Leaked)
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_ticks > 0
    }

    pub fn is_slowed(&self) -> bool {
        self.slow_ticks > 0
    }

    pub fn explosion_progress(&self, explosion_frames: u32) -> f32 {
        match self.status {
            EnemyStatus::Exploding { frame } => frame as f32 / explosion_frames.max(1) as f32,
            EnemyStatus::Dead => 1.0,
            _ => 0.0,
        }
    }

    /// Raw damage that exactly empties the remaining health after armor.
    pub fn lethal_damage(&self) -> f32 {
        self.health.max(0.0) * self.armor
    }

    pub fn advance(&mut self, path: &Path, explosion_frames: u32) -> EnemyStep {
        match self.status {
            EnemyStatus::Exploding { frame } => {
                let frame = frame + 1;
                if frame >= explosion_frames {
                    self.status = EnemyStatus::Dead;
                    return EnemyStep::Died;
                }
                self.status = EnemyStatus::Exploding { frame };
                return EnemyStep::Exploding;
            }
            EnemyStatus::Dead | EnemyStatus::Leaked => return EnemyStep::Inert,
            EnemyStatus::Alive => {}
        }

        if self.freeze_ticks > 0 {
            self.freeze_ticks -= 1;
            self.refresh_speed();
            return EnemyStep::Frozen;
        }

        let step = match path.waypoint(self.path_index) {
            None => {
                self.status = EnemyStatus::Leaked;
                EnemyStep::Leaked
            }
            Some(target) => {
                let delta = target - self.pos;
                let distance = delta.length();
                if distance <= self.speed {
                    self.pos = target;
                    self.path_index += 1;
                    if self.path_index >= path.len() {
                        self.status = EnemyStatus::Leaked;
                        EnemyStep::Leaked
                    } else {
                        EnemyStep::Moved
                    }
                } else {
                    self.pos += delta / distance * self.speed;
                    EnemyStep::Moved
                }
            }
        };

        if self.slow_ticks > 0 {
            self.slow_ticks -= 1;
            self.refresh_speed();
        }

        step
    }

    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }

        self.health -= amount / self.armor;
        if self.health <= 0.0 {
            self.status = EnemyStatus::Exploding { frame: 0 };
            self.freeze_ticks = 0;
            self.slow_ticks = 0;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hit
        }
    }

    /// Slows to `original_speed * (1 - fraction)`, never below `min_speed`.
    /// Reapplying refreshes the duration and does not stack.
    pub fn apply_slow(&mut self, fraction: f32, min_speed: f32, ticks: u64) {
        if !self.is_alive() || fraction <= 0.0 {
            return;
        }
        let slowed = self.original_speed * (1.0 - fraction.clamp(0.0, 1.0));
        self.slow_speed = slowed.max(min_speed).min(self.original_speed);
        self.slow_ticks = ticks;
        self.refresh_speed();
    }

    /// Stops the enemy for `ticks`. Reapplying refreshes the duration.
    pub fn apply_freeze(&mut self, ticks: u64) {
        if !self.is_alive() {
            return;
        }
        self.freeze_ticks = ticks;
        self.refresh_speed();
    }

    fn refresh_speed(&mut self) {
        self.speed = if self.freeze_ticks > 0 {
            0.0
        } else if self.slow_ticks > 0 {
            self.slow_speed
        } else {
            self.original_speed
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TdConfig;
    use glam::IVec2;

    fn straight_path() -> Path {
        Path::new(&[IVec2::new(0, 0), IVec2::new(1, 0)], 10.0).unwrap()
    }

    fn enemy(kind: EnemyKind) -> Enemy {
        let config = TdConfig::default();
        Enemy::new(kind, config.enemy(kind), Vec2::ZERO, config.enemy(kind).health)
    }

    #[test]
    fn armor_divides_incoming_damage() {
        let mut armored = enemy(EnemyKind::Armored);
        assert_eq!(armored.armor, 2.0);
        assert_eq!(armored.apply_damage(100.0), DamageOutcome::Hit);
        assert_eq!(armored.health, 100.0);

        let mut fast = enemy(EnemyKind::Fast);
        fast.apply_damage(40.0);
        assert!((fast.health - 10.0).abs() < 1e-4);
    }

    #[test]
    fn kill_is_reported_once_and_freezes_health() {
        let mut e = enemy(EnemyKind::Regular);
        assert_eq!(e.apply_damage(60.0), DamageOutcome::Hit);
        assert_eq!(e.apply_damage(60.0), DamageOutcome::Killed);
        let health = e.health;
        assert_eq!(e.apply_damage(60.0), DamageOutcome::Ignored);
        assert_eq!(e.health, health);
        assert!(e.is_exploding());
    }

    #[test]
    fn explosion_runs_for_configured_frames() {
        let path = straight_path();
        let mut e = enemy(EnemyKind::Regular);
        e.apply_damage(1000.0);
        let pos = e.pos;

        for _ in 0..9 {
            assert_eq!(e.advance(&path, 10), EnemyStep::Exploding);
        }
        assert_eq!(e.advance(&path, 10), EnemyStep::Died);
        assert!(e.is_removable());
        assert_eq!(e.pos, pos);
        assert_eq!(e.advance(&path, 10), EnemyStep::Inert);
    }

    #[test]
    fn walks_snaps_and_leaks() {
        let path = straight_path();
        let mut e = enemy(EnemyKind::Regular);
        e.original_speed = 4.0;
        e.speed = 4.0;

        // Spawned on the first waypoint: snaps immediately.
        assert_eq!(e.advance(&path, 10), EnemyStep::Moved);
        assert_eq!(e.path_index, 1);
        assert_eq!(e.advance(&path, 10), EnemyStep::Moved);
        assert_eq!(e.pos, Vec2::new(4.0, 0.0));
        assert_eq!(e.advance(&path, 10), EnemyStep::Moved);
        assert_eq!(e.pos, Vec2::new(8.0, 0.0));
        // 2 units left, within one step: snap onto the final waypoint and leak.
        assert_eq!(e.advance(&path, 10), EnemyStep::Leaked);
        assert_eq!(e.pos, Vec2::new(10.0, 0.0));
        assert_eq!(e.status, EnemyStatus::Leaked);
        assert_eq!(e.apply_damage(500.0), DamageOutcome::Ignored);
    }

    #[test]
    fn slow_refreshes_without_stacking_and_respects_floor() {
        let mut e = enemy(EnemyKind::Regular);
        e.apply_slow(0.3, 0.5, 10);
        assert!((e.speed - 1.75).abs() < 1e-6);
        e.apply_slow(0.3, 0.5, 10);
        assert!((e.speed - 1.75).abs() < 1e-6);

        e.apply_slow(0.99, 0.5, 10);
        assert_eq!(e.speed, 0.5);
    }

    #[test]
    fn slow_expires_back_to_original_speed() {
        let path = Path::new(&[IVec2::new(0, 0), IVec2::new(100, 0)], 10.0).unwrap();
        let mut e = enemy(EnemyKind::Regular);
        e.apply_slow(0.5, 0.5, 2);
        e.advance(&path, 10);
        assert!(e.is_slowed());
        e.advance(&path, 10);
        assert!(!e.is_slowed());
        assert_eq!(e.speed, e.original_speed);
    }

    #[test]
    fn frozen_enemy_holds_position_then_resumes() {
        let path = Path::new(&[IVec2::new(0, 0), IVec2::new(100, 0)], 10.0).unwrap();
        let mut e = enemy(EnemyKind::Regular);
        e.advance(&path, 10);
        e.apply_freeze(3);
        let pos = e.pos;

        for _ in 0..3 {
            assert_eq!(e.advance(&path, 10), EnemyStep::Frozen);
            assert_eq!(e.pos, pos);
        }
        assert_eq!(e.speed, e.original_speed);
        assert_eq!(e.advance(&path, 10), EnemyStep::Moved);
        assert!(e.pos.x > pos.x);
    }

    #[test]
    fn frozen_enemy_can_still_be_killed() {
        let mut e = enemy(EnemyKind::Regular);
        e.apply_freeze(30);
        assert_eq!(e.apply_damage(100.0), DamageOutcome::Killed);
        assert!(!e.is_frozen());
    }
}
