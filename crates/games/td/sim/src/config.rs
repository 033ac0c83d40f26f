use glam::IVec2;
use serde::{Deserialize, Serialize};
use sim_core::Micros;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Regular,
    Fast,
    Heavy,
    Armored,
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Regular,
        EnemyKind::Fast,
        EnemyKind::Heavy,
        EnemyKind::Armored,
        EnemyKind::Boss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Regular => "regular",
            EnemyKind::Fast => "fast",
            EnemyKind::Heavy => "heavy",
            EnemyKind::Armored => "armored",
            EnemyKind::Boss => "boss",
        }
    }

    /// Unrecognized names resolve to `Regular`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_else(|| {
                tracing::warn!(name, "unknown enemy type, using regular profile");
                EnemyKind::Regular
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurretKind {
    Basic,
    Sniper,
    Rapid,
    Splash,
    Laser,
    InstantKill,
    Freeze,
}

impl TurretKind {
    pub const ALL: [TurretKind; 7] = [
        TurretKind::Basic,
        TurretKind::Sniper,
        TurretKind::Rapid,
        TurretKind::Splash,
        TurretKind::Laser,
        TurretKind::InstantKill,
        TurretKind::Freeze,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TurretKind::Basic => "basic",
            TurretKind::Sniper => "sniper",
            TurretKind::Rapid => "rapid",
            TurretKind::Splash => "splash",
            TurretKind::Laser => "laser",
            TurretKind::InstantKill => "instant_kill",
            TurretKind::Freeze => "freeze",
        }
    }

    /// Unrecognized names resolve to `Basic`. Accepts `instant-kill` as well as `instant_kill`.
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(&normalized))
            .unwrap_or_else(|| {
                tracing::warn!(name, "unknown turret type, using basic profile");
                TurretKind::Basic
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialWeaponKind {
    Bomb,
    FreezeField,
    RepairAll,
}

impl SpecialWeaponKind {
    pub const COUNT: usize = 3;

    pub const ALL: [SpecialWeaponKind; Self::COUNT] = [
        SpecialWeaponKind::Bomb,
        SpecialWeaponKind::FreezeField,
        SpecialWeaponKind::RepairAll,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpecialWeaponKind::Bomb => "bomb",
            SpecialWeaponKind::FreezeField => "freeze_field",
            SpecialWeaponKind::RepairAll => "repair_all",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Base stats for one enemy type. Speeds are world units per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub health: f32,
    pub speed: f32,
    /// Incoming damage is divided by this; above 1 resists, below 1 amplifies.
    pub armor: f32,
    pub money_reward: u32,
    pub score_reward: u64,
    /// Damage per tick dealt to every turret within `TdConfig::siege_range`.
    #[serde(default)]
    pub siege_damage: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfiles {
    pub regular: EnemyProfile,
    pub fast: EnemyProfile,
    pub heavy: EnemyProfile,
    pub armored: EnemyProfile,
    pub boss: EnemyProfile,
}

impl EnemyProfiles {
    pub fn get(&self, kind: EnemyKind) -> &EnemyProfile {
        match kind {
            EnemyKind::Regular => &self.regular,
            EnemyKind::Fast => &self.fast,
            EnemyKind::Heavy => &self.heavy,
            EnemyKind::Armored => &self.armored,
            EnemyKind::Boss => &self.boss,
        }
    }
}

impl Default for EnemyProfiles {
    fn default() -> Self {
        Self {
            regular: EnemyProfile {
                health: 100.0,
                speed: 2.5,
                armor: 1.0,
                money_reward: 25,
                score_reward: 10,
                siege_damage: 0.0,
            },
            fast: EnemyProfile {
                health: 60.0,
                speed: 4.0,
                armor: 0.8,
                money_reward: 20,
                score_reward: 15,
                siege_damage: 0.0,
            },
            heavy: EnemyProfile {
                health: 250.0,
                speed: 1.5,
                armor: 1.5,
                money_reward: 40,
                score_reward: 25,
                siege_damage: 0.2,
            },
            armored: EnemyProfile {
                health: 150.0,
                speed: 2.0,
                armor: 2.0,
                money_reward: 35,
                score_reward: 30,
                siege_damage: 0.0,
            },
            boss: EnemyProfile {
                health: 1200.0,
                speed: 1.2,
                armor: 2.5,
                money_reward: 200,
                score_reward: 150,
                siege_damage: 0.5,
            },
        }
    }
}

/// How a turret delivers damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackMode {
    /// Launches a projectile at the target's current position.
    Projectile,
    /// Damages the target immediately; non-boss targets are destroyed outright.
    Execute,
    /// Damages the target every tick it stays in range. No discrete shots.
    Continuous,
}

/// Cooldown-gated modifier applied to the next shot when ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurretAbility {
    Piercing,
    Chain,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretSpec {
    pub cost: u32,
    /// Charged per current level: going from level `n` to `n + 1` costs `upgrade_cost * n`.
    pub upgrade_cost: u32,
    /// Per shot, or per tick for `AttackMode::Continuous`.
    pub damage: f32,
    pub range: f32,
    pub fire_interval: Micros,
    pub attack: AttackMode,
    #[serde(default)]
    pub splash_radius: f32,
    #[serde(default)]
    pub slow_fraction: f32,
    #[serde(default)]
    pub freezes: bool,
    #[serde(default)]
    pub ability: Option<TurretAbility>,
    pub hp: f32,
}

impl TurretSpec {
    fn projectile(cost: u32, upgrade_cost: u32, damage: f32, range: f32, millis: u32) -> Self {
        Self {
            cost,
            upgrade_cost,
            damage,
            range,
            fire_interval: Micros::from_millis(millis),
            attack: AttackMode::Projectile,
            splash_radius: 0.0,
            slow_fraction: 0.0,
            freezes: false,
            ability: None,
            hp: 100.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretSpecs {
    pub basic: TurretSpec,
    pub sniper: TurretSpec,
    pub rapid: TurretSpec,
    pub splash: TurretSpec,
    pub laser: TurretSpec,
    pub instant_kill: TurretSpec,
    pub freeze: TurretSpec,
}

impl TurretSpecs {
    pub fn get(&self, kind: TurretKind) -> &TurretSpec {
        match kind {
            TurretKind::Basic => &self.basic,
            TurretKind::Sniper => &self.sniper,
            TurretKind::Rapid => &self.rapid,
            TurretKind::Splash => &self.splash,
            TurretKind::Laser => &self.laser,
            TurretKind::InstantKill => &self.instant_kill,
            TurretKind::Freeze => &self.freeze,
        }
    }
}

impl Default for TurretSpecs {
    fn default() -> Self {
        Self {
            basic: TurretSpec::projectile(75, 50, 25.0, 150.0, 1000),
            sniper: TurretSpec {
                ability: Some(TurretAbility::Piercing),
                ..TurretSpec::projectile(150, 100, 75.0, 250.0, 2000)
            },
            rapid: TurretSpec {
                ability: Some(TurretAbility::Chain),
                ..TurretSpec::projectile(100, 75, 10.0, 120.0, 400)
            },
            splash: TurretSpec {
                splash_radius: 50.0,
                slow_fraction: 0.3,
                ..TurretSpec::projectile(200, 125, 20.0, 130.0, 1500)
            },
            laser: TurretSpec {
                attack: AttackMode::Continuous,
                fire_interval: Micros::ZERO,
                ..TurretSpec::projectile(250, 150, 0.8, 140.0, 0)
            },
            instant_kill: TurretSpec {
                attack: AttackMode::Execute,
                ..TurretSpec::projectile(300, 200, 100.0, 160.0, 4000)
            },
            freeze: TurretSpec {
                freezes: true,
                ..TurretSpec::projectile(175, 100, 5.0, 120.0, 2000)
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialWeaponSpec {
    pub cost: u32,
    pub cooldown: Micros,
    /// Damage dealt to each enemy (bomb only).
    #[serde(default)]
    pub damage: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialWeapons {
    pub bomb: SpecialWeaponSpec,
    pub freeze_field: SpecialWeaponSpec,
    pub repair_all: SpecialWeaponSpec,
}

impl SpecialWeapons {
    pub fn get(&self, kind: SpecialWeaponKind) -> &SpecialWeaponSpec {
        match kind {
            SpecialWeaponKind::Bomb => &self.bomb,
            SpecialWeaponKind::FreezeField => &self.freeze_field,
            SpecialWeaponKind::RepairAll => &self.repair_all,
        }
    }
}

impl Default for SpecialWeapons {
    fn default() -> Self {
        Self {
            bomb: SpecialWeaponSpec {
                cost: 150,
                cooldown: Micros::from_secs(20),
                damage: 150.0,
            },
            freeze_field: SpecialWeaponSpec {
                cost: 100,
                cooldown: Micros::from_secs(15),
                damage: 0.0,
            },
            repair_all: SpecialWeaponSpec {
                cost: 80,
                cooldown: Micros::from_secs(10),
                damage: 0.0,
            },
        }
    }
}

/// A named path layout. Waypoints are tile coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub name: String,
    pub waypoints: Vec<IVec2>,
}

impl MapConfig {
    fn new(name: &str, waypoints: &[(i32, i32)]) -> Self {
        Self {
            name: name.to_string(),
            waypoints: waypoints.iter().map(|&(x, y)| IVec2::new(x, y)).collect(),
        }
    }

    pub fn builtin() -> Vec<MapConfig> {
        vec![
            MapConfig::new(
                "Serpentine",
                &[(0, 3), (10, 3), (10, 8), (5, 8), (5, 12), (19, 12)],
            ),
            MapConfig::new(
                "Switchback",
                &[(0, 1), (17, 1), (17, 5), (2, 5), (2, 9), (17, 9), (17, 13), (19, 13)],
            ),
            MapConfig::new(
                "Crossing",
                &[(0, 7), (6, 7), (6, 2), (13, 2), (13, 12), (19, 12)],
            ),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyUnlock {
    pub kind: EnemyKind,
    pub from_wave: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TdConfig {
    pub tick_hz: u32,

    // World
    pub world_width: f32,
    pub world_height: f32,
    pub tile_size: f32,
    pub maps: Vec<MapConfig>,
    pub start_map: usize,
    /// Placement exclusion distance around the path, in tiles.
    pub path_buffer_tiles: f32,
    /// Minimum distance between two turret centers.
    pub turret_spacing: f32,

    // Session
    pub start_money: u32,
    pub start_lives: u32,

    // Waves
    pub waves_total: Option<u32>,
    pub initial_wave_delay: Micros,
    pub wave_grace_delay: Micros,
    pub wave_base_size: u16,
    pub wave_size_growth: u16,
    pub spawn_interval: Micros,
    pub boss_spawn_delay: Micros,
    pub boss_every: u32,
    pub enemy_unlocks: Vec<EnemyUnlock>,
    /// Max health added per wave after the first.
    pub health_per_wave: f32,

    // Enemies
    pub enemies: EnemyProfiles,
    pub explosion_frames: u32,
    pub min_enemy_speed: f32,
    pub slow_duration: Micros,
    pub freeze_duration: Micros,
    pub siege_range: f32,

    // Turrets
    pub turrets: TurretSpecs,
    pub max_level: u8,
    pub level_multiplier_step: f32,
    pub min_fire_interval: Micros,
    pub ability_cooldown: Micros,
    pub muzzle_flash: Micros,

    // Projectiles
    pub projectile_speed: f32,
    pub hit_radius: f32,
    pub chain_max_hits: u32,

    pub special_weapons: SpecialWeapons,
}

impl TdConfig {
    pub fn spec(&self, kind: TurretKind) -> &TurretSpec {
        self.turrets.get(kind)
    }

    pub fn enemy(&self, kind: EnemyKind) -> &EnemyProfile {
        self.enemies.get(kind)
    }

    pub fn weapon(&self, kind: SpecialWeaponKind) -> &SpecialWeaponSpec {
        self.special_weapons.get(kind)
    }

    pub fn duration_to_ticks(&self, d: Micros) -> u64 {
        d.to_ticks(self.tick_hz)
    }

    /// `1 + (level - 1) * step`.
    pub fn level_multiplier(&self, level: u8) -> f32 {
        1.0 + (level.max(1) - 1) as f32 * self.level_multiplier_step
    }

    /// Cost of raising a turret from `level` to `level + 1`, or `None` at max level.
    pub fn upgrade_cost(&self, kind: TurretKind, level: u8) -> Option<u32> {
        (level < self.max_level).then(|| self.spec(kind).upgrade_cost * level as u32)
    }

    pub fn path_buffer(&self) -> f32 {
        self.path_buffer_tiles * self.tile_size
    }

    pub fn wave_size(&self, wave: u32) -> u16 {
        self.wave_base_size
            .saturating_add(self.wave_size_growth.saturating_mul(wave.min(u16::MAX as u32) as u16))
    }

    pub fn is_boss_wave(&self, wave: u32) -> bool {
        self.boss_every > 0 && wave > 0 && wave % self.boss_every == 0
    }

    /// Enemy kinds a wave may draw from, in unlock order. Never contains the boss.
    pub fn enemy_pool(&self, wave: u32) -> Vec<EnemyKind> {
        let mut pool: Vec<EnemyKind> = self
            .enemy_unlocks
            .iter()
            .filter(|u| u.kind != EnemyKind::Boss && wave >= u.from_wave)
            .map(|u| u.kind)
            .collect();
        if pool.is_empty() {
            pool.push(EnemyKind::Regular);
        }
        pool
    }

    pub fn enemy_max_health(&self, kind: EnemyKind, wave: u32) -> f32 {
        self.enemy(kind).health + self.health_per_wave * wave.saturating_sub(1) as f32
    }
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,

            world_width: 800.0,
            world_height: 600.0,
            tile_size: 40.0,
            maps: MapConfig::builtin(),
            start_map: 0,
            path_buffer_tiles: 0.75,
            turret_spacing: 40.0,

            start_money: 300,
            start_lives: 10,

            waves_total: None,
            initial_wave_delay: Micros::from_secs(3),
            wave_grace_delay: Micros::from_secs(3),
            wave_base_size: 5,
            wave_size_growth: 2,
            spawn_interval: Micros::from_secs(1),
            boss_spawn_delay: Micros::from_secs(3),
            boss_every: 5,
            enemy_unlocks: vec![
                EnemyUnlock {
                    kind: EnemyKind::Regular,
                    from_wave: 1,
                },
                EnemyUnlock {
                    kind: EnemyKind::Fast,
                    from_wave: 3,
                },
                EnemyUnlock {
                    kind: EnemyKind::Heavy,
                    from_wave: 5,
                },
                EnemyUnlock {
                    kind: EnemyKind::Armored,
                    from_wave: 7,
                },
            ],
            health_per_wave: 20.0,

            enemies: EnemyProfiles::default(),
            explosion_frames: 10,
            min_enemy_speed: 0.5,
            slow_duration: Micros::from_secs(2),
            freeze_duration: Micros::from_millis(1500),
            siege_range: 45.0,

            turrets: TurretSpecs::default(),
            max_level: 3,
            level_multiplier_step: 0.5,
            min_fire_interval: Micros::from_millis(100),
            ability_cooldown: Micros::from_secs(5),
            muzzle_flash: Micros::from_millis(100),

            projectile_speed: 10.0,
            hit_radius: 20.0,
            chain_max_hits: 3,

            special_weapons: SpecialWeapons::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_defaults() {
        assert_eq!(TurretKind::from_name("railgun"), TurretKind::Basic);
        assert_eq!(EnemyKind::from_name("dragon"), EnemyKind::Regular);
        assert_eq!(TurretKind::from_name("Instant-Kill"), TurretKind::InstantKill);
        assert_eq!(EnemyKind::from_name(" BOSS "), EnemyKind::Boss);
    }

    #[test]
    fn wave_size_grows_linearly() {
        let config = TdConfig::default();
        assert_eq!(config.wave_size(1), 7);
        assert_eq!(config.wave_size(5), 15);
        assert_eq!(config.wave_size(10), 25);
    }

    #[test]
    fn pool_unlocks_by_wave_and_excludes_boss() {
        let config = TdConfig::default();
        assert_eq!(config.enemy_pool(1), vec![EnemyKind::Regular]);
        assert_eq!(config.enemy_pool(3), vec![EnemyKind::Regular, EnemyKind::Fast]);
        assert_eq!(config.enemy_pool(9).len(), 4);
        assert!(!config.enemy_pool(50).contains(&EnemyKind::Boss));
        assert!(config.is_boss_wave(5));
        assert!(config.is_boss_wave(10));
        assert!(!config.is_boss_wave(4));
    }

    #[test]
    fn upgrade_cost_scales_with_level_and_stops_at_max() {
        let config = TdConfig::default();
        assert_eq!(config.upgrade_cost(TurretKind::Basic, 1), Some(50));
        assert_eq!(config.upgrade_cost(TurretKind::Basic, 2), Some(100));
        assert_eq!(config.upgrade_cost(TurretKind::Basic, 3), None);
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config: TdConfig =
            serde_json::from_str(r#"{"start_money": 1000, "wave_grace_delay": 500}"#).unwrap();
        assert_eq!(config.start_money, 1000);
        assert_eq!(config.wave_grace_delay, Micros::from_millis(500));
        assert_eq!(config.start_lives, 10);
        assert_eq!(config.maps.len(), 3);
    }

    #[test]
    fn out_of_range_duration_is_rejected() {
        let err = serde_json::from_str::<TdConfig>(r#"{"initial_wave_delay": 5000000}"#).unwrap_err();
        assert!(err.to_string().contains("5000000 ms"), "{err}");

        let config: TdConfig = serde_json::from_str(r#"{"initial_wave_delay": 4294967}"#).unwrap();
        assert_eq!(config.initial_wave_delay.as_millis(), 4_294_967);
    }

    #[test]
    fn enemy_health_grows_each_wave() {
        let config = TdConfig::default();
        assert_eq!(config.enemy_max_health(EnemyKind::Regular, 1), 100.0);
        assert_eq!(config.enemy_max_health(EnemyKind::Regular, 3), 140.0);
    }
}
