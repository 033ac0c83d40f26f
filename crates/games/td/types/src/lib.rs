//! Canonical serializable types for the Turret Defense game.
//!
//! These are the read-only snapshots handed to presentation layers
//! (renderer, HUD, audio) and written by the headless runner's `--json` mode.

use serde::{Deserialize, Serialize};

/// Point in world space (pixels).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Current wave status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(tag = "type")]
pub enum WaveStatus {
    /// Between waves, waiting for the next wave to start.
    Pause {
        /// Tick when the next wave starts.
        #[serde(default)]
        until_tick: u64,
        /// Number of enemies the next wave will spawn.
        #[serde(default)]
        next_wave_size: u16,
    },
    /// Wave in progress.
    InWave {
        /// Enemies spawned so far this wave.
        spawned: u16,
        /// Total enemies in this wave.
        wave_size: u16,
        /// Tick of the next scheduled spawn, if any remain.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_spawn_tick: Option<u64>,
    },
    /// Final wave cleared.
    Finished,
}

impl Default for WaveStatus {
    fn default() -> Self {
        Self::Pause {
            until_tick: 0,
            next_wave_size: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct EnemyInfo {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub max_health: f32,
    pub exploding: bool,
    /// Explosion progress in `[0, 1]`; zero while alive.
    pub explosion_progress: f32,
    pub frozen: bool,
    pub slowed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TurretInfo {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    /// Facing angle in radians, measured from the +x axis.
    pub rotation: f32,
    pub level: u8,
    pub max_level: u8,
    pub range: f32,
    pub damage: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub muzzle_flash: bool,
    pub ability_ready: bool,
    /// `None` once the turret is at max level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_cost: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ProjectileInfo {
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SpecialWeaponInfo {
    pub kind: String,
    pub cost: u32,
    /// Ticks until the weapon can be used again; zero when ready.
    pub ready_in_ticks: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ShopEntry {
    pub kind: String,
    pub cost: u32,
    pub range: f32,
    pub affordable: bool,
}

/// Full game state observation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TdObservation {
    pub tick: u64,
    pub ticks_per_second: u32,

    pub world_width: f32,
    pub world_height: f32,
    pub tile_size: f32,
    pub map_index: usize,
    pub map_name: String,
    /// Path waypoints in world space.
    pub path: Vec<Point>,

    pub money: u32,
    pub score: u64,
    pub lives: u32,
    pub game_over: bool,

    pub current_wave: u32,
    pub wave_in_progress: bool,
    pub wave_status: WaveStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_turret_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_turret: Option<String>,

    pub shop: Vec<ShopEntry>,
    pub special_weapons: Vec<SpecialWeaponInfo>,
    pub enemies: Vec<EnemyInfo>,
    pub turrets: Vec<TurretInfo>,
    pub projectiles: Vec<ProjectileInfo>,
}
