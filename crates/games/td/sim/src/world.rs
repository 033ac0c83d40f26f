use crate::config::{SpecialWeaponKind, TdConfig, TurretKind};
use crate::economy::Economy;
use crate::enemy::Enemy;
use crate::errors::MapSelectError;
use crate::path::Path;
use crate::projectile::Projectile;
use crate::turret::Turret;
use crate::wave::WaveDirector;
use glam::Vec2;
use sim_core::Tick;
use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct TurretId; }
new_key_type! { pub struct EnemyId; }
new_key_type! { pub struct ProjectileId; }

#[derive(Clone, Debug, Default)]
pub struct World {
    pub turrets: SlotMap<TurretId, Turret>,
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub projectiles: SlotMap<ProjectileId, Projectile>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enemies still in the simulation, including ones mid-explosion.
    pub fn live_enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn turret_at(&self, point: Vec2, radius: f32) -> Option<TurretId> {
        self.turrets
            .iter()
            .filter(|(_, t)| t.pos.distance(point) < radius)
            .min_by(|(_, a), (_, b)| a.pos.distance(point).total_cmp(&b.pos.distance(point)))
            .map(|(id, _)| id)
    }
}

/// UI selection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub turret_type: Option<TurretKind>,
    pub turret: Option<TurretId>,
}

#[derive(Clone, Debug)]
pub struct TdState {
    pub config: TdConfig,
    pub tick: Tick,
    pub world: World,
    pub path: Path,
    pub map_index: usize,
    pub director: WaveDirector,
    pub economy: Economy,
    pub selection: Selection,
    /// Tick at which each special weapon is usable again, indexed by kind.
    pub weapon_ready_at: [Tick; SpecialWeaponKind::COUNT],
}

impl TdState {
    /// Builds the initial state. An invalid starting map is replaced by the
    /// first valid built-in map.
    pub fn new(mut config: TdConfig, seed: u64) -> Self {
        let (map_index, path) = match load_path(&config, config.start_map) {
            Ok(path) => (config.start_map, path),
            Err(err) => {
                tracing::warn!(%err, "start map unusable, falling back to built-in maps");
                config.maps = crate::config::MapConfig::builtin();
                let path = load_path(&config, 0).unwrap_or_else(|_| builtin_fallback_path(&config));
                (0, path)
            }
        };

        Self {
            director: WaveDirector::new(&config, seed),
            economy: Economy::new(config.start_money, config.start_lives),
            tick: 0,
            world: World::new(),
            path,
            map_index,
            selection: Selection::default(),
            weapon_ready_at: [0; SpecialWeaponKind::COUNT],
            config,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.config.world_width, self.config.world_height)
    }

    pub fn in_bounds(&self, point: Vec2) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x <= self.config.world_width
            && point.y <= self.config.world_height
    }

    pub fn is_on_path(&self, point: Vec2) -> bool {
        self.path.is_on_path(point, self.config.path_buffer())
    }

    pub fn map_name(&self) -> &str {
        self.config
            .maps
            .get(self.map_index)
            .map(|m| m.name.as_str())
            .unwrap_or("")
    }
}

pub fn load_path(config: &TdConfig, index: usize) -> Result<Path, MapSelectError> {
    let map = config
        .maps
        .get(index)
        .ok_or(MapSelectError::UnknownMap { index })?;
    Path::new(&map.waypoints, config.tile_size)
        .map_err(|source| MapSelectError::InvalidPath { index, source })
}

/// A straight line across the middle of the world.
fn builtin_fallback_path(config: &TdConfig) -> Path {
    let row = (config.world_height / config.tile_size / 2.0) as i32;
    let last = (config.world_width / config.tile_size) as i32;
    Path::straight(row, last, config.tile_size)
}
