pub mod actions;
pub mod config;
pub mod economy;
pub mod enemy;
pub mod errors;
pub mod events;
pub mod game;
pub mod observe;
pub mod path;
pub mod projectile;
pub mod systems;
pub mod turret;
pub mod wave;
pub mod world;

pub use actions::TdAction;
pub use config::{EnemyKind, SpecialWeaponKind, TdConfig, TurretKind};
pub use errors::{MapSelectError, PlacementError, SelectError, SpecialWeaponError, SpendError, UpgradeError};
pub use events::TdEvent;
pub use game::TdGame;
pub use world::{EnemyId, ProjectileId, TdState, TurretId};
