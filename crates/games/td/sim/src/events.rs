use crate::config::{EnemyKind, SpecialWeaponKind, TurretKind};
use crate::errors::{MapSelectError, PlacementError, SelectError, SpecialWeaponError, UpgradeError};
use crate::projectile::ProjectileKind;
use crate::world::{EnemyId, TurretId};
use sim_core::Tick;

/// Fire-and-forget notifications for presentation layers (audio, HUD, logs).
#[derive(Clone, Debug)]
pub enum TdEvent {
    TurretTypeSelected {
        kind: TurretKind,
    },
    TurretSelected {
        id: TurretId,
    },
    SelectionRejected {
        reason: SelectError,
    },
    TurretPlaced {
        id: TurretId,
        kind: TurretKind,
        x: f32,
        y: f32,
        cost: u32,
    },
    PlacementRejected {
        reason: PlacementError,
    },
    TurretUpgraded {
        id: TurretId,
        level: u8,
        cost: u32,
    },
    UpgradeRejected {
        reason: UpgradeError,
    },
    TurretDestroyed {
        id: TurretId,
        kind: TurretKind,
    },
    /// A discrete shot. Continuous beams do not emit this.
    ShotFired {
        turret: TurretId,
        kind: TurretKind,
        projectile: Option<ProjectileKind>,
    },
    EnemySpawned {
        id: EnemyId,
        kind: EnemyKind,
    },
    EnemyKilled {
        id: EnemyId,
        kind: EnemyKind,
        money: u32,
        score: u64,
    },
    EnemyLeaked {
        id: EnemyId,
        kind: EnemyKind,
        lives_left: u32,
    },
    WaveStarted {
        wave: u32,
        size: u16,
    },
    WaveCleared {
        wave: u32,
        next_wave_tick: Option<Tick>,
    },
    SpecialWeaponUsed {
        kind: SpecialWeaponKind,
        affected: usize,
    },
    SpecialWeaponRejected {
        kind: SpecialWeaponKind,
        reason: SpecialWeaponError,
    },
    MapSelected {
        index: usize,
        name: String,
        removed_turrets: usize,
    },
    MapSelectRejected {
        reason: MapSelectError,
    },
    GameOver {
        score: u64,
        wave: u32,
    },
    Victory {
        score: u64,
        wave: u32,
    },
}
