use crate::path::PathError;
use sim_core::Tick;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpendError {
    #[error("insufficient funds: need {cost}, have {have}")]
    InsufficientFunds { cost: u32, have: u32 },
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum PlacementError {
    #[error("no turret type selected")]
    NoTurretSelected,
    #[error("({x}, {y}) is outside the play area")]
    OutOfBounds { x: f32, y: f32 },
    #[error("({x}, {y}) is on the enemy path")]
    OnPath { x: f32, y: f32 },
    #[error("({x}, {y}) overlaps an existing turret")]
    Overlaps { x: f32, y: f32 },
    #[error(transparent)]
    Funds(#[from] SpendError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("no turret selected")]
    NoSelection,
    #[error("selected turret no longer exists")]
    UnknownTurret,
    #[error("turret is already at max level {level}")]
    MaxLevel { level: u8 },
    #[error(transparent)]
    Funds(#[from] SpendError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpecialWeaponError {
    #[error("special weapon is cooling down until tick {ready_at}")]
    CoolingDown { ready_at: Tick },
    #[error(transparent)]
    Funds(#[from] SpendError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapSelectError {
    #[error("cannot change maps while a wave is in progress")]
    WaveInProgress,
    #[error("cannot change maps while {alive} enemies remain")]
    EnemiesAlive { alive: usize },
    #[error("no map at index {index}")]
    UnknownMap { index: usize },
    #[error("map {index} has an invalid path: {source}")]
    InvalidPath { index: usize, source: PathError },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("selected turret no longer exists")]
    UnknownTurret,
}
