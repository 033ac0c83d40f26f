use crate::config::{SpecialWeaponKind, TurretKind};
use crate::world::TurretId;

/// Player commands. Positions are world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum TdAction {
    SelectTurretType { kind: TurretKind },
    /// Places the selected turret type.
    PlaceTurret { x: f32, y: f32 },
    SelectPlacedTurret { turret_id: TurretId },
    UpgradeSelectedTurret,
    UseSpecialWeapon { kind: SpecialWeaponKind },
    /// Only honored between waves with no enemies on the field.
    SelectMap { index: usize },
}
