use crate::enemy::Enemy;
use crate::world::EnemyId;
use glam::Vec2;
use std::collections::HashSet;

/// On-hit behavior carried by a projectile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectileEffect {
    pub splash_radius: f32,
    pub slow_fraction: f32,
    pub freezes: bool,
    pub piercing: bool,
    pub chain: bool,
}

/// Visual family of a projectile, derived from its effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Basic,
    Piercing,
    Chain,
    Splash,
    Slowing,
    Freezing,
}

impl ProjectileKind {
    pub fn name(self) -> &'static str {
        match self {
            ProjectileKind::Basic => "basic",
            ProjectileKind::Piercing => "piercing",
            ProjectileKind::Chain => "chain",
            ProjectileKind::Splash => "splash",
            ProjectileKind::Slowing => "slowing",
            ProjectileKind::Freezing => "freezing",
        }
    }
}

impl ProjectileEffect {
    pub fn kind(&self) -> ProjectileKind {
        if self.piercing {
            ProjectileKind::Piercing
        } else if self.chain {
            ProjectileKind::Chain
        } else if self.splash_radius > 0.0 {
            ProjectileKind::Splash
        } else if self.freezes {
            ProjectileKind::Freezing
        } else if self.slow_fraction > 0.0 {
            ProjectileKind::Slowing
        } else {
            ProjectileKind::Basic
        }
    }
}

/// Launch parameters emitted by a turret shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileRequest {
    pub origin: Vec2,
    /// Target position at the moment of firing.
    pub target: Vec2,
    pub damage: f32,
    pub effect: ProjectileEffect,
}

/// A straight-line shot. Velocity is fixed at launch; projectiles never home.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub effect: ProjectileEffect,
    hit: HashSet<EnemyId>,
    /// Remaining distinct enemies a chain shot may hit.
    chain_hits_left: u32,
    spent: bool,
}

impl Projectile {
    pub fn new(request: ProjectileRequest, speed: f32, chain_max_hits: u32) -> Self {
        let direction = (request.target - request.origin)
            .try_normalize()
            .unwrap_or(Vec2::X);
        Self {
            pos: request.origin,
            velocity: direction * speed,
            damage: request.damage,
            effect: request.effect,
            hit: HashSet::new(),
            chain_hits_left: chain_max_hits.max(1),
            spent: false,
        }
    }

    pub fn kind(&self) -> ProjectileKind {
        self.effect.kind()
    }

    pub fn advance(&mut self) {
        self.pos += self.velocity;
    }

    /// Hit test against a live enemy not yet struck by this projectile.
    pub fn test_collision(&self, id: EnemyId, enemy: &Enemy, hit_radius: f32) -> bool {
        !self.spent
            && enemy.is_alive()
            && !self.has_hit(id)
            && self.pos.distance(enemy.pos) <= hit_radius
    }

    /// Records a hit. Returns true when the projectile is used up.
    pub fn register_hit(&mut self, id: EnemyId) -> bool {
        self.hit.insert(id);
        if self.effect.piercing {
            return false;
        }
        if self.effect.chain {
            self.chain_hits_left = self.chain_hits_left.saturating_sub(1);
            self.spent = self.chain_hits_left == 0;
        } else {
            self.spent = true;
        }
        self.spent
    }

    pub fn has_hit(&self, id: EnemyId) -> bool {
        self.hit.contains(&id)
    }

    pub fn hit_count(&self) -> usize {
        self.hit.len()
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Outside the `[0, bounds.x] x [0, bounds.y]` play area.
    pub fn is_out_of_bounds(&self, bounds: Vec2) -> bool {
        self.pos.x < 0.0 || self.pos.y < 0.0 || self.pos.x > bounds.x || self.pos.y > bounds.y
    }
}

/// Splash falloff: full damage at the center, zero at and beyond `radius`.
pub fn splash_damage(damage: f32, distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    damage * (1.0 - distance / radius)
}
