use glam::{IVec2, Vec2};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("a path needs at least two waypoints, got {len}")]
    TooShort { len: usize },
    #[error("waypoint {index} repeats the previous waypoint {cell}")]
    RepeatedWaypoint { index: usize, cell: IVec2 },
}

/// The route every enemy follows. Immutable after construction.
///
/// Waypoints are authored in tile coordinates and stored in world space
/// (tile coordinate times tile size).
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    pub fn new(cells: &[IVec2], tile_size: f32) -> Result<Self, PathError> {
        if cells.len() < 2 {
            return Err(PathError::TooShort { len: cells.len() });
        }
        if let Some(index) = cells.windows(2).position(|w| w[0] == w[1]) {
            return Err(PathError::RepeatedWaypoint {
                index: index + 1,
                cell: cells[index],
            });
        }

        Ok(Self {
            waypoints: cells.iter().map(|c| c.as_vec2() * tile_size).collect(),
        })
    }

    /// A single horizontal leg along `row`, from column 0 to `last_col` (at least 1).
    pub fn straight(row: i32, last_col: i32, tile_size: f32) -> Self {
        let cells = [IVec2::new(0, row), IVec2::new(last_col.max(1), row)];
        Self {
            waypoints: cells.iter().map(|c| c.as_vec2() * tile_size).collect(),
        }
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Shortest distance from `point` to any segment of the path.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.waypoints
            .windows(2)
            .map(|w| point_segment_distance(point, w[0], w[1]))
            .fold(f32::INFINITY, f32::min)
    }

    /// True when `point` lies strictly closer than `buffer` to the path.
    pub fn is_on_path(&self, point: Vec2, buffer: f32) -> bool {
        self.distance_to(point) < buffer
    }
}

pub fn point_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serpentine() -> Path {
        let cells = [(0, 3), (10, 3), (10, 8), (5, 8)].map(|(x, y)| IVec2::new(x, y));
        Path::new(&cells, 40.0).unwrap()
    }

    #[test]
    fn rejects_degenerate_paths() {
        assert_eq!(
            Path::new(&[IVec2::new(1, 1)], 40.0),
            Err(PathError::TooShort { len: 1 })
        );
        assert_eq!(
            Path::new(&[IVec2::ZERO, IVec2::X, IVec2::X], 40.0),
            Err(PathError::RepeatedWaypoint {
                index: 2,
                cell: IVec2::X
            })
        );
    }

    #[test]
    fn waypoints_are_scaled_to_world_space() {
        let path = serpentine();
        assert_eq!(path.start(), Vec2::new(0.0, 120.0));
        assert_eq!(path.waypoint(1), Some(Vec2::new(400.0, 120.0)));
        assert_eq!(path.waypoint(4), None);
    }

    #[test]
    fn distance_clamps_to_segment_ends() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(point_segment_distance(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_segment_distance(Vec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(point_segment_distance(Vec2::new(13.0, 4.0), a, b), 5.0);
    }

    #[test]
    fn on_path_uses_strict_buffer() {
        let path = serpentine();
        // 30 below the first horizontal segment.
        assert!(path.is_on_path(Vec2::new(200.0, 150.0), 31.0));
        assert!(!path.is_on_path(Vec2::new(200.0, 150.0), 30.0));
        assert!(!path.is_on_path(Vec2::new(200.0, 300.0), 30.0));
        // Near the vertical segment at x = 400.
        assert!(path.is_on_path(Vec2::new(410.0, 250.0), 30.0));
    }
}
