//! Arena bounds and the static level layouts
//!
//! Level content is immutable data built once per simulation instance: the
//! obby platform set, the racing track (checkpoint regions, boost pads, start
//! pose) and the tycoon plot table. Rule evaluation reads these layouts, so a
//! different track or plot table is a data change, not a code change.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// The fixed rectangular playfield shared by every minigame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub bounds: Aabb,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            bounds: Aabb::new(Vec2::ZERO, Vec2::new(ARENA_WIDTH, ARENA_HEIGHT)),
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            bounds: Aabb::new(Vec2::ZERO, Vec2::new(width, height)),
        }
    }
}

/// Obby platform set: ground slab plus five floating platforms
pub fn obby_platforms() -> Vec<Aabb> {
    vec![
        Aabb::from_center_size(Vec2::new(400.0, 584.0), Vec2::new(800.0, 32.0)),
        Aabb::from_center_size(Vec2::new(600.0, 450.0), Vec2::new(200.0, 16.0)),
        Aabb::from_center_size(Vec2::new(50.0, 350.0), Vec2::new(200.0, 16.0)),
        Aabb::from_center_size(Vec2::new(750.0, 320.0), Vec2::new(200.0, 16.0)),
        Aabb::from_center_size(Vec2::new(300.0, 220.0), Vec2::new(200.0, 16.0)),
        Aabb::from_center_size(Vec2::new(650.0, 150.0), Vec2::new(200.0, 16.0)),
    ]
}

/// A racing track definition: ordered checkpoint regions, boost pads and the
/// start pose. The last checkpoint region doubles as the start/finish line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackLayout {
    /// Ordered gates; a lap credits only after passing all of them in order
    pub checkpoints: Vec<Aabb>,
    pub boost_pads: Vec<Aabb>,
    pub start_pos: Vec2,
    /// Start facing angle in radians
    pub start_angle: f32,
}

impl TrackLayout {
    /// The hub's one shipped track: an oval run counter-clockwise from the top
    pub fn oval() -> Self {
        Self {
            checkpoints: vec![
                Aabb::new(Vec2::new(650.0, 250.0), Vec2::new(800.0, 350.0)),
                Aabb::new(Vec2::new(350.0, 450.0), Vec2::new(450.0, 600.0)),
                Aabb::new(Vec2::new(0.0, 250.0), Vec2::new(150.0, 350.0)),
                Aabb::new(Vec2::new(350.0, 0.0), Vec2::new(450.0, 150.0)),
            ],
            boost_pads: vec![
                Aabb::from_center_size(Vec2::new(600.0, 200.0), Vec2::new(40.0, 20.0)),
                Aabb::from_center_size(Vec2::new(600.0, 400.0), Vec2::new(40.0, 20.0)),
                Aabb::from_center_size(Vec2::new(200.0, 200.0), Vec2::new(40.0, 20.0)),
                Aabb::from_center_size(Vec2::new(200.0, 400.0), Vec2::new(40.0, 20.0)),
            ],
            start_pos: Vec2::new(400.0, 500.0),
            start_angle: -std::f32::consts::FRAC_PI_2,
        }
    }

    /// The start/finish region (the final checkpoint gate)
    pub fn finish(&self) -> &Aabb {
        self.checkpoints.last().expect("track has no checkpoints")
    }
}

/// Initial cost/income for one tycoon building plot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlotSpec {
    pub cost: u64,
    pub income: u64,
}

/// The tycoon plot table, cheapest to priciest
pub fn tycoon_plots() -> Vec<PlotSpec> {
    vec![
        PlotSpec { cost: 50, income: 2 },
        PlotSpec { cost: 200, income: 5 },
        PlotSpec { cost: 500, income: 12 },
        PlotSpec { cost: 1000, income: 25 },
        PlotSpec { cost: 2000, income: 50 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arena_bounds() {
        let arena = Arena::default();
        assert_eq!(arena.bounds.min, Vec2::ZERO);
        assert_eq!(arena.bounds.max, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_oval_track_regions_are_disjoint() {
        let track = TrackLayout::oval();
        assert_eq!(track.checkpoints.len(), 4);
        for (i, a) in track.checkpoints.iter().enumerate() {
            for b in track.checkpoints.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "checkpoint regions must not overlap");
            }
        }
    }

    #[test]
    fn test_oval_finish_is_last_gate() {
        let track = TrackLayout::oval();
        assert_eq!(*track.finish(), track.checkpoints[3]);
        assert!(track.finish().contains_point(Vec2::new(400.0, 75.0)));
    }

    #[test]
    fn test_obby_ground_spans_arena() {
        let platforms = obby_platforms();
        let ground = &platforms[0];
        assert_eq!(ground.min.x, 0.0);
        assert_eq!(ground.max.x, 800.0);
    }
}
