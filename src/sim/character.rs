//! Platformer character: horizontal movement, gravity, jump, ground clamp
//!
//! Explicit Euler with an instantaneous ground clamp. Units are pixels and
//! ticks; y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::CharacterSettings;

/// A sprite character with center-anchored position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Center position
    pub pos: Vec2,
    /// Vertical velocity (positive = falling)
    pub vy: f32,
    pub on_ground: bool,
    /// Display size (width, height)
    pub size: Vec2,
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
}

impl Character {
    /// Create a character resting on the ground line
    pub fn new(x: f32, ground_y: f32, size: Vec2, settings: &CharacterSettings) -> Self {
        Self {
            pos: Vec2::new(x, ground_y),
            vy: 0.0,
            on_ground: false,
            size,
            speed: settings.speed,
            gravity: settings.gravity,
            jump_impulse: settings.jump_impulse,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.size.y / 2.0
    }

    /// Advance one tick with the given held movement keys
    pub fn step(&mut self, left: bool, right: bool, canvas_width: f32, ground_y: f32) {
        if left {
            self.pos.x -= self.speed;
        }
        if right {
            self.pos.x += self.speed;
        }

        self.vy += self.gravity;
        self.pos.y += self.vy;

        if self.pos.y > ground_y {
            self.pos.y = ground_y;
            self.vy = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }

        self.clamp_x(canvas_width);
    }

    /// Keep the sprite inside `[half_width, canvas_width - half_width]`.
    ///
    /// A canvas narrower than the sprite pins it to the canvas center.
    pub fn clamp_x(&mut self, canvas_width: f32) {
        let min = self.half_width();
        let max = canvas_width - self.half_width();
        self.pos.x = if min <= max {
            self.pos.x.clamp(min, max)
        } else {
            canvas_width / 2.0
        };
    }

    /// Start a jump. Ignored while airborne.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vy = self.jump_impulse;
        self.on_ground = false;
        true
    }

    /// Keep a standing character on a moved ground line
    pub fn snap_to_ground(&mut self, ground_y: f32) {
        if self.on_ground {
            self.pos.y = ground_y;
        }
    }

    /// Center distance to another character
    #[inline]
    pub fn distance_to(&self, other: &Character) -> f32 {
        self.pos.distance(other.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GROUND: f32 = 500.0;
    const WIDTH: f32 = 800.0;

    fn settings() -> CharacterSettings {
        CharacterSettings {
            speed: 6.0,
            gravity: 0.8,
            jump_impulse: -15.0,
        }
    }

    fn standing() -> Character {
        let mut c = Character::new(400.0, GROUND, Vec2::new(100.0, 100.0), &settings());
        c.step(false, false, WIDTH, GROUND);
        c
    }

    #[test]
    fn test_lands_on_first_tick() {
        let c = standing();
        assert!(c.on_ground);
        assert_eq!(c.pos.y, GROUND);
        assert_eq!(c.vy, 0.0);
    }

    #[test]
    fn test_both_keys_cancel() {
        let mut c = standing();
        c.step(true, true, WIDTH, GROUND);
        assert_eq!(c.pos.x, 400.0);
        c.step(true, false, WIDTH, GROUND);
        assert_eq!(c.pos.x, 394.0);
    }

    #[test]
    fn test_jump_then_airborne_jump_ignored() {
        let mut c = standing();
        assert!(c.jump());
        assert_eq!(c.vy, -15.0);
        assert!(!c.on_ground);

        c.step(false, false, WIDTH, GROUND);
        let vy = c.vy;
        assert!(!c.jump());
        assert_eq!(c.vy, vy);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let mut c = standing();
        c.jump();
        let mut peak = GROUND;
        for _ in 0..60 {
            c.step(false, false, WIDTH, GROUND);
            peak = peak.min(c.pos.y);
        }
        assert!(peak < GROUND - 100.0);
        assert!(c.on_ground);
        assert_eq!(c.pos.y, GROUND);
    }

    #[test]
    fn test_clamped_at_edges() {
        let mut c = standing();
        for _ in 0..200 {
            c.step(false, true, WIDTH, GROUND);
        }
        assert_eq!(c.pos.x, WIDTH - 50.0);
        for _ in 0..200 {
            c.step(true, false, WIDTH, GROUND);
        }
        assert_eq!(c.pos.x, 50.0);
    }

    #[test]
    fn test_narrow_canvas_pins_center() {
        let mut c = standing();
        c.clamp_x(60.0);
        assert_eq!(c.pos.x, 30.0);
    }

    #[test]
    fn test_snap_only_when_standing() {
        let mut c = standing();
        c.snap_to_ground(300.0);
        assert_eq!(c.pos.y, 300.0);

        c.jump();
        c.step(false, false, WIDTH, 300.0);
        let y = c.pos.y;
        c.snap_to_ground(700.0);
        assert_eq!(c.pos.y, y);
    }

    proptest! {
        #[test]
        fn prop_stays_in_bounds(
            keys in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..300),
            start_x in -500.0f32..1500.0,
        ) {
            let mut c = Character::new(start_x, GROUND, Vec2::new(100.0, 100.0), &settings());
            for (left, right, jump) in keys {
                if jump {
                    c.jump();
                }
                c.step(left, right, WIDTH, GROUND);
                prop_assert!(c.pos.y <= GROUND);
                prop_assert!(c.pos.x >= c.half_width());
                prop_assert!(c.pos.x <= WIDTH - c.half_width());
            }
        }
    }
}
