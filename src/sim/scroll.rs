//! Linear scroll-then-dispose directive
//!
//! Each scrolling entity owns its own directive; nothing is shared between
//! them. The tick advances every directive and collects finished entities
//! into a removal list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scroll {
    pub from_x: f32,
    pub to_x: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Scroll {
    /// Move left by `distance` over `duration`
    pub fn leftward(from_x: f32, distance: f32, duration: f32) -> Self {
        Self {
            from_x,
            to_x: from_x - distance,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance and return the new x position
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.x()
    }

    /// Current x position
    pub fn x(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to_x;
        }
        let t = self.elapsed / self.duration;
        self.from_x + (self.to_x - self.from_x) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Units per second
    pub fn speed(&self) -> f32 {
        (self.from_x - self.to_x) / self.duration
    }
}
