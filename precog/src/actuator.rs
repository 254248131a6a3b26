//! Actuator gate
//!
//! Whatever drives the machine receives every [`FrameDecision`] and must hold
//! still while `danger` is set.

use crate::types::FrameDecision;

pub trait Actuator {
    /// Advance one frame under the gate of `decision`
    fn apply(&mut self, decision: &FrameDecision);
}

/// Simulated arm sweeping back and forth along x
#[derive(Debug, Clone, PartialEq)]
pub struct SweepingArm {
    x: f32,
    direction: f32,
    start_x: f32,
    speed: f32,
    min_x: f32,
    max_x: f32,
    frozen: bool,
}

impl SweepingArm {
    pub fn new(start_x: f32, speed: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            x: start_x,
            direction: 1.0,
            start_x,
            speed,
            min_x,
            max_x,
            frozen: false,
        }
    }

    /// Arm of `arm_width` inside a frame of `frame_width`, keeping `margin` clear on both sides
    pub fn for_frame(frame_width: f32, arm_width: f32, margin: f32) -> Self {
        Self::new(20.0, 3.0, margin, frame_width - margin - arm_width)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// True when the last applied decision blocked motion
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn reset(&mut self) {
        self.x = self.start_x;
        self.direction = 1.0;
        self.frozen = false;
    }
}

impl Default for SweepingArm {
    fn default() -> Self {
        Self::for_frame(640.0, 80.0, 10.0)
    }
}

impl Actuator for SweepingArm {
    fn apply(&mut self, decision: &FrameDecision) {
        self.frozen = decision.danger;
        if self.frozen {
            log::debug!("Arm frozen at x={:.0}: {}", self.x, decision.status_line());
            return;
        }

        self.x += self.speed * self.direction;
        if self.x >= self.max_x {
            self.direction = -1.0;
        } else if self.x <= self.min_x {
            self.direction = 1.0;
        }
    }
}
