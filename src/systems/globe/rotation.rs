use bevy::prelude::*;

use crate::config::{DRAG_FACTOR, ENGAGED_ANGULAR_RATE, INITIAL_ANGULAR_RATE};

/// Orientation of the globe, blended from auto rotation and user drags.
///
/// Angles accumulate without wrapping.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GlobeRotation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    default_rate: f32,
    engaged: bool,
}

impl Default for GlobeRotation {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            default_rate: INITIAL_ANGULAR_RATE,
            engaged: false,
        }
    }
}

impl GlobeRotation {
    /// one tick of auto rotation, only while the user is not dragging
    pub fn advance_default(&mut self) {
        self.yaw += self.default_rate;
    }

    pub fn apply_drag_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * DRAG_FACTOR;
        self.pitch += dy * DRAG_FACTOR;

        // slow down for good once the user has taken over
        if !self.engaged {
            self.engaged = true;
            self.default_rate = ENGAGED_ANGULAR_RATE;
            debug!("Globe engaged, auto rotation slowed to {}", self.default_rate);
        }
    }

    #[cfg(test)]
    pub fn default_rate(&self) -> f32 {
        self.default_rate
    }

    #[cfg(test)]
    pub fn has_engaged(&self) -> bool {
        self.engaged
    }

    // pitch about X, then yaw about Y, then roll about Z
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, self.roll)
    }
}
