use bevy::prelude::*;
use chrono::{DateTime, Utc};

pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TimeState::default())
           .add_systems(Update, (keyboard_controls, update).chain());
    }
}

/// Central time control state for the orbital simulation
#[derive(Resource)]
pub struct TimeState {
    pub is_paused: bool,
    pub speed_mult: f64,
    pub sim_time: DateTime<Utc>,
}

impl Default for TimeState {
    fn default() -> Self {
        Self {
            is_paused: false,
            speed_mult: 1.0,
            sim_time: Utc::now(),
        }
    }
}

impl TimeState {
    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
    }

    // decrease speed, or go negative
    pub fn step_backward(&mut self) {
        self.is_paused = false;

        self.speed_mult = if self.speed_mult > 1.0 {
            self.speed_mult / 2.0
        } else if self.speed_mult == 1.0 {
            -1.0
        } else {
            (self.speed_mult * 2.0).clamp(-4096.0, -1.0)
        };
    }

    // increase speed, or go positive
    pub fn step_forward(&mut self) {
        self.is_paused = false;

        self.speed_mult = if self.speed_mult < -1.0 {
            self.speed_mult / 2.0
        } else if self.speed_mult == -1.0 {
            1.0
        } else {
            (self.speed_mult * 2.0).clamp(1.0, 4096.0)
        };
    }

    pub fn reset_to_normal(&mut self) {
        self.speed_mult = 1.0;
        self.is_paused = false;
    }

    /// seconds of simulation time that pass for `real_delta` seconds of wall time
    pub fn sim_delta(&self, real_delta: f64) -> f64 {
        if self.is_paused {
            0.0
        } else {
            real_delta * self.speed_mult
        }
    }
}

fn keyboard_controls(keys: Res<ButtonInput<KeyCode>>, mut time_state: ResMut<TimeState>) {
    if keys.just_pressed(KeyCode::Space) {
        time_state.toggle_pause();
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        time_state.step_forward();
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        time_state.step_backward();
    }
    if keys.just_pressed(KeyCode::Backspace) {
        time_state.reset_to_normal();
    }
}

fn update(
    mut time_state: ResMut<TimeState>,
    time: Res<Time>
) {
    let sim_delta_seconds = time_state.sim_delta(time.delta_secs_f64());

    // apply
    if let Some(new_time) = time_state.sim_time.checked_add_signed(
        chrono::Duration::milliseconds((sim_delta_seconds * 1000.0) as i64)
    ) {
        time_state.sim_time = new_time;
    }
}
