use bevy::input::ButtonState;
use bevy::input::touch::TouchPhase;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowEvent};

use crate::config::{CLICK_THRESHOLD_SECS, DRAG_THRESHOLD_PX};
use crate::systems::GlobeSet;
use crate::systems::globe::GlobeRotation;
use crate::systems::links::PointerClick;
use crate::systems::satellites::{SatellitePoses, refresh_poses};
use crate::systems::simulation::Simulation;

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GestureController::default())
            .add_event::<WindowEvent>()
            .add_systems(Update, handle_pointer.in_set(GlobeSet::Input));
    }
}

/// Where the current gesture is at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    // pressed, not yet moved past the drag threshold
    PointerDown { start: Vec2, start_time: f64 },
    Dragging { last: Vec2 },
}

// mouse and touch both boil down to these
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    None,
    // pixel delta to rotate the globe by
    Drag(Vec2),
    Click(Vec2),
}

/// Tells a drag-to-rotate apart from a click-to-navigate.
#[derive(Resource, Debug, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// feed one pointer event, `now` in seconds
    pub fn handle(&mut self, event: PointerEvent, now: f64) -> GestureOutcome {
        use GestureState::*;

        match (self.state, event) {
            (Idle, PointerEvent::Down(position)) => {
                self.state = PointerDown { start: position, start_time: now };
                GestureOutcome::None
            }

            // a second pointer does not restart the gesture
            (_, PointerEvent::Down(_)) => GestureOutcome::None,

            (PointerDown { start, .. }, PointerEvent::Move(position)) => {
                if start.distance(position) > DRAG_THRESHOLD_PX {
                    // the whole movement since the press counts
                    self.state = Dragging { last: position };
                    GestureOutcome::Drag(position - start)
                } else {
                    GestureOutcome::None
                }
            }

            (Dragging { last }, PointerEvent::Move(position)) => {
                self.state = Dragging { last: position };
                GestureOutcome::Drag(position - last)
            }

            (Idle, PointerEvent::Move(_)) => GestureOutcome::None,

            (PointerDown { start_time, .. }, PointerEvent::Up(position)) => {
                self.state = Idle;
                if now - start_time < CLICK_THRESHOLD_SECS {
                    GestureOutcome::Click(position)
                } else {
                    // long press, nothing to do
                    GestureOutcome::None
                }
            }

            (_, PointerEvent::Up(_)) | (_, PointerEvent::Cancel) => {
                self.state = Idle;
                GestureOutcome::None
            }
        }
    }
}

// mouse and touch events into the gesture controller, in arrival order
#[allow(clippy::too_many_arguments)]
fn handle_pointer(
    mut window_events: EventReader<WindowEvent>,
    window: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time<Real>>,
    mut last_cursor: Local<Option<Vec2>>,
    mut active_touch: Local<Option<u64>>,
    mut controller: ResMut<GestureController>,
    mut rotation: ResMut<GlobeRotation>,
    mut poses: ResMut<SatellitePoses>,
    simulation: Res<Simulation>,
    mut clicks: EventWriter<PointerClick>,
) {
    let now = time.elapsed_secs_f64();
    let window_cursor = window.single().ok().and_then(|w| w.cursor_position());

    let mut events = Vec::new();
    for window_event in window_events.read() {
        match window_event {
            WindowEvent::CursorMoved(moved) => {
                *last_cursor = Some(moved.position);
                events.push(PointerEvent::Move(moved.position));
            }

            WindowEvent::MouseButtonInput(input) if input.button == MouseButton::Left => {
                // position is wherever the cursor was when the button changed
                let cursor = last_cursor.or(window_cursor);
                match input.state {
                    ButtonState::Pressed => {
                        if let Some(position) = cursor {
                            events.push(PointerEvent::Down(position));
                        }
                    }
                    // a release off-window still ends the gesture
                    ButtonState::Released => {
                        let fallback = match controller.state() {
                            GestureState::Dragging { last } => last,
                            GestureState::PointerDown { start, .. } => start,
                            GestureState::Idle => Vec2::ZERO,
                        };
                        events.push(PointerEvent::Up(cursor.unwrap_or(fallback)));
                    }
                }
            }

            // only the first finger drives the globe
            WindowEvent::TouchInput(touch) => match touch.phase {
                TouchPhase::Started if active_touch.is_none() => {
                    *active_touch = Some(touch.id);
                    events.push(PointerEvent::Down(touch.position));
                }
                TouchPhase::Moved if *active_touch == Some(touch.id) => {
                    events.push(PointerEvent::Move(touch.position));
                }
                TouchPhase::Ended if *active_touch == Some(touch.id) => {
                    *active_touch = None;
                    events.push(PointerEvent::Up(touch.position));
                }
                TouchPhase::Canceled if *active_touch == Some(touch.id) => {
                    *active_touch = None;
                    events.push(PointerEvent::Cancel);
                }
                _ => {}
            },

            _ => {}
        }
    }

    for event in events {
        match controller.handle(event, now) {
            GestureOutcome::None => {}
            GestureOutcome::Drag(delta) => {
                rotation.apply_drag_delta(delta.x, delta.y);

                // keep the satellites glued to the globe while dragging
                if let Err(e) = refresh_poses(&simulation, &rotation, &mut poses) {
                    debug!("Skipping drag pose update: {}", e);
                }
            }
            GestureOutcome::Click(position) => {
                clicks.write(PointerClick { position });
            }
        }
    }
}
