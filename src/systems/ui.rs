use bevy::prelude::*;

use crate::systems::simulation::Simulation;
use crate::systems::time::TimeState;

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ui)
           .add_systems(Update, (update_satellite_count, update_datetime));
    }
}

// UI component to display satellite count
#[derive(Component)]
pub struct SatelliteCounter;

// UI component to display simulation clock
#[derive(Component)]
pub struct DateTimeDisplay;

fn setup_ui(mut commands: Commands) {
    // create UI container
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Start,
                justify_content: JustifyContent::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            BackgroundColor(Color::NONE),
        ))
        .with_children(|parent| {
            // display satellite count
            parent.spawn((
                Text::new("Satellites: Loading..."),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                SatelliteCounter,
            ));

            // display datetime
            parent.spawn((
                Text::new("Time: Loading..."),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                DateTimeDisplay,
                Node {
                    margin: UiRect::top(Val::Px(5.0)), // spacing
                    ..default()
                },
            ));
        });
}

// update the satellite count display
fn update_satellite_count(
    simulation: Res<Simulation>,
    mut text_query: Query<&mut Text, With<SatelliteCounter>>,
) {
    let Ok(mut text) = text_query.single_mut() else { return; };

    text.0 = match simulation.service() {
        Ok(service) => format!("Satellites: {}", service.satellite_count()),
        Err(_) => "Satellites: Loading...".to_string(),
    };
}

// update the clock display with simulation time and speed
fn update_datetime(
    time_state: Res<TimeState>,
    mut text_query: Query<&mut Text, With<DateTimeDisplay>>,
) {
    if let Ok(mut text) = text_query.single_mut() {
        text.0 = clock_text(&time_state);
    }
}

fn clock_text(time_state: &TimeState) -> String {
    let speed = if time_state.is_paused {
        "paused".to_string()
    } else {
        format!("{}x", time_state.speed_mult)
    };

    format!("Time: {} UTC ({})", time_state.sim_time.format("%Y-%m-%d %H:%M:%S"), speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_clock_text() {
        let mut state = TimeState {
            is_paused: false,
            speed_mult: 4.0,
            sim_time: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        };
        assert_eq!(clock_text(&state), "Time: 2025-01-01 12:00:00 UTC (4x)");

        state.toggle_pause();
        assert_eq!(clock_text(&state), "Time: 2025-01-01 12:00:00 UTC (paused)");
    }
}
