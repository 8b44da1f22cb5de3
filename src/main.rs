use bevy::prelude::*;

mod config;
mod error;
mod systems;

use systems::GlobeSet;
use systems::globe::GlobePlugin;
use systems::links::LinkPlugin;
use systems::pointer::PointerPlugin;
use systems::satellites::SatellitePlugin;
use systems::simulation::SimulationPlugin;
use systems::time::TimePlugin;
use systems::ui::UIPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "orbitlinks".to_string(),
                // keeps touch drags from scrolling the host page on the web
                prevent_default_event_handling: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.0)))
        .configure_sets(Update, (GlobeSet::Input, GlobeSet::Pose, GlobeSet::Render).chain())
        .add_plugins((
            TimePlugin,
            SimulationPlugin,
            GlobePlugin,
            SatellitePlugin,
            PointerPlugin,
            LinkPlugin,
            UIPlugin,
        ))
        .run()
}
