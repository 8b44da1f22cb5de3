use bevy::prelude::*;

pub mod globe;
pub mod links;
pub mod pointer;
pub mod satellites;
pub mod simulation;
pub mod time;
pub mod ui;

// frame ordering: pointer input, then the tick, then writing to the scene
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GlobeSet {
    Input,
    Pose,
    Render,
}
