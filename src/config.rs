use bevy::prelude::*;

// scene measurements (world units)
pub const GLOBE_RADIUS: f32 = 5.0;
pub const CAMERA_DISTANCE: f32 = 15.0;
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const SATELLITE_SIZE: f32 = 0.1;

// globe rotation, radians per tick
pub const INITIAL_ANGULAR_RATE: f32 = 0.001;
pub const ENGAGED_ANGULAR_RATE: f32 = 0.00005;
pub const DRAG_FACTOR: f32 = 0.01;

// gesture classification
pub const DRAG_THRESHOLD_PX: f32 = 5.0;
pub const CLICK_THRESHOLD_SECS: f64 = 0.2;

// hit testing
pub const HOT_ZONE_NDC: f32 = 0.25;
pub const HIT_RADIUS_WORLD: f32 = 2.0;

// visibility shading
pub const VISIBILITY_OFFSET: f32 = 3.0;
pub const VISIBILITY_GAIN: f32 = 2.0;
pub const SATELLITE_EMISSIVE: LinearRgba = LinearRgba::new(1.0, 0.85, 0.2, 1.0);

// default orbital setup for label groups
pub const DEFAULT_ORBIT_RADIUS: f32 = 7.0;
pub const DEFAULT_ORBIT_RATE: f32 = 0.05;
pub const DEFAULT_SPIN_RATE: f32 = 0.5;
pub const LETTER_SPACING: f32 = 0.08;

// asset paths
pub const EARTH_DIFFUSE_TEXTURE: &str = "textures/earth_lights_lrg.jpg";
pub const LINK_CONFIG_PATH: &str = "assets/data/links.json";
