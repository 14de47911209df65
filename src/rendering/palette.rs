//! Fixed colors shared by the machine renderers.
use super::renderer::Rgba8;

pub const BACKGROUND: Rgba8 = Rgba8::rgb(135, 206, 235);

pub const BROWN: Rgba8 = Rgba8::rgb(150, 100, 50);
pub const DARK_BROWN: Rgba8 = Rgba8::rgb(100, 60, 20);
pub const GRAY: Rgba8 = Rgba8::gray(200);
pub const DARK_GRAY: Rgba8 = Rgba8::gray(100);

// Ball
pub const BALL: Rgba8 = Rgba8::rgb(220, 40, 40);
pub const BALL_EDGE: Rgba8 = Rgba8::rgb(120, 0, 0);
pub const BALL_HIGHLIGHT: Rgba8 = Rgba8::rgba(255, 255, 255, 60);

// Crate
pub const CRATE_X: Rgba8 = Rgba8::rgb(255, 0, 0);

// Domino
pub const DOMINO: Rgba8 = Rgba8::gray(230);
pub const DOMINO_EDGE: Rgba8 = Rgba8::gray(80);

// Seesaw (also the platform concrete)
pub const SEESAW: Rgba8 = Rgba8::rgb(160, 170, 180);
pub const SEESAW_EDGE: Rgba8 = Rgba8::rgb(90, 100, 110);
pub const SEESAW_PIVOT: Rgba8 = Rgba8::gray(60);
pub const STEEL_HIGHLIGHT: Rgba8 = Rgba8::gray(220);

// Projectile rock
pub const ROCK: Rgba8 = Rgba8::gray(100);
pub const ROCK_EDGE: Rgba8 = Rgba8::gray(60);
pub const ROCK_SPECKLE: Rgba8 = Rgba8::gray(70);
pub const ROCK_CRACK: Rgba8 = Rgba8::gray(30);

// Catapult
pub const ARM_SHADOW: Rgba8 = Rgba8::rgb(60, 40, 20);
pub const BASE_BORDER: Rgba8 = Rgba8::rgb(90, 50, 20);
pub const WHEEL_BOLT: Rgba8 = Rgba8::gray(220);
pub const ARM_TIP: Rgba8 = Rgba8::gray(120);

// Debug overlay
pub const TRIGGER_OUTLINE: Rgba8 = Rgba8::rgba(255, 220, 0, 180);

/// Platform speckle tone: light gray most of the time, otherwise dark.
pub fn speckle_color(light: bool, level: u8) -> Rgba8 {
    if light {
        Rgba8::gray(level)
    } else {
        Rgba8::gray(80)
    }
}
