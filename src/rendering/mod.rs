pub mod canvas;
pub mod draw_list;
pub mod palette;
pub mod renderer;
pub mod texture;

pub use canvas::Canvas;
pub use draw_list::{DrawCommand, DrawList};
pub use renderer::{normalize_degrees, Renderer, Rgba8};
pub use texture::Texture;
