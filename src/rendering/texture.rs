use image::RgbaImage;

use super::canvas::Canvas;

/// Immutable RGBA image painted once and reused every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    /// Paints a transparent `width` x `height` texture through a [`Canvas`].
    pub fn paint(width: u32, height: u32, painter: impl FnOnce(&mut Canvas)) -> Self {
        let mut canvas = Canvas::new(width.max(1), height.max(1));
        painter(&mut canvas);
        Self { image: canvas.into_image() }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}
