use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::app::simulation::FrameCanvas;
use crate::core::system::PresentSet;
use crate::rendering::palette;

/// Handle of the on-screen image mirroring [`FrameCanvas`].
#[derive(Resource)]
pub struct CanvasImage(pub Handle<Image>);

/// Shows the software canvas as a full-window sprite.
pub struct PresentPlugin;

impl Plugin for PresentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_present)
            .add_systems(Update, upload_canvas.in_set(PresentSet));
    }
}

fn setup_present(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    canvas: Res<FrameCanvas>,
) {
    let img = Image::new_fill(
        Extent3d { width: canvas.0.width(), height: canvas.0.height(), depth_or_array_layers: 1 },
        TextureDimension::D2,
        &palette::BACKGROUND.0,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    let handle = images.add(img);
    commands.spawn(Camera2d);
    commands.spawn(Sprite::from_image(handle.clone()));
    commands.insert_resource(CanvasImage(handle));
}

fn upload_canvas(
    canvas: Res<FrameCanvas>,
    target: Option<Res<CanvasImage>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(target) = target else { return };
    if let Some(img) = images.get_mut(&target.0) {
        img.data = Some(canvas.0.as_raw().to_vec());
    }
}
