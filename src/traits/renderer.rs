use crate::camera::Camera;
use crate::scene::Scene;

/// Render capability consumed by the viewer. The GPU pipeline behind it is
/// not this crate's concern.
pub trait RenderBackend {
    /// Resize the drawing surface.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Background color for frames with or without a model.
    fn set_clear_color(&mut self, color: [f32; 3]);

    /// Draw one frame of the scene from the camera.
    fn render(&mut self, scene: &Scene, camera: &Camera);
}
