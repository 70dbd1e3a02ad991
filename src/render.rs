use crate::camera::Camera;
use crate::scene::{Scene, MODEL_NODE_NAME};
use crate::traits::RenderBackend;

/// Backend that records what it was asked to draw instead of driving a GPU.
/// The terminal driver and the test suite both run against it.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub viewport: Option<(u32, u32)>,
    pub clear_color: Option<[f32; 3]>,
    pub frames_rendered: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
        log::debug!("viewport {}x{}", width, height);
    }

    fn set_clear_color(&mut self, color: [f32; 3]) {
        self.clear_color = Some(color);
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) {
        self.frames_rendered += 1;
        if self.frames_rendered == 1 {
            let vertices = scene
                .node(MODEL_NODE_NAME)
                .map(|n| n.vertex_count())
                .unwrap_or(0);
            log::debug!(
                "first frame: {} vertices, camera at {:?}",
                vertices,
                camera.position
            );
        }
    }
}
