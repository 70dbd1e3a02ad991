use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use glam::Vec3;

use crate::camera::Camera;
use crate::controls::OrbitControls;
use crate::error::{DecodeError, ExportError};
use crate::math::AABB;
use crate::report::ErrorReporter;
use crate::scene::{ColorEncoding, Light, Scene, SceneGraph, MODEL_NODE_NAME};
use crate::traits::{RenderBackend, SceneLoader};
use crate::ui::{OverlayContainer, ViewportRect, WindowLayout};

/// Background drawn behind the model (and before any model loads).
pub const BACKGROUND_COLOR: [f32; 3] = [0.92, 0.92, 0.94];

/// Render loop cadence, one cooperative step per frame.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Camera framing derived from the active node's bounding box. Recomputed on
/// every load; all three clip/navigation limits scale with the diagonal.
#[derive(Copy, Clone, Debug)]
pub struct CameraFrame {
    pub center: Vec3,
    pub size: Vec3,
    pub diagonal: f32,
}

impl CameraFrame {
    pub fn from_bounds(bounds: &AABB) -> Self {
        Self {
            center: bounds.center(),
            size: bounds.size(),
            diagonal: bounds.diagonal(),
        }
    }

    pub fn near(&self) -> f32 {
        self.diagonal / 100.0
    }

    pub fn far(&self) -> f32 {
        self.diagonal * 100.0
    }

    pub fn max_distance(&self) -> f32 {
        self.diagonal * 10.0
    }
}

/// Owns the persistent scene, camera, lights, navigation controls and the
/// decode/render capabilities. One instance per viewport.
pub struct Viewer {
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    lights: Vec<Light>,
    loader: Box<dyn SceneLoader>,
    renderer: Box<dyn RenderBackend>,
    viewport: ViewportRect,
    last_payload: Option<Vec<u8>>,
    render_loop_started: bool,
}

impl Viewer {
    /// The resize pass runs here once, before any model: without it the
    /// backend has no viewport or background for the first frame.
    pub fn new(
        loader: Box<dyn SceneLoader>,
        renderer: Box<dyn RenderBackend>,
        window: WindowLayout,
    ) -> Self {
        let mut viewer = Self {
            scene: Scene::new(),
            camera: Camera::new(),
            controls: OrbitControls::new(),
            lights: vec![
                Light::Ambient {
                    color: [1.0, 1.0, 1.0],
                    intensity: 0.4,
                },
                Light::Directional {
                    color: [1.0, 1.0, 1.0],
                    intensity: 0.8,
                    direction: Vec3::new(-0.5, -1.0, -0.3),
                },
            ],
            loader,
            renderer,
            viewport: window.viewport(),
            last_payload: None,
            render_loop_started: false,
        };
        viewer.handle_resize(window);
        viewer
    }

    /// Decode and display a payload. On decode failure the previously
    /// rendered scene is left untouched. On success the scene node is
    /// replaced wholesale, the camera reframed, and the error state cleared.
    pub fn load(
        &mut self,
        payload: &[u8],
        errors: &mut ErrorReporter,
        overlay: Option<&mut OverlayContainer>,
    ) -> Result<(), DecodeError> {
        let graph = self.loader.decode(payload)?;

        self.install(graph);
        self.last_payload = Some(payload.to_vec());
        errors.remove_error(overlay);
        Ok(())
    }

    /// Replace the reserved node with `graph` and reframe the camera, as one
    /// uninterrupted step with no suspension point: a rendered frame sees
    /// either the old graph or the new one.
    ///
    /// The recenter offset is relative to the node's current position, not an
    /// absolute reset. Installing a node that was already recentered (no
    /// intervening `clear`) compounds the offset.
    pub fn install(&mut self, mut graph: SceneGraph) {
        graph.name = MODEL_NODE_NAME.to_string();
        self.scene.remove_node(MODEL_NODE_NAME);
        self.controls.reset();

        if let Some(bounds) = graph.bounds() {
            let frame = CameraFrame::from_bounds(&bounds);
            graph.position += graph.position - frame.center;
            self.apply_frame(&frame);
        }
        normalize_materials(&mut graph);
        self.scene.insert_node(graph);
    }

    fn apply_frame(&mut self, frame: &CameraFrame) {
        self.camera.near = frame.near();
        self.camera.far = frame.far();
        self.controls.max_distance = frame.max_distance();
        self.camera.position = frame.size * 2.0;
        self.camera.look_at(self.controls.target);
    }

    /// Remove the active model node. Camera, lights and controls keep their
    /// state; the cached payload is dropped so export refuses until the next
    /// load.
    pub fn clear(&mut self) {
        self.scene.remove_node(MODEL_NODE_NAME);
        self.last_payload = None;
    }

    /// Base64 encoding of the most recently loaded raw payload. Decoding it
    /// yields the server's terminal response byte for byte.
    pub fn export(&self, errors: &ErrorReporter) -> Result<String, ExportError> {
        if errors.is_active() {
            return Err(ExportError::ErrorActive);
        }
        let payload = self.last_payload.as_ref().ok_or(ExportError::NoModel)?;
        Ok(BASE64.encode(payload))
    }

    /// Recompute the viewport rectangle, camera aspect and backend surface.
    pub fn handle_resize(&mut self, window: WindowLayout) {
        self.viewport = window.viewport();
        self.camera.set_aspect(self.viewport.width, self.viewport.height);
        self.renderer.set_viewport(
            self.viewport.width.round() as u32,
            self.viewport.height.round() as u32,
        );
        self.renderer.set_clear_color(BACKGROUND_COLOR);
    }

    /// One render-loop step: advance control damping, draw the frame.
    pub fn step_frame(&mut self, dt: f32) {
        self.controls.update(&mut self.camera, dt);
        self.renderer.render(&self.scene, &self.camera);
    }

    /// Flip the started flag; true only for the caller that gets to spawn
    /// the loop. Later loads leave the running loop alone.
    pub fn try_start_render_loop(&mut self) -> bool {
        if self.render_loop_started {
            false
        } else {
            self.render_loop_started = true;
            true
        }
    }

    pub fn render_loop_started(&self) -> bool {
        self.render_loop_started
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn has_model(&self) -> bool {
        self.scene.node(MODEL_NODE_NAME).is_some()
    }

    /// Take the active node back out of the scene.
    pub fn take_model(&mut self) -> Option<SceneGraph> {
        self.scene.remove_node(MODEL_NODE_NAME)
    }
}

/// Force color and emissive maps to non-linear encoding; anything changed is
/// flagged for re-upload.
fn normalize_materials(graph: &mut SceneGraph) {
    for mesh in &mut graph.meshes {
        let material = &mut mesh.material;
        let mut changed = false;
        for map in [&mut material.base_color_texture, &mut material.emissive_texture]
            .into_iter()
            .flatten()
        {
            if map.encoding != ColorEncoding::Srgb {
                map.encoding = ColorEncoding::Srgb;
                changed = true;
            }
        }
        if changed {
            material.needs_upload = true;
        }
    }
}

/// Everything the selection pipeline mutates, behind one handle: the viewer,
/// the error reporter and the viewport overlay. No module-level state.
pub struct ViewerState {
    pub viewer: Viewer,
    pub errors: ErrorReporter,
    pub overlay: OverlayContainer,
}

impl ViewerState {
    pub fn new(
        loader: Box<dyn SceneLoader>,
        renderer: Box<dyn RenderBackend>,
        window: WindowLayout,
    ) -> Self {
        Self {
            viewer: Viewer::new(loader, renderer, window),
            errors: ErrorReporter::new(),
            overlay: OverlayContainer::new(),
        }
    }

    pub fn load(&mut self, payload: &[u8]) -> Result<(), DecodeError> {
        self.viewer
            .load(payload, &mut self.errors, Some(&mut self.overlay))
    }

    pub fn display_error(&mut self, message: impl Into<String>) {
        self.errors
            .display_error(Some(&mut self.overlay), message);
    }

    pub fn export(&self) -> Result<String, ExportError> {
        self.viewer.export(&self.errors)
    }
}

/// Spawn the per-frame loop for this viewer if nothing spawned it yet. The
/// loop is a single continuously rescheduled cooperative task; calling this
/// again after any number of loads is a no-op.
pub fn ensure_render_loop(view: &Rc<RefCell<ViewerState>>) {
    if !view.borrow_mut().viewer.try_start_render_loop() {
        return;
    }
    let view = Rc::clone(view);
    tokio::task::spawn_local(async move {
        let mut last = tokio::time::Instant::now();
        loop {
            tokio::time::sleep(FRAME_INTERVAL).await;
            let now = tokio::time::Instant::now();
            let dt = (now - last).as_secs_f32();
            last = now;
            view.borrow_mut().viewer.step_frame(dt);
        }
    });
}
