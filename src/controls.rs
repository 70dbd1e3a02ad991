use glam::Vec3;

use crate::camera::Camera;

pub const DEFAULT_MAX_DISTANCE: f32 = 100.0;
pub const DEFAULT_DAMPING: f32 = 0.05;
const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;

/// Orbit navigation around a target point. Input nudges write into velocity
/// state; `update` advances the orbit and bleeds the velocities off by the
/// damping factor, one step per rendered frame.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub max_distance: f32,
    pub damping: f32,
    azimuth_velocity: f32,
    polar_velocity: f32,
    zoom_velocity: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            max_distance: DEFAULT_MAX_DISTANCE,
            damping: DEFAULT_DAMPING,
            azimuth_velocity: 0.0,
            polar_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Restore defaults. Pending velocities are dropped.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth_velocity += d_azimuth;
        self.polar_velocity += d_polar;
    }

    pub fn zoom(&mut self, delta: f32) {
        self.zoom_velocity += delta;
    }

    pub fn is_damping(&self) -> bool {
        self.azimuth_velocity.abs() > 1e-5
            || self.polar_velocity.abs() > 1e-5
            || self.zoom_velocity.abs() > 1e-5
    }

    /// Advance one frame: apply current velocities to the camera orbit, clamp
    /// the distance, then decay the velocities.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) {
        let offset = camera.position - self.target;
        let mut distance = offset.length().max(1e-4);
        let mut azimuth = offset.z.atan2(offset.x);
        let mut polar = (offset.y / distance).clamp(-1.0, 1.0).acos();

        azimuth += self.azimuth_velocity * dt;
        polar = (polar + self.polar_velocity * dt).clamp(MIN_POLAR, MAX_POLAR);
        distance = (distance * (1.0 + self.zoom_velocity * dt)).min(self.max_distance);

        camera.position = self.target
            + Vec3::new(
                distance * polar.sin() * azimuth.cos(),
                distance * polar.cos(),
                distance * polar.sin() * azimuth.sin(),
            );
        camera.look_at(self.target);

        let keep = 1.0 - self.damping;
        self.azimuth_velocity *= keep;
        self.polar_velocity *= keep;
        self.zoom_velocity *= keep;
        if !self.is_damping() {
            self.azimuth_velocity = 0.0;
            self.polar_velocity = 0.0;
            self.zoom_velocity = 0.0;
        }
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_defaults() {
        let mut controls = OrbitControls::new();
        controls.max_distance = 500.0;
        controls.rotate(1.0, 0.5);
        controls.reset();
        assert_eq!(controls.max_distance, DEFAULT_MAX_DISTANCE);
        assert!(!controls.is_damping());
    }

    #[test]
    fn damping_decays_to_rest() {
        let mut controls = OrbitControls::new();
        let mut camera = Camera::new();
        controls.rotate(1.0, 0.0);

        for _ in 0..1000 {
            controls.update(&mut camera, 1.0 / 60.0);
        }
        assert!(!controls.is_damping());
    }

    #[test]
    fn distance_clamped_to_max() {
        let mut controls = OrbitControls::new();
        controls.max_distance = 10.0;
        let mut camera = Camera::new();
        camera.position = Vec3::new(0.0, 0.0, 50.0);

        controls.update(&mut camera, 1.0 / 60.0);
        assert!((camera.position - controls.target).length() <= 10.0 + 1e-3);
    }

    #[test]
    fn update_keeps_camera_aimed_at_target() {
        let mut controls = OrbitControls::new();
        let mut camera = Camera::new();
        camera.position = Vec3::new(3.0, 4.0, 5.0);
        controls.rotate(0.2, 0.1);
        controls.update(&mut camera, 1.0 / 60.0);
        assert_eq!(camera.target, controls.target);
    }
}
