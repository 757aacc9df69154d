use std::f32::consts::PI;

use glam::{Mat4, Vec3, Vec4Swizzles};

/// Degrees per pixel for orbiting, fraction per wheel unit for zooming
const SPEED: Vec3 = Vec3::new(0.4, 0.3, 0.1);
const HOME_AZIMUTH: f32 = -60.0;
const HOME_ELEVATION: f32 = 30.0;
const MAX_ELEVATION: f32 = 89.0;
const FIELD_OF_VIEW: f32 = PI / 5.0;

/// Orbits the plot cube with z up, the way a 3D axes widget does.
#[derive(Debug, Clone)]
pub struct Camera {
    look_at: Vec3,
    azimuth: f32,
    elevation: f32,
    distance: f32,
    home_distance: f32,
    width: f32,
    height: f32,
}

impl Camera {
    pub fn new(axis_limit: f32, width: u32, height: u32) -> Self {
        let home_distance = axis_limit * 6.0;
        Self {
            look_at: Vec3::ZERO,
            azimuth: HOME_AZIMUTH,
            elevation: HOME_ELEVATION,
            distance: home_distance,
            home_distance,
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn reset(&mut self) {
        self.azimuth = HOME_AZIMUTH;
        self.elevation = HOME_ELEVATION;
        self.distance = self.home_distance;
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    pub fn position(&self) -> Vec3 {
        let (azimuth, elevation) = (self.azimuth.to_radians(), self.elevation.to_radians());
        self.look_at
            + self.distance
                * Vec3::new(
                    elevation.cos() * azimuth.cos(),
                    elevation.cos() * azimuth.sin(),
                    elevation.sin(),
                )
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth = (self.azimuth - dx * SPEED.x) % 360.0;
        self.elevation = (self.elevation + dy * SPEED.y).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Positive amounts move closer.
    pub fn zoom(&mut self, amount: f32) {
        let factor = (1.0 - amount * SPEED.z).clamp(0.5, 1.5);
        self.distance = (self.distance * factor)
            .clamp(self.home_distance * 0.1, self.home_distance * 10.0);
    }

    pub fn mvp_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.look_at, Vec3::Z)
    }

    fn projection_matrix(&self) -> Mat4 {
        let near = self.distance * 0.01;
        let far = self.distance * 10.0;
        Mat4::perspective_rh(FIELD_OF_VIEW, self.width / self.height, near, far)
    }

    /// Window pixel position of a scene point, or None when it is behind the camera.
    pub fn project(&self, point: Vec3) -> Option<[f32; 2]> {
        let clip = self.mvp_matrix() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some([
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_projects_to_window_center() {
        let camera = Camera::new(0.3, 800, 600);
        let [x, y] = camera.project(Vec3::ZERO).unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn up_is_up_on_screen() {
        let camera = Camera::new(0.3, 800, 600);
        let [_, below] = camera.project(Vec3::new(0.0, 0.0, -0.1)).unwrap();
        let [_, above] = camera.project(Vec3::new(0.0, 0.0, 0.1)).unwrap();
        assert!(above < below);
    }

    #[test]
    fn points_behind_the_camera_do_not_project() {
        let camera = Camera::new(0.3, 800, 600);
        let behind = camera.position() * 2.0;
        assert!(camera.project(behind).is_none());
    }

    #[test]
    fn elevation_stops_short_of_the_pole() {
        let mut camera = Camera::new(0.3, 800, 600);
        camera.orbit(0.0, 10_000.0);
        assert!(camera.position().z < camera.distance);
        camera.orbit(0.0, -20_000.0);
        assert!(camera.position().z > -camera.distance);
    }

    #[test]
    fn zoom_is_bounded_and_reset_restores() {
        let mut camera = Camera::new(0.3, 800, 600);
        let home = camera.position();
        for _ in 0..100 {
            camera.zoom(5.0);
        }
        assert!(camera.distance >= camera.home_distance * 0.1);
        camera.orbit(120.0, 40.0);
        camera.reset();
        assert!(camera.position().distance(home) < 1e-5);
    }
}
