// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cameras: a projection plus a view built with [`Camera::look_at`].

use crate::math::{Mat4, MathError, Vec3, Vec4};

/// The projection model of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// A perspective frustum.
    Perspective {
        /// Vertical field of view, in degrees.
        fov_y_degrees: f32,
        /// Width over height.
        aspect: f32,
        /// Near clip distance.
        near: f32,
        /// Far clip distance.
        far: f32,
    },
    /// An axis-aligned box.
    Orthographic {
        /// Left plane.
        left: f32,
        /// Right plane.
        right: f32,
        /// Bottom plane.
        bottom: f32,
        /// Top plane.
        top: f32,
        /// Near plane.
        near: f32,
        /// Far plane.
        far: f32,
    },
}

impl Projection {
    /// The projection matrix.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective(fov_y_degrees, aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic(left, right, bottom, top, near, far),
        }
    }
}

/// A rectangle of the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// A viewport anchored at the origin.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// A viewpoint onto the scene.
///
/// The view matrix is only rebuilt by [`Camera::look_at`]; until it is called the
/// camera sits at the origin looking down `-Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// The projection model.
    pub projection: Projection,
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    view: Mat4,
}

impl Default for Camera {
    /// A 40 degree perspective camera with aspect 1, near 0.1 and far 1000.
    fn default() -> Self {
        Self::perspective(40.0, 1.0, 0.1, 1000.0)
    }
}

impl Camera {
    fn with_projection(projection: Projection) -> Self {
        Self {
            projection,
            eye: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            view: Mat4::IDENTITY,
        }
    }

    /// A perspective camera.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Perspective {
            fov_y_degrees,
            aspect,
            near,
            far,
        })
    }

    /// An orthographic camera.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Orthographic {
            left,
            right,
            bottom,
            top,
            near,
            far,
        })
    }

    /// Places the camera at `eye`, looking at `target`, and rebuilds the view matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DegenerateBasis`] if `eye == target` or `up` is
    /// parallel to the view direction. The camera is left unchanged.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) -> Result<(), MathError> {
        self.view = Mat4::look_at_rh(eye, target, up)?;
        self.eye = eye;
        self.target = target;
        self.up = up;
        Ok(())
    }

    /// The camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.eye
    }

    /// The point the camera looks at.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// The up vector passed to the last [`Camera::look_at`].
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Updates the aspect ratio of a perspective camera. No-op for orthographic ones.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = new_aspect;
        }
    }

    /// The world-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// The view-to-clip matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view
    }

    /// Maps a world-space point to window coordinates; `z` is depth in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::DivisionByZero`] for a point on the camera plane.
    pub fn project(&self, world: Vec3, viewport: &Viewport) -> Result<Vec3, MathError> {
        let ndc = self.view_projection().transform_point(world)?;
        Ok(Vec3::new(
            (ndc.x * 0.5 + 0.5) * viewport.width + viewport.x,
            (ndc.y * 0.5 + 0.5) * viewport.height + viewport.y,
            (ndc.z + 1.0) * 0.5,
        ))
    }

    /// Maps window coordinates (with depth in `[0, 1]`) back to world space.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::SingularMatrix`] if the view-projection has no
    /// inverse, or [`MathError::DivisionByZero`] for a degenerate viewport.
    pub fn unproject(&self, window: Vec3, viewport: &Viewport) -> Result<Vec3, MathError> {
        if viewport.width == 0.0 || viewport.height == 0.0 {
            return Err(MathError::DivisionByZero);
        }
        let inverse = self.view_projection().inverse()?;
        let ndc = Vec4::new(
            (window.x - viewport.x) / viewport.width * 2.0 - 1.0,
            (window.y - viewport.y) / viewport.height * 2.0 - 1.0,
            window.z * 2.0 - 1.0,
            1.0,
        );
        let world = inverse * ndc;
        world.truncate().try_div_scalar(world.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_camera_uses_engine_perspective() {
        let camera = Camera::default();
        assert_eq!(
            camera.projection,
            Projection::Perspective {
                fov_y_degrees: 40.0,
                aspect: 1.0,
                near: 0.1,
                far: 1000.0
            }
        );
        assert_eq!(camera.view_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn look_at_rejects_degenerate_input_and_keeps_state() {
        let mut camera = Camera::default();
        camera
            .look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .expect("valid basis");
        let err = camera.look_at(Vec3::ZERO, Vec3::ZERO, Vec3::Y);
        assert_eq!(err, Err(MathError::DegenerateBasis));
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn target_projects_to_viewport_centre() {
        let mut camera = Camera::perspective(60.0, 4.0 / 3.0, 0.1, 100.0);
        camera
            .look_at(Vec3::new(3.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y)
            .expect("valid basis");
        let viewport = Viewport::new(800.0, 600.0);
        let window = camera.project(Vec3::ZERO, &viewport).expect("in front");
        assert_abs_diff_eq!(window.x, 400.0, epsilon = 1e-2);
        assert_abs_diff_eq!(window.y, 300.0, epsilon = 1e-2);
    }

    #[test]
    fn unproject_inverts_project() {
        let mut camera = Camera::perspective(45.0, 1.0, 0.5, 50.0);
        camera
            .look_at(Vec3::new(0.0, 1.0, 6.0), Vec3::ZERO, Vec3::Y)
            .expect("valid basis");
        let viewport = Viewport::new(256.0, 256.0);
        let world = Vec3::new(0.5, -0.25, 1.0);
        let window = camera.project(world, &viewport).expect("in front");
        let back = camera.unproject(window, &viewport).expect("invertible");
        assert_abs_diff_eq!(back, world, epsilon = 1e-3);
    }

    #[test]
    fn orthographic_ignores_aspect_updates() {
        let mut camera = Camera::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
        let before = camera.projection;
        camera.set_aspect(2.0);
        assert_eq!(camera.projection, before);
    }
}
