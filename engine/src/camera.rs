use glam::{Mat4, Vec3, Vec4Swizzles};

pub const DEFAULT_FOV_Y_DEGREES: f32 = 50.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;

/// Perspective camera aimed at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: DEFAULT_FOV_Y_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            aspect: 1.0,
        }
    }
}

impl Camera {
    /// Places the camera at `center + offset`, looking at `center`.
    pub fn orbiting(center: Vec3, offset: Vec3, aspect: f32) -> Self {
        Self {
            position: center + offset,
            target: center,
            aspect,
            ..Self::default()
        }
        .with_up_for_offset(offset)
    }

    pub fn with_lens(mut self, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_y_degrees = fov_y_degrees;
        self.near = near;
        self.far = far;
        self
    }

    // A straight-down camera would make `look_at` degenerate with +Y up.
    fn with_up_for_offset(mut self, offset: Vec3) -> Self {
        let dir = offset.normalize_or_zero();
        if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            self.up = Vec3::NEG_Z;
        }
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect.max(1e-3),
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world point into normalized device coordinates.
    ///
    /// Returns `(ndc, view_depth)`, or `None` when the point is behind the camera or outside
    /// the near/far range.
    pub fn project(&self, world: Vec3) -> Option<(Vec3, f32)> {
        let view = self.view_matrix() * world.extend(1.0);
        let depth = -view.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let clip = self.projection_matrix() * view;
        if clip.w <= 0.0 {
            return None;
        }
        Some((clip.xyz() / clip.w, depth))
    }

    /// Screen-space size of a world length seen at `depth`, as a fraction of the viewport height.
    pub fn height_fraction_at(&self, world_len: f32, depth: f32) -> f32 {
        let half_fov = (self.fov_y_degrees.to_radians() * 0.5).tan();
        if depth <= 0.0 || half_fov <= 0.0 {
            return 0.0;
        }
        world_len / (2.0 * depth * half_fov)
    }
}
