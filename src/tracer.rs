//! Sphere tracing against the implicit terrain surface.

use glam::{vec3, Vec3};

use crate::noise::{self, HEIGHT_SCALE};

/// A march stops once the field value is within this distance of zero.
pub const HIT_EPSILON: f32 = 0.01;

/// Fraction of the field value advanced per step. The height field is not a
/// true distance bound, so full steps would overshoot.
pub const STEP_SCALE: f32 = 0.5;

pub const NORMAL_EPSILON: f32 = 0.01;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// `direction` is normalized on construction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MarchLimits {
    pub max_steps: usize,
    pub max_distance: f32,
}

impl Default for MarchLimits {
    fn default() -> Self {
        Self {
            max_steps: 128,
            max_distance: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HitRecord {
    pub t: f32,
    pub position: Vec3,
    /// Zero when nothing was hit.
    pub normal: Vec3,
    pub hit: bool,
}

/// March along `ray` until `field` changes sign within [`HIT_EPSILON`].
///
/// The result is a hit only if the surface was found within
/// `limits.max_distance`; leaving the distance range or running out of steps
/// are both misses. `normal` is left at zero.
pub fn march(ray: &Ray, field: impl Fn(Vec3) -> f32, limits: MarchLimits) -> HitRecord {
    let mut t = 0.0;
    let mut position = ray.origin;

    for _ in 0..limits.max_steps {
        position = ray.at(t);
        let h = field(position);

        if t > limits.max_distance {
            break;
        }
        if h.abs() < HIT_EPSILON {
            return HitRecord {
                t,
                position,
                normal: Vec3::ZERO,
                hit: true,
            };
        }

        t += h * STEP_SCALE;
    }

    HitRecord {
        t,
        position,
        normal: Vec3::ZERO,
        hit: false,
    }
}

/**
Forward-difference surface normal of the fbm height field at `p`.

`p` is in height-field space (world position times [`HEIGHT_SCALE`]). Only the
x and z axes are differenced; the y component is the step itself. The result
is deterministic but deliberately one-sided, so it is not the exact gradient.
*/
pub fn normal(p: Vec3) -> Vec3 {
    let h = noise::fbm(p);
    vec3(
        noise::fbm(p + Vec3::X * NORMAL_EPSILON) - h,
        NORMAL_EPSILON,
        noise::fbm(p + Vec3::Z * NORMAL_EPSILON) - h,
    )
    .normalize()
}

/// Trace `ray` against the terrain and fill in the surface normal on a hit.
pub fn trace(ray: &Ray) -> HitRecord {
    let mut record = march(ray, noise::terrain_field, MarchLimits::default());
    if record.hit {
        record.normal = normal(record.position * HEIGHT_SCALE);
    }
    record
}
