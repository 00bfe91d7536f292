//! Shading-language style helpers for `glam` vectors.

use std::ops::{Add, Mul, Sub};

use glam::{vec3, Vec3};

pub fn saturate(x: f32) -> f32 {
    x.max(0.0).min(1.0)
}

/// Hermite interpolation between `edge0` and `edge1`, clamped to `[0, 1]`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let x = saturate((x - edge0) / (edge1 - edge0));
    x * x * (3.0 - 2.0 * x)
}

pub fn mix<X: Copy + Mul<A, Output = X> + Add<Output = X> + Sub<Output = X>, A: Copy>(
    x: X,
    y: X,
    a: A,
) -> X {
    x - x * a + y * a
}

pub trait FloatExt {
    /// `x - floor(x)`, always in `[0, 1)` (unlike [`f32::fract`] for negatives).
    fn gl_fract(self) -> Self;
}

impl FloatExt for f32 {
    fn gl_fract(self) -> f32 {
        self - self.floor()
    }
}

pub trait VecExt {
    fn gl_fract(self) -> Self;
    fn sin(self) -> Self;
}

impl VecExt for Vec3 {
    fn gl_fract(self) -> Vec3 {
        vec3(self.x.gl_fract(), self.y.gl_fract(), self.z.gl_fract())
    }

    fn sin(self) -> Vec3 {
        vec3(self.x.sin(), self.y.sin(), self.z.sin())
    }
}
