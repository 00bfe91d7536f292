//! Colouring for escape-time results, and the quantized pixel format.

use bytemuck::{Pod, Zeroable};
use glam::{vec3, Vec3};

use crate::{
    complex::Escape,
    math::{mix, saturate, VecExt},
};

const HUE_OFFSET: f32 = 0.95;
const HUE_PER_ITERATION: f32 = 0.012;
/// Full hue turns per second.
const HUE_SPEED: f32 = 0.1;
const SATURATION: f32 = 0.9;
const VALUE: f32 = 1.0;

/// [`bytemuck`]-compatible colour output for a single pixel, as uploaded to
/// an `Rgba8Unorm` texture.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Quantize an opaque colour. Channels are clamped to `[0, 1]` first, and
    /// NaN becomes 0.
    pub fn from_colour(colour: Vec3) -> Self {
        fn channel(value: f32) -> u8 {
            (saturate(value) * 255.0).round() as u8
        }

        Self {
            r: channel(colour.x),
            g: channel(colour.y),
            b: channel(colour.z),
            a: u8::MAX,
        }
    }
}

/// Piecewise-linear HSV to RGB. `hue` wraps with period 1.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Vec3 {
    let k = (Vec3::splat(hue) + vec3(0.0, 2.0 / 3.0, 1.0 / 3.0)).gl_fract() * 6.0
        - Vec3::splat(3.0);
    let rgb = (k.abs() - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE);
    value * mix(Vec3::ONE, rgb, saturation)
}

/// Continuous iteration count `n + 1 - log₂(ln |z|)` for an escaped point.
pub fn smooth_iteration_count(escape: &Escape) -> f32 {
    escape.iteration_count as f32 + 1.0 - escape.z.norm().ln().ln() / std::f32::consts::LN_2
}

/// Interior points are black; escaped points get a hue that rotates with `time`.
pub fn hue_colour(escape: &Escape, time: f32) -> Vec3 {
    if !escape.escaped() {
        return Vec3::ZERO;
    }

    let smoothed = smooth_iteration_count(escape);
    let hue = HUE_OFFSET + HUE_PER_ITERATION * smoothed + time * HUE_SPEED;
    hsv_to_rgb(hue, SATURATION, VALUE)
}
