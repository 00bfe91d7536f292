/*!
Gradient noise and fractal Brownian motion.

Everything here is a pure function of its input position: there is no seed and
no state, so the same world position produces the same value in every frame
and in every one of the eight lattice-corner lookups of a single [`noise3`].
*/

use glam::{vec3, Vec3};

use crate::math::{mix, VecExt};

pub const OCTAVES: usize = 6;

/// Scale applied to world positions before sampling the height field.
pub const HEIGHT_SCALE: f32 = 0.5;

/// Pseudo-random gradient for an integer lattice point, each component in `[-1, 1]`.
pub fn hash(lattice: Vec3) -> Vec3 {
    let p = vec3(
        lattice.dot(vec3(127.1, 311.7, 74.7)),
        lattice.dot(vec3(269.5, 183.3, 246.1)),
        lattice.dot(vec3(113.5, 271.9, 124.6)),
    );
    Vec3::splat(-1.0) + 2.0 * (p.sin() * 43758.547).gl_fract()
}

/// `6t⁵ - 15t⁴ + 10t³`, which has zero first and second derivatives at the
/// cell boundaries.
fn quintic(f: Vec3) -> Vec3 {
    f * f * f * (f * (f * 6.0 - Vec3::splat(15.0)) + Vec3::splat(10.0))
}

fn corner(cell: Vec3, offset: Vec3, f: Vec3) -> f32 {
    hash(cell + offset).dot(f - offset)
}

/// Gradient noise on the unit lattice.
pub fn noise3(p: Vec3) -> f32 {
    let cell = p.floor();
    let f = p - cell;
    let u = quintic(f);

    mix(
        mix(
            mix(
                corner(cell, vec3(0.0, 0.0, 0.0), f),
                corner(cell, vec3(1.0, 0.0, 0.0), f),
                u.x,
            ),
            mix(
                corner(cell, vec3(0.0, 1.0, 0.0), f),
                corner(cell, vec3(1.0, 1.0, 0.0), f),
                u.x,
            ),
            u.y,
        ),
        mix(
            mix(
                corner(cell, vec3(0.0, 0.0, 1.0), f),
                corner(cell, vec3(1.0, 0.0, 1.0), f),
                u.x,
            ),
            mix(
                corner(cell, vec3(0.0, 1.0, 1.0), f),
                corner(cell, vec3(1.0, 1.0, 1.0), f),
                u.x,
            ),
            u.y,
        ),
        u.z,
    )
}

/// Six octaves of [`noise3`]: frequency doubles and amplitude halves per octave,
/// starting from amplitude 0.5 at frequency 1.
pub fn fbm(p: Vec3) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..OCTAVES {
        value += amplitude * noise3(p * frequency);
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    value
}

/// Signed implicit terrain surface: positive above the ground, negative below.
pub fn terrain_field(p: Vec3) -> f32 {
    p.y - fbm(p * HEIGHT_SCALE)
}
