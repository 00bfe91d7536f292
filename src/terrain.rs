//! Ray-marched fbm terrain with height-based colouring, diffuse light and fog.

use glam::{vec3, Vec2, Vec3};

use crate::{
    math::{mix, smoothstep},
    screen::{self, Size},
    shader::PixelShader,
    tracer::{self, HitRecord, Ray},
};

pub const SKY_COLOUR: Vec3 = vec3(0.6, 0.7, 0.8);
pub const FOG_COLOUR: Vec3 = vec3(0.6, 0.7, 0.8);
const VALLEY_COLOUR: Vec3 = vec3(0.2, 0.3, 0.1);
const PEAK_COLOUR: Vec3 = vec3(0.8, 0.8, 0.8);
const AMBIENT: f32 = 0.2;
const FOG_DENSITY: f32 = 0.1;
pub const GAMMA: f32 = 0.4545;

const CAMERA_ORIGIN: Vec3 = vec3(0.0, 4.0, -6.0);
const CAMERA_TARGET: Vec3 = Vec3::ZERO;
/// Radians per second of camera orbit around the vertical axis.
const ORBIT_SPEED: f32 = 0.2;

/// Rotate `v` about +Y by `angle` radians.
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    vec3(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

/// Camera ray through device coordinate `uv`, orbited by `time`.
pub fn camera_ray(uv: Vec2, time: f32) -> Ray {
    let forward = (CAMERA_TARGET - CAMERA_ORIGIN).normalize();
    let right = Vec3::Y.cross(forward).normalize();
    let up = forward.cross(right);
    let direction = (forward + right * uv.x + up * uv.y).normalize();

    let angle = time * ORBIT_SPEED;
    Ray::new(rotate_y(CAMERA_ORIGIN, angle), rotate_y(direction, angle))
}

fn light_direction() -> Vec3 {
    vec3(1.0, 1.0, -1.0).normalize()
}

/// Linear colour for a trace result, before gamma correction.
pub fn shade(record: &HitRecord) -> Vec3 {
    if !record.hit {
        return SKY_COLOUR;
    }

    let base = mix(
        VALLEY_COLOUR,
        PEAK_COLOUR,
        smoothstep(-0.5, 1.0, record.position.y),
    );
    let diffuse = record.normal.dot(light_direction()).max(0.0);
    let lit = base * (diffuse + AMBIENT);

    mix(lit, FOG_COLOUR, 1.0 - (-FOG_DENSITY * record.t).exp())
}

/// Per-channel gamma. Negative channels are clamped first so `powf` never
/// sees a negative base.
pub fn gamma_correct(colour: Vec3) -> Vec3 {
    colour.max(Vec3::ZERO).powf(GAMMA)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Terrain;

impl PixelShader for Terrain {
    fn evaluate_pixel(&self, frag_coord: Vec2, viewport: Size, time: f32) -> Vec3 {
        let uv = screen::device_coordinate(frag_coord, viewport);
        let record = tracer::trace(&camera_ray(uv, time));
        gamma_correct(shade(&record))
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    fn sky() -> Vec3 {
        gamma_correct(SKY_COLOUR)
    }

    #[test]
    fn rotation_preserves_height_and_length() {
        let v = vec3(1.0, 2.0, -3.0);
        let rotated = rotate_y(v, 1.3);
        assert_eq!(rotated.y, 2.0);
        assert!((rotated.length() - v.length()).abs() < 1e-5);
        assert_eq!(rotate_y(v, 0.0), v);
    }

    #[test]
    fn center_ray_looks_at_target() {
        let ray = camera_ray(Vec2::ZERO, 0.0);
        let expected = (CAMERA_TARGET - CAMERA_ORIGIN).normalize();
        assert!((ray.direction - expected).length() < 1e-6);
        assert_eq!(ray.origin, CAMERA_ORIGIN);
    }

    #[test]
    fn miss_is_sky() {
        let record = HitRecord {
            t: 25.0,
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            hit: false,
        };
        assert_eq!(shade(&record), SKY_COLOUR);
    }

    #[test]
    fn far_hits_fade_into_fog() {
        let record = HitRecord {
            t: 1000.0,
            position: Vec3::ZERO,
            normal: Vec3::Y,
            hit: true,
        };
        assert!((shade(&record) - FOG_COLOUR).length() < 1e-4);
    }

    #[test]
    fn near_hit_facing_away_from_light_is_ambient_only() {
        let record = HitRecord {
            t: 0.0,
            position: vec3(0.0, -0.5, 0.0),
            normal: -light_direction(),
            hit: true,
        };
        assert!((shade(&record) - VALLEY_COLOUR * AMBIENT).length() < 1e-6);
    }

    #[test]
    fn gamma_never_produces_nan() {
        let corrected = gamma_correct(vec3(-0.5, 0.0, 1.0));
        assert_eq!(corrected, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn viewport_center_sees_terrain() {
        let viewport = Size::new(800, 600);
        let colour = Terrain.evaluate_pixel(vec2(400.0, 300.0), viewport, 0.0);

        let record = tracer::trace(&camera_ray(Vec2::ZERO, 0.0));
        assert!(record.hit);
        assert!((colour - sky()).length() > 1e-3);
    }

    #[test]
    fn output_channels_are_in_unit_range() {
        let viewport = Size::new(64, 48);
        for row in (0..48).step_by(6) {
            for column in (0..64).step_by(8) {
                let frag = screen::frag_coord(column, row, viewport);
                let colour = Terrain.evaluate_pixel(frag, viewport, 3.7);
                for channel in colour.to_array() {
                    assert!((0.0..=1.0).contains(&channel), "{:?}", colour);
                }
            }
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let viewport = Size::new(320, 240);
        let frag = vec2(101.5, 77.5);
        let first = Terrain.evaluate_pixel(frag, viewport, 12.25);
        let second = Terrain.evaluate_pixel(frag, viewport, 12.25);
        assert_eq!(first.to_array(), second.to_array());
    }

    #[test]
    fn mid_height_hit_is_lit_then_fogged() {
        let record = HitRecord {
            t: 10.0,
            position: vec3(0.0, 0.25, 0.0),
            normal: Vec3::Y,
            hit: true,
        };

        let base = vec3(0.5, 0.55, 0.45);
        let lit = base * (1.0 / 3f32.sqrt() + 0.2);
        let fog = vec3(0.6, 0.7, 0.8);
        let expected = lit + (fog - lit) * (1.0 - (-1f32).exp());

        let colour = shade(&record);
        assert!(
            (colour - expected).abs().max_element() < 1e-5,
            "{:?} != {:?}",
            colour,
            expected
        );
    }

    #[test]
    fn gamma_is_the_inverse_of_2_2() {
        let corrected = gamma_correct(Vec3::splat(0.5));
        assert!((corrected - Vec3::splat(0.5f32.powf(0.4545))).abs().max_element() < 1e-6);
        assert!((corrected.x - 0.7298).abs() < 1e-3);
    }
}
