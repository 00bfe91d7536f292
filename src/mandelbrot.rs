//! Smooth-coloured Mandelbrot set with an animated hue.

use glam::{vec2, Vec2, Vec3};

use crate::{
    colour,
    complex::{self, Complex},
    screen::{self, Size},
    shader::PixelShader,
};

/// Half the height of the visible region of the complex plane on the shorter axis.
const PLANE_SCALE: f32 = 1.5;
const PLANE_CENTER: Vec2 = vec2(-0.5, 0.0);

/// Point on the complex plane for device coordinate `uv`.
pub fn plane_coordinate(uv: Vec2) -> Complex {
    let c = uv * PLANE_SCALE + PLANE_CENTER;
    Complex::new(c.x, c.y)
}

/// Colour of a single point on the complex plane at `time`. No gamma is applied.
pub fn evaluate_point(c: Complex, time: f32) -> Vec3 {
    let escape = complex::iterate(c, complex::MAX_ITERATIONS);
    colour::hue_colour(&escape, time)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Mandelbrot;

impl PixelShader for Mandelbrot {
    fn evaluate_pixel(&self, frag_coord: Vec2, viewport: Size, time: f32) -> Vec3 {
        let uv = screen::device_coordinate(frag_coord, viewport);
        evaluate_point(plane_coordinate(uv), time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_center_is_plane_center() {
        assert_eq!(plane_coordinate(Vec2::ZERO), Complex::new(-0.5, 0.0));
    }

    #[test]
    fn main_cardioid_is_black_at_any_time() {
        let viewport = Size::new(800, 600);
        // uv = (-1/3, 0) maps to c = (-1, 0).
        let frag = vec2(300.0, 300.0);
        let c = plane_coordinate(screen::device_coordinate(frag, viewport));
        assert!((c.real + 1.0).abs() < 1e-6 && c.imaginary == 0.0);

        for time in [0.0, 1.5, 60.0, 3600.0] {
            assert_eq!(Mandelbrot.evaluate_pixel(frag, viewport, time), Vec3::ZERO);
        }
    }

    #[test]
    fn hue_changes_over_time_outside_the_set() {
        let c = Complex::new(0.5, 0.5);
        let early = evaluate_point(c, 0.0);
        let late = evaluate_point(c, 2.5);
        assert_ne!(early, Vec3::ZERO);
        assert!((early - late).length() > 1e-3);
        // A full hue turn takes ten seconds.
        assert!((early - evaluate_point(c, 10.0)).length() < 1e-3);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let viewport = Size::new(1024, 768);
        let frag = vec2(12.5, 700.5);
        let first = Mandelbrot.evaluate_pixel(frag, viewport, 4.2);
        assert_eq!(first.to_array(), Mandelbrot.evaluate_pixel(frag, viewport, 4.2).to_array());
    }
}
