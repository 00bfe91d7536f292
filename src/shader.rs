//! The capability every procedural variant provides to the frame driver.

use glam::{Vec2, Vec3};

use crate::{mandelbrot::Mandelbrot, screen::Size, terrain::Terrain};

/**
A per-pixel procedural program.

Implementations must be pure: the colour depends only on the arguments, so
pixels can be evaluated in any order and on any thread. `viewport` is never
empty when called from [`crate::frame::render_frame`].
*/
pub trait PixelShader: Sync {
    /// Colour of the fragment at `frag_coord` (pixel center, origin bottom-left),
    /// each channel in `[0, 1]`.
    fn evaluate_pixel(&self, frag_coord: Vec2, viewport: Size, time: f32) -> Vec3;
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Ray-marched fractal terrain with fog.
    Terrain,
    /// Mandelbrot set with a rotating hue.
    Mandelbrot,
}

impl Variant {
    pub fn shader(self) -> Box<dyn PixelShader> {
        match self {
            Variant::Terrain => Box::new(Terrain),
            Variant::Mandelbrot => Box::new(Mandelbrot),
        }
    }

    /// Render-scale divisor used when none is given. Ray marching costs far
    /// more per pixel than the escape loop, so terrain renders coarser.
    pub fn default_scale(self) -> u32 {
        match self {
            Variant::Terrain => 4,
            Variant::Mandelbrot => 2,
        }
    }
}
