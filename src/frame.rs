//! Per-frame evaluation of a [`PixelShader`] over a whole viewport.

use std::time::Instant;

use log::trace;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{
    colour::Rgba8,
    error::FrameError,
    screen::{self, Size},
    shader::PixelShader,
};

/// Monotonic frame time source, started once at startup.
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since [`FrameClock::start`]. Never decreases.
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/**
Evaluate `shader` for every pixel of `viewport` at `time_seconds` into `image`.

`image` is laid out row-major with row 0 at the top, and is resized to
`viewport.pixel_count()`. An empty viewport evaluates nothing and leaves
`image` empty. The result depends only on the shader, `viewport`, and
`time_seconds`; rows are evaluated in parallel on the global [`rayon`] pool.
*/
pub fn render_frame(
    shader: &dyn PixelShader,
    viewport: Size,
    time_seconds: f64,
    image: &mut Vec<Rgba8>,
) -> Result<(), FrameError> {
    if !time_seconds.is_finite() || time_seconds < 0.0 {
        return Err(FrameError::InvalidTime(time_seconds));
    }

    if viewport.is_empty() {
        image.clear();
        return Ok(());
    }

    trace!("begin render_frame {:?} at {:.3}s", viewport, time_seconds);

    image.resize(viewport.pixel_count(), Rgba8::default());
    let time = time_seconds as f32;

    image
        .par_chunks_mut(viewport.width as usize)
        .enumerate()
        .for_each(|(row, pixels)| {
            for (column, pixel) in pixels.iter_mut().enumerate() {
                let frag_coord = screen::frag_coord(column as u32, row as u32, viewport);
                *pixel = Rgba8::from_colour(shader.evaluate_pixel(frag_coord, viewport, time));
            }
        });

    trace!("end render_frame");
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::{vec3, Vec2, Vec3};

    use super::*;
    use crate::{mandelbrot::Mandelbrot, terrain::Terrain};

    /// Encodes the fragment coordinate into the colour.
    struct Gradient;

    impl PixelShader for Gradient {
        fn evaluate_pixel(&self, frag_coord: Vec2, viewport: Size, _time: f32) -> Vec3 {
            vec3(
                frag_coord.x / viewport.width as f32,
                frag_coord.y / viewport.height as f32,
                0.0,
            )
        }
    }

    fn render(shader: &dyn PixelShader, viewport: Size, time: f64) -> Vec<Rgba8> {
        let mut image = Vec::new();
        render_frame(shader, viewport, time, &mut image).unwrap();
        image
    }

    #[test]
    fn empty_viewport_renders_nothing() {
        let mut image = vec![Rgba8::default(); 16];
        render_frame(&Terrain, Size::new(0, 480), 1.0, &mut image).unwrap();
        assert!(image.is_empty());

        render_frame(&Terrain, Size::new(640, 0), 1.0, &mut image).unwrap();
        assert!(image.is_empty());
    }

    #[test]
    fn invalid_time_is_rejected() {
        let mut image = Vec::new();
        for time in [f64::NAN, f64::INFINITY, -1.0] {
            let result = render_frame(&Mandelbrot, Size::new(8, 8), time, &mut image);
            assert!(matches!(result, Err(FrameError::InvalidTime(_))));
        }
    }

    #[test]
    fn image_covers_viewport_top_row_first() {
        let viewport = Size::new(5, 3);
        let image = render(&Gradient, viewport, 0.0);
        assert_eq!(image.len(), 15);

        let top_left = image[0];
        let bottom_left = image[10];
        let top_right = image[4];
        assert!(top_left.g > bottom_left.g);
        assert!(top_right.r > top_left.r);
        assert!(image.iter().all(|pixel| pixel.a == u8::MAX));
    }

    #[test]
    fn parallel_image_matches_per_pixel_evaluation() {
        let viewport = Size::new(24, 16);
        let time = 2.0;
        let image = render(&Mandelbrot, viewport, time);

        for row in 0..viewport.height {
            for column in 0..viewport.width {
                let frag = screen::frag_coord(column, row, viewport);
                let expected =
                    Rgba8::from_colour(Mandelbrot.evaluate_pixel(frag, viewport, time as f32));
                assert_eq!(image[(row * viewport.width + column) as usize], expected);
            }
        }
    }

    #[test]
    fn rerendering_is_identical() {
        let viewport = Size::new(16, 12);
        assert_eq!(
            render(&Terrain, viewport, 7.5),
            render(&Terrain, viewport, 7.5)
        );
    }

    #[test]
    fn image_shrinks_with_viewport() {
        let mut image = Vec::new();
        render_frame(&Mandelbrot, Size::new(10, 10), 0.0, &mut image).unwrap();
        render_frame(&Mandelbrot, Size::new(4, 2), 0.0, &mut image).unwrap();
        assert_eq!(image.len(), 8);
    }

    #[test]
    fn clock_is_monotonic() {
        let clock = FrameClock::start();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(first >= 0.0 && second >= first);
    }
}
