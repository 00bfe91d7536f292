//! Escape-time iteration of the quadratic map `z ↦ z² + c`.

use std::ops::Add;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub real: f32,
    pub imaginary: f32,
}

impl Complex {
    pub const ZERO: Self = Complex {
        real: 0.0,
        imaginary: 0.0,
    };

    pub fn new(real: f32, imaginary: f32) -> Self {
        Self { real, imaginary }
    }

    pub fn square(self) -> Self {
        Self {
            real: self.real * self.real - self.imaginary * self.imaginary,
            imaginary: 2.0 * self.real * self.imaginary,
        }
    }

    /// `|z|²`
    pub fn norm_sqr(self) -> f32 {
        self.real * self.real + self.imaginary * self.imaginary
    }

    pub fn norm(self) -> f32 {
        self.norm_sqr().sqrt()
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            real: self.real + rhs.real,
            imaginary: self.imaginary + rhs.imaginary,
        }
    }
}

pub const MAX_ITERATIONS: u32 = 100;

/// Escape threshold on `|z|²`. Reaching it exactly does not count as escaping.
pub const ESCAPE_NORM_SQR: f32 = 4.0;

#[derive(Clone, Copy, Debug)]
pub struct Escape {
    pub iteration_count: u32,
    /// Final value of `z`; outside the escape radius iff the point escaped.
    pub z: Complex,
    pub max_iterations: u32,
}

impl Escape {
    pub fn escaped(&self) -> bool {
        self.iteration_count < self.max_iterations
    }
}

/**
Iterate `z ↦ z² + c` from `z = 0` until `|z|² > 4` or `max_iterations` steps.

`iteration_count` is the number of steps taken before the escaping one, so a
point that escapes on the first step has a count of 0 and a bounded point has
a count of exactly `max_iterations`.
*/
pub fn iterate(c: Complex, max_iterations: u32) -> Escape {
    let mut z = Complex::ZERO;
    let mut iteration_count = 0;

    while iteration_count < max_iterations {
        z = z.square() + c;
        if z.norm_sqr() > ESCAPE_NORM_SQR {
            break;
        }
        iteration_count += 1;
    }

    Escape {
        iteration_count,
        z,
        max_iterations,
    }
}
