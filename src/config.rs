//! Command-line configuration.

use clap::Parser;

use crate::shader::Variant;

#[derive(Parser, Debug)]
#[command(name = "procedural-shaders")]
#[command(about = "Full-window procedural shader renderer (fbm terrain or Mandelbrot)")]
pub struct Config {
    /// Which procedural program to render.
    #[arg(short, long, value_enum, default_value_t = Variant::Terrain)]
    pub variant: Variant,

    /// Render at 1/SCALE of the window resolution and upscale on present.
    /// Defaults to 4 for terrain and 2 for mandelbrot.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub scale: Option<u32>,

    /// Worker threads for pixel evaluation. Defaults to the number of logical CPUs.
    #[arg(short, long)]
    pub threads: Option<usize>,
}

impl Config {
    pub fn thread_count(&self) -> usize {
        self.threads.filter(|&n| n > 0).unwrap_or_else(num_cpus::get)
    }

    pub fn render_scale(&self) -> u32 {
        self.scale.unwrap_or_else(|| self.variant.default_scale())
    }
}
