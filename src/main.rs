mod colour;
mod commands;
mod complex;
mod config;
mod context;
mod error;
mod frame;
mod mandelbrot;
mod math;
mod noise;
mod screen;
mod shader;
mod terrain;
mod tracer;
mod uniform;

use clap::Parser;
use log::{debug, error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::{config::Config, context::RenderContext, error::RenderError, frame::FrameClock};

fn main() -> Result<(), RenderError> {
    env_logger::init();

    let config = Config::parse();
    debug!("{:?}", config);

    let threads = config.thread_count();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;
    info!("evaluating pixels on {} threads", threads);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("procedural-shaders")
        .build(&event_loop)?;

    let mut context = RenderContext::new(&window, &config)?;
    let clock = FrameClock::start();

    event_loop.run(move |event, _, control_flow| {
        // To present frames in realtime, *don't* set `control_flow` to `Wait`.
        match event {
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    context.resize(size.into());
                    window.request_redraw();
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    context.resize((*new_inner_size).into());
                }
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                if let Err(error) = context.render(clock.elapsed()) {
                    error!("{}", error);
                    *control_flow = ControlFlow::ExitWithCode(1);
                }
            }
            _ => {}
        }
    })
}
