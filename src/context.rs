/*!
Host-side render state.

Everything the GPU needs lives in one [`RenderContext`], created once at
startup. Only [`RenderContext::resize`] changes the viewport, and only
[`RenderContext::render`] consumes time. Dropping the context releases the
device, surface and textures.
*/

use std::num::NonZeroU32;

use bytemuck::{Pod, Zeroable};
use log::{debug, info, trace, warn};
use winit::window::Window;

use crate::{
    colour::Rgba8,
    commands::{self, FullScreenDraw},
    config::Config,
    error::RenderError,
    frame,
    screen::Size,
    shader::PixelShader,
    uniform::Uniform,
};

const FRAME_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Corresponds to `present.wgsl#Sizes`.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug)]
struct PresentSizes {
    surface: Size,
    frame: Size,
}

/// CPU-written texture holding one rendered frame, plus the bind group that
/// presents it.
struct FrameTexture {
    size: Size,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl FrameTexture {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sizes: &Uniform<PresentSizes>,
        size: Size,
    ) -> Self {
        debug_assert!(!size.is_empty());

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame-texture"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAME_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("present-bind-group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: sizes.binding_resource(),
                },
            ],
        });

        Self {
            size,
            texture,
            bind_group,
        }
    }

    fn upload(&self, queue: &wgpu::Queue, image: &[Rgba8]) {
        debug_assert_eq!(image.len(), self.size.pixel_count());

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(image),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(4 * self.size.width),
                rows_per_image: NonZeroU32::new(self.size.height),
            },
            wgpu::Extent3d {
                width: self.size.width,
                height: self.size.height,
                depth_or_array_layers: 1,
            },
        );
    }
}

pub struct RenderContext {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    sizes: Uniform<PresentSizes>,
    /// `None` while the window has no pixels.
    frame: Option<FrameTexture>,
    image: Vec<Rgba8>,
    shader: Box<dyn PixelShader>,
    scale: u32,
    viewport: Size,
}

impl RenderContext {
    pub fn new(window: &Window, config: &Config) -> Result<Self, RenderError> {
        let viewport = Size::from(window.inner_size());

        let instance = wgpu::Instance::new(wgpu::Backends::all());
        let surface = unsafe { instance.create_surface(window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or(RenderError::NoAdapter)?;
        info!("using adapter {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        // Frames are already display-encoded, so avoid a second sRGB encode
        // when the surface offers a linear format.
        let formats = surface.get_supported_formats(&adapter);
        let format = formats
            .iter()
            .copied()
            .find(|format| !format.describe().srgb)
            .or_else(|| formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        if format.describe().srgb {
            warn!("only sRGB surface formats available; colours will look washed out");
        }
        debug!("surface format {:?}", format);

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: viewport.width,
            height: viewport.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        if !viewport.is_empty() {
            surface.configure(&device, &surface_configuration);
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("present-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline = create_present_pipeline(&device, &bind_group_layout, format)?;

        let scale = config.render_scale();
        let render_size = viewport.scaled_down(scale);
        let sizes = Uniform::new(
            &device,
            "present-sizes",
            PresentSizes {
                surface: viewport,
                frame: render_size,
            },
        );

        let frame_texture = (!viewport.is_empty())
            .then(|| FrameTexture::new(&device, &bind_group_layout, &sizes, render_size));

        info!(
            "rendering {:?} at {:?} (1/{} of the window)",
            config.variant, render_size, scale
        );

        Ok(Self {
            surface,
            device,
            queue,
            surface_configuration,
            bind_group_layout,
            pipeline,
            sizes,
            frame: frame_texture,
            image: Vec::new(),
            shader: config.variant.shader(),
            scale,
            viewport,
        })
    }

    pub fn resize(&mut self, size: Size) {
        if size == self.viewport && self.frame.is_some() {
            return;
        }
        debug!("resizing to {:?}", size);
        self.viewport = size;

        if size.is_empty() {
            self.frame = None;
            return;
        }

        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface.configure(&self.device, &self.surface_configuration);

        let render_size = size.scaled_down(self.scale);
        self.sizes.write(
            &self.queue,
            PresentSizes {
                surface: size,
                frame: render_size,
            },
        );
        self.frame = Some(FrameTexture::new(
            &self.device,
            &self.bind_group_layout,
            &self.sizes,
            render_size,
        ));
    }

    /// Render and present one frame at `time_seconds`.
    ///
    /// The image is evaluated and uploaded before the surface texture is
    /// acquired, so the swapchain image is only held for the present pass.
    /// Frames are skipped (not failed) while the window is empty or the
    /// surface needs reconfiguring.
    pub fn render(&mut self, time_seconds: f64) -> Result<(), RenderError> {
        let frame_texture = match &self.frame {
            Some(frame_texture) => frame_texture,
            None => {
                trace!("skipping frame for empty viewport");
                return Ok(());
            }
        };

        frame::render_frame(
            self.shader.as_ref(),
            frame_texture.size,
            time_seconds,
            &mut self.image,
        )?;
        frame_texture.upload(&self.queue, &self.image);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(error @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!("{}; reconfiguring and skipping frame", error);
                self.surface.configure(&self.device, &self.surface_configuration);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out acquiring surface texture; skipping frame");
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let command_buffer = commands::record_full_screen_pass(
            &self.device,
            "present-pass",
            &surface_texture_view,
            FullScreenDraw {
                pipeline: &self.pipeline,
                bind_group: &frame_texture.bind_group,
            },
        );

        self.queue.submit([command_buffer]);
        surface_texture.present();
        Ok(())
    }
}

/// Compile `present.wgsl` and link it into the present pipeline. Any
/// validation error is fatal.
fn create_present_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("present-shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("present.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("present-pipeline-layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("present-pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: "vertex_main",
            buffers: &[],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: "fragment_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(RenderError::ShaderCompilation(error.to_string())),
        None => Ok(pipeline),
    }
}
