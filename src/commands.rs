/// Number of vertices in the triangle strip that covers the target.
pub const FULL_SCREEN_VERTICES: u32 = 4;

/// Pipeline and bindings for a pass that covers the whole target.
pub struct FullScreenDraw<'a> {
    pub pipeline: &'a wgpu::RenderPipeline,
    pub bind_group: &'a wgpu::BindGroup,
}

/// Record a single render pass that clears `target` to black and draws the
/// full-screen strip, and finish the encoder.
pub fn record_full_screen_pass(
    device: &wgpu::Device,
    label: &str,
    target: &wgpu::TextureView,
    draw: FullScreenDraw<'_>,
) -> wgpu::CommandBuffer {
    let mut command_encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some(label),
    });

    command_encoder.push_debug_group(label);
    {
        let mut render_pass = command_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: true,
                },
            })],
            depth_stencil_attachment: None,
        });

        render_pass.set_pipeline(draw.pipeline);
        render_pass.set_bind_group(0, draw.bind_group, &[]);
        render_pass.draw(0..FULL_SCREEN_VERTICES, 0..1);
    }
    command_encoder.pop_debug_group();

    command_encoder.finish()
}
