/*!
A uniform buffer holding exactly one value of type `A`.

Keeps the host side honest about what the shader's uniform block contains:
only `A`s can be written to a `Uniform<A>`.
*/

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

pub struct Uniform<A> {
    buffer: wgpu::Buffer,
    phantom_data: PhantomData<A>,
}

impl<A: bytemuck::Pod> Uniform<A> {
    pub fn new(device: &wgpu::Device, label: &str, contents: A) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&contents),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Uniform {
            buffer,
            phantom_data: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, contents: A) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&contents));
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}
