//! GPU-to-CPU readback of the develop output.

use std::sync::mpsc;

use crate::error::GpuError;

/// Copy `source` into a staging buffer, block until it is mapped and
/// return its contents as packed pixels.
pub fn download_packed(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    source: &wgpu::Buffer,
    size: u64,
) -> Result<Vec<u32>, GpuError> {
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("darkroom_image_staging"),
        size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("darkroom_image_download_encoder"),
    });
    encoder.copy_buffer_to_buffer(source, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    let (tx, rx) = mpsc::channel();
    staging
        .slice(..)
        .map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|e| GpuError::Poll(e.to_string()))?;

    rx.recv()
        .map_err(|e| GpuError::BufferMap(e.to_string()))?
        .map_err(|e| GpuError::BufferMap(e.to_string()))?;

    let data = staging.slice(..).get_mapped_range();
    let packed: Vec<u32> = bytemuck::cast_slice(&data).to_vec();
    drop(data);
    staging.unmap();
    Ok(packed)
}
