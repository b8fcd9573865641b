//! GPU buffer management for the develop pass.

use darkroom_core::PixelBuffer;
use darkroom_core::buffer::CHANNELS;
use wgpu::util::DeviceExt;

/// Pack RGB bytes into one `u32` per pixel, red in the low byte.
pub fn pack_pixels(pixels: &PixelBuffer) -> Vec<u32> {
    pixels
        .as_bytes()
        .chunks_exact(CHANNELS)
        .map(|px| u32::from(px[0]) | (u32::from(px[1]) << 8) | (u32::from(px[2]) << 16))
        .collect()
}

/// Inverse of [`pack_pixels`].
pub fn unpack_pixels(packed: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(packed.len() * CHANNELS);
    for &p in packed {
        out.push((p & 0xff) as u8);
        out.push(((p >> 8) & 0xff) as u8);
        out.push(((p >> 16) & 0xff) as u8);
    }
    out
}

/// Byte size of a packed image.
pub fn packed_size(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * 4
}

/// Source and destination storage buffers for one image.
pub struct GpuImageBuffers {
    pub source: wgpu::Buffer,
    pub output: wgpu::Buffer,
    pub width: u32,
    pub height: u32,
}

impl GpuImageBuffers {
    /// Upload `pixels` and allocate an output buffer of the same size.
    pub fn upload(device: &wgpu::Device, pixels: &PixelBuffer) -> Self {
        let packed = pack_pixels(pixels);
        let source = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("darkroom_image_source"),
            contents: bytemuck::cast_slice(&packed),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        let output = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("darkroom_image_output"),
            size: packed_size(pixels.width(), pixels.height()),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        Self {
            source,
            output,
            width: pixels.width(),
            height: pixels.height(),
        }
    }

    pub fn byte_size(&self) -> u64 {
        packed_size(self.width, self.height)
    }
}

/// Upload a baked table as a read-only storage buffer.
pub fn upload_table<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::STORAGE,
    })
}
