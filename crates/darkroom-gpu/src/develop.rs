//! The develop compute pass: one dispatch applies every per-pixel stage.

use std::num::NonZeroU64;

use darkroom_core::stages::{Stage, effects};
use darkroom_core::{PixelBuffer, PreparedPipeline};
use wgpu::util::DeviceExt;

use crate::buffers::{GpuImageBuffers, packed_size, unpack_pixels, upload_table};
use crate::context::GpuContext;
use crate::error::GpuError;
use crate::readback::download_packed;
use crate::uniforms::{DevelopUniforms, pack_hue_luts, pack_tone_luts};

/// Workgroup edge length, matching `@workgroup_size(8, 8, 1)`.
const WORKGROUP_SIZE: u32 = 8;

/// Owns the `develop.wgsl` compute pipeline.
///
/// Buffers are created per render, so one pipeline can serve several
/// threads at once.
pub struct GpuDevelopPipeline {
    ctx: GpuContext,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuDevelopPipeline {
    /// Compile `develop.wgsl` on the given device.
    pub fn new(ctx: GpuContext) -> Self {
        let device = &ctx.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("darkroom_develop_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/develop.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("darkroom_develop_layout"),
            entries: &[
                // binding 0: develop uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<DevelopUniforms>() as u64
                        ),
                    },
                    count: None,
                },
                // binding 1: source pixels
                storage_layout_entry(1, true),
                // binding 2: output pixels
                storage_layout_entry(2, false),
                // binding 3: tone table
                storage_layout_entry(3, true),
                // binding 4: hue table
                storage_layout_entry(4, true),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("darkroom_develop_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("darkroom_develop_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("develop"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        Self {
            ctx,
            pipeline,
            bind_group_layout,
        }
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    /// Fail early if the image cannot be bound or dispatched in one pass.
    fn check_limits(&self, width: u32, height: u32) -> Result<(), GpuError> {
        let limits = self.ctx.device.limits();
        let max_bytes = limits.max_storage_buffer_binding_size as u64;
        let max_groups = limits.max_compute_workgroups_per_dimension;
        if packed_size(width, height) > max_bytes
            || width.div_ceil(WORKGROUP_SIZE) > max_groups
            || height.div_ceil(WORKGROUP_SIZE) > max_groups
        {
            return Err(GpuError::ImageTooLarge {
                width,
                height,
                max_bytes,
            });
        }
        Ok(())
    }

    /// Develop `pixels` with a prepared pipeline and read the result back.
    ///
    /// Blocks until the GPU work completes.
    pub fn render(
        &self,
        prepared: &PreparedPipeline,
        pixels: &PixelBuffer,
    ) -> Result<PixelBuffer, GpuError> {
        if prepared.is_identity() || pixels.pixel_count() == 0 {
            return Ok(pixels.clone());
        }
        let (width, height) = (pixels.width(), pixels.height());
        let uniforms = DevelopUniforms::from_prepared(prepared, width, height);

        let mut developed = if uniforms.stage_mask == 0 && prepared.tone_luts().is_identity() {
            pixels.clone()
        } else {
            self.dispatch(prepared, &uniforms, pixels)?
        };

        if prepared.has_stage(Stage::Blur) {
            developed = effects::box_blur(&developed, effects::blur_radius(prepared.edit().blur));
        }
        Ok(developed)
    }

    fn dispatch(
        &self,
        prepared: &PreparedPipeline,
        uniforms: &DevelopUniforms,
        pixels: &PixelBuffer,
    ) -> Result<PixelBuffer, GpuError> {
        let (width, height) = (uniforms.width, uniforms.height);
        self.check_limits(width, height)?;

        let device = &self.ctx.device;
        let queue = &self.ctx.queue;

        let image = GpuImageBuffers::upload(device, pixels);
        let tone_table = upload_table(
            device,
            "darkroom_tone_table",
            &pack_tone_luts(prepared.tone_luts()),
        );
        let hue_table = upload_table(
            device,
            "darkroom_hue_table",
            &pack_hue_luts(prepared.hue_luts()),
        );
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("darkroom_develop_uniforms"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("darkroom_develop_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: image.source.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: image.output.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: tone_table.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: hue_table.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("darkroom_develop_encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("darkroom_develop_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(
                width.div_ceil(WORKGROUP_SIZE),
                height.div_ceil(WORKGROUP_SIZE),
                1,
            );
        }
        queue.submit(std::iter::once(encoder.finish()));

        let packed = download_packed(device, queue, &image.output, image.byte_size())?;
        tracing::debug!(
            "GPU develop pass finished for {width}x{height} ({} stages)",
            prepared.stages().len()
        );
        PixelBuffer::new(width, height, unpack_pixels(&packed))
            .map_err(|e| GpuError::BufferMap(e.to_string()))
    }
}

fn storage_layout_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
