//! Errors raised by the GPU adapter.

/// Any failure here makes the caller fall back to the CPU pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter: {0}")]
    NoAdapter(String),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(String),

    #[error("failed to map readback buffer: {0}")]
    BufferMap(String),

    #[error("device poll failed: {0}")]
    Poll(String),

    #[error("{width}x{height} image exceeds the device limit of {max_bytes} bytes per buffer")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_bytes: u64,
    },
}
