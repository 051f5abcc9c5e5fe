use std::sync::Arc;
use wgpu::{Device, DeviceDescriptor, Instance, Queue, Surface};

use super::error::VideoError;

/// Shared GPU device and queue, cheap to clone.
#[derive(Clone)]
pub struct GpuContext {
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a context whose adapter is compatible with `surface`.
    pub async fn new_with_surface(
        instance: &Instance,
        surface: &Surface<'_>,
    ) -> Result<Self, VideoError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| VideoError::SurfaceLost(format!("no compatible adapter: {e:?}")))?;

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Video Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| VideoError::SurfaceLost(format!("device creation failed: {e:?}")))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<GpuContext>();
    }
}
