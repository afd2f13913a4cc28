//! Headless GPU device management.

use thiserror::Error;
use tracing::debug;
use wgpu::{Adapter, Device, Instance, Queue};

/// Errors that can occur during GPU operations.
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}

/// GPU context holding the device used for texture uploads.
pub struct GpuContext {
    /// wgpu instance.
    pub instance: Instance,
    /// GPU adapter.
    pub adapter: Adapter,
    /// GPU device.
    pub device: Device,
    /// Command queue.
    pub queue: Queue,
}

impl GpuContext {
    /// Create a context on the default adapter.
    pub async fn new() -> Result<Self, GpuError> {
        GpuContextBuilder::new().build().await
    }

    /// Get adapter info.
    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Largest texture side the device accepts.
    pub fn max_texture_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Submit pending uploads and wait for the queue to drain.
    pub fn flush(&self) {
        self.queue.submit(std::iter::empty());
        let _ = self.device.poll(wgpu::Maintain::Wait);
    }
}

/// Builder for GPU context configuration.
pub struct GpuContextBuilder {
    backends: wgpu::Backends,
    power_preference: wgpu::PowerPreference,
    force_fallback_adapter: bool,
    limits: Option<wgpu::Limits>,
}

impl GpuContextBuilder {
    pub fn new() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            limits: None,
        }
    }

    /// Set the backends to use.
    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    /// Set power preference.
    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    /// Prefer a software adapter.
    pub fn force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    /// Set device limits.
    pub fn limits(mut self, limits: wgpu::Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Build the GPU context.
    pub async fn build(self) -> Result<GpuContext, GpuError> {
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: self.backends,
            dx12_shader_compiler: Default::default(),
            flags: wgpu::InstanceFlags::default(),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: self.power_preference,
                compatible_surface: None,
                force_fallback_adapter: self.force_fallback_adapter,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let limits = self.limits.unwrap_or_else(|| {
            wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits())
        });

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Media GPU Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: limits,
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        let info = adapter.get_info();
        debug!(adapter = %info.name, backend = ?info.backend, "created gpu context");

        Ok(GpuContext {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

impl Default for GpuContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
