use std::sync::Arc;
use wgpu::{BindGroup, Device, RenderPipeline, Surface, SurfaceConfiguration, Texture, TextureView};
use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window};

use super::dirty::Rect;
use super::error::VideoError;
use super::gpu_context::GpuContext;
use super::presenter::{PresentMode, PresentTarget, SurfaceOrigin};

/// Displays the backing store on a window through a wgpu surface.
///
/// The store's true-color pixels live in a texture the size of the store;
/// dirty rectangles arrive as partial texture writes and a fullscreen
/// triangle blits the texture to the swapchain. Reallocation of the store
/// requires [`PresentTarget::rebind`], which rebuilds the texture and
/// reconfigures the surface.
pub struct SurfaceRenderer {
    gpu: GpuContext,
    window: Arc<Window>,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    render_pipeline: RenderPipeline,
    texture: Texture,
    bind_group: BindGroup,
    width: u32,
    height: u32,
    visible: bool,
}

impl SurfaceRenderer {
    /// Create a renderer bound to `window`, with the store texture sized
    /// `width` x `height`.
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, VideoError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| VideoError::SurfaceLost(format!("surface creation failed: {e}")))?;

        let gpu = pollster::block_on(GpuContext::new_with_surface(&instance, &surface))?;

        let size = window.inner_size();
        let surface_format = wgpu::TextureFormat::Bgra8Unorm;
        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let texture = Self::create_store_texture(gpu.device(), width, height);
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (render_pipeline, bind_group) =
            Self::create_render_pipeline(gpu.device(), &texture_view, surface_format);

        Ok(Self {
            gpu,
            window,
            surface,
            surface_config,
            render_pipeline,
            texture,
            bind_group,
            width,
            height,
            visible: true,
        })
    }

    /// Draw the store texture to the swapchain and present it.
    ///
    /// Called on the window's redraw cycle, and directly for a forced
    /// present. A lost or outdated swapchain is reconfigured and the frame
    /// skipped; only out-of-memory is fatal.
    pub fn blit(&mut self) -> Result<(), VideoError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("swapchain lost, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(()),
            Err(err) => {
                return Err(VideoError::SurfaceLost(format!(
                    "swapchain acquire failed: {err}"
                )))
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Blit Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }
        self.gpu.queue().submit(Some(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Track the window's swapchain size; the store texture is untouched.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
    }

    fn create_store_texture(device: &Device, width: u32, height: u32) -> Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Backing Store Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Bgra8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_render_pipeline(
        device: &Device,
        texture_view: &TextureView,
        surface_format: wgpu::TextureFormat,
    ) -> (RenderPipeline, BindGroup) {
        let shader_source = include_str!("../display.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Display Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Store Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = Self::create_bind_group(device, &bind_group_layout, texture_view);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Display Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Display Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    fn create_bind_group(
        device: &Device,
        layout: &wgpu::BindGroupLayout,
        texture_view: &TextureView,
    ) -> BindGroup {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Store Texture Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Store Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        })
    }
}

impl PresentTarget for SurfaceRenderer {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn origin(&self) -> SurfaceOrigin {
        SurfaceOrigin::TopLeft
    }

    fn upload(&mut self, data: &[u8], bytes_per_row: u32, dest: Rect) -> Result<(), VideoError> {
        let dest = dest.intersection(&Rect::new(0, 0, self.width, self.height));
        if dest.is_empty() {
            return Ok(());
        }
        self.gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: dest.left,
                    y: dest.top,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: dest.width(),
                height: dest.height(),
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn present(&mut self, mode: PresentMode) -> Result<(), VideoError> {
        match mode {
            PresentMode::Deferred => {
                self.window.request_redraw();
                Ok(())
            }
            PresentMode::Immediate => {
                self.blit()?;
                self.gpu
                    .device()
                    .poll(wgpu::PollType::Wait {
                        submission_index: None,
                        timeout: None,
                    })
                    .map_err(|e| VideoError::SurfaceLost(format!("device wait failed: {e:?}")))?;
                Ok(())
            }
        }
    }

    fn rebind(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        self.width = width;
        self.height = height;

        self.texture = Self::create_store_texture(self.gpu.device(), width, height);
        let texture_view = self
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group_layout = self.render_pipeline.get_bind_group_layout(0);
        self.bind_group =
            Self::create_bind_group(self.gpu.device(), &bind_group_layout, &texture_view);

        let size = self.window.inner_size();
        self.resize_surface(size.width, size.height);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn change_resolution(&mut self, width: u32, height: u32) -> bool {
        match self
            .window
            .request_inner_size(PhysicalSize::new(width, height))
        {
            Some(size) => size.width == width && size.height == height,
            // Applied asynchronously; a Resized event follows.
            None => true,
        }
    }

    fn toggle_fullscreen(&mut self, fullscreen: bool) -> bool {
        if fullscreen {
            match self.window.current_monitor() {
                Some(monitor) => {
                    self.window
                        .set_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
                    true
                }
                None => false,
            }
        } else {
            self.window.set_fullscreen(None);
            true
        }
    }

    fn supported_resolutions(&self) -> Vec<(u32, u32)> {
        let mut modes: Vec<(u32, u32)> = self
            .window
            .current_monitor()
            .map(|monitor| {
                monitor
                    .video_modes()
                    .map(|mode| (mode.size().width, mode.size().height))
                    .collect()
            })
            .unwrap_or_default();
        modes.sort_unstable();
        modes.dedup();
        modes
    }
}
