use std::error::Error;

use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::Event;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub min_size: Option<PhysicalSize<u32>>,
    pub buffer_size: SurfaceSize,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
}

impl AppContext {
    pub fn window_size(&self) -> SurfaceSize {
        let size = self.window.inner_size();
        SurfaceSize::new(size.width, size.height)
    }
}

pub trait AppHandler {
    fn init(&mut self, _ctx: &mut AppContext) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: Event<()>,
        control_flow: &mut ControlFlow,
        ctx: &mut AppContext,
    );
}

/// Opens a window and drives `handler` from the winit event loop until it exits.
pub fn run_app<H: AppHandler + 'static>(
    config: AppConfig,
    mut handler: H,
) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let initial_size = match event_loop.primary_monitor().map(|m| m.size()) {
        Some(monitor) if config.clamp_to_monitor => PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        ),
        _ => config.desired_size,
    };
    let mut window_builder = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size);
    if let Some(min) = config.min_size {
        window_builder = window_builder.with_min_inner_size(min);
    }
    let window = window_builder.build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut builder = PixelsBuilder::new(
        config.buffer_size.width,
        config.buffer_size.height,
        surface_texture,
    );
    if let Some(vsync) = config.vsync {
        builder = builder.enable_vsync(vsync);
    }
    let pixels = builder.build()?;
    let renderer = PixelsRenderer2d::new(pixels, config.buffer_size)?;

    let mut ctx = AppContext { window, renderer };
    handler.init(&mut ctx)?;

    event_loop.run(move |event, _, control_flow| {
        handler.handle_event(event, control_flow, &mut ctx);
    });

    #[allow(unreachable_code)]
    Ok(())
}
