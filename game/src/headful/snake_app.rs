use std::error::Error;
use std::time::Instant;

use engine::app::{AppContext, AppHandler};
use engine::surface::SurfaceSize;
use tracing::{debug, error, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, WindowEvent};
use winit::event_loop::ControlFlow;

use crate::config::{GameConfig, Palette};
use crate::headful::frame_presenter::FramePresenter;
use crate::headful::key_map::key_code;
use crate::input::route_control;
use crate::layout::Layout;
use crate::resize::ResizeDebouncer;
use crate::session::Session;
use crate::sim::{SimError, Simulation};
use crate::stats::StatsStore;

/// Window host for one game session.
///
/// Delayed ticks wake the loop through `ControlFlow::WaitUntil`; the tick itself runs on the
/// following `RedrawRequested`, which is the native stand-in for an animation frame.
pub struct SnakeApp<S, T> {
    session: Session<S, FramePresenter, T>,
    config: GameConfig,
    palette: Palette,
    layout: Layout,
    debouncer: ResizeDebouncer<PhysicalSize<u32>>,
    cursor: Option<(f32, f32)>,
    exiting: bool,
}

impl<S, T> SnakeApp<S, T>
where
    S: Simulation,
    T: StatsStore,
{
    pub fn new(session: Session<S, FramePresenter, T>, config: GameConfig) -> Self {
        let layout = Layout::new(session.sim().jungle_width(), config.cell_size);
        Self {
            session,
            palette: Palette::default(),
            layout,
            debouncer: ResizeDebouncer::new(config.resize_debounce()),
            cursor: None,
            exiting: false,
            config,
        }
    }

    fn relayout(&mut self, ctx: &mut AppContext, window_width: u32) -> Result<(), Box<dyn Error>> {
        let layout =
            Layout::for_window(&self.config, self.session.sim().jungle_width(), window_width);
        if layout != self.layout {
            debug!(cell_size = layout.cell_size(), "relayout");
        }
        self.layout = layout;
        ctx.renderer.resize_buffer(layout.buffer_size())?;
        self.session.redraw()?;
        self.session.presenter_mut().mark_dirty();
        Ok(())
    }

    fn on_resize(&mut self, ctx: &mut AppContext, size: PhysicalSize<u32>, now: Instant) {
        let window = SurfaceSize::new(size.width, size.height);
        if let Err(err) = ctx.renderer.resize_surface(window) {
            error!(%err, "failed to resize surface");
            self.exiting = true;
            return;
        }
        self.debouncer.observe(size, now);
    }

    fn on_click(&mut self, ctx: &AppContext, now: Instant) -> Result<(), SimError> {
        let Some(position) = self.cursor else {
            return Ok(());
        };
        let Some((x, y)) = ctx.renderer.window_to_buffer(position) else {
            return Ok(());
        };
        let Some(control) = self.layout.hit_test(x, y) else {
            return Ok(());
        };
        let enabled = self
            .session
            .presenter()
            .indicators()
            .is_some_and(|ind| ind.is_enabled(control));
        if !enabled {
            debug!(?control, "click on disabled control");
            return Ok(());
        }
        self.session.dispatch(route_control(control), now)
    }

    fn on_redraw(&mut self, ctx: &mut AppContext, now: Instant) -> Result<(), Box<dyn Error>> {
        self.session.on_animation_frame(now)?;

        let layout = self.layout;
        let palette = self.palette;
        let presenter = self.session.presenter();
        ctx.renderer.draw_frame(|gfx| presenter.draw(gfx, &layout, &palette));
        self.session.presenter_mut().take_dirty();
        ctx.renderer.present()?;
        Ok(())
    }

    fn check<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        if let Err(err) = result {
            error!(%err, "game loop stopped");
            self.exiting = true;
        }
    }

    fn next_wake(&self) -> Option<Instant> {
        [self.session.next_deadline(), self.debouncer.deadline()]
            .into_iter()
            .flatten()
            .min()
    }
}

impl<S, T> AppHandler for SnakeApp<S, T>
where
    S: Simulation,
    T: StatsStore,
{
    fn init(&mut self, ctx: &mut AppContext) -> Result<(), Box<dyn Error>> {
        let width = ctx.window_size().width;
        self.relayout(ctx, width)?;
        info!(
            jungle_width = self.session.sim().jungle_width(),
            cell_size = self.layout.cell_size(),
            "window ready"
        );
        ctx.window.request_redraw();
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: Event<()>,
        control_flow: &mut ControlFlow,
        ctx: &mut AppContext,
    ) {
        let now = Instant::now();
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => self.exiting = true,
                WindowEvent::Resized(size) => self.on_resize(ctx, size, now),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    self.on_resize(ctx, *new_inner_size, now)
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    let result = self.session.handle_key(key_code(key), now).map(|_| ());
                    self.check(result);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    self.cursor = Some((position.x as f32, position.y as f32));
                }
                WindowEvent::CursorLeft { .. } => self.cursor = None,
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    let result = self.on_click(ctx, now);
                    self.check(result);
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if let Some(size) = self.debouncer.poll(now) {
                    let result = self.relayout(ctx, size.width);
                    self.check(result);
                }
                let frame_due = self.session.poll(now);
                if frame_due || self.session.presenter_mut().take_dirty() {
                    ctx.window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                let result = self.on_redraw(ctx, now);
                self.check(result);
            }
            _ => {}
        }

        *control_flow = if self.exiting {
            ControlFlow::Exit
        } else {
            match self.next_wake() {
                Some(deadline) => ControlFlow::WaitUntil(deadline),
                None => ControlFlow::Wait,
            }
        };
    }
}
