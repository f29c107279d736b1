//! Native window host: winit events in, `pixels` frames out.

pub mod frame_presenter;
pub mod key_map;
pub mod snake_app;

pub use frame_presenter::FramePresenter;
pub use snake_app::SnakeApp;
