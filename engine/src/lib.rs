//! Windowing and 2D drawing support for the snake client.
//!
//! Everything here is game agnostic: surfaces, a `Renderer2d` trait with CPU and recording
//! backends, layout rectangles, and a small winit runner.

pub mod app;
pub mod graphics;
pub mod pixels_renderer;
pub mod surface;
pub mod ui;
