pub mod config;
pub mod headful;
pub mod indicators;
pub mod input;
pub mod jungle;
pub mod layout;
pub mod render;
pub mod resize;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod snapshot;
pub mod speed;
pub mod stats;
