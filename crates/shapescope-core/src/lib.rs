pub mod app;
pub mod camera;
pub mod config;
pub mod controls;
pub mod detection;
pub mod display;
pub mod frame;
pub mod render;

pub use app::{App, LoopControl};
pub use config::Config;
