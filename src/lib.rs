pub mod app;
pub mod area;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod keybindings;
pub mod palette;
pub mod persist;
pub mod scene;
pub mod snap;
pub mod theme;
pub mod throttle;
pub mod tracing_sub;
pub mod ui;
