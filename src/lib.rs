pub mod audio;
pub mod config;
pub mod data;
pub mod ecs;
pub mod error;
pub mod input;
pub mod map;
pub mod narrative;
pub mod render;
pub mod save;
pub mod scripted_input;
pub mod session;
pub mod timing;
