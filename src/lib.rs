pub mod assets;
pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod constants;
pub mod display;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod map;
