pub mod clip;
pub mod config;
pub mod geometry;
pub mod shadow;
pub mod volume;
