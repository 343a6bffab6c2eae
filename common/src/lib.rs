//! Common utilities for the simulations
//!
//! This crate provides shared graphics setup, the screen-space camera, and
//! vertex types used by the simulation binaries.

pub mod camera;
pub mod error;
pub mod graphics;

pub use camera::*;
pub use error::GraphicsError;
pub use graphics::*;
