//! Bevy plugins
//!
//! Render-world plugins; currently only the GPU readback of the hero frame.

pub mod image_copy;

pub use image_copy::ImageCopyPlugin;
