//! CPU hidden-surface elimination: seven interchangeable algorithms over a
//! shared camera, rasterizer, lighting and texture core.
//!
//! A render takes a [`Scene`] of meshes and height fields, a yaw-only
//! [`Camera`] and an optional [`Light`], and returns a [`Framebuffer`] of
//! normalized RGB colors with the depth buffer it was resolved against.

pub mod algorithms;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod fragment;
pub mod framebuffer;
pub mod lighting;
pub mod mesh;
pub mod obj;
pub mod raster;
pub mod shapes;
pub mod texture;
pub mod visibility;

pub use algorithms::{Algorithm, HiddenSurface, Renderer};
pub use camera::{Camera, Projector, ScreenPoint};
pub use color::Color;
pub use config::{RenderConfig, Settings};
pub use error::{ConfigError, SceneError};
pub use framebuffer::Framebuffer;
pub use lighting::Light;
pub use mesh::{Bounds, Mesh, Scene, SceneObject, Surface};
pub use texture::Texture;
