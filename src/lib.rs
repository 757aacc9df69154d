pub mod application;
pub mod camera;
pub mod config;
pub mod error;
pub mod generation;
pub mod keyboard;
pub mod messages;
pub mod point_cloud;
pub mod pointer;
pub mod scene;
pub mod session;
pub mod wgpu;

pub use error::LabError;
pub use messages::{LabEvent, Radio};
