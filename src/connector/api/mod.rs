pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig, DEFAULT_ALLOWED_ORIGIN};
pub use router::Router;
