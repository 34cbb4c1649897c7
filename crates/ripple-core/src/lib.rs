pub mod constants;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod lifecycle;
pub mod settings;

pub use controller::*;
pub use error::*;
pub use geometry::*;
pub use host::*;
pub use lifecycle::*;
pub use settings::*;
