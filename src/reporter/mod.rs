pub mod aggregate;
pub mod allure;
pub mod context;
pub mod render;

pub use aggregate::{aggregate, Summary};
pub use render::{Renderer, Report};
