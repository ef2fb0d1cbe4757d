pub mod pages;
pub mod status;

pub use pages::Pages;
pub use status::{HealthReport, StatusReport};
