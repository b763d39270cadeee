pub const PROJECT_NAME: &str = "skrt";

pub mod dataset;
pub mod error;
pub mod plugins;
pub mod utils;
