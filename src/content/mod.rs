//! Content module - project and experience listings

pub mod loader;
mod project;

pub use loader::DataLoader;
pub use project::{default_projects, Experience, Project};
