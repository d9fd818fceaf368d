pub mod format;
pub mod project;
