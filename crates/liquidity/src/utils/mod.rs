pub mod explorer;
pub mod format;
