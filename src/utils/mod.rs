//! Utility Modules

pub mod format;
