//! HTTP endpoint handlers.

pub mod pages;
pub mod system;
