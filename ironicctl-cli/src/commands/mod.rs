//! Command implementations for ironicctl CLI

pub mod catalog;
pub mod config;
pub mod resources;
