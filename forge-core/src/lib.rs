pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod draft;
pub mod error;
pub mod generator;
pub mod mesocycle;
pub mod progress;
pub mod session;
pub mod workout;

#[cfg(feature = "uniffi")]
mod runtime;

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
#[cfg(feature = "uniffi")]
pub mod uniffi_interface;
