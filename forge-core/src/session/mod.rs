//! Session module: the per-user façade over the database.
//!
//! `Session` owns the pool, the caller identity and any workout in progress.
//! Its methods are split by concern across the files of this module.

mod account;
mod drafts;
mod exercises;
mod mesocycles;
mod progress;
mod session;
mod workout;
mod workout_days;

pub use mesocycles::CreatedMesocycle;
pub use session::Session;
