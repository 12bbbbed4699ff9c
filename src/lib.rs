//! Interactive timeline scheduler for construction project tasks.
//!
//! [`model`] holds tasks and the date ↔ pixel projection, [`scheduling`] the
//! dependency check and drag state machine, [`io`] the task stores, and
//! [`ui`]/[`app`] the egui front end.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod scheduling;
pub mod ui;
