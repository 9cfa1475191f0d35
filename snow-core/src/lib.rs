//! Core snowflake growth library: random-walk aggregation with dihedral
//! symmetry on a fixed-size lattice.
//!
//! Main components:
//! - [`symmetry`] — expansion of one point into its symmetric counterparts.
//! - [`lattice`] — occupancy grid and the shared bounds predicate.
//! - [`growth`] — single random-walk trials.
//! - [`scheduler`] — seed band and the frame-budgeted growth loop.
//! - [`simulation`] — the context object tying config, lattice and RNG together.
//! - [`color`] — thread-safe tint fed by external controls.
//! - [`render`] — lattice to RGBA pixels.
//! - [`config`] / [`error`] — startup parameters and their validation.
//! - [`types`] — shared point aliases.

pub mod color;
pub mod config;
pub mod error;
pub mod growth;
pub mod lattice;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod symmetry;
pub mod types;

pub use color::{Channel, ColorState};
pub use config::Config;
pub use error::ConfigError;
pub use scheduler::TickStatus;
pub use simulation::Simulation;
