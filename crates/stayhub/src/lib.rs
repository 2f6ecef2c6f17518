//! Core building blocks for the StayHub vacation-rental marketplace.
//!
//! The `marketplace` module carries the domain itself: the availability
//! core, listing and booking aggregates, account handling, and the media
//! gateway. `config`, `telemetry`, and `error` provide the service shell
//! that `services/api` assembles into a running process.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
