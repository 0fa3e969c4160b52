//! Application core: the feeder orchestration and its port boundary.
//!
//! Door scheduling and cooler regulation are driven from here through the
//! **port traits** in [`ports`], so the whole core runs on host with mocks.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
