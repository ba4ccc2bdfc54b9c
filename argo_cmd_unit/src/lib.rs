//! # Argo Command Unit Library
//!
//! Command-dispatch and control-event layer for the argo two-board robot
//! controller. The host computer issues motion and targeting commands over
//! the shared bus; this unit buffers the latest value per command type in
//! a mailbox and applies them from a real-time consumer loop under a
//! silence timeout and a hardware disable switch.
//!
//! ## Data Flow
//!
//! bus receive → [`registry`] → [`mailbox`] → [`events`] → actuation
//! subsystems. Telemetry flows the other way: subsystem snapshots →
//! [`telemetry`] relay → bus send.
//!
//! ## Single Blocking Point
//!
//! The control event loop suspends only at its bounded mailbox wait.
//! Receive handlers never block; each mailbox slot has exactly one
//! producer, and the loop is the sole consumer of the pending flags.

#![deny(clippy::disallowed_types)]

pub mod actuation;
pub mod bus;
pub mod config;
pub mod events;
pub mod input;
pub mod mailbox;
pub mod registry;
pub mod role;
pub mod rt;
pub mod telemetry;
