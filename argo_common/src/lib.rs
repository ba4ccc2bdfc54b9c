//! Argo Common Library
//!
//! Shared bus protocol definitions for the two-board argo robot controller:
//! the chassis board and the gimbal/shooter board exchange fixed-layout
//! command frames over a shared bus, and both sides must agree on the
//! identifier space, payload layouts, and fixed-point scaling.
//!
//! # Module Structure
//!
//! - [`protocol`] - Command identifiers and bus addresses
//! - [`wire`] - Fixed-layout payload records with explicit encode/decode
//! - [`fixed`] - Fixed-point scaling helpers (deci / centi)

pub mod fixed;
pub mod protocol;
pub mod wire;
