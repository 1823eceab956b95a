//! Directional controls: the four held-key flags a tick is driven by.
//!
//! # Invariants
//! - Flags are independent; opposing flags may be held together.
//! - Raw device events are mapped elsewhere; this crate only sees flags.

pub mod controls;

pub use controls::{ControlKey, Controls, InputError};
