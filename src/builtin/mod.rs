//! Built-in functionality for stax.
//!
//! The code in this module is built using the APIs available to users
//! and provided as a minimal "out of the box" experience for using the
//! window manager.
pub mod actions;
pub mod layout;
