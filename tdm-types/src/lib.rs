//! # TDM Types
//!
//! Value types shared by the temporal dynamic macro engine and its hosts.
//!
//! ## Modules
//!
//! - [`keycode`] - 16-bit keycodes, digit and layer-key classification, engine control keys
//! - [`record`] - The keypress record stored in every macro buffer slot

#![no_std]

pub mod keycode;
pub mod record;
