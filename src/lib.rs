//! # Skycam Library
//!
//! Solar-adaptive control for an all-sky camera.
//!
//! This library exists to enable testing of the control logic and provide clean
//! separation between CLI dispatch (main.rs) and the algorithms.
//!
//! ## Architecture
//!
//! - **Solar model**: `geo` computes sunrise, sunset and solar noon for a
//!   location and resolves the local UTC offset
//! - **Lighting cue**: `colour` maps colour temperature to RGB and builds the
//!   twilight colour and luminosity from the solar times
//! - **Exposure**: `exposure` holds the day/night/high-gain state machine and
//!   shutter feedback
//! - **Capture loop**: `cycle` drives the controller against a camera,
//!   a sky classifier and a notifier
//! - **Infrastructure**: configuration, logging, a swappable time source and
//!   the CLI commands

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod colour;
pub mod commands;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod error;
pub mod exposure;
pub mod geo;
pub mod time_source;
