//! Shared fixtures for end-to-end client tests
//!
//! Each test binary compiles this module on its own, so helpers unused by a
//! given binary are expected.

#![allow(dead_code)]

pub mod config;
pub mod fixtures;
pub mod transport;
