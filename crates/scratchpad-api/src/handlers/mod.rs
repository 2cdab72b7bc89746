//! HTTP handler modules for scratchpad-api.

pub mod notes;
pub mod web;
