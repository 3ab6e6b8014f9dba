//! Parts Concierge - conversational support for appliance parts
//!
//! This crate routes customer messages through intent classification and a
//! registry of domain handlers (part search, compatibility checks,
//! troubleshooting, installation help) backed by resilient completion
//! providers and a TTL-scoped session context.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
