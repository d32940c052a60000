#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! pulse-tally - Shift-partitioned pulse counter for Raspberry Pi Pico 2 W
//!
//! This library provides platform abstraction, collaborator drivers, and the
//! counting / persistence / delivery subsystems for a dual-core
//! production-line pulse counter appliance.

// Platform abstraction layer; all platform-specific code is isolated here
pub mod platform;

// Ambient infrastructure: logging, cross-core mailbox
pub mod core;

// Fixed build-time configuration
pub mod config;

// Pulse & shift coordinator (hot loop, core 1)
pub mod counter;

// Persistent counter store (flash log, core 0)
pub mod storage;

// Network delivery manager (core 0)
pub mod network;

// External collaborators: RTC and character display drivers
pub mod devices;
