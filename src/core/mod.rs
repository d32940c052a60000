//! Core infrastructure
//!
//! This module contains the ambient pieces shared by both execution
//! contexts: the logging macros and the cross-core mailbox.

pub mod logging;
pub mod mailbox;
