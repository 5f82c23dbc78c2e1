//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the transport layer decoupled from storage details.

pub mod account_service;
pub mod affinity_service;
pub mod preference_service;
pub mod restaurant_service;
