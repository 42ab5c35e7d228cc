//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers (CLI, HTTP adapters) decoupled from storage details.

pub mod goal_service;
pub mod report_service;
