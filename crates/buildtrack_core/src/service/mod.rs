//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate import parsing and repository calls into use-case APIs.
//! - Keep CLI callers decoupled from storage details.

pub mod import_service;
pub mod task_service;
