//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Parse caller-supplied identifiers at the boundary.
//!
//! Services are constructed explicitly by the caller and passed by
//! reference; none of them is a process-wide singleton.

pub mod like_service;
pub mod user_service;
