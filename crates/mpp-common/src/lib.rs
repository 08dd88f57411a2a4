//! Common types and utilities for the mpp expect/actual checker.
//!
//! This crate provides foundational types used across all mpp crates:
//! - String interning (`Atom`, `Interner`)
//! - Source anchors (`SourceAnchor`)
//! - Diagnostic data types, codes and message templates
//! - Checker limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Source anchors attached to declarations and diagnostics
pub mod span;
pub use span::SourceAnchor;

// Centralized limits and thresholds
pub mod limits;

pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, DiagnosticRelatedInformation,
    diagnostic_codes, diagnostic_messages, format_message, get_message_template,
};
