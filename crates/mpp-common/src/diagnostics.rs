//! Diagnostic types and message lookup for the expect/actual checker.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A message template with its code and default category.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Related information for a diagnostic (e.g., the expected declaration a
/// verdict was computed against).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A checker diagnostic with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information spans (e.g., where an expected candidate is declared)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create a diagnostic from a catalogue entry, filling `{N}` placeholders.
    #[must_use]
    pub fn from_message(
        message: &DiagnosticMessage,
        file: String,
        start: u32,
        length: u32,
        args: &[&str],
    ) -> Self {
        Self {
            file,
            start,
            length,
            message_text: format_message(message.message, args),
            category: message.category,
            code: message.code,
            related_information: Vec::new(),
        }
    }

    /// Attach a related-information entry.
    #[must_use]
    pub fn with_related(
        mut self,
        file: String,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            file,
            start,
            length,
            message_text: message.into(),
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

// =============================================================================
// Catalogue
// =============================================================================

pub mod diagnostic_codes {
    pub const ACTUAL_WITHOUT_EXPECT: u32 = 9001;
    pub const ACTUAL_MISSING: u32 = 9002;
    pub const NO_ACTUAL_CLASS_MEMBER_FOR_EXPECTED_CLASS: u32 = 9003;
    pub const AMBIGUOUS_EXPECTS: u32 = 9004;
    pub const ACTUAL_ANNOTATION_CONFLICTING_DEFAULT_ARGUMENT_VALUE: u32 = 9005;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const ACTUAL_WITHOUT_EXPECT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::ACTUAL_WITHOUT_EXPECT,
        category: DiagnosticCategory::Error,
        message: "{0} has no corresponding expected declaration{1}",
    };

    pub const ACTUAL_MISSING: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::ACTUAL_MISSING,
        category: DiagnosticCategory::Error,
        message: "Declaration must be marked with 'actual'",
    };

    pub const NO_ACTUAL_CLASS_MEMBER_FOR_EXPECTED_CLASS: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::NO_ACTUAL_CLASS_MEMBER_FOR_EXPECTED_CLASS,
        category: DiagnosticCategory::Error,
        message: "Actual class '{0}' has no corresponding members for expected class members:{1}",
    };

    pub const AMBIGUOUS_EXPECTS: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::AMBIGUOUS_EXPECTS,
        category: DiagnosticCategory::Error,
        message: "{0} has several compatible expect declarations in modules {1}",
    };

    pub const ACTUAL_ANNOTATION_CONFLICTING_DEFAULT_ARGUMENT_VALUE: DiagnosticMessage =
        DiagnosticMessage {
            code: diagnostic_codes::ACTUAL_ANNOTATION_CONFLICTING_DEFAULT_ARGUMENT_VALUE,
            category: DiagnosticCategory::Error,
            message: "Parameter '{0}' has conflicting values in expected and actual annotations",
        };
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::ACTUAL_WITHOUT_EXPECT,
    diagnostic_messages::ACTUAL_MISSING,
    diagnostic_messages::NO_ACTUAL_CLASS_MEMBER_FOR_EXPECTED_CLASS,
    diagnostic_messages::AMBIGUOUS_EXPECTS,
    diagnostic_messages::ACTUAL_ANNOTATION_CONFLICTING_DEFAULT_ARGUMENT_VALUE,
];

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
