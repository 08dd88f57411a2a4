use anyhow::Result;
use colored::Colorize;
use mpp_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

/// Renders diagnostics as `file:offset - error MPP9001: message` lines.
///
/// The checker works from source anchors only, so locations are byte
/// offsets rather than line/column pairs.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub const fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format_location(&diagnostic.file, diagnostic.start);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!(
            "{}: {} - {}",
            prefix,
            format_location(&related.file, related.start),
            related.message_text
        )
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("MPP{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

fn format_location(file: &str, offset: u32) -> String {
    if file.is_empty() {
        "<unknown>".to_string()
    } else {
        format!("{file}:{offset}")
    }
}

/// Machine-readable output: a pretty-printed JSON array.
pub fn render_json(diagnostics: &[Diagnostic]) -> Result<String> {
    Ok(serde_json::to_string_pretty(diagnostics)?)
}
