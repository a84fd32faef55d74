//! Display helpers for comparison results.
//!
//! Nothing here parses the reasoning trace. The only structure recognized is
//! the two literal labels and the pipe separator the backend emits.

use lazy_static::lazy_static;
use regex::Regex;

/// What the backend sends when the agent used no guideline or tool
pub const NO_REASONING_SENTINEL: &str = "(no explicit tools/guidelines recorded)";
pub const NO_REASONING_PLACEHOLDER: &str = "No explicit tools/guidelines recorded for this query.";
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response received";

const GUIDELINES_MARKER: &str = "Guidelines:";
const TOOLS_MARKER: &str = "Tools:";

lazy_static! {
    static ref PIPE_SEPARATOR: Regex = Regex::new(r"\s*\|\s*").expect("static regex");
}

/// How labels and paragraph breaks are rendered
pub trait ReasoningMarkup {
    fn guidelines_label(&self) -> String;
    fn tools_label(&self) -> String;
    fn paragraph_break(&self) -> String;
}

/// Markup used by the web demo page
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkup;

impl ReasoningMarkup for HtmlMarkup {
    fn guidelines_label(&self) -> String {
        r#"<strong style="color: #10b981;">📋 Guidelines:</strong>"#.to_string()
    }

    fn tools_label(&self) -> String {
        r#"<strong style="color: #6366f1;">🔧 Tools:</strong>"#.to_string()
    }

    fn paragraph_break(&self) -> String {
        "<br><br>".to_string()
    }
}

/// Unstyled labels, blank line between paragraphs
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkup;

impl ReasoningMarkup for PlainMarkup {
    fn guidelines_label(&self) -> String {
        "📋 Guidelines:".to_string()
    }

    fn tools_label(&self) -> String {
        "🔧 Tools:".to_string()
    }

    fn paragraph_break(&self) -> String {
        "\n\n".to_string()
    }
}

/// Formats a reasoning trace for display.
///
/// Empty input and the "nothing recorded" sentinel both produce
/// [`NO_REASONING_PLACEHOLDER`]. Otherwise every `Guidelines:` and `Tools:`
/// becomes a styled label and every whitespace-pipe-whitespace run becomes a
/// paragraph break.
pub fn format_reasoning(text: &str, markup: &dyn ReasoningMarkup) -> String {
    if text.is_empty() || text == NO_REASONING_SENTINEL {
        return NO_REASONING_PLACEHOLDER.to_string();
    }

    let labelled = text
        .replace(GUIDELINES_MARKER, &markup.guidelines_label())
        .replace(TOOLS_MARKER, &markup.tools_label());

    let paragraph_break = markup.paragraph_break();
    PIPE_SEPARATOR
        .replace_all(&labelled, regex::NoExpand(&paragraph_break))
        .into_owned()
}

/// Substitutes the placeholder for an empty response
pub fn response_or_placeholder(response: &str) -> &str {
    if response.is_empty() {
        NO_RESPONSE_PLACEHOLDER
    } else {
        response
    }
}

/// Rephrases raw error text using keyword matching.
///
/// This is a heuristic over free text. A structured error code from the
/// backend would make it unnecessary. Unmatched messages pass through.
pub fn friendly_error(message: &str) -> String {
    let lower = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    let friendly = if has(&["api key", "api_key", "unauthorized", "401"]) {
        "The language model provider rejected the request. Check the backend's API key configuration."
    } else if has(&["parlant", "agent"]) {
        "The Parlant agent is unavailable. Make sure parlant_agent_server.py is running."
    } else if has(&["timeout", "timed out"]) {
        "The comparison took too long to complete. Please try again."
    } else if has(&["network", "connection", "failed to send request", "failed to fetch"]) {
        "Network error: unable to reach the comparison service. Check that the API server is running."
    } else if has(&["500", "internal server error"]) {
        "The comparison service hit an internal error. Please try again shortly."
    } else if has(&["404", "not found"]) {
        "The comparison endpoint was not found. Check the configured API URL."
    } else {
        return message.to_string();
    };

    friendly.to_string()
}
