//! Typed markup construction
//!
//! Wrapper spans are assembled through a small builder rather than ad-hoc
//! string interpolation, so attribute values (description, style values)
//! are always escaped on the way into the document.
//!
//! The wrapped body is deliberately NOT escaped: the formatting pipeline
//! re-wraps text that already contains earlier rules' spans, and escaping
//! the body would destroy them. The builder is the single place that
//! constraint lives.

use std::collections::BTreeMap;
use std::fmt;

/// Annotated output, trusted for direct rendering
///
/// The formatter assembles this value internally from controlled templates;
/// downstream consumers must not route arbitrary third-party text through
/// this type without running it through the formatter first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wrap an already-assembled markup string
    pub(crate) fn new(inner: String) -> Self {
        Self(inner)
    }

    /// Borrow the markup text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape a string for use inside a double-quoted attribute value
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds a single inline wrapper span
#[derive(Debug, Default)]
pub struct SpanBuilder {
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    title: Option<String>,
}

impl SpanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class token
    pub fn class(mut self, class: &str) -> Self {
        if !class.is_empty() {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Add inline style declarations
    pub fn styles(mut self, styles: &BTreeMap<String, String>) -> Self {
        for (property, value) in styles {
            self.styles.insert(property.clone(), value.clone());
        }
        self
    }

    /// Set the advisory tooltip
    pub fn title(mut self, title: &str) -> Self {
        if !title.is_empty() {
            self.title = Some(title.to_string());
        }
        self
    }

    /// Serialize the span around the given body
    ///
    /// The body is inserted verbatim; see the module docs for why.
    pub fn wrap(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len() + 64);
        out.push_str("<span");

        if !self.classes.is_empty() {
            let classes: Vec<String> = self.classes.iter().map(|c| escape_attr(c)).collect();
            out.push_str(" class=\"");
            out.push_str(&classes.join(" "));
            out.push('"');
        }

        if !self.styles.is_empty() {
            out.push_str(" style=\"");
            let mut first = true;
            for (property, value) in &self.styles {
                if !first {
                    out.push_str("; ");
                }
                out.push_str(&escape_attr(property));
                out.push_str(": ");
                out.push_str(&escape_attr(value));
                first = false;
            }
            out.push('"');
        }

        if let Some(ref title) = self.title {
            out.push_str(" title=\"");
            out.push_str(&escape_attr(title));
            out.push('"');
        }

        out.push('>');
        out.push_str(body);
        out.push_str("</span>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_with_classes_and_styles() {
        let mut styles = BTreeMap::new();
        styles.insert("color".to_string(), "#b91c1c".to_string());
        styles.insert("font-weight".to_string(), "700".to_string());

        let span = SpanBuilder::new()
            .class("regmark-annotation")
            .class("warning")
            .styles(&styles)
            .title("Compliance warning")
            .wrap("late filing penalty");

        assert_eq!(
            span,
            "<span class=\"regmark-annotation warning\" \
             style=\"color: #b91c1c; font-weight: 700\" \
             title=\"Compliance warning\">late filing penalty</span>"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let span = SpanBuilder::new()
            .class("note")
            .title(r#"see "12 CFR" <part 1026>"#)
            .wrap("x");

        assert!(span.contains("title=\"see &quot;12 CFR&quot; &lt;part 1026&gt;\""));
    }

    #[test]
    fn test_body_is_inserted_verbatim() {
        // Nested wrappers from earlier rules must survive re-wrapping.
        let inner = "<span class=\"bold\">x</span>";
        let span = SpanBuilder::new().class("highlight").wrap(inner);
        assert!(span.contains(inner));
    }

    #[test]
    fn test_empty_builder_is_a_bare_span() {
        assert_eq!(SpanBuilder::new().wrap("x"), "<span>x</span>");
    }

    #[test]
    fn test_style_injection_cannot_break_out() {
        let mut styles = BTreeMap::new();
        styles.insert(
            "color".to_string(),
            "red\" onmouseover=\"steal()".to_string(),
        );
        let span = SpanBuilder::new().styles(&styles).wrap("x");
        assert!(!span.contains("onmouseover=\"steal"));
        assert!(span.contains("&quot;"));
    }
}
