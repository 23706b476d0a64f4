//! Turns raw page bytes into flat text plus a view of price-tagged elements.

use super::patterns::{ATTRIBUTED_ELEMENT, PRICE_HINT};
use crate::error::ParseError;
use scraper::{ElementRef, Html, Node};
use tracing::trace;

/// Elements whose text is never rendered as page content.
const HIDDEN_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "template", "noscript"];

/// An element whose class or id mentions "price", with its inner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedElement<'a> {
    pub text: String,
    pub class_hint: Option<&'a str>,
    pub id_hint: Option<&'a str>,
}

/// A parsed page ready for scanning.
pub struct NormalizedPage {
    flat_text: String,
    document: Html,
}

impl NormalizedPage {
    /// Whitespace-collapsed visible text of the whole document, in document order.
    pub fn flat_text(&self) -> &str {
        &self.flat_text
    }

    /// Price-tagged elements in document order.
    ///
    /// The iterator is lazy; call again to restart from the top.
    pub fn tagged_elements(&self) -> impl Iterator<Item = TaggedElement<'_>> + '_ {
        self.document.select(&ATTRIBUTED_ELEMENT).filter_map(tagged)
    }
}

/// Decodes and parses page bytes.
pub fn normalize(page: &[u8]) -> Result<NormalizedPage, ParseError> {
    let html = std::str::from_utf8(page).map_err(|_| ParseError::InvalidEncoding)?;
    if html.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }

    let document = Html::parse_document(html);
    let flat_text = collapse_whitespace(visible_text(document.root_element()));
    trace!("Flattened page to {} bytes of text", flat_text.len());

    Ok(NormalizedPage { flat_text, document })
}

/// Joins text fragments with single spaces, dropping every whitespace run.
fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in fragments.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Text nodes under `root`, skipping script, style, template and noscript content.
fn visible_text<'a>(root: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    root.descendants().filter_map(|node| match node.value() {
        Node::Text(text) if !node.ancestors().any(|a| is_hidden(a.value())) => Some(&**text),
        _ => None,
    })
}

fn is_hidden(node: &Node) -> bool {
    node.as_element().is_some_and(|e| HIDDEN_TEXT_ELEMENTS.contains(&e.name()))
}

fn tagged(element: ElementRef<'_>) -> Option<TaggedElement<'_>> {
    let class_hint = element.value().attr("class");
    let id_hint = element.value().attr("id");

    let hinted = |value: Option<&str>| {
        value.is_some_and(|v| v.to_ascii_lowercase().contains(PRICE_HINT))
    };
    if !hinted(class_hint) && !hinted(id_hint) {
        return None;
    }

    Some(TaggedElement { text: visible_text(element).collect(), class_hint, id_hint })
}
