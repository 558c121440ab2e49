//! HTML parsing as an element stream
//!
//! Workers consume a page as a sequence of elements: a tag name, whether it
//! opens or closes, and its attributes in source order. Only `<a>` start tags
//! and their first `href` matter to the crawl; everything else is skipped.
//!
//! The concrete parser sits behind [`PageParser`] so it can be swapped
//! without touching the worker.

use scraper::{ElementRef, Html};
use thiserror::Error;

/// Whether an element opens or closes a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
}

/// A single tag seen while reading a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name
    pub name: String,

    /// Start or end tag
    pub kind: TagKind,

    /// Attributes as `(key, value)` pairs, in source order
    pub attributes: Vec<(String, String)>,
}

impl Element {
    /// Creates a start tag with the given attributes
    pub fn start<K, V>(name: &str, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.to_ascii_lowercase(),
            kind: TagKind::Start,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates an end tag
    pub fn end(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            kind: TagKind::End,
            attributes: Vec::new(),
        }
    }

    /// Returns true for `<a ...>`, false for `</a>` and every other tag
    pub fn is_anchor_start(&self) -> bool {
        self.kind == TagKind::Start && self.name == "a"
    }

    /// Value of the first attribute with exactly this key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Errors surfaced while reading a page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed content: {0}")]
    Malformed(String),
}

/// Stream of elements read from one page body
///
/// An `Err` ends extraction for the page; elements yielded before it stay valid.
pub type ElementStream<'a> = Box<dyn Iterator<Item = Result<Element, ParseError>> + Send + 'a>;

/// Capability to turn a page body into an element stream
pub trait PageParser: Send + Sync {
    fn elements<'a>(&self, body: &'a str) -> ElementStream<'a>;
}

/// Returns the `href` of an anchor start tag
///
/// Only the first attribute keyed `href` is considered; no other attribute
/// is inspected. Returns `None` for every element that is not `<a ...>`.
pub fn anchor_href(element: &Element) -> Option<&str> {
    if !element.is_anchor_start() {
        return None;
    }
    element.attr("href")
}

/// [`PageParser`] backed by `scraper` (html5ever)
///
/// html5ever recovers from malformed markup instead of failing, so this
/// parser never yields `ParseError`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl PageParser for HtmlParser {
    fn elements<'a>(&self, body: &'a str) -> ElementStream<'a> {
        // `Html` is not Send; the elements are copied out before it is dropped
        let elements = {
            let document = Html::parse_document(body);
            if !document.errors.is_empty() {
                tracing::trace!("Recovered from {} markup errors", document.errors.len());
            }
            start_tags(&document)
        };

        Box::new(elements.into_iter().map(Ok))
    }
}

/// Collects every start tag of the document in document order
fn start_tags(document: &Html) -> Vec<Element> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .map(|element| {
            let value = element.value();
            Element::start(value.name(), value.attrs())
        })
        .collect()
}
