//! HTML content extraction
//!
//! This module turns rendered HTML into the data a crawl works with:
//! - Normalized visible text
//! - Outbound links keyed by anchor text (the traversal frontier)
//! - Social media profile links
//!
//! Script and style elements, and any element whose class mentions "cookie"
//! (consent banners), are dropped before anything is collected.

use crate::extract::{Platform, SocialMap};
use scraper::{ElementRef, Html, Node};
use unicode_normalization::UnicodeNormalization;

/// Outbound links of a page, keyed by anchor text
///
/// Keys keep the position of their first insertion; inserting an existing key
/// replaces its href in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundLinks {
    entries: Vec<(String, String)>,
}

impl OutboundLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: String, href: String) {
        match self.entries.iter_mut().find(|(t, _)| *t == text) {
            Some(entry) => entry.1 = href,
            None => self.entries.push((text, href)),
        }
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == text)
            .map(|(_, href)| href.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (anchor text, href) pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, h)| (t.as_str(), h.as_str()))
    }

    pub fn hrefs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, h)| h.as_str())
    }
}

/// Everything extracted from one rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub social_links: SocialMap,
    pub outbound_links: OutboundLinks,
}

/// One fetched and extracted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Absolute URL the page was fetched from
    pub url: String,
    pub raw_html: String,
    pub extracted_text: String,
    pub social_links: SocialMap,
    pub outbound_links: OutboundLinks,
}

impl FetchedPage {
    /// Extracts content from rendered HTML and wraps it with its URL
    pub fn from_html(url: &str, raw_html: String) -> Self {
        let content = extract_content(&raw_html);
        Self {
            url: url.to_string(),
            raw_html,
            extracted_text: content.text,
            social_links: content.social_links,
            outbound_links: content.outbound_links,
        }
    }
}

/// Parses HTML content and extracts text and links
///
/// # Extraction Rules
///
/// **Dropped entirely (with descendants):**
/// - `<script>` and `<style>` elements
/// - Elements whose `class` contains "cookie" (case-insensitive)
///
/// **Text:** every remaining text node is trimmed, HTML-unescaped and NFKD-normalized;
/// the fragments, blank ones included, are joined with single spaces and the result trimmed.
///
/// **Outbound links:** `<a href>` with a non-empty href not starting with `#`, keyed by
/// the anchor's stripped text. A repeated anchor text keeps the later href.
///
/// **Social links:** per platform, the first anchor whose href contains the platform
/// domain (e.g. `facebook.com`). Platforms without a match are absent.
///
/// # Example
///
/// ```
/// use portfolio_crawler::crawler::extract_content;
///
/// let html = r#"<html><body><p>Hello</p><a href="/team">Team</a></body></html>"#;
/// let content = extract_content(html);
/// assert_eq!(content.text, "Hello Team");
/// assert_eq!(content.outbound_links.get("Team"), Some("/team"));
/// ```
pub fn extract_content(html: &str) -> ExtractedContent {
    let document = Html::parse_document(html);

    let mut fragments: Vec<String> = Vec::new();
    let mut anchors: Vec<(String, String)> = Vec::new();

    // Depth-first, document order; children pushed in reverse
    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => {
                // Blank nodes still contribute their separator
                fragments.push(normalize_fragment(text));
                continue;
            }
            Node::Element(element) => {
                if is_noise(element) {
                    continue;
                }
                if element.name() == "a" {
                    if let (Some(href), Some(anchor)) = (element.attr("href"), ElementRef::wrap(node)) {
                        anchors.push((anchor_text(anchor), href.to_string()));
                    }
                }
            }
            Node::Document | Node::Fragment => {}
            _ => continue,
        }

        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }

    ExtractedContent {
        text: normalize_text(&fragments.join(" ")),
        social_links: social_links(&anchors),
        outbound_links: outbound_links(&anchors),
    }
}

/// Normalizes one text node: trimmed, entity-unescaped, then NFKD
///
/// Unescaping can leave edge whitespace (`&nbsp;` becomes a plain space) which is kept.
pub fn normalize_fragment(raw: &str) -> String {
    let unescaped = html_escape::decode_html_entities(raw.trim());
    unescaped.nfkd().collect()
}

/// NFKD-normalizes and trims assembled text
///
/// Entities are not decoded here, so applying it to its own output is a no-op.
pub fn normalize_text(text: &str) -> String {
    let normalized: String = text.nfkd().collect();
    normalized.trim().to_string()
}

fn is_noise(element: &scraper::node::Element) -> bool {
    matches!(element.name(), "script" | "style")
        || element
            .attr("class")
            .map_or(false, |class| class.to_lowercase().contains("cookie"))
}

fn anchor_text(anchor: ElementRef<'_>) -> String {
    anchor.text().map(str::trim).collect()
}

fn social_links(anchors: &[(String, String)]) -> SocialMap {
    let mut links = SocialMap::new();
    for platform in Platform::ALL {
        if let Some((_, href)) = anchors.iter().find(|(_, href)| platform.matches(href)) {
            links.insert(platform, href.clone());
        }
    }
    links
}

fn outbound_links(anchors: &[(String, String)]) -> OutboundLinks {
    let mut links = OutboundLinks::new();
    for (text, href) in anchors {
        if !href.is_empty() && !href.starts_with('#') {
            links.insert(text.clone(), href.clone());
        }
    }
    links
}
