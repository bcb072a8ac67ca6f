//! Sitemap XML parsing
//!
//! A fetched sitemap is classified exactly once, here, into either an index
//! (pointing at more sitemaps) or a URL set (pointing at pages).

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Errors from parsing a sitemap document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SitemapError {
    #[error("Invalid XML: {0}")]
    InvalidXml(String),
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: child sitemap locations, in document order
    Index(Vec<String>),

    /// Any other root (normally `<urlset>`): page locations
    UrlSet(Vec<String>),
}

impl SitemapDocument {
    /// Parses a sitemap or sitemap index
    ///
    /// Element names are matched by local name, so namespace prefixes do not
    /// matter. For an index, `<loc>` values directly inside `<sitemap>` are
    /// collected; for a URL set, those directly inside `<url>`. Values are
    /// unescaped and trimmed, and empty ones are dropped.
    ///
    /// # Errors
    ///
    /// `SitemapError::InvalidXml` for malformed markup, unclosed elements,
    /// or a document with no root element.
    pub fn parse(xml: &str) -> Result<Self, SitemapError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        let mut root: Option<String> = None;
        let mut stack: Vec<String> = Vec::new();
        let mut loc_text = String::new();
        let mut sitemap_locs = Vec::new();
        let mut page_locs = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    if root.is_none() {
                        root = Some(name.clone());
                    }
                    if name == "loc" {
                        loc_text.clear();
                    }
                    stack.push(name);
                }
                Ok(Event::Empty(ref e)) => {
                    if root.is_none() {
                        root = Some(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if stack.last().map(String::as_str) == Some("loc") {
                        let text = e
                            .unescape()
                            .map_err(|err| SitemapError::InvalidXml(err.to_string()))?;
                        loc_text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if stack.last().map(String::as_str) == Some("loc") {
                        loc_text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(name) = stack.pop() else {
                        return Err(SitemapError::InvalidXml(
                            "unexpected closing tag".to_string(),
                        ));
                    };
                    if name == "loc" {
                        let loc = loc_text.trim();
                        if !loc.is_empty() {
                            match stack.last().map(String::as_str) {
                                Some("sitemap") => sitemap_locs.push(loc.to_string()),
                                Some("url") => page_locs.push(loc.to_string()),
                                _ => {}
                            }
                        }
                        loc_text.clear();
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(SitemapError::InvalidXml(format!(
                        "{} at position {}",
                        e,
                        reader.buffer_position()
                    )));
                }
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(SitemapError::InvalidXml(format!(
                "unclosed element <{}>",
                open
            )));
        }

        match root.as_deref() {
            None => Err(SitemapError::InvalidXml("no root element".to_string())),
            Some("sitemapindex") => Ok(Self::Index(sitemap_locs)),
            Some(_) => Ok(Self::UrlSet(page_locs)),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    pub fn locations(&self) -> &[String] {
        match self {
            Self::Index(locs) | Self::UrlSet(locs) => locs,
        }
    }
}
