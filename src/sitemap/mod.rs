//! Sitemap module for sitemap-driven URL discovery
//!
//! This module handles:
//! - Parsing sitemap and sitemap-index XML into a two-variant document
//! - Recursively resolving index files into a flat, filtered URL set

mod document;
mod resolver;

pub use document::{SitemapDocument, SitemapError};
pub use resolver::{SitemapResolver, SitemapWalk};
