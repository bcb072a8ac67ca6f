//! Page filters shared by the crawler and the sitemap resolver

use crate::url::{CanonicalUrl, UrlScope};

/// File extensions that never denote a crawlable page
///
/// Documents, images, media, archives, binaries and static assets.
const FILE_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", // documents
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", // images
    "mp4", "avi", "mov", "wmv", "flv", "mp3", "wav", // media
    "zip", "rar", "7z", "tar", "gz", "bz2", // archives
    "exe", "dmg", "pkg", "deb", "rpm", // binaries
    "ico", "webmanifest", "xml", "json", "css", "js", // static assets
];

/// Schemes rejected outright, before any syntax checks
const SPECIAL_SCHEMES: &[&str] = &[
    "tel", "mailto", "javascript", "ftp", "data", "file", "sms", "callto", "skype", "whatsapp",
];

/// Returns the canonical spelling of `scheme` if it is a special protocol
pub(crate) fn special_scheme(scheme: &str) -> Option<&'static str> {
    SPECIAL_SCHEMES
        .iter()
        .copied()
        .find(|special| special.eq_ignore_ascii_case(scheme))
}

/// Checks if a URL string starts with a non-HTTP(S) protocol
///
/// Matches the known special protocols (`mailto:`, `tel:`, messaging apps,
/// ...) and any other `scheme:` prefix that is not `http:`/`https:`.
///
/// # Examples
///
/// ```
/// use url_scout::url::is_special_protocol;
///
/// assert!(is_special_protocol("mailto:someone@example.com"));
/// assert!(is_special_protocol("WhatsApp://send"));
/// assert!(!is_special_protocol("https://example.com/"));
/// assert!(!is_special_protocol("/relative/path"));
/// ```
pub fn is_special_protocol(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };

    let looks_like_scheme = scheme
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));

    looks_like_scheme
        && !scheme.eq_ignore_ascii_case("http")
        && !scheme.eq_ignore_ascii_case("https")
}

/// Checks if the URL's last path segment carries a denylisted file extension
pub fn is_file_url(url: &CanonicalUrl) -> bool {
    let last_segment = url.path().rsplit('/').next().unwrap_or_default();

    last_segment
        .rsplit_once('.')
        .map_or(false, |(_, ext)| {
            FILE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Applies every page filter: scope, file extension, special protocol
///
/// This is the acceptance rule for both discovery paths.
pub fn is_page_candidate(url: &CanonicalUrl, scope: &UrlScope) -> bool {
    scope.contains(url) && !is_file_url(url) && !is_special_protocol(&url.to_string())
}
