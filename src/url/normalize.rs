use crate::url::filter::special_scheme;
use crate::url::resolve::{resolve_reference, split_absolute, RawParts};
use crate::url::{CanonicalUrl, Scheme};
use crate::UrlError;
use regex::Regex;
use std::sync::OnceLock;

/// Hosts shorter than this are rejected as implausible
const MIN_HOST_LEN: usize = 3;

/// Characters that never appear in a URL we would want to crawl
const ILLEGAL_CHARS: &[char] = &['<', '>', '{', '}', '[', ']', '"', '|', '^', '`'];

/// Canonicalizes a raw link candidate, resolving it against `base` if relative
///
/// # Canonicalization Steps
///
/// 1. Trim whitespace and decode HTML entities; reject candidates that still
///    decode to something else, since their canonical form would not be stable
/// 2. Reject special protocols (`mailto:`, `tel:`, `javascript:`, ...) and any
///    other non-HTTP(S) scheme
/// 3. Reject candidates that look like captured script rather than a URL:
///    script fragments, angle/brace/bracket characters, backslash escapes
/// 4. Drop the fragment
/// 5. Resolve relative references (protocol-relative, absolute-path,
///    query-only, document-relative) against `base`
/// 6. Lowercase the host, drop a default port, check the host length
/// 7. Collapse `.`/`..`/empty path segments; strip the trailing slash
///    (except for root)
/// 8. Check the result parses as a structurally valid URL
///
/// Pure and deterministic: the same input always gives the same output.
///
/// # Examples
///
/// ```
/// use url_scout::url::canonicalize;
///
/// let base = canonicalize("https://a.com/b/c/page", None).unwrap();
/// let url = canonicalize("../x", Some(&base)).unwrap();
/// assert_eq!(url.to_string(), "https://a.com/b/x");
/// ```
pub fn canonicalize(raw: &str, base: Option<&CanonicalUrl>) -> Result<CanonicalUrl, UrlError> {
    // Step 1: Trim and decode entities
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }
    let decoded = html_escape::decode_html_entities(trimmed);
    let candidate = decoded.trim();
    if candidate.is_empty() {
        return Err(UrlError::Empty);
    }
    if html_escape::decode_html_entities(candidate) != candidate {
        return Err(UrlError::Malformed(format!(
            "entity left after decoding: {}",
            candidate
        )));
    }

    // Step 2: Scheme check
    let explicit_scheme = scheme_of(candidate);
    if let Some(scheme) = explicit_scheme {
        if let Some(special) = special_scheme(scheme) {
            return Err(UrlError::SpecialScheme(special.to_string()));
        }
        if Scheme::parse(scheme).is_none() {
            return Err(UrlError::UnsupportedScheme(scheme.to_lowercase()));
        }
    }

    // Step 3: Reject captured code
    check_syntax(candidate)?;

    // Step 4: Drop fragment
    let without_fragment = candidate
        .split_once('#')
        .map_or(candidate, |(before, _)| before);

    // Step 5: Resolve
    let parts = match explicit_scheme {
        Some(_) => split_absolute(without_fragment)?,
        None => match base {
            Some(base) => resolve_reference(without_fragment, base)?,
            None => return Err(UrlError::MissingBase(candidate.to_string())),
        },
    };

    // Steps 6-7
    let url = normalize_parts(parts)?;

    // Step 8: Structural validity
    let parsed = ::url::Url::parse(&url.to_string())
        .map_err(|e| UrlError::Malformed(format!("{}: {}", url, e)))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Returns the explicit scheme of a reference, if it has one
fn scheme_of(candidate: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("scheme regex is valid")
    });

    re.captures(candidate)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rejects strings that an extractor captured out of inline code
fn check_syntax(candidate: &str) -> Result<(), UrlError> {
    static SCRIPT_RE: OnceLock<Regex> = OnceLock::new();
    let script_re = SCRIPT_RE.get_or_init(|| {
        Regex::new(r"(?i)=>|\b(?:function|var|let|const|return)[\s(]")
            .expect("script regex is valid")
    });

    if let Some(m) = script_re.find(candidate) {
        return Err(UrlError::ScriptLike(m.as_str().trim().to_string()));
    }

    let mut chars = candidate.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            return match chars.peek() {
                Some(next) if next.is_ascii_alphabetic() => Err(UrlError::EscapeSequence),
                _ => Err(UrlError::IllegalCharacter(c)),
            };
        }
        if ILLEGAL_CHARS.contains(&c) || c.is_whitespace() || c.is_control() {
            return Err(UrlError::IllegalCharacter(c));
        }
    }

    Ok(())
}

/// Applies host and path normalization to resolved parts
fn normalize_parts(parts: RawParts) -> Result<CanonicalUrl, UrlError> {
    let authority = normalize_authority(parts.scheme, &parts.authority)?;
    let path = normalize_path(&parts.path);
    let query = parts.query.filter(|q| !q.is_empty());

    Ok(CanonicalUrl::from_parts(parts.scheme, authority, path, query))
}

/// Lowercases the host, drops userinfo and a default port
fn normalize_authority(scheme: Scheme, authority: &str) -> Result<String, UrlError> {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let (host, port) = match host_port.rsplit_once(':') {
        Some((host, port)) => {
            if port.is_empty() {
                (host, None)
            } else {
                let port: u16 = port
                    .parse()
                    .map_err(|_| UrlError::Malformed(format!("invalid port in {}", authority)))?;
                (host, Some(port))
            }
        }
        None => (host_port, None),
    };

    let host = host.trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        return Err(UrlError::MissingHost);
    }
    if host.len() < MIN_HOST_LEN {
        return Err(UrlError::HostTooShort(host));
    }

    Ok(match port {
        Some(port) if port != scheme.default_port() => format!("{}:{}", host, port),
        _ => host,
    })
}

/// Normalizes a URL path by removing dot segments and trailing slashes
///
/// Segments are collapsed left to right on a stack: `..` pops (a no-op on an
/// empty stack), `.` and empty segments are skipped.
pub(crate) fn normalize_path(path: &str) -> String {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        canonicalize(raw, None).unwrap().to_string()
    }

    fn base() -> CanonicalUrl {
        canonicalize("https://a.com/b/c/page", None).unwrap()
    }

    fn resolve(raw: &str) -> String {
        canonicalize(raw, Some(&base())).unwrap().to_string()
    }

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(canon("https://example.com/page/"), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        assert_eq!(canon("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        assert_eq!(canon("https://example.com"), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        assert_eq!(
            canon("https://example.com/page#section"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_query_preserved_verbatim() {
        assert_eq!(
            canon("https://example.com/page?b=2&a=1&utm_source=x"),
            "https://example.com/page?b=2&a=1&utm_source=x"
        );
    }

    #[test]
    fn test_empty_query_dropped() {
        assert_eq!(canon("https://example.com/page?"), "https://example.com/page");
    }

    #[test]
    fn test_scheme_is_preserved() {
        assert_eq!(canon("http://example.com/page"), "http://example.com/page");
        assert_eq!(canon("HTTPS://example.com/page"), "https://example.com/page");
    }

    #[test]
    fn test_lowercase_host_keeps_path_case() {
        assert_eq!(canon("https://EXAMPLE.COM/Page"), "https://example.com/Page");
    }

    #[test]
    fn test_default_port_dropped() {
        assert_eq!(canon("https://example.com:443/a"), "https://example.com/a");
        assert_eq!(canon("http://example.com:80/a"), "http://example.com/a");
        assert_eq!(
            canon("http://example.com:8080/a"),
            "http://example.com:8080/a"
        );
    }

    #[test]
    fn test_userinfo_dropped() {
        assert_eq!(canon("https://user:pw@example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_normalize_path_with_dots() {
        assert_eq!(
            canon("https://example.com/a/../b/./c"),
            "https://example.com/b/c"
        );
    }

    #[test]
    fn test_multiple_slashes() {
        assert_eq!(
            canon("https://example.com///path//to///page"),
            "https://example.com/path/to/page"
        );
    }

    #[test]
    fn test_parent_directory_at_root() {
        assert_eq!(canon("https://example.com/../../page"), "https://example.com/page");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            canon("https://example.com/search?a=1&amp;b=2"),
            "https://example.com/search?a=1&b=2"
        );
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(canon("  https://example.com/a \n"), "https://example.com/a");
    }

    #[test]
    fn test_resolve_parent() {
        assert_eq!(resolve("../x"), "https://a.com/b/x");
    }

    #[test]
    fn test_resolve_current() {
        assert_eq!(resolve("./y"), "https://a.com/b/c/y");
    }

    #[test]
    fn test_resolve_absolute_path() {
        assert_eq!(resolve("/z"), "https://a.com/z");
    }

    #[test]
    fn test_resolve_bare_relative() {
        assert_eq!(resolve("sibling"), "https://a.com/b/c/sibling");
    }

    #[test]
    fn test_resolve_too_many_parents_is_clamped() {
        assert_eq!(resolve("../../../../x"), "https://a.com/x");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        assert_eq!(resolve("//cdn.example.com/lib"), "https://cdn.example.com/lib");
    }

    #[test]
    fn test_resolve_query_only() {
        assert_eq!(resolve("?page=2"), "https://a.com/b/c/page?page=2");
    }

    #[test]
    fn test_resolve_fragment_only() {
        assert_eq!(resolve("#top"), "https://a.com/b/c/page");
    }

    #[test]
    fn test_absolute_ignores_base() {
        assert_eq!(resolve("https://other.com/p/"), "https://other.com/p");
    }

    #[test]
    fn test_relative_without_base() {
        assert!(matches!(
            canonicalize("/page", None),
            Err(UrlError::MissingBase(_))
        ));
    }

    #[test]
    fn test_special_schemes_rejected() {
        for raw in [
            "mailto:someone@example.com",
            "tel:+123456",
            "javascript:void(0)",
            "data:text/plain,hello",
            "ftp://example.com/file",
            "file:///etc/passwd",
            "whatsapp://send?text=hi",
            "skype:someone?call",
        ] {
            assert!(
                matches!(canonicalize(raw, Some(&base())), Err(UrlError::SpecialScheme(_))),
                "expected special scheme rejection for {}",
                raw
            );
        }
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        assert_eq!(
            canonicalize("gopher://example.com/", None),
            Err(UrlError::UnsupportedScheme("gopher".to_string()))
        );
    }

    #[test]
    fn test_script_like_rejected() {
        assert!(matches!(
            canonicalize("function(){return x}", Some(&base())),
            Err(UrlError::ScriptLike(_))
        ));
        assert!(matches!(
            canonicalize("x=>x.href", Some(&base())),
            Err(UrlError::ScriptLike(_))
        ));
    }

    #[test]
    fn test_keyword_inside_path_is_fine() {
        assert_eq!(resolve("/let-it-go"), "https://a.com/let-it-go");
        assert_eq!(resolve("/variables"), "https://a.com/variables");
    }

    #[test]
    fn test_brackets_rejected() {
        assert_eq!(
            canonicalize("/page<br>", Some(&base())),
            Err(UrlError::IllegalCharacter('<'))
        );
        assert_eq!(
            canonicalize("/a/{id}", Some(&base())),
            Err(UrlError::IllegalCharacter('{'))
        );
        assert_eq!(
            canonicalize("/a[0]", Some(&base())),
            Err(UrlError::IllegalCharacter('['))
        );
    }

    #[test]
    fn test_escape_sequence_rejected() {
        assert_eq!(
            canonicalize(r"\/page\n", Some(&base())),
            Err(UrlError::IllegalCharacter('\\'))
        );
        assert_eq!(
            canonicalize(r"page\n", Some(&base())),
            Err(UrlError::EscapeSequence)
        );
    }

    #[test]
    fn test_interior_whitespace_rejected() {
        assert_eq!(
            canonicalize("/a page", Some(&base())),
            Err(UrlError::IllegalCharacter(' '))
        );
    }

    #[test]
    fn test_short_host_rejected() {
        assert!(matches!(
            canonicalize("https://ab/", None),
            Err(UrlError::HostTooShort(_))
        ));
    }

    #[test]
    fn test_missing_host_rejected() {
        assert_eq!(canonicalize("https:///path", None), Err(UrlError::MissingHost));
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(matches!(
            canonicalize("https://example.com:abc/", None),
            Err(UrlError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(canonicalize("   ", None), Err(UrlError::Empty));
    }

    #[test]
    fn test_idempotent_on_examples() {
        for raw in [
            "http://WWW.Example.com:80/a/./b/../c/?q=1#f",
            "https://example.com",
            "https://example.com/a//b/",
            "https://example.com/list?region=us&copy=2&notify=1",
            "https://example.com/search?a=1&amp;b=2",
        ] {
            let once = canonicalize(raw, None).unwrap();
            let twice = canonicalize(&once.to_string(), None).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_double_escaped_entity_rejected() {
        assert!(matches!(
            canonicalize("https://a.com/p?x=&amp;amp;y", None),
            Err(UrlError::Malformed(_))
        ));
        assert!(matches!(
            canonicalize("/p?x=&amp;lt;y", Some(&base())),
            Err(UrlError::Malformed(_))
        ));
    }

    #[test]
    fn test_plain_ampersands_kept() {
        assert_eq!(
            canon("https://a.com/p?region=us&notify=1"),
            "https://a.com/p?region=us&notify=1"
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/a/b/"), "/a/b");
        assert_eq!(normalize_path("/.."), "/");
        assert_eq!(normalize_path("/a/./b/../../c"), "/c");
    }
}
