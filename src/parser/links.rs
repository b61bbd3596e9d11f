//! Link extraction from document text.
//!
//! Recognises three syntaxes: wiki-style `[[target]]` / `[[target|alias]]`,
//! markdown `[text](target)`, and bare `http(s)://` URLs. Targets with a
//! scheme become external links (grouped by domain downstream); everything
//! else is an internal target resolved relative to the source file's
//! directory. The exact syntax set is a collaborator contract — callers treat
//! the output as opaque raw targets, pre-validation.

use std::sync::OnceLock;

use regex::Regex;

/// An external reference: the full URL plus its extracted domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub url: String,
    pub domain: String,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Internal targets, resolved relative to the source file, in document
    /// order. May contain duplicates.
    pub internal: Vec<String>,
    pub external: Vec<ExternalLink>,
}

fn wikilink_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\[([^\]\[|#]+)(?:#[^\]\[|]*)?(?:\|[^\]\[]*)?\]\]").unwrap())
}

fn mdlink_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]\(([^)\s]+)\)").unwrap())
}

fn bare_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s)\]>'\x22]+").unwrap())
}

/// Extract all links from `text`. `source_path` is the document's own path
/// relative to the scan root, used to resolve relative targets.
pub fn extract(text: &str, source_path: &str) -> ExtractedLinks {
    let mut out = ExtractedLinks::default();

    for cap in wikilink_re().captures_iter(text) {
        let raw = cap[1].trim();
        if raw.is_empty() {
            continue;
        }
        out.internal
            .push(resolve_relative(source_path, &ensure_extension(raw)));
    }

    for cap in mdlink_re().captures_iter(text) {
        let raw = cap[1].trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        if let Some(domain) = url_domain(raw) {
            out.external.push(ExternalLink {
                url: raw.to_string(),
                domain,
            });
        } else if !raw.contains("://") {
            let target = raw.split('#').next().unwrap_or(raw);
            if !target.is_empty() {
                out.internal
                    .push(resolve_relative(source_path, &ensure_extension(target)));
            }
        }
    }

    // Bare URLs outside of markdown link syntax.
    for m in bare_url_re().find_iter(text) {
        let url = m.as_str().trim_end_matches(['.', ',', ';']);
        let already = out.external.iter().any(|e| e.url == url);
        if already {
            continue;
        }
        if let Some(domain) = url_domain(url) {
            out.external.push(ExternalLink {
                url: url.to_string(),
                domain,
            });
        }
    }

    out
}

/// Extract the host part of an http(s) URL, lowercased. `None` for anything
/// without an http scheme.
pub fn url_domain(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    // Drop userinfo and port.
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// Targets without an extension refer to documents; default to `.md`.
fn ensure_extension(target: &str) -> String {
    let basename = target.rsplit('/').next().unwrap_or(target);
    if basename.contains('.') {
        target.to_string()
    } else {
        format!("{target}.md")
    }
}

/// Resolve `target` against the directory containing `source_path`, collapsing
/// `.` and `..` segments. Both are forward-slash paths relative to the root;
/// the result never escapes above the root.
pub fn resolve_relative(source_path: &str, target: &str) -> String {
    let dir = match source_path.rfind('/') {
        Some(idx) => &source_path[..idx],
        None => "",
    };
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wikilinks_get_md_extension() {
        let links = extract("see [[Ideas]] and [[notes/plan|the plan]]", "a.md");
        assert_eq!(links.internal, vec!["Ideas.md", "notes/plan.md"]);
    }

    #[test]
    fn wikilink_anchor_is_stripped() {
        let links = extract("[[Ideas#section]]", "a.md");
        assert_eq!(links.internal, vec!["Ideas.md"]);
    }

    #[test]
    fn markdown_links_resolve_relative_to_source() {
        let links = extract("[up](../top.md) [side](other.md)", "notes/deep/a.md");
        assert_eq!(links.internal, vec!["notes/top.md", "notes/deep/other.md"]);
    }

    #[test]
    fn markdown_http_link_is_external() {
        let links = extract("[site](https://example.com/x)", "a.md");
        assert!(links.internal.is_empty());
        assert_eq!(links.external.len(), 1);
        assert_eq!(links.external[0].domain, "example.com");
    }

    #[test]
    fn bare_urls_collected_once() {
        let links = extract(
            "[x](https://example.com/x) and also https://example.com/x plus https://other.org/y",
            "a.md",
        );
        let urls: Vec<&str> = links.external.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/x", "https://other.org/y"]);
    }

    #[test]
    fn domain_strips_port_and_path() {
        assert_eq!(
            url_domain("https://Example.COM:8080/a/b?q=1"),
            Some("example.com".to_string())
        );
        assert_eq!(url_domain("ftp://example.com"), None);
    }

    #[test]
    fn resolve_does_not_escape_root() {
        assert_eq!(resolve_relative("a.md", "../../b.md"), "b.md");
    }

    #[test]
    fn anchor_only_markdown_link_ignored() {
        let links = extract("[here](#section)", "a.md");
        assert!(links.internal.is_empty());
    }
}
