use url::Url;

/// Canonical deduplication key for an article URL: host + path, lower-cased,
/// scheme dropped, one trailing slash removed. Unparseable input falls back
/// to the trimmed raw string so the function never fails.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(parsed) if parsed.host_str().is_some() => {
            let host = parsed.host_str().unwrap_or_default();
            let path = parsed.path();
            let path = path.strip_suffix('/').unwrap_or(path);
            format!("{}{}", host, path).to_lowercase()
        }
        _ => {
            let stripped = trimmed.strip_suffix('/').unwrap_or(trimmed);
            stripped.to_lowercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_url;

    #[test]
    fn scheme_is_ignored() {
        assert_eq!(
            normalize_url("https://x.com/a"),
            normalize_url("http://x.com/a")
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        assert_eq!(
            normalize_url("https://x.com/a/"),
            normalize_url("https://x.com/a")
        );
        assert_eq!(normalize_url("https://x.com/a/"), "x.com/a");
    }

    #[test]
    fn host_is_lowercased() {
        assert_eq!(normalize_url("https://X.COM/News/A"), "x.com/news/a");
    }

    #[test]
    fn query_and_fragment_are_dropped() {
        assert_eq!(
            normalize_url("https://x.com/a?utm_source=feed#top"),
            "x.com/a"
        );
    }

    #[test]
    fn bare_host_keeps_no_slash() {
        assert_eq!(normalize_url("https://x.com/"), "x.com");
    }

    #[test]
    fn malformed_input_falls_back_to_raw() {
        assert_eq!(normalize_url("  Not A Url/ "), "not a url");
        assert_eq!(normalize_url("x.com/a/"), "x.com/a");
    }

    #[test]
    fn normalization_is_stable() {
        let key = normalize_url("HTTPS://X.com/A/");
        assert_eq!(key, normalize_url(&key.clone()));
        assert_eq!(key, "x.com/a");
    }
}
