/// Classifies a candidate link relative to the crawl's base URL
///
/// The base has a single trailing `/` trimmed before comparison. A candidate
/// is in scope when it starts with the trimmed base, or when it is a
/// path-relative link starting with `/`, in which case it is joined onto the
/// trimmed base. Anything else is returned unchanged and out of scope.
///
/// An empty base (or a base that is empty once trimmed) never puts anything
/// in scope; otherwise the empty prefix would match every candidate.
///
/// # Arguments
///
/// * `base` - The base URL of the crawl (normally the seed URL)
/// * `candidate` - The raw `href` value found on a page
///
/// # Returns
///
/// A tuple of the (possibly joined) link and whether it is in scope
///
/// # Examples
///
/// ```
/// use site_ripple::url::validate_link;
///
/// assert_eq!(
///     validate_link("https://parserdigital.com/", "/careers"),
///     ("https://parserdigital.com/careers".to_string(), true)
/// );
/// assert_eq!(
///     validate_link("https://parserdigital.com/", "https://other.com/"),
///     ("https://other.com/".to_string(), false)
/// );
/// ```
pub fn validate_link(base: &str, candidate: &str) -> (String, bool) {
    let base = base.strip_suffix('/').unwrap_or(base);

    if base.is_empty() {
        return (candidate.to_string(), false);
    }

    if candidate.starts_with(base) {
        (candidate.to_string(), true)
    } else if candidate.starts_with('/') {
        (format!("{}{}", base, candidate), true)
    } else {
        (candidate.to_string(), false)
    }
}

/// Returns true if `candidate` is in scope for `base`
///
/// Shorthand for the boolean half of [`validate_link`].
pub fn is_in_scope(base: &str, candidate: &str) -> bool {
    validate_link(base, candidate).1
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://parserdigital.com/";

    #[test]
    fn test_absolute_link_with_base_prefix() {
        assert_eq!(
            validate_link(BASE, "https://parserdigital.com/careers"),
            ("https://parserdigital.com/careers".to_string(), true)
        );
    }

    #[test]
    fn test_slash_prefixed_link_is_joined() {
        assert_eq!(
            validate_link(BASE, "/careers"),
            ("https://parserdigital.com/careers".to_string(), true)
        );
    }

    #[test]
    fn test_different_origin_is_out_of_scope() {
        assert_eq!(
            validate_link(BASE, "https://other.com/"),
            ("https://other.com/".to_string(), false)
        );
        assert_eq!(
            validate_link(BASE, "https://cesarcedanov.com/careers"),
            ("https://cesarcedanov.com/careers".to_string(), false)
        );
    }

    #[test]
    fn test_empty_base_is_never_in_scope() {
        assert_eq!(
            validate_link("", "https://other.com/"),
            ("https://other.com/".to_string(), false)
        );
        assert_eq!(validate_link("", "/careers"), ("/careers".to_string(), false));
    }

    #[test]
    fn test_base_of_single_slash_trims_to_empty() {
        assert!(!is_in_scope("/", "/careers"));
        assert!(!is_in_scope("/", "https://other.com/"));
    }

    #[test]
    fn test_empty_candidate_is_out_of_scope() {
        assert_eq!(validate_link(BASE, ""), (String::new(), false));
    }

    #[test]
    fn test_subdomain_sharing_suffix_is_out_of_scope() {
        assert!(!is_in_scope("parserdigital.com/", "community.parserdigital.com/"));
    }

    #[test]
    fn test_only_one_trailing_slash_is_trimmed() {
        // "https://parserdigital.com/" remains as the prefix
        assert!(is_in_scope(
            "https://parserdigital.com//",
            "https://parserdigital.com/careers"
        ));
        assert_eq!(
            validate_link("https://parserdigital.com//", "/careers"),
            ("https://parserdigital.com//careers".to_string(), true)
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        assert_eq!(
            validate_link("https://parserdigital.com", "/about"),
            ("https://parserdigital.com/about".to_string(), true)
        );
    }

    #[test]
    fn test_no_further_normalization() {
        assert_eq!(
            validate_link(BASE, "https://parserdigital.com/Careers/?q=1#top"),
            ("https://parserdigital.com/Careers/?q=1#top".to_string(), true)
        );
        assert_eq!(
            validate_link(BASE, "careers"),
            ("careers".to_string(), false)
        );
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            validate_link(BASE, "/"),
            ("https://parserdigital.com/".to_string(), true)
        );
    }
}
