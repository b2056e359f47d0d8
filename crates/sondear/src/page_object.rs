//! Page Object Model support.
//!
//! A page object encapsulates one page's selectors and actions behind a
//! named contract, so scenarios depend on intent rather than raw DOM
//! queries, and a DOM change is edited in exactly one place.
//!
//! Page objects are constructed per test run by an explicit factory; none is
//! exported as a shared singleton, so no state can leak across scenarios.

/// Trait for page objects representing one page in the UI.
///
/// # Example
///
/// ```ignore
/// struct LoginPage {
///     username_input: Locator,
///     submit_button: Locator,
/// }
///
/// impl PageObject for LoginPage {
///     fn url_pattern(&self) -> &str {
///         "/login"
///     }
/// }
/// ```
pub trait PageObject {
    /// URL path pattern that matches this page (e.g. `/`, `/users/*`)
    fn url_pattern(&self) -> &str;

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether a URL (absolute or path-only) lands on this page
    fn matches_url(&self, url: &str) -> bool {
        UrlMatcher::new(self.url_pattern()).matches(url)
    }
}

/// URL path matcher for page objects.
///
/// Patterns are `/`-separated; a `*` segment matches exactly one segment of
/// any content. Absolute URLs are matched by their path component only.
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
}

/// Strip scheme and authority from an absolute URL, leaving the path
fn path_of(url: &str) -> &str {
    let rest = url
        .split_once("://")
        .map_or(url, |(_, after_scheme)| after_scheme);
    if rest == url {
        // Already a bare path
        return url;
    }
    rest.find('/').map_or("", |idx| &rest[idx..])
}

impl UrlMatcher {
    /// Create a new matcher from a path pattern
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL's path matches the pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let path = path_of(url);
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let url_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if url_segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(&url_segments)
            .all(|(segment, actual)| match segment {
                UrlSegment::Literal(lit) => lit == actual,
                UrlSegment::Wildcard => true,
            })
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
