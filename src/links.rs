use log::debug;
use url::Url;

/// Where a navigation anchor points: a page file and an optional in-page section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTarget {
    pub file: String,
    pub section_id: String,
}

impl LinkTarget {
    pub fn is_empty(&self) -> bool {
        self.file.is_empty() && self.section_id.is_empty()
    }
}

/// Last segment of a URL path, or `index_filename` for directory paths.
pub fn current_filename(path: &str, index_filename: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        return index_filename.to_string();
    }
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => index_filename.to_string(),
    }
}

/// Resolves a raw `href` against the page location (`location` is the full
/// page URL). Anything that does not parse resolves to an empty target.
pub fn resolve(href: Option<&str>, location: &str, index_filename: &str) -> LinkTarget {
    let href = match href.map(str::trim) {
        Some(href) if !href.is_empty() => href,
        _ => return LinkTarget::default(),
    };

    if let Some(section) = href.strip_prefix('#') {
        let path = Url::parse(location)
            .map(|url| url.path().to_string())
            .unwrap_or_default();
        return LinkTarget {
            file: current_filename(&path, index_filename),
            section_id: section.to_string(),
        };
    }

    let resolved = match Url::parse(location).and_then(|base| base.join(href)) {
        Ok(url) => url,
        Err(e) => {
            debug!("Ignoring nav link {:?}: {}", href, e);
            return LinkTarget::default();
        }
    };

    LinkTarget {
        file: current_filename(resolved.path(), index_filename),
        section_id: resolved.fragment().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/site/services.html";

    #[test]
    fn filename_of_directory_paths_is_index() {
        assert_eq!(current_filename("", "index.html"), "index.html");
        assert_eq!(current_filename("/", "index.html"), "index.html");
        assert_eq!(current_filename("/about/", "index.html"), "index.html");
        assert_eq!(current_filename("/about/team.html", "index.html"), "team.html");
    }

    #[test]
    fn hash_links_point_at_the_current_page() {
        let target = resolve(Some("#pricing"), PAGE, "index.html");
        assert_eq!(target.file, "services.html");
        assert_eq!(target.section_id, "pricing");

        let home = resolve(Some("#faq"), "https://example.com/", "index.html");
        assert_eq!(home.file, "index.html");
        assert_eq!(home.section_id, "faq");
    }

    #[test]
    fn relative_links_resolve_against_the_page() {
        let target = resolve(Some("contact.html#form"), PAGE, "index.html");
        assert_eq!(target.file, "contact.html");
        assert_eq!(target.section_id, "form");

        let up = resolve(Some("../"), PAGE, "index.html");
        assert_eq!(up.file, "index.html");
        assert_eq!(up.section_id, "");

        let absolute = resolve(Some("/about.html"), PAGE, "index.html");
        assert_eq!(absolute.file, "about.html");
    }

    #[test]
    fn empty_and_unparseable_hrefs_contribute_nothing() {
        assert!(resolve(None, PAGE, "index.html").is_empty());
        assert!(resolve(Some("   "), PAGE, "index.html").is_empty());
        assert!(resolve(Some("http://[::1"), PAGE, "index.html").is_empty());
        assert!(resolve(Some("about.html"), "not a url", "index.html").is_empty());
    }
}
