use crate::links::{self, LinkTarget};

#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub href: String,
    pub target: LinkTarget,
    pub is_active: bool,
}

impl NavLink {
    pub fn new(href: Option<String>, location: &str, index_filename: &str) -> Self {
        let target = links::resolve(href.as_deref(), location, index_filename);
        Self {
            href: href.unwrap_or_default(),
            target,
            is_active: false,
        }
    }

    /// `aria-current` token for an active link: in-page section links mark a
    /// location, plain links mark the page itself.
    pub fn aria_current(&self) -> Option<&'static str> {
        if !self.is_active {
            None
        } else if self.target.section_id.is_empty() {
            Some("page")
        } else {
            Some("location")
        }
    }
}

/// Identity of the page being viewed, used by the fallback tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIdentity {
    pub filename: String,
    pub is_index: bool,
}

impl PageIdentity {
    pub fn from_path(path: &str, index_filename: &str) -> Self {
        let filename = links::current_filename(path, index_filename);
        Self {
            is_index: filename == index_filename,
            filename,
        }
    }
}

/// Active flags for every nav link on the page, in document order.
///
/// Links are read once at start; only the flags change afterwards.
#[derive(Debug, Clone)]
pub struct ActiveLinks {
    links: Vec<NavLink>,
    page: PageIdentity,
    home_hrefs: Vec<String>,
}

impl ActiveLinks {
    pub fn new(links: Vec<NavLink>, page: PageIdentity, home_hrefs: Vec<String>) -> Self {
        Self {
            links,
            page,
            home_hrefs,
        }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn active_indices(&self) -> Vec<usize> {
        self.links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.is_active)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn clear_all(&mut self) {
        for link in &mut self.links {
            link.is_active = false;
        }
    }

    /// Clears every link, then activates those matching `predicate`.
    /// Returns how many links ended up active.
    pub fn activate_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(usize, &NavLink) -> bool,
    {
        self.clear_all();
        let mut count = 0;
        for (i, link) in self.links.iter_mut().enumerate() {
            if predicate(i, &*link) {
                link.is_active = true;
                count += 1;
            }
        }
        count
    }

    pub fn activate_index(&mut self, index: usize) -> usize {
        self.activate_where(|i, _| i == index)
    }

    pub fn activate_by_section_id(&mut self, id: &str) -> usize {
        self.activate_where(|_, link| !id.is_empty() && link.target.section_id == id)
    }

    /// Page-identity fallback: plain links to this page, then any link to
    /// this page, then (on the index page only) the home href variants.
    pub fn activate_by_fallback(&mut self) -> usize {
        let file = self.page.filename.clone();

        let plain = self.activate_where(|_, link| {
            link.target.file == file && link.target.section_id.is_empty()
        });
        if plain > 0 {
            return plain;
        }

        let any = self.activate_where(|_, link| link.target.file == file);
        if any > 0 {
            return any;
        }

        if self.page.is_index {
            let home_hrefs = self.home_hrefs.clone();
            return self.activate_where(|_, link| {
                home_hrefs.iter().any(|home| home == link.href.trim())
            });
        }

        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(location: &str, hrefs: &[&str]) -> ActiveLinks {
        let url = url::Url::parse(location).unwrap();
        let links = hrefs
            .iter()
            .map(|href| NavLink::new(Some(href.to_string()), location, "index.html"))
            .collect();
        ActiveLinks::new(
            links,
            PageIdentity::from_path(url.path(), "index.html"),
            vec!["/".to_string(), "#top".to_string()],
        )
    }

    #[test]
    fn fallback_prefers_plain_page_links() {
        let mut nav = model(
            "https://example.com/services.html",
            &["index.html", "services.html#pricing", "services.html", "contact.html"],
        );
        assert_eq!(nav.activate_by_fallback(), 1);
        assert_eq!(nav.active_indices(), vec![2]);
    }

    #[test]
    fn fallback_widens_to_section_links_of_this_page() {
        let mut nav = model(
            "https://example.com/services.html",
            &["index.html", "#pricing", "services.html#faq", "contact.html"],
        );
        assert_eq!(nav.activate_by_fallback(), 2);
        assert_eq!(nav.active_indices(), vec![1, 2]);
    }

    #[test]
    fn fallback_uses_home_variants_only_on_index() {
        // "/" resolves to index.html, so craft a page where no link resolves
        // to the current file and only the raw href matches.
        let mut nav = ActiveLinks::new(
            vec![
                NavLink::new(Some("#top".to_string()), "not a url", "index.html"),
                NavLink::new(Some("about.html".to_string()), "not a url", "index.html"),
            ],
            PageIdentity {
                filename: "home.html".to_string(),
                is_index: true,
            },
            vec!["#top".to_string()],
        );
        assert_eq!(nav.activate_by_fallback(), 1);
        assert_eq!(nav.active_indices(), vec![0]);

        let mut elsewhere = model("https://example.com/about.html", &["#top", "contact.html"]);
        elsewhere.links[0].target = LinkTarget::default();
        assert_eq!(elsewhere.activate_by_fallback(), 0);
        assert!(elsewhere.active_indices().is_empty());
    }

    #[test]
    fn fallback_clears_stale_state_when_nothing_matches() {
        let mut nav = model("https://example.com/blog.html", &["index.html", "#about"]);
        nav.activate_index(0);
        nav.links[1].target = LinkTarget::default();
        assert_eq!(nav.activate_by_fallback(), 0);
        assert!(nav.active_indices().is_empty());
    }

    #[test]
    fn section_activation_marks_every_duplicate() {
        let mut nav = model(
            "https://example.com/",
            &["#about", "#faq", "index.html#about", "#contact"],
        );
        assert_eq!(nav.activate_by_section_id("about"), 2);
        assert_eq!(nav.active_indices(), vec![0, 2]);

        nav.activate_by_section_id("contact");
        assert_eq!(nav.active_indices(), vec![3]);
    }

    #[test]
    fn empty_section_id_activates_nothing() {
        let mut nav = model("https://example.com/", &["index.html", "#about"]);
        assert_eq!(nav.activate_by_section_id(""), 0);
    }

    #[test]
    fn aria_current_distinguishes_sections_from_pages() {
        let mut nav = model("https://example.com/", &["index.html", "#about", "contact.html"]);
        assert!(nav.links().iter().all(|link| link.aria_current().is_none()));

        nav.activate_by_fallback();
        assert_eq!(nav.links()[0].aria_current(), Some("page"));
        assert_eq!(nav.links()[1].aria_current(), None);

        nav.activate_by_section_id("about");
        assert_eq!(nav.links()[0].aria_current(), None);
        assert_eq!(nav.links()[1].aria_current(), Some("location"));
    }
}
