use std::path::{Path, PathBuf};

use crate::error::{ExportError, PageError};
use crate::net::content::ContentClient;
use crate::page::html::render_html;
use crate::page::{HomePage, ListingPage, Page, PostPage, Route};

/// What `export` wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub files: Vec<PathBuf>,
    pub posts: usize,
}

/// The site pipeline: Route → Fetch → Markdown → Page.
pub struct SiteEngine {
    client: ContentClient,
}

impl SiteEngine {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    /// Build the page for `route`. Only the listing can fail, and only when
    /// there is no content API to ask.
    pub fn load(&self, route: &Route) -> Result<Page, PageError> {
        log::info!("loading {}", route);
        let page = match route {
            Route::Home => Page::Home(HomePage::new()),
            Route::Blog => {
                if !self.client.has_api_base() {
                    return Err(PageError::MissingApiBase);
                }
                let posts = self.client.fetch_all_posts();
                log::debug!("listing has {} posts", posts.len());
                Page::Listing(ListingPage::new(&posts))
            }
            Route::Post(slug) => match self.client.fetch_post(slug) {
                Some(post) => Page::Post(PostPage::new(&post)),
                None => Page::NotFound { path: route.path() },
            },
            Route::Unknown(path) => Page::NotFound { path: path.clone() },
        };
        Ok(page)
    }

    /// Write the home page, the listing and every post under `out`, one
    /// `index.html` per route.
    pub fn export(&self, out: &Path) -> Result<ExportSummary, ExportError> {
        if !self.client.has_api_base() {
            return Err(PageError::MissingApiBase.into());
        }

        let mut summary = ExportSummary::default();
        let posts = self.client.fetch_all_posts();

        write_page(out, &Route::Home, &Page::Home(HomePage::new()), &mut summary)?;
        write_page(out, &Route::Blog, &Page::Listing(ListingPage::new(&posts)), &mut summary)?;

        for post in &posts {
            if post.slug.is_empty()
                || post.slug.contains(['/', '\\'])
                || post.slug.starts_with('.')
            {
                log::warn!("skipping post {} with unusable slug {:?}", post.id, post.slug);
                continue;
            }
            let route = Route::Post(post.slug.clone());
            write_page(out, &route, &Page::Post(PostPage::new(post)), &mut summary)?;
            summary.posts += 1;
        }

        log::info!("exported {} files to {}", summary.files.len(), out.display());
        Ok(summary)
    }
}

fn write_page(
    out: &Path,
    route: &Route,
    page: &Page,
    summary: &mut ExportSummary,
) -> Result<(), ExportError> {
    let dir = route
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(out.to_path_buf(), |dir, segment| dir.join(segment));
    let file = dir.join("index.html");

    let io_err = |source| ExportError::Write {
        path: file.display().to_string(),
        source,
    };
    std::fs::create_dir_all(&dir).map_err(io_err)?;
    std::fs::write(&file, render_html(page)).map_err(io_err)?;

    log::debug!("wrote {}", file.display());
    summary.files.push(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> SiteEngine {
        SiteEngine::new(ContentClient::new(None))
    }

    #[test]
    fn home_needs_no_network() {
        let page = offline().load(&Route::Home).unwrap();
        assert!(matches!(page, Page::Home(ref h) if h.sections.len() == 3));
    }

    #[test]
    fn listing_without_api_base_is_an_error() {
        let err = offline().load(&Route::Blog).unwrap_err();
        assert_eq!(
            err.to_string(),
            "[listing] content API base URL is not configured (set CONTENT_API_URL)"
        );
    }

    #[test]
    fn post_without_api_base_is_not_found() {
        let page = offline().load(&Route::Post("anything".into())).unwrap();
        assert_eq!(page, Page::NotFound { path: "/blog/anything".into() });
    }

    #[test]
    fn unknown_routes_are_not_found() {
        let page = offline().load(&Route::parse("/nope")).unwrap();
        assert!(page.is_not_found());
    }

    #[test]
    fn unreachable_api_gives_an_empty_listing() {
        // Port 9 (discard) is closed on test machines; the connection is refused.
        let engine = SiteEngine::new(ContentClient::new(Some("http://127.0.0.1:9")));
        match engine.load(&Route::Blog).unwrap() {
            Page::Listing(listing) => assert!(listing.entries.is_empty()),
            other => panic!("expected listing, got {:?}", other),
        }
    }

    #[test]
    fn export_without_api_base_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = offline().export(dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::Page(PageError::MissingApiBase)));
    }
}
