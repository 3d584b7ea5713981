//! Page view-models, independent of how they are drawn.
//!
//! The window (`app`) and the static writer (`html`) both consume these.

pub mod home;
pub mod html;
pub mod route;

pub use home::HomePage;
pub use route::Route;

use crate::markdown::{parse_markdown, Block};
use crate::net::content::Post;

pub const BLOG_TITLE: &str = "Ethan's Blog";
pub const BLOG_DESCRIPTION: &str = "Ethan Zhang's personal blog about coding and technology.";
pub const BLOG_INTRO: &str = "Welcome to my blog! Here you'll find posts about my coding journey, \
    projects, and thoughts on technology. Feel free to explore and check back for new updates.";
pub const BLOG_NOTE: &str = "Note: Posts may take a long time to load";
pub const NO_POSTS: &str = "No posts found.";

/// A labelled link to another route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub route: Route,
}

impl NavLink {
    pub fn new(label: &str, route: Route) -> Self {
        Self {
            label: label.to_string(),
            route,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub route: Route,
    pub byline: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub title: String,
    pub intro: String,
    pub note: String,
    pub entries: Vec<ListingEntry>,
    pub back: NavLink,
}

impl ListingPage {
    pub fn new(posts: &[Post]) -> Self {
        Self {
            title: BLOG_TITLE.to_string(),
            intro: BLOG_INTRO.to_string(),
            note: BLOG_NOTE.to_string(),
            entries: posts
                .iter()
                .map(|p| ListingEntry {
                    title: p.title.clone(),
                    route: Route::Post(p.slug.clone()),
                    byline: p.byline(),
                })
                .collect(),
            back: NavLink::new("← Back to Home", Route::Home),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub title: String,
    pub byline: String,
    pub blocks: Vec<Block>,
    pub back: NavLink,
}

impl PostPage {
    pub fn new(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            byline: post.byline(),
            blocks: parse_markdown(&post.content),
            back: NavLink::new("← See all Blogs", Route::Blog),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home(HomePage),
    Listing(ListingPage),
    Post(PostPage),
    NotFound { path: String },
}

impl Page {
    /// Window / document title.
    pub fn title(&self) -> String {
        match self {
            Page::Home(_) => "Ethan Zhang".to_string(),
            Page::Listing(l) => l.title.clone(),
            Page::Post(p) if p.title.is_empty() => "Blog Post".to_string(),
            Page::Post(p) => p.title.clone(),
            Page::NotFound { .. } => "Not found".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Page::NotFound { .. })
    }
}
