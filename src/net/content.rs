//! Read-only client for the headless CMS that hosts blog posts.
//!
//! Two endpoints are used:
//!
//! - `GET {base}/api/posts`: every post
//! - `GET {base}/api/posts?filters[slug][$eq]={slug}`: a one-element (or empty) list
//!
//! Failures never reach the caller: they are logged and turned into `None` or
//! an empty list so the page can show its empty state.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::ContentError;
use crate::net::fetch::{fetch_json, http_client};

/// A blog post as served by the content API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    pub slug: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,
    #[serde(default, deserialize_with = "publish_date")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub content: String,
}

impl Post {
    /// Short US-style date, e.g. `1/1/2024`.
    pub fn display_date(&self) -> String {
        match self.publish_date {
            Some(d) => d.format("%-m/%-d/%Y").to_string(),
            None => "Unknown date".to_string(),
        }
    }

    /// "author — date" line shown under titles.
    pub fn byline(&self) -> String {
        format!("{} \u{2014} {}", self.author, self.display_date())
    }
}

/// Records come either flat or wrapped in `{ id, attributes }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Record {
    Nested {
        #[serde(default)]
        id: u64,
        attributes: Post,
    },
    Flat(Post),
}

impl Record {
    fn into_post(self) -> Post {
        match self {
            Record::Nested { id, mut attributes } => {
                if attributes.id == 0 {
                    attributes.id = id;
                }
                attributes
            }
            Record::Flat(post) => post,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
}

fn nullable_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn publish_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.and_then(|s| parse_publish_date(&s)))
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
pub fn parse_publish_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Decode a `{ "data": [...] }` body. Records that are not posts are skipped.
pub fn parse_posts(body: &str) -> Result<Vec<Post>, ContentError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let records = envelope.data.unwrap_or_default();

    let mut posts = Vec::with_capacity(records.len());
    for value in records {
        match serde_json::from_value::<Record>(value) {
            Ok(record) => posts.push(record.into_post()),
            Err(e) => log::warn!("Skipping malformed post record: {}", e),
        }
    }
    Ok(posts)
}

/// HTTP client for the content API.
#[derive(Clone, Debug)]
pub struct ContentClient {
    api_base: Option<String>,
}

impl ContentClient {
    /// A client with no base URL is valid; every fetch through it comes back empty.
    pub fn new(api_base: Option<&str>) -> Self {
        Self {
            api_base: api_base
                .map(|b| b.trim().trim_end_matches('/').to_string())
                .filter(|b| !b.is_empty()),
        }
    }

    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    pub fn has_api_base(&self) -> bool {
        self.api_base.is_some()
    }

    /// `{base}/api/posts`
    pub fn posts_url(&self) -> Result<Url, ContentError> {
        let base = self.api_base.as_deref().ok_or(ContentError::MissingApiBase)?;
        Ok(Url::parse(&format!("{}/api/posts", base))?)
    }

    /// `{base}/api/posts?filters[slug][$eq]={slug}`
    pub fn post_url(&self, slug: &str) -> Result<Url, ContentError> {
        let mut url = self.posts_url()?;
        url.query_pairs_mut().append_pair("filters[slug][$eq]", slug);
        Ok(url)
    }

    /// Every post, or an empty list when anything goes wrong.
    pub fn fetch_all_posts(&self) -> Vec<Post> {
        match self.try_fetch_all_posts() {
            Ok(posts) => {
                log::info!("Fetched {} posts", posts.len());
                posts
            }
            Err(e) => {
                log::error!("Failed to fetch posts: {}", e);
                Vec::new()
            }
        }
    }

    /// The post with `slug`, or `None` when it is missing or the fetch fails.
    pub fn fetch_post(&self, slug: &str) -> Option<Post> {
        match self.try_fetch_post(slug) {
            Ok(post) => post,
            Err(e) => {
                log::error!("Failed to fetch post {:?}: {}", slug, e);
                None
            }
        }
    }

    pub fn try_fetch_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        let url = self.posts_url()?;
        let body = fetch_json(&http_client()?, &url)?;
        parse_posts(&body)
    }

    pub fn try_fetch_post(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let url = self.post_url(slug)?;
        let body = fetch_json(&http_client()?, &url)?;
        Ok(parse_posts(&body)?.into_iter().next())
    }
}
