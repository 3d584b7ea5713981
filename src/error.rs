//! Error types shared by the content client, asset loaders and the page pipeline.
//!
//! Public content operations never return these: `ContentClient` logs and
//! falls back to empty values. They exist so the fallible steps underneath can
//! use `?` and so the pipeline can report the one fatal case (no API base).

use thiserror::Error;

/// Failure while talking to the content API.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content API base URL is not configured")]
    MissingApiBase,

    #[error("invalid content URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("content API answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("could not decode content response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure while loading a static asset (image or model).
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("asset {url} answered {status}")]
    Status { status: u16, url: String },

    #[error("could not read asset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("could not decode model: {0}")]
    Model(#[from] gltf::Error),

    #[error("model has no triangle geometry")]
    EmptyModel,
}

/// Failure while building a page.
#[derive(Debug, Error)]
pub enum PageError {
    /// The listing page cannot be built without a content API.
    #[error("[listing] content API base URL is not configured (set CONTENT_API_URL)")]
    MissingApiBase,
}

/// Failure while writing the static site.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error("could not write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
