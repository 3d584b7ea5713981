use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{AssetError, ContentError};

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Blocking client used for every request the site makes.
pub fn http_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// GET a URL and return the body as text. Non-2xx answers are errors.
pub fn fetch_json(client: &reqwest::blocking::Client, url: &Url) -> Result<String, ContentError> {
    log::debug!("GET {}", url);

    let response = client
        .get(url.as_str())
        .header("Accept", "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(ContentError::Status {
            status: response.status().as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response.text()?)
}

/// Where static assets (images, models) live: a web origin or a local directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    Remote(Url),
    Local(PathBuf),
}

impl AssetSource {
    /// `http(s)://…` is treated as a remote origin, anything else as a directory.
    pub fn parse(base: &str) -> Self {
        if base.starts_with("http://") || base.starts_with("https://") {
            let with_slash = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{}/", base)
            };
            if let Ok(url) = Url::parse(&with_slash) {
                return AssetSource::Remote(url);
            }
        }
        AssetSource::Local(PathBuf::from(base))
    }

    /// Resolve a site-relative asset path (`/objects/duckie.glb` or
    /// `objects/duckie.glb`) into a printable location.
    pub fn locate(&self, path: &str) -> String {
        let rel = path.trim_start_matches('/');
        match self {
            AssetSource::Remote(base) => base
                .join(rel)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{}{}", base, rel)),
            AssetSource::Local(dir) => dir.join(rel).display().to_string(),
        }
    }

    /// Read an asset's raw bytes. Absolute `http(s)` paths bypass the base.
    pub fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return fetch_bytes(path);
        }
        match self {
            AssetSource::Remote(_) => fetch_bytes(&self.locate(path)),
            AssetSource::Local(dir) => Ok(std::fs::read(dir.join(path.trim_start_matches('/')))?),
        }
    }
}

fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    let response = http_client()?.get(url).send()?;
    let status = response.status().as_u16();
    if !response.status().is_success() {
        return Err(AssetError::Status {
            status,
            url: url.to_string(),
        });
    }
    Ok(response.bytes()?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_source_joins_relative_paths() {
        let src = AssetSource::parse("https://cdn.example.com/site");
        assert_eq!(
            src.locate("/objects/duckie.glb"),
            "https://cdn.example.com/site/objects/duckie.glb"
        );
    }

    #[test]
    fn bare_path_is_local() {
        let src = AssetSource::parse("public");
        assert_eq!(src, AssetSource::Local(PathBuf::from("public")));
        assert!(src.locate("/objects/earth.glb").ends_with("objects/earth.glb"));
    }

    #[test]
    fn local_read_of_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = AssetSource::Local(dir.path().to_path_buf());
        assert!(matches!(src.read("objects/nope.glb"), Err(AssetError::Io(_))));
    }

    #[test]
    fn local_read_returns_bytes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bin"), [1u8, 2, 3]).unwrap();
        let src = AssetSource::Local(dir.path().to_path_buf());
        assert_eq!(src.read("/a.bin").unwrap(), vec![1, 2, 3]);
    }
}
