use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes escaped inside one path segment. `/` is included so a slug stays one segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A site path, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Blog,
    Post(String),
    Unknown(String),
}

impl Route {
    /// `/` → Home, `/blog` → Blog, `/blog/{slug}` → Post. A trailing slash,
    /// a query string or a fragment is ignored.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        let bare = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .trim_end_matches('/');
        let segments: Vec<&str> = bare.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["blog"] => Route::Blog,
            ["blog", slug] => Route::Post(decode(slug)),
            _ => Route::Unknown(trimmed.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Blog => "/blog".to_string(),
            Route::Post(slug) => format!("/blog/{}", utf8_percent_encode(slug, SEGMENT)),
            Route::Unknown(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_site_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/blog"), Route::Blog);
        assert_eq!(Route::parse("/blog/"), Route::Blog);
        assert_eq!(Route::parse("/blog/hello-world"), Route::Post("hello-world".into()));
        assert_eq!(Route::parse("/blog/hello-world/?ref=x"), Route::Post("hello-world".into()));
        assert_eq!(Route::parse("/blog/a/b"), Route::Unknown("/blog/a/b".into()));
        assert_eq!(Route::parse("/about"), Route::Unknown("/about".into()));
    }

    #[test]
    fn slugs_are_percent_decoded() {
        assert_eq!(Route::parse("/blog/caf%C3%A9"), Route::Post("café".into()));
    }

    #[test]
    fn plus_is_not_a_space_in_paths() {
        assert_eq!(Route::parse("/blog/c++"), Route::Post("c++".into()));
    }

    #[test]
    fn paths_round_trip() {
        for path in ["/", "/blog", "/blog/x", "/blog/a%2Fb", "/blog/a%20b", "/blog/caf%C3%A9"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }

    #[test]
    fn slugs_with_reserved_characters_survive_a_trip_through_the_path() {
        for slug in ["a/b", "50% off", "what?", "c++", "#1"] {
            let route = Route::Post(slug.into());
            assert_eq!(Route::parse(&route.path()), route, "{}", slug);
        }
    }
}
