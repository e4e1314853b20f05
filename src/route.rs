use crate::error::{Result, TrackError};

const REPOSITORY_PREFIX: &str = "/repository/";

/// A screen address. The repository identifier travels percent-encoded as a
/// single path segment, so "owner/repo" becomes "owner%2Frepo".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    TrackedList,
    Repository(String),
}

impl Route {
    pub fn repository(identifier: &str) -> Self {
        Route::Repository(urlencoding::encode(identifier).into_owned())
    }

    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() || path == "/" {
            return Ok(Route::TrackedList);
        }
        match path.strip_prefix(REPOSITORY_PREFIX) {
            Some(segment) if !segment.is_empty() && !segment.contains('/') => {
                Ok(Route::Repository(segment.to_string()))
            }
            _ => Err(TrackError::Route(path.to_string())),
        }
    }

    /// The decoded repository identifier, if this route names one.
    pub fn identifier(&self) -> Result<Option<String>> {
        match self {
            Route::TrackedList => Ok(None),
            Route::Repository(segment) => decode_segment(segment).map(Some),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::TrackedList => "/".to_string(),
            Route::Repository(segment) => format!("{}{}", REPOSITORY_PREFIX, segment),
        }
    }
}

/// Percent-decode a route segment back into an "owner/repo" identifier.
pub fn decode_segment(segment: &str) -> Result<String> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| TrackError::Route(format!("{}: {}", segment, e)))
}
