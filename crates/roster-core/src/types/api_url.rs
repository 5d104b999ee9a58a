//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::{RecordId, Resource};
use crate::error::{Error, InvalidInputError};

/// A validated API base URL.
///
/// The URL must be absolute and use HTTPS (HTTP is allowed for localhost).
/// A base path such as `/api/v1` is kept; resource paths are appended to it.
///
/// # Example
///
/// ```
/// use roster_core::{ApiUrl, RecordId, Resource};
///
/// let api = ApiUrl::new("https://hr.example.com/api/").unwrap();
/// assert_eq!(api.resource_url(Resource::Employees), "https://hr.example.com/api/employees");
///
/// let id = RecordId::new("abc123").unwrap();
/// assert_eq!(api.record_url(Resource::Vehicles, &id), "https://hr.example.com/api/vehicles/abc123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the URL for an arbitrary endpoint path under the base.
    pub fn endpoint_url(&self, path: &str) -> String {
        // The url crate always keeps a trailing slash on root paths.
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// Returns the collection URL for a resource.
    pub fn resource_url(&self, resource: Resource) -> String {
        self.endpoint_url(resource.path())
    }

    /// Returns the URL of a single record.
    ///
    /// The id is percent-encoded as one path segment.
    pub fn record_url(&self, resource: Resource, id: &RecordId) -> String {
        let mut url = self.0.clone();
        // Never fails: cannot-be-a-base URLs are rejected on construction.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(resource.path())
                .push(id.as_str());
        }
        url.into()
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let api = ApiUrl::new("https://hr.example.com").unwrap();
        assert_eq!(api.host(), Some("hr.example.com"));
    }

    #[test]
    fn valid_localhost_http() {
        let api = ApiUrl::new("http://localhost:5000").unwrap();
        assert_eq!(api.host(), Some("localhost"));
    }

    #[test]
    fn keeps_base_path() {
        let api = ApiUrl::new("https://hr.example.com/api/v1").unwrap();
        assert_eq!(
            api.endpoint_url("auth/login"),
            "https://hr.example.com/api/v1/auth/login"
        );
    }

    #[test]
    fn normalizes_trailing_slash() {
        let api = ApiUrl::new("https://hr.example.com/").unwrap();
        assert_eq!(
            api.resource_url(Resource::Departments),
            "https://hr.example.com/departments"
        );
    }

    #[test]
    fn record_url_encodes_the_id() {
        let api = ApiUrl::new("https://hr.example.com/api/").unwrap();
        let id = RecordId::new("a%2Fb").unwrap();
        assert_eq!(
            api.record_url(Resource::Employees, &id),
            "https://hr.example.com/api/employees/a%252Fb"
        );

        let root = ApiUrl::new("https://hr.example.com").unwrap();
        let id = RecordId::new("12").unwrap();
        assert_eq!(
            root.record_url(Resource::NextOfKin, &id),
            "https://hr.example.com/nextofkin/12"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ApiUrl::new("http://hr.example.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ApiUrl::new("/employees").is_err());
    }
}
