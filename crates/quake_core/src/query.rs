use std::fmt;

use url::Url;

/// Serialization the feed is asked to respond with.
///
/// Only formats the scanner can read are listed; the feed also offers
/// GeoJSON, CSV and plain text, none of which carry element events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Xml,
}

impl ResponseFormat {
    pub fn as_param(self) -> &'static str {
        match self {
            ResponseFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// The two query parameters sent with every feed request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryParams {
    pub format: ResponseFormat,
    pub min_magnitude: f64,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            format: ResponseFormat::Xml,
            min_magnitude: 5.0,
        }
    }
}

impl QueryParams {
    /// Builds `{base}{endpoint}?format=..&minmagnitude=..`.
    ///
    /// `base` should end with `/` for `endpoint` to be appended rather than
    /// replace the last path segment.
    pub fn to_url(&self, base: &Url, endpoint: &str) -> Result<Url, url::ParseError> {
        let mut url = base.join(endpoint)?;
        url.query_pairs_mut()
            .append_pair("format", self.format.as_param())
            .append_pair("minmagnitude", &self.min_magnitude.to_string());
        Ok(url)
    }
}
