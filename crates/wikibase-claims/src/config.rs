//! Lookup configuration: API endpoint and the entity request format.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ResolveError;

/// Language used when a caller does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Public Wikidata action API.
pub const API_BASE_ENDPOINT: &str = "https://www.wikidata.org/w/api.php";

/// Action returning full entity documents.
pub const ENTITY_API_ACTION: &str = "wbgetentities";

/// Entity sections requested from the entity API.
pub const ENTITY_PROPS: &str = "labels|claims|info|aliases";

/// Where and how entity documents are looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub api_endpoint: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_endpoint: API_BASE_ENDPOINT.to_string(),
        }
    }
}

impl LookupConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Entity API URL for `ids` with terms in `lang`.
    ///
    /// Several ids are joined with `|`, as the API expects.
    pub fn entity_url(&self, ids: &[&str], lang: &str) -> Result<Url, ResolveError> {
        let ids = ids.join("|");
        let url = Url::parse_with_params(
            &self.api_endpoint,
            &[
                ("action", ENTITY_API_ACTION),
                ("format", "json"),
                ("ids", ids.as_str()),
                ("languages", lang),
                ("props", ENTITY_PROPS),
            ],
        )?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entity_url() {
        let url = LookupConfig::default().entity_url(&["Q42"], "en").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.wikidata.org/w/api.php?action=wbgetentities&format=json&ids=Q42&languages=en&props=labels%7Cclaims%7Cinfo%7Caliases"
        );
    }

    #[test]
    fn test_multiple_ids_are_joined() {
        let url = LookupConfig::default().entity_url(&["Q1", "P31"], "de").unwrap();
        let ids = url.query_pairs().find(|(k, _)| k == "ids").map(|(_, v)| v.into_owned());
        assert_eq!(ids.as_deref(), Some("Q1|P31"));
    }

    #[test]
    fn test_custom_endpoint() {
        let config = LookupConfig::default().with_endpoint("https://test.wikidata.org/w/api.php");
        let url = config.entity_url(&["Q1"], "fr").unwrap();
        assert_eq!(url.host_str(), Some("test.wikidata.org"));

        let bad = LookupConfig::default().with_endpoint("not a url");
        assert!(matches!(bad.entity_url(&["Q1"], "en"), Err(ResolveError::Endpoint(_))));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: LookupConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LookupConfig::default());
        assert_eq!(config.api_endpoint, API_BASE_ENDPOINT);

        let config: LookupConfig =
            serde_json::from_str(r#"{"api_endpoint": "https://test.wikidata.org/w/api.php"}"#).unwrap();
        assert_eq!(config.api_endpoint, "https://test.wikidata.org/w/api.php");
    }
}
