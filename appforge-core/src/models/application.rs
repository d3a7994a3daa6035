//! Deployed application details.

use serde::{Deserialize, Serialize};

/// Details of a deployed application, fetched once after publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetails {
    /// Key of the application.
    pub app_key: String,
    /// Display name assigned by the generator.
    #[serde(default)]
    pub name: Option<String>,
    /// Path component of the live application URL.
    #[serde(default)]
    pub url_path: Option<String>,
}

impl ApplicationDetails {
    /// Returns the URL path, treating an empty string as absent.
    pub fn url_path(&self) -> Option<&str> {
        self.url_path.as_deref().filter(|path| !path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_details() {
        let json = r#"{ "appKey": "app-456", "name": "Todo Tracker", "urlPath": "/p/todo-tracker" }"#;

        let details: ApplicationDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.url_path(), Some("/p/todo-tracker"));
    }

    #[test]
    fn test_missing_url_path() {
        let json = r#"{ "appKey": "app-456" }"#;

        let details: ApplicationDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.url_path(), None);
    }

    #[test]
    fn test_empty_url_path_is_absent() {
        let json = r#"{ "appKey": "app-456", "urlPath": "" }"#;

        let details: ApplicationDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.url_path(), None);
    }
}
