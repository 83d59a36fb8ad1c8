use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One issue or pull request returned by the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub url: String,
    pub repository_url: String,
    pub number: u64,
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

impl ResultItem {
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .flatten()
            .map(|label| label.name.as_str())
    }
}

/// Raw body of a `search/issues` response. Items are decoded one at a time so
/// a bad record is reported by position instead of failing the whole page.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub incomplete_results: Option<bool>,
    pub items: Vec<serde_json::Value>,
}

impl SearchPage {
    pub fn into_items(self, offset: usize) -> Result<Vec<ResultItem>> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                serde_json::from_value(value).map_err(|e| Error::MalformedItem {
                    index: offset + i,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_optional() {
        let page: SearchPage = serde_json::from_str(
            r#"{"total_count": 2, "items": [
                {"title": "a", "url": "u1", "repository_url": "r", "number": 1},
                {"title": "b", "url": "u2", "repository_url": "r", "number": 2,
                 "labels": [{"name": "bug", "color": "ff0000"}]}
            ]}"#,
        )
        .unwrap();

        let items = page.into_items(0).unwrap();
        assert!(items[0].labels.is_none());
        assert_eq!(items[1].label_names().collect::<Vec<_>>(), vec!["bug"]);
    }

    #[test]
    fn test_missing_repository_url_is_malformed() {
        let page: SearchPage = serde_json::from_str(
            r#"{"items": [
                {"title": "a", "url": "u1", "repository_url": "r", "number": 1},
                {"title": "b", "url": "u2", "number": 2}
            ]}"#,
        )
        .unwrap();

        match page.into_items(100) {
            Err(Error::MalformedItem { index, reason }) => {
                assert_eq!(index, 101);
                assert!(reason.contains("repository_url"));
            }
            other => panic!("expected MalformedItem, got {:?}", other),
        }
    }
}
