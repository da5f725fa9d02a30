use serde::{Deserialize, Serialize};

/// A news/blog entry from GET /news.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl NewsItem {
    /// Preview line for list views: the summary when present, otherwise the
    /// opening of the body.
    pub fn preview(&self) -> &str {
        self.summary
            .as_deref()
            .or(self.content.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_prefers_summary() {
        let json = r#"{"id": 1, "title": "New fleet", "summary": "Short",
                       "content": "Long body"}"#;
        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.preview(), "Short");
    }

    #[test]
    fn test_preview_falls_back_to_content() {
        let json = r#"{"id": 2, "title": "Opening hours", "content": "Long body"}"#;
        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.preview(), "Long body");
    }
}
