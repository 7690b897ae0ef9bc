use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// 表单校验失败时展示给用户的提示
pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and description are required.";

/// 帖子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>, // None 表示没有正文
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// 由表单内容生成帖子，创建时间取 `now`
    pub fn from_draft(id: i64, draft: PostDraft, now: DateTime<Utc>) -> Self {
        let content = draft.content_or_none();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            content,
            created_at: now,
        }
    }

    /// 正文（空串视为没有正文）
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        check_required(&self.title, &self.description)
    }

    /// 转回表单内容（编辑页预填）
    pub fn to_draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            content: self.content.clone().unwrap_or_default(),
        }
    }
}

/// 表单提交的内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub content: String,
}

impl PostDraft {
    #[allow(dead_code)]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        check_required(&self.title, &self.description)
    }

    fn content_or_none(&self) -> Option<String> {
        if self.content.trim().is_empty() {
            None
        } else {
            Some(self.content.clone())
        }
    }
}

fn check_required(title: &str, description: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(StoreError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_blank_content_is_absent() {
        let post = Post::from_draft(1, PostDraft::new("Title", "Desc", "   "), at(1));
        assert_eq!(post.content, None);
        assert_eq!(post.body(), None);

        let post = Post::from_draft(2, PostDraft::new("Title", "Desc", "body"), at(2));
        assert_eq!(post.body(), Some("body"));
    }

    #[test]
    fn test_validation_requires_title_and_description() {
        assert!(PostDraft::new("Title", "Desc", "").validate().is_ok());
        assert!(matches!(
            PostDraft::new("  ", "Desc", "").validate(),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            PostDraft::new("Title", "", "body").validate(),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_record_field_names() {
        let post = Post::from_draft(
            1_700_000_000_000,
            PostDraft::new("Hello", "World", ""),
            at(1_700_000_000_000),
        );
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["id"], 1_700_000_000_000_i64);
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["description"], "World");
        assert!(json.get("content").is_none());
        assert!(json["createdAt"].as_str().unwrap().starts_with("2023-11-14T22:13:20"));
    }

    #[test]
    fn test_reads_browser_style_record() {
        let raw = r#"[{"id":1700000000000,"title":"t","description":"d","content":"c","createdAt":"2023-11-14T22:13:20.000Z"}]"#;
        let posts: Vec<Post> = serde_json::from_str(raw).unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content.as_deref(), Some("c"));
        assert_eq!(posts[0].created_at, at(1_700_000_000_000));
    }
}
