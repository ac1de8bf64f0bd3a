use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The id of a comment, assigned by the backend
pub type CommentId = u64;

/// A comment posted on a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
	/// The id of the comment
	pub id: CommentId,
	/// The id of the page the comment belongs to
	pub page: String,
	/// The id of the author
	#[serde(default)]
	pub user: Option<Uuid>,
	/// The email of the author
	#[serde(default)]
	pub user_email: Option<String>,
	/// The username of the author
	#[serde(default)]
	pub user_name: Option<String>,
	/// The content of the comment
	pub content: String,
	/// When the comment was posted
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// When the content last changed
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

impl Comment {
	/// Whether the content changed after the comment was posted
	pub fn is_edited(&self) -> bool {
		self.created_at != self.updated_at
	}

	/// The name to show for the author
	pub fn author(&self) -> &str {
		self.user_name
			.as_deref()
			.filter(|name| !name.is_empty())
			.or(self.user_email.as_deref())
			.unwrap_or("Unknown")
	}
}

/// One recorded change of a comment's content. Only superadmins can read
/// revisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRevision {
	/// The id of the revision
	pub id: u64,
	/// The id of the comment that changed
	pub comment: CommentId,
	/// The id of the user who made the change, if they still exist
	#[serde(default)]
	pub modified_by: Option<Uuid>,
	/// The email of the user who made the change
	#[serde(default)]
	pub modified_by_email: Option<String>,
	/// The username of the user who made the change
	#[serde(default)]
	pub modified_by_name: Option<String>,
	/// The content before the change
	pub old_content: String,
	/// The content after the change
	pub new_content: String,
	/// When the change was made
	#[serde(with = "time::serde::rfc3339")]
	pub modified_at: OffsetDateTime,
}

impl CommentRevision {
	/// The name to show for the user who made the change
	pub fn modified_by_display(&self) -> &str {
		self.modified_by_name
			.as_deref()
			.filter(|name| !name.is_empty())
			.or(self.modified_by_email.as_deref())
			.unwrap_or("Deleted user")
	}
}

#[cfg(test)]
mod test {
	use serde_json::json;
	use time::macros::datetime;

	use super::{Comment, CommentRevision};

	#[test]
	fn parses_backend_comment() {
		let comment: Comment = serde_json::from_value(json!({
			"id": 7,
			"page": "products",
			"user": "0b0c3bf6-1c4b-4d6c-9a44-6f1d0ab1d2a1",
			"user_email": "a@x.com",
			"user_name": "alice",
			"content": "Restock soon",
			"created_at": "2024-05-01T10:20:30.123456Z",
			"updated_at": "2024-05-01T10:20:30.123456Z"
		}))
		.unwrap();

		assert_eq!(comment.id, 7);
		assert_eq!(comment.author(), "alice");
		assert!(!comment.is_edited());
		assert_eq!(comment.created_at, datetime!(2024-05-01 10:20:30.123456 UTC));
	}

	#[test]
	fn edited_and_author_fallback() {
		let comment = Comment {
			id: 1,
			page: "orders".to_string(),
			user: None,
			user_email: Some("b@x.com".to_string()),
			user_name: Some(String::new()),
			content: "x".to_string(),
			created_at: datetime!(2024-05-01 10:00 UTC),
			updated_at: datetime!(2024-05-01 11:00 UTC),
		};
		assert!(comment.is_edited());
		assert_eq!(comment.author(), "b@x.com");
	}

	#[test]
	fn parses_revision_of_deleted_user() {
		let revision: CommentRevision = serde_json::from_value(json!({
			"id": 3,
			"comment": 7,
			"modified_by": null,
			"old_content": "a",
			"new_content": "b",
			"modified_at": "2024-05-02T08:00:00Z"
		}))
		.unwrap();
		assert_eq!(revision.modified_by_display(), "Deleted user");
		assert_eq!(revision.new_content, "b");
	}
}
