use serde::Serialize;

use crate::prelude::*;

/// Whether a notice reports a success or a failure
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
	/// The action went through
	Success,
	/// The action failed
	Error,
}

/// A short message shown to the user after an action
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
	/// Whether the action succeeded
	pub kind: NoticeKind,
	/// The message to show
	pub message: String,
}

impl Notice {
	/// A success notice
	pub fn success(message: impl Into<String>) -> Self {
		Self {
			kind: NoticeKind::Success,
			message: message.into(),
		}
	}

	/// An error notice
	pub fn error(message: impl Into<String>) -> Self {
		Self {
			kind: NoticeKind::Error,
			message: message.into(),
		}
	}
}

impl From<&ApiErrorResponse> for Notice {
	fn from(error: &ApiErrorResponse) -> Self {
		Self::error(error.message())
	}
}

/// The notices waiting to be seen. Each one can be dismissed on its own.
#[derive(Debug, Clone, Default)]
pub struct Notices {
	/// The notices with the ids they were given
	entries: Vec<(u64, Notice)>,
	/// The id of the next notice
	next_id: u64,
}

impl Notices {
	/// Adds a notice and returns its id
	pub fn push(&mut self, notice: Notice) -> u64 {
		let id = self.next_id;
		self.next_id += 1;
		self.entries.push((id, notice));
		id
	}

	/// Removes a notice. Returns false if it was already gone.
	pub fn dismiss(&mut self, id: u64) -> bool {
		let before = self.entries.len();
		self.entries.retain(|(entry, _)| *entry != id);
		self.entries.len() != before
	}

	/// Removes and returns every notice, oldest first
	pub fn drain(&mut self) -> Vec<Notice> {
		self.entries.drain(..).map(|(_, notice)| notice).collect()
	}

	/// The notices waiting, oldest first
	pub fn iter(&self) -> impl Iterator<Item = &Notice> {
		self.entries.iter().map(|(_, notice)| notice)
	}

	/// The notices waiting with their ids, oldest first
	pub fn entries(&self) -> impl Iterator<Item = (u64, &Notice)> {
		self.entries.iter().map(|(id, notice)| (*id, notice))
	}

	/// The most recent notice
	pub fn last(&self) -> Option<&Notice> {
		self.entries.last().map(|(_, notice)| notice)
	}

	/// Whether there is nothing to show
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn dismissing() {
		let mut notices = Notices::default();
		let first = notices.push(Notice::success("Comment posted"));
		let second = notices.push(Notice::from(&ApiErrorResponse::network_error()));

		assert!(notices.dismiss(first));
		assert!(!notices.dismiss(first));
		assert_eq!(notices.last(), Some(&Notice::error("Network error")));
		assert!(notices.dismiss(second));
		assert!(notices.is_empty());
	}
}
