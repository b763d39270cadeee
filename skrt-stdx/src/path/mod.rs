mod expand;

pub use expand::Expand;

use path_clean::PathClean;
use std::path::{Path, PathBuf};

pub trait PathExt {
	/// Final component of the path as an owned string, or an empty string
	/// for paths such as `/` or `..` that have none.
	fn entity_name(&self) -> String;
	fn is_hidden(&self) -> bool;
	fn starts_with_char(&self, c: char) -> bool;
	fn normalize(&self) -> PathBuf;
}

impl<T: AsRef<Path>> PathExt for T {
	fn entity_name(&self) -> String {
		self.as_ref()
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default()
	}

	fn is_hidden(&self) -> bool {
		self.starts_with_char('.')
	}

	fn starts_with_char(&self, c: char) -> bool {
		self.as_ref()
			.file_name()
			.is_some_and(|name| name.to_string_lossy().starts_with(c))
	}

	fn normalize(&self) -> PathBuf {
		self.as_ref().clean()
	}
}
