use std::{ffi::OsStr, path::PathBuf};

pub trait Expand {
	/// Replaces a leading `~` component with the user's home directory.
	/// Paths are returned untouched when no home directory can be found.
	fn expand_user(self) -> PathBuf
	where
		Self: Sized;
}

impl<T: Into<PathBuf>> Expand for T {
	fn expand_user(self) -> PathBuf {
		let path = self.into();
		let mut components = path.components();
		match components.next() {
			Some(first) if first.as_os_str() == OsStr::new("~") => match dirs::home_dir() {
				Some(mut home) => {
					home.extend(components);
					home
				}
				None => path,
			},
			_ => path,
		}
	}
}
