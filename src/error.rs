/*!
# HTMLPress: Errors
*/

use std::{
	error::Error,
	fmt,
	io,
	path::PathBuf,
};



#[derive(Debug)]
/// # Press Error.
///
/// Every fatal condition bubbles out of [`press`](crate::press) as one of
/// these. There is no partial output on a fatal path.
///
/// Note that a missing JavaScript minifier is _not_ an error; inline scripts
/// simply pass through unchanged.
pub enum PressError {
	/// # Invalid Configuration.
	///
	/// Raised while building [`PressOptions`](crate::PressOptions), before any
	/// document is touched.
	Config(String),

	/// # Cache or Temporary File I/O.
	Io(io::Error),

	/// # JavaScript Minifier Failure.
	JsMinify {
		/// # What Went Wrong.
		message: String,

		/// # The Offending Script.
		source: String,
	},

	/// # CSS Minifier Failure.
	CssMinify {
		/// # What Went Wrong.
		message: String,

		/// # The Offending Stylesheet.
		source: String,
	},

	/// # External Tool Missing.
	ToolMissing {
		/// # Tool Name.
		tool: &'static str,

		/// # Where We Looked.
		path: PathBuf,

		/// # Remediation.
		hint: &'static str,
	},
}

impl fmt::Display for PressError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Config(s) => write!(f, "Invalid options: {s}"),
			Self::Io(e) => write!(f, "I/O error: {e}"),
			Self::JsMinify { message, source } => write!(
				f,
				"JavaScript minification failed: {message}\n---\n{source}\n---",
			),
			Self::CssMinify { message, source } => write!(
				f,
				"CSS minification failed: {message}\n---\n{source}\n---",
			),
			Self::ToolMissing { tool, path, hint } => write!(
				f,
				"{tool} binary not found at: {}\n{hint}",
				path.display(),
			),
		}
	}
}

impl Error for PressError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		if let Self::Io(e) = self { Some(e) }
		else { None }
	}
}

impl From<io::Error> for PressError {
	#[inline]
	fn from(src: io::Error) -> Self { Self::Io(src) }
}

impl PressError {
	#[must_use]
	/// # Is Missing Tool?
	pub const fn is_tool_missing(&self) -> bool {
		matches!(self, Self::ToolMissing { .. })
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_display_carries_source() {
		let err = PressError::JsMinify {
			message: "Unexpected token".to_owned(),
			source: "var = ;".to_owned(),
		};
		let out = err.to_string();
		assert!(out.contains("Unexpected token"));
		assert!(out.contains("var = ;"));
	}

	#[test]
	fn t_tool_missing() {
		let err = PressError::ToolMissing {
			tool: "lightningcss",
			path: PathBuf::from("/nope/lightningcss"),
			hint: "Run `npm install lightningcss-cli`.",
		};
		assert!(err.is_tool_missing());
		let out = err.to_string();
		assert!(out.contains("/nope/lightningcss"));
		assert!(out.contains("npm install"));

		let err = PressError::from(io::Error::from(io::ErrorKind::NotFound));
		assert!(! err.is_tool_missing());
		assert!(err.source().is_some());
	}
}
