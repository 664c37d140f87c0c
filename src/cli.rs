/*!
# HTMLPress: CLI Errors
*/

use dactyl::traits::NiceInflection;
use htmlpress::PressError;
use std::{
	error::Error,
	fmt,
};



#[derive(Debug)]
/// # CLI Error.
pub(super) enum CliError {
	/// # Bad Options.
	Config(PressError),

	/// # Some Documents Failed.
	Failed(usize),

	/// # Unreadable Path List.
	ListFile,

	/// # Nothing to Do.
	NoDocuments,

	/// # Too Many Documents for the Progress Bar.
	Progress,

	/// # Print Help (Not an Error).
	PrintHelp,

	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for CliError {}

impl fmt::Display for CliError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Config(e) => fmt::Display::fmt(e, f),
			Self::Failed(n) => write!(
				f,
				"{} could not be pressed.",
				n.nice_inflect("document", "documents"),
			),
			_ => f.write_str(self.as_str()),
		}
	}
}

impl From<PressError> for CliError {
	#[inline]
	fn from(src: PressError) -> Self { Self::Config(src) }
}

impl CliError {
	/// # As Str.
	pub(super) const fn as_str(&self) -> &'static str {
		match self {
			Self::Config(_) => "Invalid options.",
			Self::Failed(_) => "Some documents could not be pressed.",
			Self::ListFile => "Unable to read the path list.",
			Self::NoDocuments => "No documents were found.",
			Self::Progress => "Progress can only be displayed for up to 4,294,967,295 files. Try again with fewer files or without the -p/--progress flag.",
			Self::PrintHelp | Self::PrintVersion => "",
		}
	}
}
