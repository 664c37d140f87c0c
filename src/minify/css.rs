/*!
# HTMLPress: CSS Minifiers
*/

use crate::{
	CssMinifier,
	PressError,
};
use serde::Deserialize;
use std::{
	fs,
	io::Write,
	path::{
		Path,
		PathBuf,
	},
	process::Command,
};
use super::find_program;
use tempfile::NamedTempFile;



/// # Default Browser Targets.
pub const DEFAULT_TARGETS: &str = ">= 0.25%";

/// # Installation Hint.
const HINT: &str = "Install it with `npm install lightningcss-cli`, or point `lightningcss` at the binary.";



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
/// # Missing Tool Policy.
///
/// What to do when a CSS minifier is configured but its program is nowhere
/// to be found.
pub enum MissingToolPolicy {
	#[default]
	/// # Abort the Press.
	Fail,

	/// # Warn and Leave the CSS Alone.
	Passthrough,
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Lightning CSS.
///
/// This shells out to the `lightningcss` CLI with `--minify --bundle` and the
/// configured browser targets.
pub struct LightningCss {
	/// # Binary Path.
	bin: PathBuf,

	/// # Browser Targets.
	targets: String,

	/// # Minify?
	minify: bool,
}

impl LightningCss {
	#[must_use]
	/// # New.
	pub fn new<P: Into<PathBuf>>(bin: P) -> Self {
		Self {
			bin: bin.into(),
			targets: DEFAULT_TARGETS.to_owned(),
			minify: true,
		}
	}

	#[must_use]
	/// # Locate.
	///
	/// Use the explicit path if given, otherwise look for `lightningcss` in
	/// `$PATH`. Unlike Terser, a miss still returns an instance; the problem
	/// is reported (per policy) the first time it is actually needed.
	pub fn locate(explicit: Option<&Path>) -> Self {
		find_program(explicit, "lightningcss").map_or_else(
			|| Self::new(explicit.map_or_else(|| PathBuf::from("lightningcss"), Path::to_path_buf)),
			Self::new,
		)
	}

	#[must_use]
	/// # With Targets.
	pub fn with_targets<S: Into<String>>(mut self, targets: S) -> Self {
		self.targets = targets.into();
		self
	}

	#[must_use]
	/// # With Minify.
	///
	/// Disabling this still bundles and transpiles for the targets.
	pub const fn with_minify(mut self, minify: bool) -> Self {
		self.minify = minify;
		self
	}

	#[must_use]
	/// # Binary Path.
	pub fn bin(&self) -> &Path { &self.bin }

	/// # Run Lightning CSS.
	fn run(&self, src: &str) -> Result<String, PressError> {
		if ! self.bin.is_file() {
			return Err(PressError::ToolMissing {
				tool: "lightningcss",
				path: self.bin.clone(),
				hint: HINT,
			});
		}

		let mut input = tempfile::Builder::new()
			.prefix("htmlpress-")
			.suffix(".css")
			.tempfile()?;
		input.write_all(src.as_bytes())?;
		input.flush()?;
		let output = NamedTempFile::new()?;

		let mut cmd = Command::new(&self.bin);
		if self.minify { cmd.arg("--minify"); }
		let res = cmd.arg("--bundle")
			.arg("--targets")
			.arg(&self.targets)
			.arg(input.path())
			.arg("-o")
			.arg(output.path())
			.output()?;

		if ! res.status.success() {
			return Err(PressError::CssMinify {
				message: String::from_utf8_lossy(&res.stderr).trim().to_owned(),
				source: src.to_owned(),
			});
		}

		Ok(fs::read_to_string(output.path())?)
	}
}

impl CssMinifier for LightningCss {
	/// # Minify.
	///
	/// A missing binary is reported as such so the policy can be applied;
	/// anything else comes back as [`PressError::CssMinify`] with the
	/// stylesheet attached.
	fn minify(&self, src: &str) -> Result<String, PressError> {
		self.run(src).map_err(|e| match e {
			PressError::CssMinify { .. } | PressError::ToolMissing { .. } => e,
			e => PressError::CssMinify {
				message: e.to_string(),
				source: src.to_owned(),
			},
		})
	}

	fn fingerprint(&self) -> String {
		format!("lightningcss:{}|{}|{}", self.bin.display(), self.targets, self.minify)
	}
}
