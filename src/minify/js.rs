/*!
# HTMLPress: JavaScript Minifiers
*/

use crate::{
	JsMinifier,
	JsOptions,
	PressError,
};
use std::{
	fs,
	io::Write,
	path::{
		Path,
		PathBuf,
	},
	process::Command,
	sync::Arc,
};
use super::find_program;
use tempfile::NamedTempFile;



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # No-Op Minifier.
///
/// This is what you get when no real minifier is wanted, or none could be
/// found. Scripts pass through untouched and nothing is cached.
pub struct PassthroughMinifier {
	/// # Standing in for a Missing Tool?
	fallback: bool,
}

impl PassthroughMinifier {
	#[must_use]
	/// # Fallback.
	///
	/// A passthrough used because the real minifier couldn't be found.
	/// Documents pressed with one of these are not cached.
	pub const fn fallback() -> Self { Self { fallback: true } }
}

impl JsMinifier for PassthroughMinifier {
	#[inline]
	fn minify(&self, src: &str, _options: &JsOptions) -> Result<String, PressError> {
		Ok(src.to_owned())
	}

	#[inline]
	fn fingerprint(&self) -> String { "passthrough".to_owned() }

	#[inline]
	fn is_passthrough(&self) -> bool { true }

	#[inline]
	fn is_fallback(&self) -> bool { self.fallback }
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Terser.
///
/// This shells out to the `terser` CLI, feeding it the script and options by
/// way of temporary files.
pub struct Terser {
	/// # Binary Path.
	bin: PathBuf,
}

impl Terser {
	#[must_use]
	/// # New.
	pub fn new<P: Into<PathBuf>>(bin: P) -> Self { Self { bin: bin.into() } }

	#[must_use]
	/// # Locate.
	///
	/// Use the explicit path if given (and it exists), otherwise look for
	/// `terser` in `$PATH`.
	pub fn locate(explicit: Option<&Path>) -> Option<Self> {
		find_program(explicit, "terser").map(Self::new)
	}

	/// # Config.
	///
	/// Compress and mangle, with the user's map layered over top.
	fn config(options: &JsOptions) -> serde_json::Value {
		let mut out = JsOptions::new();
		out.insert("compress".to_owned(), serde_json::Value::Object(JsOptions::new()));
		out.insert("mangle".to_owned(), serde_json::Value::Bool(true));
		for (k, v) in options { out.insert(k.clone(), v.clone()); }
		serde_json::Value::Object(out)
	}

	/// # Run Terser.
	fn run(&self, src: &str, options: &JsOptions) -> Result<String, PressError> {
		if ! self.bin.is_file() {
			return Err(PressError::ToolMissing {
				tool: "terser",
				path: self.bin.clone(),
				hint: "Install it with `npm install terser`, or drop `js_minifier` from the configuration.",
			});
		}

		let mut input = tempfile::Builder::new()
			.prefix("htmlpress-")
			.suffix(".js")
			.tempfile()?;
		input.write_all(src.as_bytes())?;
		input.flush()?;

		let mut config = tempfile::Builder::new()
			.prefix("htmlpress-")
			.suffix(".json")
			.tempfile()?;
		serde_json::to_writer(&mut config, &Self::config(options))
			.map_err(|e| PressError::Config(e.to_string()))?;
		config.flush()?;

		let output = NamedTempFile::new()?;
		let res = Command::new(&self.bin)
			.arg(input.path())
			.arg("--config-file")
			.arg(config.path())
			.arg("--output")
			.arg(output.path())
			.output()?;

		if ! res.status.success() {
			return Err(PressError::JsMinify {
				message: String::from_utf8_lossy(&res.stderr).trim().to_owned(),
				source: src.to_owned(),
			});
		}

		Ok(fs::read_to_string(output.path())?)
	}
}

impl JsMinifier for Terser {
	/// # Minify.
	///
	/// Whatever goes wrong, the error comes back as
	/// [`PressError::JsMinify`] with the script attached.
	fn minify(&self, src: &str, options: &JsOptions) -> Result<String, PressError> {
		self.run(src, options).map_err(|e| match e {
			PressError::JsMinify { .. } => e,
			e => PressError::JsMinify {
				message: e.to_string(),
				source: src.to_owned(),
			},
		})
	}

	fn fingerprint(&self) -> String { format!("terser:{}", self.bin.display()) }
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # JavaScript Engine.
///
/// The minifier is chosen once, when the options are built.
pub enum JsEngine {
	/// # Use Terser if Installed.
	Auto,

	/// # Require Terser.
	Terser,

	/// # Never Minify.
	None,
}

impl JsEngine {
	/// # Probe.
	///
	/// Resolve the engine into an actual minifier. `Auto` quietly falls back
	/// to [`PassthroughMinifier::fallback`] if Terser can't be found.
	///
	/// ## Errors
	///
	/// `Terser` is an explicit request, so if it can't be found that's a
	/// configuration error.
	pub fn resolve(self, explicit: Option<&Path>) -> Result<Arc<dyn JsMinifier>, PressError> {
		match self {
			Self::Auto => {
				let out: Arc<dyn JsMinifier> = match Terser::locate(explicit) {
					Some(t) => Arc::new(t),
					None => Arc::new(PassthroughMinifier::fallback()),
				};
				Ok(out)
			},
			Self::Terser => match Terser::locate(explicit) {
				Some(t) => Ok(Arc::new(t)),
				None => Err(PressError::Config(
					"The terser binary could not be found; install it or set `terser` to its path.".to_owned()
				)),
			},
			Self::None => Ok(Arc::new(PassthroughMinifier::default())),
		}
	}
}
