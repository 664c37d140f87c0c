/*!
# HTMLPress: Options

[`PressOptions`] is the validated, ready-to-use configuration handed to
[`press`](crate::press). It can be built directly, or deserialized from a
loose TOML table as [`RawOptions`] and converted.
*/

use crate::{
	Cache,
	CacheKeyPolicy,
	CssMinifier,
	JsEngine,
	JsMinifier,
	JsOptions,
	LightningCss,
	MissingToolPolicy,
	PassthroughMinifier,
	PressError,
};
use fyi_msg::Msg;
use serde::Deserialize;
use std::{
	fmt,
	fs,
	path::{
		Path,
		PathBuf,
	},
	sync::Arc,
};



/// # Current Options Version.
pub const OPTIONS_VERSION: u32 = 2;



/// # Logger.
///
/// Fatal errors are reported here right before they're returned. Warnings
/// (deprecations, missing optional tools) default to STDERR.
pub trait Logger: fmt::Debug + Send + Sync {
	/// # Error.
	fn error(&self, msg: &str);

	/// # Warning.
	fn warn(&self, msg: &str) { Msg::warning(msg).with_newline(true).eprint(); }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # STDERR Logger.
pub struct StderrLogger;

impl Logger for StderrLogger {
	fn error(&self, msg: &str) { Msg::error(msg).with_newline(true).eprint(); }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Silent Logger.
pub struct SilentLogger;

impl Logger for SilentLogger {
	fn error(&self, _msg: &str) {}
	fn warn(&self, _msg: &str) {}
}



#[derive(Debug, Clone)]
/// # Press Options.
///
/// By default scripts pass through unminified, styles are sent to the
/// `lightningcss` found in `$PATH` (failing if there isn't one), nothing is
/// cached, and the indent is two spaces.
pub struct PressOptions {
	/// # Logger.
	logger: Option<Arc<dyn Logger>>,

	/// # Unquote Attribute Values.
	unquoted_attributes: bool,

	/// # Drop Empty Attribute Values.
	drop_empty_values: bool,

	/// # Join Lines.
	strip_crlf: bool,

	/// # Indent Unit.
	indent: String,

	/// # JS Minifier.
	js_minifier: Arc<dyn JsMinifier>,

	/// # JS Minifier Options.
	js_minifier_options: JsOptions,

	/// # CSS Minifier.
	css_minifier: Option<Arc<dyn CssMinifier>>,

	/// # Missing CSS Tool Policy.
	css_missing: MissingToolPolicy,

	/// # Cache.
	cache: Option<Cache>,
}

impl Default for PressOptions {
	fn default() -> Self {
		Self {
			logger: None,
			unquoted_attributes: false,
			drop_empty_values: false,
			strip_crlf: false,
			indent: "  ".to_owned(),
			js_minifier: Arc::new(PassthroughMinifier::default()),
			js_minifier_options: JsOptions::new(),
			css_minifier: Some(Arc::new(LightningCss::locate(None))),
			css_missing: MissingToolPolicy::Fail,
			cache: None,
		}
	}
}

/// # Builders.
impl PressOptions {
	#[must_use]
	/// # With Logger.
	pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
		self.logger = Some(logger);
		self
	}

	#[must_use]
	/// # With Unquoted Attributes.
	///
	/// Strip the quotes from attribute values that don't need them.
	pub const fn with_unquoted_attributes(mut self, on: bool) -> Self {
		self.unquoted_attributes = on;
		self
	}

	#[must_use]
	/// # With Dropped Empty Values.
	///
	/// Reduce `name=""` to `name`.
	pub const fn with_drop_empty_values(mut self, on: bool) -> Self {
		self.drop_empty_values = on;
		self
	}

	#[must_use]
	/// # With Stripped Line Breaks.
	///
	/// Join everything onto as few lines as possible instead of reindenting.
	pub const fn with_strip_crlf(mut self, on: bool) -> Self {
		self.strip_crlf = on;
		self
	}

	#[must_use]
	/// # With Indent.
	///
	/// Set the indentation unit to this many spaces.
	pub fn with_indent(mut self, spaces: usize) -> Self {
		self.indent = " ".repeat(spaces);
		self
	}

	#[must_use]
	/// # With JS Minifier.
	pub fn with_js_minifier(mut self, minifier: Arc<dyn JsMinifier>) -> Self {
		self.js_minifier = minifier;
		self
	}

	#[must_use]
	/// # With JS Minifier Options.
	pub fn with_js_minifier_options(mut self, options: JsOptions) -> Self {
		self.js_minifier_options = options;
		self
	}

	#[must_use]
	/// # With CSS Minifier.
	pub fn with_css_minifier(mut self, minifier: Arc<dyn CssMinifier>) -> Self {
		self.css_minifier = Some(minifier);
		self
	}

	#[must_use]
	/// # Without CSS Minifier.
	///
	/// Leave inline styles exactly as they are.
	pub fn without_css_minifier(mut self) -> Self {
		self.css_minifier = None;
		self
	}

	#[must_use]
	/// # With Missing CSS Tool Policy.
	pub const fn with_css_missing(mut self, policy: MissingToolPolicy) -> Self {
		self.css_missing = policy;
		self
	}

	#[must_use]
	/// # With Cache Directory.
	pub fn with_cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
		let policy = self.cache.as_ref().map_or_else(CacheKeyPolicy::default, Cache::policy);
		self.cache = Some(Cache::new(dir).with_policy(policy));
		self
	}

	#[must_use]
	/// # With Cache.
	pub fn with_cache(mut self, cache: Cache) -> Self {
		self.cache = Some(cache);
		self
	}
}

/// # Getters.
impl PressOptions {
	#[must_use]
	/// # Logger.
	pub fn logger(&self) -> Option<&dyn Logger> { self.logger.as_deref() }

	#[must_use]
	/// # Unquoted Attributes?
	pub const fn unquoted_attributes(&self) -> bool { self.unquoted_attributes }

	#[must_use]
	/// # Drop Empty Values?
	pub const fn drop_empty_values(&self) -> bool { self.drop_empty_values }

	#[must_use]
	/// # Strip Line Breaks?
	pub const fn strip_crlf(&self) -> bool { self.strip_crlf }

	#[must_use]
	/// # Indent Unit.
	pub fn indent(&self) -> &str { &self.indent }

	#[must_use]
	/// # JS Minifier.
	pub fn js_minifier(&self) -> &dyn JsMinifier { self.js_minifier.as_ref() }

	#[must_use]
	/// # JS Minifier Options.
	pub const fn js_minifier_options(&self) -> &JsOptions { &self.js_minifier_options }

	#[must_use]
	/// # CSS Minifier.
	pub fn css_minifier(&self) -> Option<&dyn CssMinifier> { self.css_minifier.as_deref() }

	#[must_use]
	/// # Missing CSS Tool Policy.
	pub const fn css_missing(&self) -> MissingToolPolicy { self.css_missing }

	#[must_use]
	/// # Cache.
	pub const fn cache(&self) -> Option<&Cache> { self.cache.as_ref() }

	#[must_use]
	/// # Fingerprint.
	///
	/// Everything that affects the output of a press, flattened into a
	/// string. This only matters for the content-and-config cache policy.
	pub fn fingerprint(&self) -> String {
		format!(
			"v{OPTIONS_VERSION}|{}|{}|{}|{:?}|{}|{}",
			self.unquoted_attributes,
			self.drop_empty_values,
			self.strip_crlf,
			self.indent,
			crate::minify::js_fingerprint(self),
			self.css_minifier.as_ref().map_or_else(String::new, |c| c.fingerprint()),
		)
	}

	/// # Warn.
	///
	/// Send a warning to the logger, or STDERR if there isn't one.
	pub(crate) fn warn(&self, msg: &str) {
		if let Some(logger) = self.logger() { logger.warn(msg); }
		else { StderrLogger.warn(msg); }
	}
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
/// # JS Engine Choice.
pub enum JsChoice {
	#[default]
	/// # Terser if Found.
	Auto,

	/// # Terser or Bust.
	Terser,

	/// # No Minification.
	None,
}

impl From<JsChoice> for JsEngine {
	fn from(src: JsChoice) -> Self {
		match src {
			JsChoice::Auto => Self::Auto,
			JsChoice::Terser => Self::Terser,
			JsChoice::None => Self::None,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
/// # CSS Engine Choice.
pub enum CssChoice {
	/// # No Minification.
	None,

	#[default]
	/// # Lightning CSS.
	Lightningcss,
}



#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// # Raw Options.
///
/// This is the loose, serializable form of [`PressOptions`], as read from a
/// TOML file. Unknown keys are rejected. The pre-`2` key `dump_empty_values`
/// is still understood, but triggers a deprecation warning.
pub struct RawOptions {
	/// # Format Version.
	pub version: Option<u32>,

	/// # Logger Name.
	///
	/// One of `stderr` or `silent`.
	pub logger: Option<String>,

	/// # Unquote Attribute Values.
	pub unquoted_attributes: bool,

	/// # Drop Empty Attribute Values.
	pub drop_empty_values: Option<bool>,

	/// # Drop Empty Attribute Values (Deprecated).
	pub dump_empty_values: Option<bool>,

	/// # Join Lines.
	pub strip_crlf: bool,

	/// # Indent Width.
	pub indent: Option<usize>,

	/// # JS Engine.
	pub js_minifier: JsChoice,

	/// # Terser Path.
	pub terser: Option<PathBuf>,

	/// # JS Minifier Options.
	pub js_minifier_options: Option<JsOptions>,

	/// # CSS Engine.
	pub css_minifier: CssChoice,

	/// # Lightning CSS Path.
	pub lightningcss: Option<PathBuf>,

	/// # Lightning CSS Targets.
	pub css_targets: Option<String>,

	/// # Lightning CSS Minify.
	///
	/// Turning this off still bundles and transpiles for the targets.
	pub css_minify: Option<bool>,

	/// # Missing CSS Tool Policy.
	pub css_missing: MissingToolPolicy,

	/// # Cache Directory.
	pub cache_dir: Option<PathBuf>,

	/// # Cache Key Policy.
	pub cache_key: CacheKeyPolicy,
}

impl RawOptions {
	/// # From TOML.
	///
	/// ## Errors
	///
	/// Syntax errors and unknown keys are returned as [`PressError::Config`].
	pub fn from_toml(src: &str) -> Result<Self, PressError> {
		toml::from_str(src).map_err(|e| PressError::Config(e.to_string()))
	}

	/// # From File.
	///
	/// ## Errors
	///
	/// Read errors are passed through; parse errors are as for
	/// [`RawOptions::from_toml`].
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PressError> {
		let raw = fs::read_to_string(path)?;
		Self::from_toml(&raw)
	}

	/// # Migrate.
	///
	/// Bring older configurations up to date, returning any deprecation
	/// notices that should be passed along to the user.
	///
	/// ## Errors
	///
	/// Versions from the future are rejected, as are configurations that
	/// specify both the old and new names for the same key.
	pub fn migrate(&mut self) -> Result<Vec<String>, PressError> {
		let version = self.version.unwrap_or(OPTIONS_VERSION);
		if OPTIONS_VERSION < version {
			return Err(PressError::Config(format!(
				"Unsupported options version {version}; the newest supported is {OPTIONS_VERSION}."
			)));
		}

		let mut notices = Vec::new();
		if let Some(v) = self.dump_empty_values.take() {
			if self.drop_empty_values.is_some() {
				return Err(PressError::Config(
					"Use `drop_empty_values` or `dump_empty_values`, not both.".to_owned()
				));
			}
			self.drop_empty_values = Some(v);
			notices.push("The option `dump_empty_values` is deprecated; use `drop_empty_values` instead.".to_owned());
		}

		self.version = Some(OPTIONS_VERSION);
		Ok(notices)
	}
}

impl TryFrom<RawOptions> for PressOptions {
	type Error = PressError;

	fn try_from(src: RawOptions) -> Result<Self, Self::Error> {
		Self::from_raw(src, None)
	}
}

impl PressOptions {
	/// # From Raw Options (With Logger).
	///
	/// Same as the `TryFrom` conversion, except the logger is supplied
	/// directly instead of named in the configuration. If `logger` is
	/// `Some`, it wins, and will receive any deprecation warnings raised
	/// during migration.
	///
	/// ## Errors
	///
	/// Invalid or unsupported configurations, and explicitly-requested tools
	/// that can't be found, are returned as [`PressError::Config`].
	pub fn from_raw(mut src: RawOptions, logger: Option<Arc<dyn Logger>>)
	-> Result<Self, PressError> {
		let notices = src.migrate()?;

		let logger: Option<Arc<dyn Logger>> = match (logger, src.logger.as_deref()) {
			(Some(logger), _) => Some(logger),
			(None, None) => None,
			(None, Some("stderr")) => Some(Arc::new(StderrLogger)),
			(None, Some("silent")) => Some(Arc::new(SilentLogger)),
			(None, Some(other)) => return Err(PressError::Config(format!(
				"Logger {other:?} has no error method; use \"stderr\" or \"silent\"."
			))),
		};

		let mut out = Self {
			logger,
			unquoted_attributes: src.unquoted_attributes,
			drop_empty_values: src.drop_empty_values.unwrap_or(false),
			strip_crlf: src.strip_crlf,
			js_minifier: JsEngine::from(src.js_minifier).resolve(src.terser.as_deref())?,
			js_minifier_options: src.js_minifier_options.unwrap_or_default(),
			css_missing: src.css_missing,
			cache: src.cache_dir.map(|dir| Cache::new(dir).with_policy(src.cache_key)),
			..Self::default()
		};

		if let Some(spaces) = src.indent { out = out.with_indent(spaces); }

		out.css_minifier = match src.css_minifier {
			CssChoice::None => None,
			CssChoice::Lightningcss => {
				let mut css = LightningCss::locate(src.lightningcss.as_deref());
				if let Some(targets) = src.css_targets { css = css.with_targets(targets); }
				if let Some(minify) = src.css_minify { css = css.with_minify(minify); }
				Some(Arc::new(css))
			},
		};

		for notice in notices { out.warn(&notice); }

		Ok(out)
	}
}
