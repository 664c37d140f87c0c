/*!
# HTMLPress: Minifier Adapters

Inline scripts and styles are handed off to external tools. This module holds
the strategy traits those tools hide behind, and the two cache-aware adapters
the engine actually calls.
*/

mod css;
mod js;

pub use css::{
	DEFAULT_TARGETS,
	LightningCss,
	MissingToolPolicy,
};
pub use js::{
	JsEngine,
	PassthroughMinifier,
	Terser,
};

use crate::{
	CacheKind,
	PressError,
	PressOptions,
};
use std::{
	fmt,
	path::{
		Path,
		PathBuf,
	},
};



/// # JavaScript Minifier Options.
///
/// These are opaque to the engine and passed straight through to the
/// minifier.
pub type JsOptions = serde_json::Map<String, serde_json::Value>;



/// # JavaScript Minifier.
pub trait JsMinifier: fmt::Debug + Send + Sync {
	/// # Minify.
	///
	/// ## Errors
	///
	/// Implementations should return [`PressError::JsMinify`] with the
	/// offending source attached if the script cannot be minified.
	fn minify(&self, src: &str, options: &JsOptions) -> Result<String, PressError>;

	/// # Fingerprint.
	///
	/// A short, stable description of the tool, mixed into cache keys under
	/// the content-and-config policy.
	fn fingerprint(&self) -> String;

	/// # Passthrough?
	///
	/// Return `true` if this "minifier" doesn't actually do anything, in
	/// which case the cache is bypassed entirely.
	fn is_passthrough(&self) -> bool { false }

	/// # Fallback?
	///
	/// Return `true` if this is standing in for a minifier that couldn't be
	/// found. Documents with scripts left alone for that reason are not
	/// cached, since installing the tool would change the result.
	fn is_fallback(&self) -> bool { false }
}

/// # CSS Minifier.
pub trait CssMinifier: fmt::Debug + Send + Sync {
	/// # Minify.
	///
	/// ## Errors
	///
	/// Implementations should return [`PressError::ToolMissing`] if their
	/// backing program cannot be found, or [`PressError::CssMinify`] if it
	/// fails.
	fn minify(&self, src: &str) -> Result<String, PressError>;

	/// # Fingerprint.
	fn fingerprint(&self) -> String;
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Minified Code.
///
/// The output of a minification step, plus a flag noting whether it came up
/// short because a tool was missing.
pub(crate) struct Minified {
	/// # Code.
	pub(crate) code: String,

	/// # Degraded?
	pub(crate) degraded: bool,
}

impl Minified {
	/// # Complete.
	pub(crate) const fn complete(code: String) -> Self {
		Self { code, degraded: false }
	}

	/// # Degraded.
	pub(crate) const fn degraded(code: String) -> Self {
		Self { code, degraded: true }
	}
}



/// # Minify JavaScript.
///
/// Return the cached result if there is one, otherwise run the configured
/// minifier, strip a single trailing `;`, cache it, and return it.
///
/// If no minifier is available, the source is returned unchanged.
///
/// ## Errors
///
/// Minifier failures and cache I/O errors are returned.
pub fn minify_js(src: &str, opts: &PressOptions) -> Result<String, PressError> {
	js_payload(src, opts).map(|m| m.code)
}

/// # Minify JavaScript (Payload).
///
/// This does the work for [`minify_js`], noting whether the result was
/// degraded by a missing tool.
pub(crate) fn js_payload(src: &str, opts: &PressOptions) -> Result<Minified, PressError> {
	let minifier = opts.js_minifier();
	if minifier.is_passthrough() {
		return Ok(
			if minifier.is_fallback() { Minified::degraded(src.to_owned()) }
			else { Minified::complete(src.to_owned()) }
		);
	}

	let fingerprint = js_fingerprint(opts);
	let cache = opts.cache();
	if let Some(cache) = cache {
		if let Some(hit) = cache.lookup(CacheKind::Js, &fingerprint, src.as_bytes())? {
			return Ok(Minified::complete(hit));
		}
	}

	let mut out = minifier.minify(src, opts.js_minifier_options())?;
	let len = out.trim_end().len();
	out.truncate(len);
	if out.ends_with(';') { out.truncate(len - 1); }

	if let Some(cache) = cache {
		cache.store(CacheKind::Js, &fingerprint, src.as_bytes(), out.as_bytes())?;
	}

	Ok(Minified::complete(out))
}

/// # Minify CSS.
///
/// Return the cached result if there is one, otherwise run the configured
/// minifier, cache the result, and return it.
///
/// If CSS minification has been explicitly turned off, the source is
/// returned unchanged. If the program is missing, what happens depends on
/// the [`MissingToolPolicy`].
///
/// ## Errors
///
/// Minifier failures, missing tools (under the default policy), and cache
/// I/O errors are returned.
pub fn minify_css(src: &str, opts: &PressOptions) -> Result<String, PressError> {
	css_payload(src, opts).map(|m| m.code)
}

/// # Minify CSS (Payload).
///
/// This does the work for [`minify_css`], noting whether the result was
/// degraded by a missing tool.
pub(crate) fn css_payload(src: &str, opts: &PressOptions) -> Result<Minified, PressError> {
	let Some(minifier) = opts.css_minifier() else {
		return Ok(Minified::complete(src.to_owned()));
	};

	let fingerprint = minifier.fingerprint();
	let cache = opts.cache();
	if let Some(cache) = cache {
		if let Some(hit) = cache.lookup(CacheKind::Css, &fingerprint, src.as_bytes())? {
			return Ok(Minified::complete(hit));
		}
	}

	let out = match minifier.minify(src) {
		Ok(out) => out,
		Err(e) if e.is_tool_missing() && matches!(opts.css_missing(), MissingToolPolicy::Passthrough) => {
			opts.warn(&format!("{e}\nInline CSS will not be minified."));
			return Ok(Minified::degraded(src.to_owned()));
		},
		Err(e) => return Err(e),
	};

	if let Some(cache) = cache {
		cache.store(CacheKind::Css, &fingerprint, src.as_bytes(), out.as_bytes())?;
	}

	Ok(Minified::complete(out))
}

/// # JS Cache Fingerprint.
///
/// The tool plus its options. (Map keys are sorted, so this is stable.)
pub(crate) fn js_fingerprint(opts: &PressOptions) -> String {
	format!(
		"{}|{}",
		opts.js_minifier().fingerprint(),
		serde_json::Value::Object(opts.js_minifier_options().clone()),
	)
}



/// # Find Program.
///
/// Return `explicit` if it is a file, otherwise search `$PATH` for `name`.
pub(crate) fn find_program(explicit: Option<&Path>, name: &str) -> Option<PathBuf> {
	if let Some(path) = explicit {
		return Some(path.to_path_buf()).filter(|p| p.is_file());
	}

	let paths = std::env::var_os("PATH")?;
	std::env::split_paths(&paths)
		.map(|dir| dir.join(name))
		.find(|p| p.is_file())
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::Cache;
	use std::sync::{
		Arc,
		atomic::{
			AtomicUsize,
			Ordering::SeqCst,
		},
	};
	use tempfile::TempDir;

	#[derive(Debug, Default)]
	/// # Counting Minifier.
	///
	/// Squishes spaces and counts how many times it was called.
	struct Squish(AtomicUsize);

	impl JsMinifier for Squish {
		fn minify(&self, src: &str, _options: &JsOptions) -> Result<String, PressError> {
			self.0.fetch_add(1, SeqCst);
			if src.contains("syntax error") {
				return Err(PressError::JsMinify {
					message: "Unexpected token".to_owned(),
					source: src.to_owned(),
				});
			}
			Ok(src.replace([' ', '\n'], ""))
		}

		fn fingerprint(&self) -> String { "squish".to_owned() }
	}

	impl CssMinifier for Squish {
		fn minify(&self, src: &str) -> Result<String, PressError> {
			self.0.fetch_add(1, SeqCst);
			Ok(src.replace([' ', '\n'], ""))
		}

		fn fingerprint(&self) -> String { "squish".to_owned() }
	}

	#[test]
	fn t_js_cache() {
		let tmp = TempDir::new().unwrap();
		let squish = Arc::new(Squish::default());
		let opts = PressOptions::default()
			.with_js_minifier(squish.clone())
			.with_cache_dir(tmp.path());

		let src = "var a = 1;\nvar b = 2;\n";
		let first = minify_js(src, &opts).unwrap();
		assert_eq!(first, "vara=1;varb=2");
		assert_eq!(squish.0.load(SeqCst), 1);

		// Second time's a hit.
		let second = minify_js(src, &opts).unwrap();
		assert_eq!(first, second);
		assert_eq!(squish.0.load(SeqCst), 1);

		// And it matches what's on disk.
		let cache = Cache::new(tmp.path());
		let path = cache.path(CacheKind::Js, &cache.key("", src.as_bytes()));
		assert_eq!(std::fs::read_to_string(path).unwrap(), first);
	}

	#[test]
	fn t_js_no_cache() {
		let squish = Arc::new(Squish::default());
		let opts = PressOptions::default().with_js_minifier(squish.clone());

		assert_eq!(minify_js("var a = 1;", &opts).unwrap(), "vara=1");
		assert_eq!(minify_js("var a = 1;", &opts).unwrap(), "vara=1");
		assert_eq!(squish.0.load(SeqCst), 2);
	}

	#[test]
	fn t_js_passthrough() {
		let tmp = TempDir::new().unwrap();
		let opts = PressOptions::default().with_cache_dir(tmp.path());
		assert_eq!(minify_js("var a = 1;", &opts).unwrap(), "var a = 1;");

		// Nothing was cached.
		assert!(! tmp.path().join("js").exists());
	}

	#[test]
	fn t_js_error() {
		let opts = PressOptions::default()
			.with_js_minifier(Arc::new(Squish::default()));
		let err = minify_js("syntax error (", &opts).unwrap_err();
		assert!(err.to_string().contains("syntax error ("));
	}

	#[test]
	fn t_css_cache() {
		let tmp = TempDir::new().unwrap();
		let squish = Arc::new(Squish::default());
		let opts = PressOptions::default()
			.with_css_minifier(squish.clone())
			.with_cache_dir(tmp.path());

		let src = "body { color: red; }";
		assert_eq!(minify_css(src, &opts).unwrap(), "body{color:red;}");
		assert_eq!(minify_css(src, &opts).unwrap(), "body{color:red;}");
		assert_eq!(squish.0.load(SeqCst), 1);
		assert!(tmp.path().join("css").is_dir());
	}

	#[test]
	fn t_js_fallback() {
		// An explicit passthrough is a complete answer.
		let opts = PressOptions::default();
		let out = js_payload("var a = 1;", &opts).unwrap();
		assert_eq!(out.code, "var a = 1;");
		assert!(! out.degraded);

		// A stand-in for a missing Terser is not.
		let opts = opts.with_js_minifier(Arc::new(PassthroughMinifier::fallback()));
		let out = js_payload("var a = 1;", &opts).unwrap();
		assert_eq!(out.code, "var a = 1;");
		assert!(out.degraded);
	}

	#[test]
	fn t_css_unconfigured() {
		let opts = PressOptions::default().without_css_minifier();
		let out = css_payload("body { color: red; }", &opts).unwrap();
		assert_eq!(out.code, "body { color: red; }");
		assert!(! out.degraded);
	}

	#[test]
	fn t_css_missing() {
		let lightning = Arc::new(LightningCss::new("/no/such/dir/lightningcss"));

		// Fail by default.
		let opts = PressOptions::default()
			.with_logger(Arc::new(crate::SilentLogger))
			.with_css_minifier(lightning.clone());
		let err = minify_css("a { color: red }", &opts).unwrap_err();
		assert!(err.is_tool_missing());
		assert!(err.to_string().contains("npm install"));

		// Or pass through if asked.
		let opts = opts.with_css_missing(MissingToolPolicy::Passthrough);
		let out = css_payload("a { color: red }", &opts).unwrap();
		assert_eq!(out.code, "a { color: red }");
		assert!(out.degraded);
	}

	#[test]
	fn t_find_program() {
		assert_eq!(find_program(Some(Path::new("/no/such/dir/terser")), "terser"), None);
		assert_eq!(find_program(None, "htmlpress-no-such-program"), None);
	}
}
