/*!
# HTMLPress

HTMLPress takes fully-rendered HTML and gives back a tidier version of it:
empty comments are gone, insignificant whitespace is squeezed out, void
elements are self-closed, inline scripts and styles are minified by external
tools, and the whole thing is consistently reindented.

It is _not_ a parser. The document is processed as text, line by line, with
a handful of regular expressions and some running counters standing in for
an element tree. This works well enough for template output, but garbage in
will mean (well-indented) garbage out.

## Usage

```no_run
use htmlpress::{press, PressOptions};

let opts = PressOptions::default().with_cache_dir("/tmp/htmlpress");
let html = press("<div>\n    <p>Hello   World</p>\n</div>", &opts).unwrap();
assert_eq!(html, "<div>\n  <p>Hello World</p>\n</div>");
```

## Verbatim Content

The contents of `<pre>` and `<code>` elements are lifted out before anything
else happens and put back, byte for byte, at the very end.

## Inline Assets

`<script>` bodies are handed to a [`JsMinifier`]. If [Terser](https://terser.org/)
is installed it will be used, otherwise scripts are left as-are. `<style>`
bodies go to a [`CssMinifier`], [`LightningCss`] by default. If that can't
be found the press fails, unless [`MissingToolPolicy::Passthrough`] has been
chosen, or CSS minification has been switched off entirely.

Either way, results are memoized under the cache directory, if there is one.
Documents that missed out on minification because a tool was missing are not.
*/

#![deny(unsafe_code)]

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_extern_crates,
	unused_import_braces,
)]



mod cache;
mod compact;
mod error;
mod inline;
pub mod minify;
mod normalize;
mod options;
mod placeholder;
mod reindent;
pub mod scan;

pub use cache::{
	Cache,
	CacheKeyPolicy,
	CacheKind,
};
pub use error::PressError;
pub use minify::{
	CssMinifier,
	JsEngine,
	JsMinifier,
	JsOptions,
	LightningCss,
	MissingToolPolicy,
	PassthroughMinifier,
	Terser,
	minify_css,
	minify_js,
};
pub use options::{
	CssChoice,
	JsChoice,
	Logger,
	OPTIONS_VERSION,
	PressOptions,
	RawOptions,
	SilentLogger,
	StderrLogger,
};
pub use placeholder::{
	BlockKind,
	Placeholders,
};

use minify::Minified;
use std::io::Read;



/// # Press.
///
/// Compact, minify, and reindent an HTML document. See the library
/// documentation for details.
///
/// Empty input yields empty output. If a cache directory is configured, the
/// result is memoized and a repeat call with the same input (and, depending
/// on the key policy, options) skips straight to the answer.
///
/// ## Errors
///
/// Inline asset minification failures, missing required tools, and cache
/// I/O errors are all fatal. The configured logger, if any, is told about
/// the problem before it is returned.
pub fn press(src: &str, opts: &PressOptions) -> Result<String, PressError> {
	press_cached(src, opts).map_err(|e| report(e, opts))
}

/// # Press (Reader).
///
/// Same as [`press`], but the document is read from any source first.
///
/// ## Errors
///
/// As for [`press`], plus read errors.
pub fn press_reader<R: Read>(mut reader: R, opts: &PressOptions)
-> Result<String, PressError> {
	let mut src = String::new();
	reader.read_to_string(&mut src).map_err(|e| report(e.into(), opts))?;
	press(&src, opts)
}

#[deprecated(since = "0.5.0", note = "use `press` instead")]
/// # Compress.
///
/// This is the old name for [`press`].
///
/// ## Errors
///
/// As for [`press`].
pub fn compress(src: &str, opts: &PressOptions) -> Result<String, PressError> {
	press(src, opts)
}

/// # Press, With Caching.
fn press_cached(src: &str, opts: &PressOptions) -> Result<String, PressError> {
	if src.is_empty() { return Ok(String::new()); }

	let Some(cache) = opts.cache() else { return press_raw(src, opts).map(|m| m.code); };
	let fingerprint = opts.fingerprint();
	if let Some(hit) = cache.lookup(CacheKind::Html, &fingerprint, src.as_bytes())? {
		return Ok(hit);
	}

	// Documents missing out on minification because a tool wasn't around are
	// not memoized.
	let out = press_raw(src, opts)?;
	if ! out.degraded {
		cache.store(CacheKind::Html, &fingerprint, src.as_bytes(), out.code.as_bytes())?;
	}
	Ok(out.code)
}

/// # Press, For Real.
///
/// The order of operations matters here.
fn press_raw(src: &str, opts: &PressOptions) -> Result<Minified, PressError> {
	let mut table = Placeholders::default();
	let out = table.extract(BlockKind::Pre, src);
	let out = table.extract(BlockKind::Code, &out);
	let out = out.replace('\r', "");

	let scripts = inline::scripts(&out, opts)?;
	let styles = inline::styles(&scripts.code, opts)?;
	let degraded = scripts.degraded || styles.degraded;

	let out = compact::strip_comments(&styles.code);
	let out = compact::trim_lines(&out);
	let out = compact::block_elements(&out);
	let out = compact::collapse_whitespace(&out);

	let out = normalize::attributes(&out, opts);
	let out = normalize::void_elements(&out);
	let out = compact::drop_empty_lines(&out);

	let out =
		if opts.strip_crlf() { reindent::join(&out) }
		else { reindent::reindent(&out, opts.indent()) };

	let out = table.restore(BlockKind::Code, &out);
	Ok(Minified {
		code: table.restore(BlockKind::Pre, &out),
		degraded,
	})
}

/// # Report Error.
///
/// Pass a fatal error along to the logger, then give it back.
fn report(e: PressError, opts: &PressOptions) -> PressError {
	if let Some(logger) = opts.logger() { logger.error(&e.to_string()); }
	e
}



#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{
		Arc,
		Mutex,
	};
	use tempfile::TempDir;

	/// # Test Page.
	const PAGE: &str = include_str!("../skel/test-assets/page.html");

	/// # Test Page (Pressed).
	const PAGE_PRESSED: &str = include_str!("../skel/test-assets/page.pressed.html");

	/// # Test Page With Assets.
	const ASSETS: &str = include_str!("../skel/test-assets/assets.html");

	#[derive(Debug, Default)]
	/// # Capturing Logger.
	struct Capture(Mutex<Vec<String>>);

	impl Logger for Capture {
		fn error(&self, msg: &str) { self.0.lock().unwrap().push(msg.to_owned()); }
		fn warn(&self, _msg: &str) {}
	}

	#[derive(Debug)]
	/// # Failing Minifier.
	struct Broken;

	impl JsMinifier for Broken {
		fn minify(&self, src: &str, _options: &JsOptions) -> Result<String, PressError> {
			Err(PressError::JsMinify {
				message: "Unexpected token".to_owned(),
				source: src.to_owned(),
			})
		}
		fn fingerprint(&self) -> String { "broken".to_owned() }
	}

	#[derive(Debug)]
	/// # Space-Eating Minifier.
	struct Squish;

	impl JsMinifier for Squish {
		fn minify(&self, src: &str, _options: &JsOptions) -> Result<String, PressError> {
			Ok(src.split_whitespace().collect())
		}
		fn fingerprint(&self) -> String { "squish".to_owned() }
	}

	impl CssMinifier for Squish {
		fn minify(&self, src: &str) -> Result<String, PressError> {
			Ok(src.split_whitespace().collect())
		}
		fn fingerprint(&self) -> String { "squish".to_owned() }
	}

	#[test]
	fn t_press() {
		let opts = PressOptions::default();
		assert_eq!(press("", &opts).unwrap(), "");
		assert_eq!(
			press(PAGE, &opts).unwrap(),
			PAGE_PRESSED.trim_end_matches('\n'),
		);
	}

	#[test]
	fn t_idempotent() {
		let opts = PressOptions::default().without_css_minifier();
		for raw in [PAGE, PAGE_PRESSED, ASSETS] {
			let once = press(raw, &opts).unwrap();
			let twice = press(&once, &opts).unwrap();
			assert_eq!(once, twice, "Pressing is not idempotent.");
		}

		// With minifiers too.
		let opts = opts.with_js_minifier(Arc::new(Squish))
			.with_css_minifier(Arc::new(Squish));
		let once = press(ASSETS, &opts).unwrap();
		assert_eq!(once, press(&once, &opts).unwrap());
	}

	#[test]
	fn t_verbatim() {
		let opts = PressOptions::default();
		for raw in [
			"<pre>  a\n\tb  </pre>",
			"<p>Use <code>a  b</code> here.</p>",
			"<pre class=\"x\">\r\n  keep\r\n</pre>",
		] {
			assert_eq!(press(raw, &opts).unwrap(), raw);
		}

		assert_eq!(
			press("<div>\n<pre>\n  x\n</pre>\n</div>", &opts).unwrap(),
			"<div>\n  <pre>\n  x\n</pre>\n</div>",
		);
	}

	#[test]
	fn t_void() {
		let opts = PressOptions::default();
		assert_eq!(press("<img src=\"x.png\">", &opts).unwrap(), "<img src=\"x.png\"/>");
		assert_eq!(
			press("<p>a<br>b</p>\n<hr>", &opts).unwrap(),
			"<p>a<br/>b</p>\n<hr/>",
		);
	}

	#[test]
	fn t_comments() {
		let opts = PressOptions::default();
		assert_eq!(press("<p>a</p>\n<!-- -->\n<p>b</p>", &opts).unwrap(), "<p>a</p>\n<p>b</p>");

		let raw = "<!--[if IE]><link rel=\"stylesheet\" href=\"/ie.css\"/><![endif]-->";
		assert_eq!(press(raw, &opts).unwrap(), raw);
	}

	#[test]
	fn t_scripts() {
		// No minifier, no change.
		let opts = PressOptions::default();
		let raw = "<script>var a=1;</script>";
		assert_eq!(press(raw, &opts).unwrap(), raw);

		assert_eq!(
			press("<div>\n<script>\nvar a = 1;\n</script>\n</div>", &opts).unwrap(),
			"<div>\n  <script>\n    var a = 1;\n  </script>\n</div>",
		);

		// With one, the trailing semicolon goes too.
		let opts = opts.with_js_minifier(Arc::new(Squish));
		assert_eq!(
			press("<script>\n  var a = 1;\n</script>", &opts).unwrap(),
			"<script>vara=1</script>",
		);
	}

	#[test]
	fn t_reindent() {
		let opts = PressOptions::default();
		assert_eq!(
			press("<html>\n  <body>  <p>Hello</p>  </body>\n</html>", &opts).unwrap(),
			"<html>\n  <body><p>Hello</p></body>\n</html>",
		);

		// Extra closing tags clamp to zero.
		assert_eq!(
			press("<div>\n</div>\n</div>\n<p>x</p>", &opts).unwrap(),
			"<div>\n</div>\n</div>\n<p>x</p>",
		);

		// Custom indentation.
		let opts = opts.with_indent(4);
		assert_eq!(
			press("<ul>\n<li>a</li>\n<li>b</li>\n</ul>", &opts).unwrap(),
			"<ul>\n    <li>a</li>\n    <li>b</li>\n</ul>",
		);
	}

	#[test]
	fn t_options() {
		let raw = "<a href=\"/x\" class=\"btn primary\" title=\"\" id='main'>x</a>";
		let opts = PressOptions::default()
			.with_drop_empty_values(true)
			.with_unquoted_attributes(true);
		assert_eq!(
			press(raw, &opts).unwrap(),
			"<a href=\"/x\" class=\"btn primary\" title id=main>x</a>",
		);

		let opts = PressOptions::default().with_strip_crlf(true);
		assert_eq!(
			press("<div>\n  <p>Hello</p>\n  <span>a</span>\n  text\n  more\n</div>", &opts).unwrap(),
			"<div><p>Hello</p><span>a</span>text more</div>",
		);
	}

	#[test]
	fn t_errors() {
		let capture = Arc::new(Capture::default());
		let opts = PressOptions::default()
			.with_logger(capture.clone())
			.with_js_minifier(Arc::new(Broken));

		let err = press("<p>a</p>\n<script>var = ;</script>", &opts).unwrap_err();
		assert!(matches!(err, PressError::JsMinify { .. }));

		let logged = capture.0.lock().unwrap();
		assert_eq!(logged.len(), 1);
		assert!(logged[0].contains("var = ;"));
	}

	#[test]
	fn t_cache() {
		let tmp = TempDir::new().unwrap();
		let opts = PressOptions::default().with_cache_dir(tmp.path());

		let out = press(PAGE, &opts).unwrap();
		let cache = opts.cache().unwrap();
		let path = cache.path(CacheKind::Html, &cache.key("", PAGE.as_bytes()));
		assert_eq!(std::fs::read_to_string(&path).unwrap(), out);

		// Hits come straight from disk.
		std::fs::write(&path, "<p>Cached!</p>").unwrap();
		assert_eq!(press(PAGE, &opts).unwrap(), "<p>Cached!</p>");

		// Unless the key includes the config.
		let opts = PressOptions::default()
			.with_cache(Cache::new(tmp.path()).with_policy(CacheKeyPolicy::ContentAndConfig));
		assert_eq!(press(PAGE, &opts).unwrap(), out);
	}

	#[test]
	fn t_cache_degraded() {
		let tmp = TempDir::new().unwrap();
		let raw = "<p>a</p>\n<script>\n  var a = 1;\n</script>";

		// Scripts skipped for want of Terser aren't memoized.
		let opts = PressOptions::default()
			.with_js_minifier(Arc::new(PassthroughMinifier::fallback()))
			.with_cache_dir(tmp.path());
		let out = press(raw, &opts).unwrap();
		assert_eq!(out, "<p>a</p>\n<script>\n  var a = 1;\n</script>");
		let cache = opts.cache().unwrap().clone();
		let path = cache.path(CacheKind::Html, &cache.key("", raw.as_bytes()));
		assert!(! path.exists());

		// Once the minifier turns up, the result is fresh.
		let opts = opts.with_js_minifier(Arc::new(Squish));
		assert_eq!(press(raw, &opts).unwrap(), "<p>a</p>\n<script>vara=1</script>");
		assert!(path.exists());

		// An explicit passthrough is fine to keep.
		let raw = "<p>b</p>\n<script>\n  var b = 2;\n</script>";
		let opts = PressOptions::default().with_cache_dir(tmp.path());
		press(raw, &opts).unwrap();
		assert!(cache.path(CacheKind::Html, &cache.key("", raw.as_bytes())).exists());
	}

	#[test]
	fn t_press_reader() {
		let opts = PressOptions::default();
		assert_eq!(
			press_reader(PAGE.as_bytes(), &opts).unwrap(),
			press(PAGE, &opts).unwrap(),
		);

		#[expect(deprecated, reason = "Testing the alias.")]
		let old = compress(PAGE, &opts).unwrap();
		assert_eq!(old, press(PAGE, &opts).unwrap());
	}
}
