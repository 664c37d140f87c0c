/*!
# HTMLPress: Inline Assets

The bodies of `<script>` and `<style>` elements are run through the
configured minifiers. Everything else about the element is left as-is.
*/

use crate::{
	minify::{
		self,
		Minified,
	},
	PressError,
	PressOptions,
};
use regex::Regex;
use std::sync::LazyLock;



/// # Script Element.
static RE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?is)(<script[^>]*>)(.*?)(</script>)"
).expect("Invalid regex."));

/// # Style Element.
static RE_STYLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?is)(<style[^>]*>)(.*?)(</style>)"
).expect("Invalid regex."));

/// # Type Attribute.
static RE_TYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r#"(?i)\stype\s*=\s*["']?([^"'\s>]*)"#
).expect("Invalid regex."));



/// # Minify Scripts.
///
/// Payloads of scripts that aren't JavaScript (JSON-LD, templates, etc.)
/// are passed through unchanged, as are empty ones.
///
/// The result is flagged as degraded if any payload was left alone because
/// the minifier was missing.
pub(crate) fn scripts(src: &str, opts: &PressOptions) -> Result<Minified, PressError> {
	replace_payloads(src, &RE_SCRIPT, |open, body| {
		if body.trim().is_empty() || ! is_javascript(open) {
			Ok(Minified::complete(body.to_owned()))
		}
		else { minify::js_payload(body, opts) }
	})
}

/// # Minify Styles.
///
/// As with scripts, a missing tool flags the result as degraded.
pub(crate) fn styles(src: &str, opts: &PressOptions) -> Result<Minified, PressError> {
	replace_payloads(src, &RE_STYLE, |_, body| {
		if body.trim().is_empty() { Ok(Minified::complete(body.to_owned())) }
		else { minify::css_payload(body, opts) }
	})
}

/// # Is JavaScript?
///
/// Check the `type` attribute of a `<script>` opening tag. No type (or an
/// empty one) means JavaScript.
fn is_javascript(open: &str) -> bool {
	RE_TYPE.captures(open)
		.and_then(|caps| caps.get(1))
		.is_none_or(|m| {
			let kind = m.as_str().to_ascii_lowercase();
			kind.is_empty() ||
			kind == "module" ||
			kind.contains("javascript") ||
			kind.contains("ecmascript")
		})
}

/// # Replace Payloads.
///
/// Run the callback over the body of each match, stitching the tags and
/// surrounding markup back together around the results.
fn replace_payloads<F>(src: &str, re: &Regex, mut cb: F) -> Result<Minified, PressError>
where F: FnMut(&str, &str) -> Result<Minified, PressError> {
	let mut out = String::with_capacity(src.len());
	let mut degraded = false;
	let mut last = 0;
	for caps in re.captures_iter(src) {
		let (Some(all), Some(open), Some(body), Some(close)) =
			(caps.get(0), caps.get(1), caps.get(2), caps.get(3))
		else { continue; };

		out.push_str(&src[last..all.start()]);
		let payload = cb(open.as_str(), body.as_str())?;
		degraded |= payload.degraded;
		out.push_str(open.as_str());
		out.push_str(&payload.code);
		out.push_str(close.as_str());
		last = all.end();
	}
	out.push_str(&src[last..]);
	Ok(Minified { code: out, degraded })
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		CssMinifier,
		JsMinifier,
		JsOptions,
		LightningCss,
		MissingToolPolicy,
		PassthroughMinifier,
		SilentLogger,
	};
	use std::sync::Arc;

	#[derive(Debug)]
	struct Upper;

	impl JsMinifier for Upper {
		fn minify(&self, src: &str, _options: &JsOptions) -> Result<String, PressError> {
			Ok(src.trim().to_uppercase())
		}
		fn fingerprint(&self) -> String { "upper".to_owned() }
	}

	impl CssMinifier for Upper {
		fn minify(&self, src: &str) -> Result<String, PressError> {
			Ok(src.trim().to_uppercase())
		}
		fn fingerprint(&self) -> String { "upper".to_owned() }
	}

	#[test]
	fn t_is_javascript() {
		for (open, expected) in [
			("<script>", true),
			("<script src=\"a.js\">", true),
			("<script type=\"text/javascript\">", true),
			("<script type='module' defer>", true),
			("<script type=application/ecmascript>", true),
			("<script type=\"\">", true),
			("<script type=\"application/ld+json\">", false),
			("<script type=\"text/x-template\" id=\"t\">", false),
			("<script data-type=\"json\">", true),
		] {
			assert_eq!(is_javascript(open), expected, "{open}");
		}
	}

	#[test]
	fn t_scripts() {
		let opts = PressOptions::default().with_js_minifier(Arc::new(Upper));
		assert_eq!(
			scripts(
				"<p>a</p><script>\n  var a = 1;\n</script><SCRIPT type=\"application/ld+json\">{ \"a\": 1 }</SCRIPT><script src=\"x.js\"></script>",
				&opts,
			).unwrap().code,
			"<p>a</p><script>VAR A = 1</script><SCRIPT type=\"application/ld+json\">{ \"a\": 1 }</SCRIPT><script src=\"x.js\"></script>",
		);

		// Without a minifier nothing changes.
		let raw = "<script>\n  var a = 1;\n</script>";
		let out = scripts(raw, &PressOptions::default()).unwrap();
		assert_eq!(out.code, raw);
		assert!(! out.degraded);

		// Same for a missing one, but the result is marked.
		let opts = PressOptions::default()
			.with_js_minifier(Arc::new(PassthroughMinifier::fallback()));
		let out = scripts(raw, &opts).unwrap();
		assert_eq!(out.code, raw);
		assert!(out.degraded);

		// Nothing to minify, nothing lost.
		let out = scripts("<script src=\"x.js\"></script>", &opts).unwrap();
		assert!(! out.degraded);
	}

	#[test]
	fn t_styles() {
		let opts = PressOptions::default().with_css_minifier(Arc::new(Upper));
		assert_eq!(
			styles("<style media=\"print\">\n  a { color: red }\n</style><style></style>", &opts).unwrap().code,
			"<style media=\"print\">A { COLOR: RED }</style><style></style>",
		);

		// A missing tool under the passthrough policy.
		let opts = PressOptions::default()
			.with_logger(Arc::new(SilentLogger))
			.with_css_minifier(Arc::new(LightningCss::new("/no/such/dir/lightningcss")))
			.with_css_missing(MissingToolPolicy::Passthrough);
		let raw = "<style>a { color: red }</style>";
		let out = styles(raw, &opts).unwrap();
		assert_eq!(out.code, raw);
		assert!(out.degraded);
	}
}
