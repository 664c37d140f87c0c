/*!
# HTMLPress: Attribute and Void Element Normalization
*/

use crate::{
	PressOptions,
	scan,
};
use regex::{
	Captures,
	Regex,
};
use std::sync::LazyLock;



/// # Opening Tag.
static RE_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?i)<([a-z\-:]+)([^>]*?)(/*)>"
).expect("Invalid regex."));

/// # Space Runs.
static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r" {2,}"
).expect("Invalid regex."));

/// # Attribute.
///
/// Leading whitespace, the name, and an optional value, quoted or not.
static RE_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r#"\s+([^\s"'=<>/]+)(?:=(?:"([^"]*)"|'([^']*)'|[^\s"'=<>`]+))?"#
).expect("Invalid regex."));

/// # Void Element.
static RE_VOID: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?i)<(area|base|br|col|command|embed|hr|img|input|keygen|link|meta|param|source|track|wbr|path|rect)\b([^>]*?)/*>"
).expect("Invalid regex."));



/// # Normalize Attributes.
///
/// For each opening tag, turn line breaks in the attribute text into spaces,
/// squash repeated spaces, and trim the end. The empty-value and unquoting
/// options are applied here too.
pub(crate) fn attributes(src: &str, opts: &PressOptions) -> String {
	scan::map_markup(src, |chunk| {
		RE_OPEN_TAG.replace_all(chunk, |caps: &Captures<'_>| tidy_tag(caps, opts))
			.into_owned()
	})
}

/// # Self-Close Void Elements.
///
/// `<br>`, `<br/>`, and `<br//>` all become `<br/>`.
pub(crate) fn void_elements(src: &str) -> String {
	scan::map_markup(src, |chunk| RE_VOID.replace_all(chunk, "<$1$2/>").into_owned())
}

/// # Tidy Tag.
fn tidy_tag(caps: &Captures<'_>, opts: &PressOptions) -> String {
	let attrs = caps[2].replace('\n', " ");
	let mut attrs = RE_SPACES.replace_all(&attrs, " ").trim_end().to_owned();
	if opts.drop_empty_values() || opts.unquoted_attributes() {
		attrs = tidy_values(&attrs, opts);
	}

	let slash = if caps[3].is_empty() { "" } else { "/" };
	format!("<{}{attrs}{slash}>", &caps[1])
}


/// # Tidy Values.
///
/// Walk the attributes in order, dropping empty values and unquoting safe
/// ones as configured. Matches must butt up against one another; at the
/// first gap the remainder is copied through as-is.
fn tidy_values(attrs: &str, opts: &PressOptions) -> String {
	let mut out = String::with_capacity(attrs.len());
	let mut last = 0;
	for caps in RE_ATTR.captures_iter(attrs) {
		let (Some(all), Some(name)) = (caps.get(0), caps.get(1)) else { break; };
		if all.start() != last { break; }

		out.push_str(&attrs[last..name.end()]);
		match caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str()) {
			Some("") if opts.drop_empty_values() => {},
			Some(v) if opts.unquoted_attributes() && can_unquote(v) => {
				out.push('=');
				out.push_str(v);
			},
			_ => { out.push_str(&attrs[name.end()..all.end()]); },
		}
		last = all.end();
	}

	out.push_str(&attrs[last..]);
	out
}

/// # Can Unquote?
fn can_unquote(value: &str) -> bool {
	! value.is_empty() &&
	! value.contains(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '`' | '/'))
}
