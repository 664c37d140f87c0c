/*!
# HTMLPress: Structural Compaction

These passes strip empty comments and squeeze out insignificant whitespace,
line by line. They run after verbatim blocks have been swapped for tokens, so
anything left is fair game, save for script and style payloads.
*/

use crate::scan::{
	self,
	Nesting,
};
use regex::Regex;
use std::sync::LazyLock;



/// # Block Element Names.
///
/// Whitespace on either side of these tags is never significant.
const BLOCK_ELEMENTS: &str = r"area|base(?:font)?|blockquote|body|caption|center|cite|col(?:group)?|dd|dir|div|dl|dt|fieldset|form|frame(?:set)?|h[1-6]|head|hr|html|legend|li|link|map|menu|meta|ol|opt(?:group|ion)|p|param|t(?:able|body|head|d|h|r|foot|itle)|ul";

/// # Empty Comment.
static RE_EMPTY_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"<!--[ \t]*-->"
).expect("Invalid regex."));

/// # Leading/Trailing Line Whitespace.
static RE_LINE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?m)^[ \t]+|[ \t]+$"
).expect("Invalid regex."));

/// # Whitespace Before Block Tag.
static RE_BLOCK_BEFORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(
	r"(?i)[ \t]+(</?(?:{BLOCK_ELEMENTS})\b[^>]*>)"
)).expect("Invalid regex."));

/// # Whitespace After Block Tag.
static RE_BLOCK_AFTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(&format!(
	r"(?i)(</?(?:{BLOCK_ELEMENTS})\b[^>]*>)[ \t]+"
)).expect("Invalid regex."));

/// # Line Breaks.
static RE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"[\r\n]+"
).expect("Invalid regex."));

/// # Horizontal Whitespace.
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"[ \t]+"
).expect("Invalid regex."));

/// # Empty Line.
static RE_EMPTY_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?m)^\n"
).expect("Invalid regex."));



/// # Strip Empty Comments.
///
/// Only comments with nothing (or nothing but spaces) inside are removed.
/// Conditional comments and anything else with content stay.
pub(crate) fn strip_comments(src: &str) -> String {
	RE_EMPTY_COMMENT.replace_all(src, "").into_owned()
}

/// # Trim Lines.
pub(crate) fn trim_lines(src: &str) -> String {
	RE_LINE_WHITESPACE.replace_all(src, "").into_owned()
}

/// # Compact Block Elements.
///
/// Remove spaces and tabs immediately before and after block-level tags.
pub(crate) fn block_elements(src: &str) -> String {
	scan::map_markup(src, |chunk| {
		let chunk = RE_BLOCK_BEFORE.replace_all(chunk, "$1");
		RE_BLOCK_AFTER.replace_all(&chunk, "$1").into_owned()
	})
}

/// # Collapse Whitespace.
///
/// Normalize line breaks, then reduce runs of spaces and tabs to a single
/// space everywhere except inside code, pre, script, and style elements.
///
/// Nesting is tracked tag by tag across the whole document, so text on the
/// same line as (but outside of) a protected element is still collapsed.
pub(crate) fn collapse_whitespace(src: &str) -> String {
	let src = RE_NEWLINES.replace_all(src, "\n");
	let mut out = String::with_capacity(src.len());
	let mut nesting = Nesting::default();

	for (idx, line) in src.split('\n').enumerate() {
		if idx != 0 { out.push('\n'); }

		let mut last = 0;
		for tag in scan::tags(line) {
			push_collapsed(&mut out, &line[last..tag.span.start], nesting);
			push_collapsed(&mut out, &line[tag.span.clone()], nesting);
			nesting.track(&tag);
			last = tag.span.end;
		}
		push_collapsed(&mut out, &line[last..], nesting);
	}

	out
}

/// # Drop Empty Lines.
pub(crate) fn drop_empty_lines(src: &str) -> String {
	RE_EMPTY_LINE.replace_all(src, "").into_owned()
}

/// # Push (Maybe) Collapsed.
fn push_collapsed(out: &mut String, segment: &str, nesting: Nesting) {
	if nesting.is_inside() { out.push_str(segment); }
	else { out.push_str(&RE_WHITESPACE.replace_all(segment, " ")); }
}
