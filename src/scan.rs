/*!
# HTMLPress: Tag Scanner

This is not a parser. It finds things that look like tags, one at a time,
and reports what it found; nothing is retained and no tree is built. Nesting
is approximated with plain counters.
*/

use regex::Regex;
use std::{
	ops::Range,
	sync::LazyLock,
};



/// # Script or Style Element.
static RE_FOREIGN: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?is)<script[^>]*>.*?</script>|<style[^>]*>.*?</style>"
).expect("Invalid regex."));

/// # Tag.
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?i)<(/?)([a-z\-:]+)([^<>]*?)>"
).expect("Invalid regex."));



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Tag Scan Event.
pub struct TagEvent<'a> {
	/// # Name (Sans Slash).
	pub name: &'a str,

	/// # Raw Attributes.
	///
	/// Everything between the name and the closing `>`, verbatim.
	pub attrs: &'a str,

	/// # Closing Tag?
	pub closing: bool,

	/// # Self-Closing (or Comment-Like)?
	pub self_closing: bool,

	/// # Byte Range.
	pub span: Range<usize>,
}

impl TagEvent<'_> {
	#[must_use]
	/// # Is Named?
	///
	/// Case-insensitive.
	pub fn is(&self, name: &str) -> bool { self.name.eq_ignore_ascii_case(name) }

	#[must_use]
	/// # Is Opening?
	pub fn opens(&self, name: &str) -> bool { ! self.closing && self.is(name) }

	#[must_use]
	/// # Is Closing?
	pub fn closes(&self, name: &str) -> bool { self.closing && self.is(name) }
}



/// # Scan Tags.
///
/// Return every tag-like occurrence in `src`, in order.
pub fn tags(src: &str) -> impl Iterator<Item = TagEvent<'_>> {
	RE_TAG.captures_iter(src).filter_map(|caps| {
		let all = caps.get(0)?;
		let raw = all.as_str();
		Some(TagEvent {
			name: caps.get(2)?.as_str(),
			attrs: caps.get(3).map_or("", |m| m.as_str()),
			closing: ! caps.get(1)?.as_str().is_empty(),
			self_closing: raw.starts_with("<!") || raw.ends_with("/>"),
			span: all.range(),
		})
	})
}



/// # Map Markup.
///
/// Apply `f` to everything _except_ the payloads of `<script>` and `<style>`
/// elements. The opening tags of those elements are included in the chunk
/// passed to `f`; the payloads and closing tags are copied over verbatim.
pub fn map_markup<F>(src: &str, f: F) -> String
where F: Fn(&str) -> String {
	let mut out = String::with_capacity(src.len());
	let mut last = 0;
	for m in RE_FOREIGN.find_iter(src) {
		let open_end = m.start() + m.as_str().find('>').map_or(0, |p| p + 1);
		out.push_str(&f(&src[last..open_end]));
		out.push_str(&src[open_end..m.end()]);
		last = m.end();
	}
	out.push_str(&f(&src[last..]));
	out
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Nesting Counters.
///
/// Running (non-negative) depth counts for the handful of elements whose
/// contents must not be treated like regular markup. Each is independent;
/// opens increment, closes decrement, and that's all.
pub struct Nesting {
	/// # Inside `<code>`.
	code: usize,

	/// # Inside `<pre>`.
	pre: usize,

	/// # Inside `<script>`.
	script: usize,

	/// # Inside `<style>`.
	style: usize,
}

impl Nesting {
	/// # Track.
	///
	/// Update the counters for a tag.
	pub fn track(&mut self, tag: &TagEvent<'_>) {
		let counter = match tag.name.to_ascii_lowercase().as_str() {
			"code" => &mut self.code,
			"pre" => &mut self.pre,
			"script" => &mut self.script,
			"style" => &mut self.style,
			_ => return,
		};

		if tag.closing { *counter = counter.saturating_sub(1); }
		else { *counter += 1; }
	}

	#[must_use]
	/// # In Verbatim Block?
	///
	/// Inside `<code>` or `<pre>`.
	pub const fn in_verbatim(&self) -> bool { 0 < self.code || 0 < self.pre }

	#[must_use]
	/// # In Foreign Content?
	///
	/// Inside `<script>` or `<style>`.
	pub const fn in_foreign(&self) -> bool { 0 < self.script || 0 < self.style }

	#[must_use]
	/// # Inside Anything?
	pub const fn is_inside(&self) -> bool { self.in_verbatim() || self.in_foreign() }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_tags() {
		let line = r#"<div class="a"><br/></DIV><!-- x --><img src="x.png" />"#;
		let found: Vec<_> = tags(line).collect();
		assert_eq!(found.len(), 4);

		assert_eq!(found[0].name, "div");
		assert_eq!(found[0].attrs, r#" class="a""#);
		assert!(! found[0].closing);
		assert!(! found[0].self_closing);
		assert_eq!(&line[found[0].span.clone()], r#"<div class="a">"#);

		assert_eq!(found[1].name, "br");
		assert!(found[1].self_closing);

		assert!(found[2].closes("div"));
		assert!(! found[2].opens("div"));

		// Comments aren't tags.
		assert_eq!(found[3].name, "img");
		assert!(found[3].self_closing);
	}

	#[test]
	fn t_map_markup() {
		let raw = "<p>a</p>\n<script  defer>\n  if (a  <b) {}\n</script>\n<style>a  b {}</style>\n<p>b</p>";
		let out = map_markup(raw, |s| s.replace("  ", " "));
		assert_eq!(
			out,
			"<p>a</p>\n<script defer>\n  if (a  <b) {}\n</script>\n<style>a  b {}</style>\n<p>b</p>",
		);

		// No payloads, one call.
		assert_eq!(map_markup("a  b", |s| s.replace("  ", " ")), "a b");
	}

	#[test]
	fn t_nesting() {
		let mut nesting = Nesting::default();
		assert!(! nesting.is_inside());

		for tag in tags("<pre><code>") { nesting.track(&tag); }
		assert!(nesting.in_verbatim());
		assert!(! nesting.in_foreign());

		for tag in tags("</code></PRE><script>") { nesting.track(&tag); }
		assert!(! nesting.in_verbatim());
		assert!(nesting.in_foreign());

		// A stray `<` in a script can't hide the closing tag.
		let mut nesting = Nesting::default();
		for tag in tags("<script>if(a<b){x()}</script>") { nesting.track(&tag); }
		assert!(! nesting.is_inside());

		// Extra closes clamp.
		for tag in tags("<script>") { nesting.track(&tag); }
		for tag in tags("</script></script></style>") { nesting.track(&tag); }
		assert!(! nesting.is_inside());
		for tag in tags("<style>") { nesting.track(&tag); }
		assert!(nesting.in_foreign());
	}
}
