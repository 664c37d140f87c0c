/*!
# HTMLPress: Reindentation

The output's indentation is rebuilt from scratch using a running depth count.
It's a rough approximation of the element tree, but it's stable, and bad
markup can only ever flatten it.
*/

use crate::scan::{
	self,
	Nesting,
};



/// # Reindent.
///
/// Each line is indented by `unit` times the lesser of the depth before and
/// after its tags, so a line that opens an element sits at the parent's
/// level, and one that closes it sits at the level it returns to.
///
/// Script and style bodies are indented one level deeper than their tags,
/// but tags within them don't count. Lines within code and pre blocks aren't
/// indented unless the depth went up.
pub(crate) fn reindent(src: &str, unit: &str) -> String {
	let mut out = String::with_capacity(src.len());
	let mut nesting = Nesting::default();
	let mut level = 0_usize;

	for (idx, line) in src.trim_end_matches('\n').split('\n').enumerate() {
		let pre_level = level;
		for tag in scan::tags(line) {
			nesting.track(&tag);
			if tag.opens("script") || tag.opens("style") { level += 1; }

			if tag.self_closing || nesting.in_foreign() { continue; }
			if tag.closing { level = level.saturating_sub(1); }
			else { level += 1; }
		}

		let width =
			if nesting.in_verbatim() && level <= pre_level { 0 }
			else { level.min(pre_level) };

		if idx != 0 { out.push('\n'); }
		for _ in 0..width { out.push_str(unit); }
		out.push_str(line);
	}

	out
}

/// # Join Lines.
///
/// This is the alternative to reindentation: pull everything onto one line.
/// Lines meet directly if there's a tag on either side of the seam, and with
/// a single space otherwise. Line breaks within script and style bodies are
/// kept as-are.
pub(crate) fn join(src: &str) -> String {
	let mut out = String::with_capacity(src.len());
	let mut nesting = Nesting::default();

	for line in src.split('\n').filter(|l| ! l.is_empty()) {
		if let Some(last) = out.chars().next_back() {
			if nesting.in_foreign() { out.push('\n'); }
			else if last != '>' && ! line.starts_with('<') { out.push(' '); }
		}

		out.push_str(line);
		for tag in scan::tags(line) { nesting.track(&tag); }
	}

	out
}
