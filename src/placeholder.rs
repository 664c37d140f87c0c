/*!
# HTMLPress: Placeholders

Whitespace inside `<pre>` and `<code>` matters, so their contents are lifted
out of the document before anything else happens, and dropped back in, byte
for byte, after everything else is done.
*/

use regex::{
	Captures,
	Regex,
};
use std::sync::LazyLock;



/// # Pre Block.
static RE_PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?is)(<pre(?:\s[^>]*)?>)(.*?)(</pre>)"
).expect("Invalid regex."));

/// # Code Block.
static RE_CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"(?is)(<code(?:\s[^>]*)?>)(.*?)(</code>)"
).expect("Invalid regex."));

/// # Pre Token.
static RE_PRE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"##HTMLPRESSPREBLOCK(\d+)##"
).expect("Invalid regex."));

/// # Code Token.
static RE_CODE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(
	r"##HTMLPRESSCODEBLOCK(\d+)##"
).expect("Invalid regex."));



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Verbatim Block Kind.
pub enum BlockKind {
	/// # `<code>`.
	Code,

	/// # `<pre>`.
	Pre,
}

impl BlockKind {
	#[must_use]
	/// # Token Label.
	const fn label(self) -> &'static str {
		match self {
			Self::Code => "CODE",
			Self::Pre => "PRE",
		}
	}

	/// # Block Pattern.
	fn block(self) -> &'static Regex {
		match self {
			Self::Code => &RE_CODE_BLOCK,
			Self::Pre => &RE_PRE_BLOCK,
		}
	}

	/// # Token Pattern.
	fn token(self) -> &'static Regex {
		match self {
			Self::Code => &RE_CODE_TOKEN,
			Self::Pre => &RE_PRE_TOKEN,
		}
	}

	#[must_use]
	/// # Token.
	///
	/// Return the placeholder standing in for the `idx`th block of this kind.
	pub fn token_for(self, idx: usize) -> String {
		format!("##HTMLPRESS{}BLOCK{idx}##", self.label())
	}
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Placeholder Table.
///
/// This holds the original contents of every extracted `<code>` and `<pre>`
/// block, in the order they were found. It only lives as long as a single
/// press.
pub struct Placeholders {
	/// # Code Contents.
	code_blocks: Vec<String>,

	/// # Pre Contents.
	pre_blocks: Vec<String>,
}

impl Placeholders {
	#[must_use]
	/// # Blocks.
	pub fn blocks(&self, kind: BlockKind) -> &[String] {
		match kind {
			BlockKind::Code => &self.code_blocks,
			BlockKind::Pre => &self.pre_blocks,
		}
	}

	/// # Extract.
	///
	/// Swap the content of each (lazily-matched) block of the given kind for a
	/// numbered token, stashing the original so it can be put back later. The
	/// opening and closing tags themselves stay where they are.
	pub fn extract(&mut self, kind: BlockKind, src: &str) -> String {
		let blocks = match kind {
			BlockKind::Code => &mut self.code_blocks,
			BlockKind::Pre => &mut self.pre_blocks,
		};

		kind.block().replace_all(src, |caps: &Captures<'_>| {
			let idx = blocks.len();
			blocks.push(caps[2].to_owned());
			format!("{}{}{}", &caps[1], kind.token_for(idx), &caps[3])
		}).into_owned()
	}

	#[must_use]
	/// # Restore.
	///
	/// Replace every token of the given kind with its original content. Tokens
	/// with unknown indices are left as-are.
	pub fn restore(&self, kind: BlockKind, src: &str) -> String {
		let blocks = self.blocks(kind);
		kind.token().replace_all(src, |caps: &Captures<'_>| {
			caps[1].parse::<usize>()
				.ok()
				.and_then(|idx| blocks.get(idx))
				.map_or_else(|| caps[0].to_owned(), String::clone)
		}).into_owned()
	}
}
