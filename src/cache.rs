/*!
# HTMLPress: Cache

Pressing a document is slow, shelling out to minify its inline scripts and
styles especially so. Every expensive transformation is therefore memoized on
disk.

The cache is content-addressed: each entry lives at
`<cache_dir>/<kind>/<sha1-hex>`, where the hash is taken over the raw input
and the file holds nothing but the output bytes. There is no manifest, no
expiry, and no eviction; callers wipe the directory when they want a clean
slate.

There is also no locking. Values are pure functions of their keys and writes
are whole-file atomic replacements, so concurrent writers racing on the same
key can only ever write the same thing.

## Keys

By default only the input is hashed. Upgrading a minifier or changing its
options will therefore _not_ invalidate existing entries. If that matters,
switch to [`CacheKeyPolicy::ContentAndConfig`], which mixes a configuration
fingerprint into every key.
*/

use crate::PressError;
use serde::Deserialize;
use sha1::{
	Digest,
	Sha1,
};
use std::{
	fmt,
	fs,
	io::ErrorKind,
	path::{
		Path,
		PathBuf,
	},
};



#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
/// # Cache Namespace.
pub enum CacheKind {
	/// # Pressed Documents.
	Html,

	/// # Minified Scripts.
	Js,

	/// # Minified Styles.
	Css,
}

impl fmt::Display for CacheKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl CacheKind {
	#[must_use]
	/// # As Str.
	///
	/// This doubles as the subdirectory name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Html => "html",
			Self::Js => "js",
			Self::Css => "css",
		}
	}
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
/// # Cache Key Policy.
pub enum CacheKeyPolicy {
	#[default]
	#[serde(rename = "content")]
	/// # Input Only.
	///
	/// Keys are the SHA-1 of the input and nothing else.
	Content,

	#[serde(rename = "content+config")]
	/// # Input and Configuration.
	///
	/// Keys are the SHA-1 of a configuration fingerprint, a NUL byte, and the
	/// input.
	ContentAndConfig,
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Content-Addressed Cache.
pub struct Cache {
	/// # Root Directory.
	root: PathBuf,

	/// # Key Policy.
	policy: CacheKeyPolicy,
}

impl Cache {
	#[must_use]
	/// # New.
	pub fn new<P: Into<PathBuf>>(root: P) -> Self {
		Self {
			root: root.into(),
			policy: CacheKeyPolicy::Content,
		}
	}

	#[must_use]
	/// # With Key Policy.
	pub const fn with_policy(mut self, policy: CacheKeyPolicy) -> Self {
		self.policy = policy;
		self
	}

	#[must_use]
	/// # Root Directory.
	pub fn root(&self) -> &Path { &self.root }

	#[must_use]
	/// # Key Policy.
	pub const fn policy(&self) -> CacheKeyPolicy { self.policy }

	#[must_use]
	/// # Key.
	///
	/// Hash the input (and, depending on the policy, the configuration
	/// fingerprint), returning the lowercase hex digest.
	pub fn key(&self, fingerprint: &str, input: &[u8]) -> String {
		let mut hasher = Sha1::new();
		if matches!(self.policy, CacheKeyPolicy::ContentAndConfig) {
			hasher.update(fingerprint.as_bytes());
			hasher.update(b"\0");
		}
		hasher.update(input);
		format!("{:x}", hasher.finalize())
	}

	#[must_use]
	/// # Entry Path.
	pub fn path(&self, kind: CacheKind, key: &str) -> PathBuf {
		self.root.join(kind.as_str()).join(key)
	}

	/// # Lookup.
	///
	/// Return the previously stored output for this input, if any.
	///
	/// ## Errors
	///
	/// A missing entry is simply `None`, but any other read failure is passed
	/// through; a hit must always be exactly what was stored.
	pub fn lookup(&self, kind: CacheKind, fingerprint: &str, input: &[u8])
	-> Result<Option<String>, PressError> {
		let path = self.path(kind, &self.key(fingerprint, input));
		match fs::read_to_string(path) {
			Ok(out) => Ok(Some(out)),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	/// # Store.
	///
	/// Save the output for this input, creating the kind's directory if
	/// needed.
	///
	/// ## Errors
	///
	/// Directory creation and write errors are returned as-are.
	pub fn store(&self, kind: CacheKind, fingerprint: &str, input: &[u8], output: &[u8])
	-> Result<(), PressError> {
		let dir = self.root.join(kind.as_str());
		fs::create_dir_all(&dir)?;
		write_atomic::write_file(dir.join(self.key(fingerprint, input)), output)?;
		Ok(())
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn t_key() {
		let cache = Cache::new("/tmp");

		// Known SHA-1 digests.
		assert_eq!(cache.key("", b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
		assert_eq!(cache.key("", b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");

		// The fingerprint is ignored by default…
		assert_eq!(cache.key("terser", b"abc"), cache.key("uglify", b"abc"));

		// …but not when asked.
		let cache = cache.with_policy(CacheKeyPolicy::ContentAndConfig);
		assert_ne!(cache.key("terser", b"abc"), cache.key("uglify", b"abc"));
		assert_eq!(cache.key("terser", b"abc"), cache.key("terser", b"abc"));
		assert_eq!(cache.key("terser", b"abc").len(), 40);
	}

	#[test]
	fn t_lookup_store() {
		let tmp = TempDir::new().unwrap();
		let cache = Cache::new(tmp.path());

		assert_eq!(cache.lookup(CacheKind::Js, "", b"var a = 1;").unwrap(), None);

		cache.store(CacheKind::Js, "", b"var a = 1;", b"var a=1").unwrap();
		assert_eq!(
			cache.lookup(CacheKind::Js, "", b"var a = 1;").unwrap().as_deref(),
			Some("var a=1"),
		);

		// The layout is fixed.
		let path = tmp.path().join("js").join(cache.key("", b"var a = 1;"));
		assert_eq!(std::fs::read(&path).unwrap(), b"var a=1");
		assert_eq!(cache.path(CacheKind::Js, &cache.key("", b"var a = 1;")), path);

		// Kinds don't bleed into each other.
		assert_eq!(cache.lookup(CacheKind::Css, "", b"var a = 1;").unwrap(), None);

		// Overwrites with identical data are fine.
		cache.store(CacheKind::Js, "", b"var a = 1;", b"var a=1").unwrap();
		assert_eq!(std::fs::read(&path).unwrap(), b"var a=1");
	}

	#[test]
	fn t_kind() {
		assert_eq!(CacheKind::Html.to_string(), "html");
		assert_eq!(CacheKind::Js.as_str(), "js");
		assert_eq!(CacheKind::Css.as_str(), "css");
	}
}
