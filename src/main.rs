/*!
# HTMLPress

`HTMLPress` is a post-render HTML tidier. Point it at the output directory of
your static site generator and it will rewrite every `.htm(l)` document it
finds, in place and in parallel, with empty comments stripped, insignificant
whitespace squeezed out, void elements self-closed, inline scripts and
styles minified, and everything consistently reindented.

Documents that come out the same as they went in are not rewritten.



## Use

```bash
# Press one file.
htmlpress /path/to/one.html

# Recursively press every .htm(l) file in a directory.
htmlpress /path/to

# Do the same thing but with a progress bar.
htmlpress -p /path/to

# Memoize results between runs.
htmlpress --cache-dir /tmp/htmlpress /path/to

# Load options from a file.
htmlpress -c htmlpress.toml /path/to
```



## Configuration

The `-c`/`--config` file is TOML. Every key is optional:

```toml
# Format version.
version = 2

# Where fatal errors are reported: "stderr" or "silent".
logger = "stderr"

# Attribute tweaks.
unquoted_attributes = false
drop_empty_values = false

# Join lines instead of reindenting.
strip_crlf = false

# Spaces per indentation level.
indent = 2

# JavaScript: "auto" (Terser if installed), "terser", or "none".
js_minifier = "auto"
terser = "/usr/local/bin/terser"

# CSS: "lightningcss" (the default) or "none".
css_minifier = "lightningcss"
lightningcss = "/usr/local/bin/lightningcss"
css_targets = ">= 0.25%"
css_minify = true

# What to do if lightningcss is missing: "fail" or "passthrough".
css_missing = "fail"

# Memoization.
cache_dir = "/tmp/htmlpress"
cache_key = "content"

# Passed straight through to Terser.
[js_minifier_options]
ecma = 2020
```
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



mod cli;

use argyle::Argument;
use cli::CliError;
use dowser::{
	Dowser,
	Extension,
};
use fyi_msg::{
	BeforeAfter,
	Msg,
	MsgKind,
	Progless,
};
use htmlpress::{
	PressError,
	PressOptions,
	RawOptions,
};
use rayon::iter::{
	IntoParallelRefIterator,
	ParallelIterator,
};
use std::{
	fs,
	io::Read,
	path::{
		Path,
		PathBuf,
	},
	sync::Mutex,
};



include!(concat!(env!("OUT_DIR"), "/htmlpress-extensions.rs"));



/// # Main.
fn main() {
	match main__() {
		Ok(()) => {},
		Err(CliError::PrintVersion) => {
			println!(concat!("HTMLPress v", env!("CARGO_PKG_VERSION")));
		},
		Err(CliError::PrintHelp) => { helper(); },
		Err(e) => {
			Msg::error(e.to_string()).eprint();
			std::process::exit(1);
		},
	}
}

#[inline]
/// # Actual Main.
fn main__() -> Result<(), CliError> {
	// Parse CLI arguments.
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut progress = false;
	let mut config: Option<PathBuf> = None;
	let mut cache_dir: Option<PathBuf> = None;
	let mut raw_paths: Vec<PathBuf> = Vec::new();
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(CliError::PrintHelp),
			Argument::Key("-p" | "--progress") => { progress = true; },
			Argument::Key("-V" | "--version") => return Err(CliError::PrintVersion),

			Argument::KeyWithValue("-c" | "--config", s) => { config = Some(PathBuf::from(s)); },
			Argument::KeyWithValue("--cache-dir", s) => { cache_dir = Some(PathBuf::from(s)); },
			Argument::KeyWithValue("-l" | "--list", s) => {
				raw_paths.extend(read_list(&s).ok_or(CliError::ListFile)?);
			},

			Argument::Path(s) => { raw_paths.push(PathBuf::from(s)); },

			// Nothing else is expected.
			_ => {},
		}
	}

	// Build the options.
	let mut raw = match config {
		Some(path) => RawOptions::from_path(path)?,
		None => RawOptions::default(),
	};
	if cache_dir.is_some() { raw.cache_dir = cache_dir; }
	let opts = PressOptions::try_from(raw)?;

	// Find the documents.
	let paths: Vec<PathBuf> = Dowser::default()
		.with_paths(raw_paths)
		.filter(|p| is_html(p))
		.collect();
	if paths.is_empty() { return Err(CliError::NoDocuments); }

	let failed: Mutex<Vec<(PathBuf, PressError)>> = Mutex::new(Vec::new());
	let cb = |p: &PathBuf| if let Err(e) = press_file(p, &opts) {
		if let Ok(mut v) = failed.lock() { v.push((p.clone(), e)); }
	};

	// Sexy run-through.
	if progress {
		let progress = Progless::try_from(paths.len())
			.map_err(|_| CliError::Progress)?
			.with_title(Some(Msg::new(("HTMLPress", 199), "Pressing documents…")));

		// Check file sizes before we start.
		let mut ba = BeforeAfter::start(du(&paths));

		paths.par_iter().for_each(|p| {
			let _task = progress.task(p.to_string_lossy());
			cb(p);
		});

		// And again after.
		ba.stop(du(&paths));

		progress.finish();
		progress.summary(MsgKind::Crunched, "document", "documents")
			.with_bytes_saved(ba)
			.print();
	}
	else { paths.par_iter().for_each(cb); }

	// Report failures, if any.
	let failed = failed.into_inner().unwrap_or_default();
	if failed.is_empty() { Ok(()) }
	else {
		for (path, e) in &failed {
			Msg::error(format!("{}: {e}", path.display()))
				.with_newline(true)
				.eprint();
		}
		Err(CliError::Failed(failed.len()))
	}
}

/// # Press File.
///
/// Press the document and, if anything changed, save it back atomically.
fn press_file(path: &Path, opts: &PressOptions) -> Result<(), PressError> {
	let raw = fs::read_to_string(path)?;
	let out = htmlpress::press(&raw, opts)?;
	if out != raw { write_atomic::write_file(path, out.as_bytes())?; }
	Ok(())
}

/// # Is HTML?
fn is_html(path: &Path) -> bool { E_HTML == path || E_HTM == path }

/// # Disk Usage.
///
/// Add up the sizes of the files.
fn du(paths: &[PathBuf]) -> u64 {
	paths.par_iter()
		.filter_map(|p| fs::metadata(p).ok().map(|m| m.len()))
		.sum()
}

/// # Read Path List.
///
/// Read one path per line from a file, or STDIN if the "file" is `-`. Blank
/// lines are ignored.
fn read_list(src: &str) -> Option<Vec<PathBuf>> {
	let raw =
		if src == "-" {
			let mut raw = String::new();
			std::io::stdin().read_to_string(&mut raw).ok()?;
			raw
		}
		else { fs::read_to_string(src).ok()? };

	Some(
		raw.lines()
			.map(str::trim)
			.filter(|l| ! l.is_empty())
			.map(PathBuf::from)
			.collect()
	)
}

#[cold]
/// # Print Help.
fn helper() {
	println!(concat!(
		r"
    ._______________.
    |  ___________  |
    | |  <html>   | |
    | |___________| |   ", "\x1b[38;5;199mHTMLPress\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r"
    |_______________|   Compact, minify, and
     \\\\\\\\\\\\\\\\\   reindent HTML in place.

USAGE:
    htmlpress [FLAGS] [OPTIONS] <PATH(S)>...

FLAGS:
    -h, --help        Print help information and exit.
    -p, --progress    Show progress bar while working.
    -V, --version     Print version information and exit.

OPTIONS:
    -c, --config <FILE>    Load press options from this TOML file.
        --cache-dir <DIR>  Memoize pressed documents and minified inline
                           assets in this directory.
    -l, --list <FILE>      Read (absolute) file and/or directory paths from
                           this text file, or STDIN if '-', one entry per
                           line, instead of or in addition to <PATH(S)>.

ARGS:
    <PATH(S)>...    One or more files or directories to crawl and press.
"
	));
}
