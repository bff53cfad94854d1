//! Self-healing snapshot assertions for textual expected values.
//!
//! When a snapshot-style test fails because a generated rendering changed,
//! this crate locates the source line that declared the stale expected
//! literal, rewrites that declaration in place with the new value, and
//! round-trips the file's original text encoding so the patch is invisible
//! apart from the intended change.
//!
//! The pieces compose leaf-to-root:
//!
//! - **Call-site resolution** via [`CallSiteResolver`] walks the stack at
//!   failure time and yields a [`CallSite`] (file, line, and whether the
//!   enclosing scope plausibly holds a string local). Resolution is
//!   best-effort: without debug metadata it reports "no call site" rather
//!   than failing.
//! - **File access** via [`FileStore`]: [`DiskStore`] for real files (with
//!   a minimum-size sanity guard), [`MemoryStore`] as the injectable test
//!   seam.
//! - **Literal patching** via [`patch`], a pure text transform that finds
//!   the nearest `var expected = @"...";` or `string expected = @"...";`
//!   declaration at or before a line and splices in the replacement.
//! - **Encoding round-trip** via [`Encoding`]: the preamble (byte-order
//!   mark or absence thereof) is detected on read and re-emitted on write.
//! - **Orchestration** via [`Rewriter`], which runs the one-shot
//!   read → decode → patch → encode → write sequence.
//!
//! # Example
//!
//! ```
//! use camino::Utf8PathBuf;
//! use restitch::{CallSite, MemoryStore, Rewriter};
//!
//! let store = MemoryStore::new();
//! store.insert(
//!     "tests/render.cs",
//!     "class RenderTests {\n  string expected = @\"old\";\n}",
//! );
//!
//! let rewriter = Rewriter::new(store);
//! let site = CallSite::new(Utf8PathBuf::from("tests/render.cs"), 2, false);
//! rewriter.rewrite(&site, "string expected = @\"new\";")?;
//! # Ok::<(), restitch::RewriteError>(())
//! ```
//!
//! No AST of the host language is built: the patcher anchors on a line
//! number plus a narrow lexical pattern, which keeps it independent of the
//! broader grammar while remaining precise enough to leave unrelated code
//! untouched.

mod callsite;
mod encoding;
mod error;
mod patcher;
mod rewriter;
mod store;

pub use callsite::{BacktraceResolver, CallSite, CallSiteResolver, StackFrame, select_call_site};
pub use encoding::{CANDIDATES, Encoding};
pub use error::RewriteError;
pub use patcher::patch;
pub use rewriter::Rewriter;
pub use store::{DEFAULT_MIN_SOURCE_LEN, DiskStore, FileStore, MemoryStore};
