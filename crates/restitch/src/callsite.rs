//! Call-site resolution from runtime stack metadata.
//!
//! When a snapshot assertion fails, the rewriter needs to know which source
//! file and line declared the stale expected literal. This module captures
//! the current call stack, discards frames belonging to this crate and
//! frames without source metadata, and returns the first plausible caller
//! as a [`CallSite`].
//!
//! Stack metadata is a best-effort capability of the hosting runtime: in
//! release builds or stripped binaries the symbols carry no file or line
//! information, and resolution reports "no call site" rather than failing.

use backtrace::Backtrace;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// The compiled unit whose frames mark the resolver's own machinery.
const OWN_UNIT: &str = env!("CARGO_CRATE_NAME");

/// Source location of the assertion that requested a rewrite.
///
/// Produced once per rewrite request and consumed immediately; never
/// persisted or mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Source file containing the assertion.
    pub filepath: Utf8PathBuf,
    /// 1-based line number of the assertion.
    pub line: u32,
    /// Whether the enclosing scope plausibly holds a string-typed local.
    pub has_string_local: bool,
}

impl CallSite {
    /// Creates a new call site record.
    #[must_use]
    pub const fn new(filepath: Utf8PathBuf, line: u32, has_string_local: bool) -> Self {
        Self {
            filepath,
            line,
            has_string_local,
        }
    }

    /// Returns the source file containing the assertion.
    #[must_use]
    pub fn filepath(&self) -> &Utf8Path {
        &self.filepath
    }

    /// Returns the 1-based line number of the assertion.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns whether the enclosing scope has a string-typed local.
    #[must_use]
    pub const fn has_string_local(&self) -> bool {
        self.has_string_local
    }
}

/// One resolved frame of a captured call stack, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    unit: String,
    symbol: String,
    file: Option<Utf8PathBuf>,
    line: Option<u32>,
    has_string_local: bool,
}

impl StackFrame {
    /// Creates a frame with no source metadata.
    #[must_use]
    pub fn new(unit: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            symbol: symbol.into(),
            file: None,
            line: None,
            has_string_local: false,
        }
    }

    /// Attaches source file and line metadata to the frame.
    #[must_use]
    pub fn with_location(mut self, file: Utf8PathBuf, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    /// Marks the frame's scope as holding a string-typed local.
    #[must_use]
    pub const fn with_string_local(mut self, has_string_local: bool) -> Self {
        self.has_string_local = has_string_local;
        self
    }

    /// Returns the declaring compiled unit (crate) of the frame.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the frame's symbol name.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the frame's source file, when metadata is available.
    #[must_use]
    pub fn file(&self) -> Option<&Utf8Path> {
        self.file.as_deref()
    }

    /// Returns the frame's 1-based source line, when metadata is available.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        self.line
    }

    /// Returns whether the frame's scope holds a string-typed local.
    #[must_use]
    pub const fn has_string_local(&self) -> bool {
        self.has_string_local
    }
}

/// Best-effort resolution of the assertion call site.
///
/// Implementations must return `None` when stack metadata is unavailable
/// rather than failing; an absent call site is a normal outcome.
pub trait CallSiteResolver {
    /// Resolves the call site of the failing assertion, if one can be found.
    fn resolve(&self) -> Option<CallSite>;
}

/// Default resolver backed by a native stack capture.
///
/// Native symbols expose no local-variable metadata, so every captured
/// frame reports `has_string_local = false` and inline (closure) frames are
/// never selected by this resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceResolver;

impl BacktraceResolver {
    /// Creates a new backtrace-backed resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CallSiteResolver for BacktraceResolver {
    fn resolve(&self) -> Option<CallSite> {
        let frames = capture_frames();
        select_call_site(&frames, OWN_UNIT)
    }
}

/// Selects the first plausible caller frame as a [`CallSite`].
///
/// Scans outward from the innermost frame, skipping:
///
/// - frames declared in `own_unit` (the resolver's own machinery);
/// - frames without file or line metadata (optimised or foreign code);
/// - inline/anonymous frames whose scope has no string-typed local, which
///   are assumed not to host an assertion.
///
/// Returns `None` when the stack is exhausted without a match.
#[must_use]
pub fn select_call_site(frames: &[StackFrame], own_unit: &str) -> Option<CallSite> {
    for frame in frames {
        if frame.unit() == own_unit {
            continue;
        }
        let (Some(file), Some(line)) = (frame.file(), frame.line()) else {
            continue;
        };
        if is_inline_symbol(frame.symbol()) && !frame.has_string_local() {
            continue;
        }
        return Some(CallSite::new(
            file.to_owned(),
            line,
            frame.has_string_local(),
        ));
    }
    None
}

/// Detects inline/anonymous function frames by naming convention.
///
/// Compiler-generated names are bracketed (`<Outer>b__0`) or carry the Rust
/// closure marker (`outer::{{closure}}`).
pub(crate) fn is_inline_symbol(symbol: &str) -> bool {
    (symbol.starts_with('<') && symbol.contains('>')) || symbol.contains("{{closure}}")
}

/// Captures the current stack as resolved [`StackFrame`] records.
fn capture_frames() -> Vec<StackFrame> {
    let backtrace = Backtrace::new();
    let mut frames = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            let Some(name) = symbol.name().map(|name| name.to_string()) else {
                continue;
            };
            let location = symbol
                .filename()
                .and_then(|path| Utf8PathBuf::from_path_buf(path.to_path_buf()).ok())
                .zip(symbol.lineno());

            let mut record = StackFrame::new(unit_of(&name), name);
            if let Some((file, line)) = location {
                record = record.with_location(file, line);
            }
            frames.push(record);
        }
    }

    frames
}

/// Extracts the declaring crate from a fully qualified symbol name.
fn unit_of(symbol: &str) -> String {
    let trimmed = symbol.trim_start_matches('<');
    trimmed
        .split("::")
        .next()
        .unwrap_or(trimmed)
        .trim_end_matches('>')
        .to_owned()
}
