//! Rewrite orchestration: read, decode, patch, encode, write.

use crate::callsite::CallSite;
use crate::encoding::Encoding;
use crate::error::RewriteError;
use crate::patcher;
use crate::store::FileStore;

/// Applies expected-literal rewrites to files through a [`FileStore`].
///
/// Each rewrite is a one-shot, synchronous sequence: read the raw bytes,
/// detect the encoding from the preamble, decode, patch the declaration,
/// re-encode with the same preamble, and write back. The single write
/// happens only after every prior step succeeded, so a failed rewrite
/// never leaves a partially updated file.
#[derive(Debug)]
pub struct Rewriter<S> {
    store: S,
}

impl<S: FileStore> Rewriter<S> {
    /// Creates a rewriter over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Rewrites the declaration at `site` with `new_expected`.
    ///
    /// The file's encoding preamble is preserved byte-for-byte; no other
    /// normalisation is applied. Failures are fatal and propagate
    /// unchanged — the operation runs rarely and under direct developer
    /// supervision, so silent recovery is inappropriate.
    ///
    /// # Errors
    ///
    /// Propagates [`RewriteError`] from reading, decoding, patching, or
    /// writing; no retry or fallback encoding is attempted once a
    /// candidate has matched.
    pub fn rewrite(&self, site: &CallSite, new_expected: &str) -> Result<(), RewriteError> {
        let raw = self.store.read(site.filepath())?;
        let encoding = Encoding::detect(&raw);
        let body = raw.get(encoding.preamble().len()..).unwrap_or_default();
        let text = encoding.decode(body)?;
        let patched = patcher::patch(&text, site.line(), new_expected)?;
        self.store.write(site.filepath(), &encoding.encode(&patched))
    }
}
