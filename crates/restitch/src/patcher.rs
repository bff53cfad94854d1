//! In-place patching of expected-literal declarations.
//!
//! This is a pure text transform: given full file text, a 1-based line
//! number, and replacement text, it locates the nearest declaration of the
//! form
//!
//! ```text
//! var expected = @"...";
//! string expected = @"...";
//! ```
//!
//! anchored at a line start at or before the given line, and splices the
//! replacement over the declaration while preserving every other byte,
//! including the leading line-start whitespace.
//!
//! Anchoring on a line number plus this narrow lexical pattern keeps the
//! patcher independent of the host language's grammar: no AST is built.
//! Lines are delimited by `\n` (LF or CRLF); carriage-return-only line
//! endings are not supported.

use crate::error::RewriteError;

/// Byte span of one matched declaration, keyword through terminator.
struct Declaration {
    start: usize,
    end: usize,
}

/// Replaces the nearest expected-literal declaration at or before `line`.
///
/// The replacement text is spliced verbatim; the caller is responsible for
/// any quoting the target literal syntax requires.
///
/// # Errors
///
/// Returns [`RewriteError::LineOutOfRange`] if `line` exceeds the file's
/// line count, and [`RewriteError::PatternNotFound`] if no declaration is
/// anchored at or before `line`.
pub fn patch(content: &str, line: u32, replacement: &str) -> Result<String, RewriteError> {
    let anchor = line_start_offset(content, line)?;

    // One forward enumeration, keeping the last match anchored at or before
    // the target line. Equivalent to a right-to-left search from the anchor.
    let bytes = content.as_bytes();
    let mut nearest: Option<Declaration> = None;
    for line_start in line_starts(content) {
        if line_start > anchor {
            break;
        }
        if let Some(declaration) = match_declaration_at(bytes, line_start) {
            nearest = Some(declaration);
        }
    }

    let declaration = nearest.ok_or_else(|| RewriteError::pattern_not_found(line))?;
    let mut patched = content.to_owned();
    patched.replace_range(declaration.start..declaration.end, replacement);
    Ok(patched)
}

/// Maps a 1-based line number to the byte offset of that line's start.
fn line_start_offset(content: &str, line: u32) -> Result<usize, RewriteError> {
    let Some(mut remaining) = line.checked_sub(1) else {
        return Err(RewriteError::line_out_of_range(line, line_count(content)));
    };

    let mut start = 0usize;
    if remaining > 0 {
        for (index, byte) in content.bytes().enumerate() {
            if byte == b'\n' {
                remaining -= 1;
                if remaining == 0 {
                    start = index + 1;
                    break;
                }
            }
        }
    }

    if remaining > 0 {
        return Err(RewriteError::line_out_of_range(line, line_count(content)));
    }
    Ok(start)
}

/// Counts the file's lines, where every `\n` opens a new line.
fn line_count(content: &str) -> u32 {
    let breaks = content.bytes().filter(|byte| *byte == b'\n').count();
    u32::try_from(breaks).unwrap_or(u32::MAX).saturating_add(1)
}

/// Yields the byte offset of every line start, in order.
fn line_starts(content: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(
        content
            .bytes()
            .enumerate()
            .filter(|(_, byte)| *byte == b'\n')
            .map(|(index, _)| index + 1),
    )
}

/// Attempts to match one declaration anchored at `line_start`.
///
/// The returned span excludes the leading horizontal whitespace, which is
/// preserved by the splice.
fn match_declaration_at(bytes: &[u8], line_start: usize) -> Option<Declaration> {
    let start = skip_horizontal_ws(bytes, line_start);
    let mut pos = eat_keyword(bytes, start)?;
    pos = skip_ws(bytes, pos);
    pos = eat_identifier(bytes, pos, b"expected")?;
    pos = skip_ws(bytes, pos);
    pos = eat_byte(bytes, pos, b'=')?;
    pos = skip_ws(bytes, pos);
    pos = eat_byte(bytes, pos, b'@')?;
    pos = eat_byte(bytes, pos, b'"')?;
    pos = eat_verbatim_body(bytes, pos)?;
    pos = skip_ws(bytes, pos);
    let end = eat_byte(bytes, pos, b';')?;
    Some(Declaration { start, end })
}

/// Consumes `var` or `string` followed by whitespace.
fn eat_keyword(bytes: &[u8], pos: usize) -> Option<usize> {
    let after = eat_token(bytes, pos, b"var").or_else(|| eat_token(bytes, pos, b"string"))?;
    bytes
        .get(after)
        .filter(|byte| byte.is_ascii_whitespace())
        .map(|_| after)
}

/// Consumes an exact identifier followed by whitespace or `=`.
fn eat_identifier(bytes: &[u8], pos: usize, identifier: &[u8]) -> Option<usize> {
    let after = eat_token(bytes, pos, identifier)?;
    bytes
        .get(after)
        .filter(|byte| byte.is_ascii_whitespace() || **byte == b'=')
        .map(|_| after)
}

/// Consumes the verbatim literal body after the opening quote, including
/// doubled-quote escapes, up to and including the terminating quote.
fn eat_verbatim_body(bytes: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        match bytes.get(pos)? {
            b'"' if bytes.get(pos + 1) == Some(&b'"') => pos += 2,
            b'"' => return Some(pos + 1),
            _ => pos += 1,
        }
    }
}

fn eat_token(bytes: &[u8], pos: usize, token: &[u8]) -> Option<usize> {
    let end = pos.checked_add(token.len())?;
    (bytes.get(pos..end)? == token).then_some(end)
}

fn eat_byte(bytes: &[u8], pos: usize, expected: u8) -> Option<usize> {
    (bytes.get(pos) == Some(&expected)).then_some(pos + 1)
}

fn skip_horizontal_ws(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b' ' | b'\t')) {
        pos += 1;
    }
    pos
}

fn skip_ws(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}
