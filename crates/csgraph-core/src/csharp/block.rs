//! Brace-balanced block recovery.
//!
//! Every `{` and `}` counts, including those inside string literals and
//! comments. A literal containing an unbalanced brace can therefore shift the
//! recovered block.

/// Return the substring from `start` through the brace that closes the first
/// `{` at or after `start`. Without a matching close, the remainder of the
/// text is returned.
pub fn extract_block(text: &str, start: usize) -> &str {
    let Some(rest) = text.get(start..) else {
        return "";
    };
    let mut depth = 0usize;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..=i];
                }
            }
            _ => {}
        }
    }
    rest
}

/// Strip the outer braces from a recovered block.
pub fn block_inner(block: &str) -> &str {
    let inner = block.strip_prefix('{').unwrap_or(block);
    inner.strip_suffix('}').unwrap_or(inner)
}

/// Number of braces left open before `offset`.
pub fn depth_at(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .fold(0usize, |depth, b| match b {
            b'{' => depth + 1,
            b'}' => depth.saturating_sub(1),
            _ => depth,
        })
}

/// The part of a type body that belongs to the type itself: nested blocks
/// (method bodies, nested type bodies, initializers) are blanked, keeping
/// their braces and line breaks. Auto-property accessor blocks are kept.
pub fn member_view(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut i = 0;
    while let Some(c) = body[i..].chars().next() {
        if c == '{' && depth == 1 {
            let nested = extract_block(body, i);
            if is_accessor_block(nested) {
                out.push_str(nested);
            } else {
                out.push_str(&blank(nested));
            }
            i += nested.len();
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        out.push(c);
        i += c.len_utf8();
    }
    out
}

/// Replace everything but braces and newlines with spaces.
pub fn blank(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '{' | '}' | '\n' => c,
            _ => ' ',
        })
        .collect()
}

fn is_accessor_block(block: &str) -> bool {
    let inner = block_inner(block).trim();
    if inner.is_empty() || !inner.ends_with(';') {
        return false;
    }
    inner
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .all(|accessor| {
            let keyword = accessor.rsplit(char::is_whitespace).next().unwrap_or("");
            matches!(keyword, "get" | "set" | "init")
        })
}
