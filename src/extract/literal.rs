/***************************************/
/*        3rd party libraries          */
/***************************************/
use regex::Regex;
use thiserror::Error;

/// `solution =` or `solution: Type =`, followed by the opening brace of the literal.
const SOLUTION_ASSIGNMENT: &str = r"\bsolution\s*(?::\s*[A-Za-z_$][\w$.]*(?:<[^=;{}]*>)?\s*)?=\s*\{";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid solution pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/**
 * Finds the object literal assigned to `solution` in a controller source file.
 *
 * Returns the text from the opening `{` through its matching `}`, exactly as written. The
 * assignment has to be terminated by `;`. Braces inside string literals, template literals and
 * comments are not counted. The first qualifying assignment wins; `Ok(None)` when there is none.
 */
pub fn extract_solution_literal(source: &str) -> Result<Option<&str>, ExtractError> {
    let assignment = Regex::new(SOLUTION_ASSIGNMENT)?;

    for found in assignment.find_iter(source) {
        let open = found.end() - 1;
        let Some(close) = matching_brace(source, open) else {
            continue;
        };
        let rest = source[close + 1..].trim_start();
        if rest.starts_with(';') {
            return Ok(Some(&source[open..=close]));
        }
    }

    Ok(None)
}

/// Byte index of the `}` closing the `{` at `open`.
fn matching_brace(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => i = skip_string(bytes, i, quote)?,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..].iter().position(|&b| b == b'\n').map_or(bytes.len(), |n| i + n);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = source[i + 2..].find("*/").map(|n| i + 2 + n + 1)?;
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Index of the closing quote of the string starting at `start`.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b if b == quote => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/***************************************/
/*             Unit tests              */
/***************************************/
