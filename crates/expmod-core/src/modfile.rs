//! Requirement extraction from `go.mod` files.
//!
//! Only `require` directives are interpreted; every other directive is
//! skipped, including its parenthesised block. Both forms are accepted:
//! ```text
//! require github.com/pkg/errors v0.9.1
//!
//! require (
//!     github.com/sahilm/fuzzy v0.1.0
//!     golang.org/x/sys v0.5.0 // indirect
//! )
//! ```

use crate::error::{ExpmodError, Result};

/// A single `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Module path, e.g. `github.com/pkg/errors`.
    pub module_path: String,
    /// Required version, e.g. `v0.9.1`.
    pub version: String,
    /// Marked `// indirect`: pulled in transitively, not declared directly.
    pub indirect: bool,
}

impl Requirement {
    /// Create a requirement.
    pub fn new(module_path: impl Into<String>, version: impl Into<String>, indirect: bool) -> Self {
        Requirement {
            module_path: module_path.into(),
            version: version.into(),
            indirect,
        }
    }
}

/// Parse the requirements of a `go.mod` file, in declaration order.
pub fn parse_requirements(input: &str) -> Result<Vec<Requirement>> {
    let mut requirements = Vec::new();
    // (directive is `require`, line the block opened on)
    let mut block: Option<(bool, usize)> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let (code, comment) = split_comment(raw);
        let code = code.trim();
        if code.is_empty() {
            continue;
        }

        if let Some((is_require, _)) = block {
            if code == ")" {
                block = None;
            } else if is_require {
                requirements.push(parse_require(code, comment, line_no)?);
            }
            continue;
        }

        if let Some(head) = code.strip_suffix('(') {
            let verb = head.trim();
            if !verb.is_empty() && !verb.contains(char::is_whitespace) {
                block = Some((verb == "require", line_no));
                continue;
            }
        }

        let (verb, rest) = code.split_once(char::is_whitespace).unwrap_or((code, ""));
        if verb == "require" {
            requirements.push(parse_require(rest.trim(), comment, line_no)?);
        }
    }

    if let Some((_, start)) = block {
        return Err(ExpmodError::Manifest {
            line: start,
            detail: "unterminated block, missing ')'".to_string(),
        });
    }

    Ok(requirements)
}

fn parse_require(text: &str, comment: Option<&str>, line: usize) -> Result<Requirement> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    match fields.as_slice() {
        [path, version] => Ok(Requirement::new(
            unquote(path),
            unquote(version),
            comment.is_some_and(is_indirect),
        )),
        [_] => Err(ExpmodError::Manifest {
            line,
            detail: format!("missing version for '{}'", fields[0]),
        }),
        _ => Err(ExpmodError::Manifest {
            line,
            detail: "usage: require module/path v1.2.3".to_string(),
        }),
    }
}

fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once("//") {
        Some((code, comment)) => (code, Some(comment)),
        None => (line, None),
    }
}

// `// indirect` or `// indirect; other notes`
fn is_indirect(comment: &str) -> bool {
    comment
        .split_whitespace()
        .next()
        .is_some_and(|word| word.trim_end_matches(';') == "indirect")
}

fn unquote(s: &str) -> String {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
        .to_string()
}
