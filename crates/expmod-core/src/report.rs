//! Report formatting.
//!
//! Each described dependency produces:
//! ```text
//! github.com/sahilm/fuzzy v0.1.0:
//!     Go library that provides fuzzy string matching
//! ```
//! (with a tab before the description). Failures go to a separate stream
//! as `error: <module path> - <cause>`.

use std::io::{self, Write};

use crate::pipeline::Outcome;

/// Format one report entry.
pub fn format_entry(module_path: &str, version: &str, description: &str) -> String {
    format!("{module_path} {version}:\n\t{description}\n")
}

/// Format one diagnostic line.
pub fn format_failure(module_path: &str, cause: &dyn std::fmt::Display) -> String {
    format!("error: {module_path} - {cause}\n")
}

/// Write entries to `out` and diagnostics to `err`, in outcome order.
pub fn write_report<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    outcomes: &[Outcome],
) -> io::Result<()> {
    for outcome in outcomes {
        match outcome {
            Outcome::Described {
                requirement,
                description,
                ..
            } => out.write_all(
                format_entry(&requirement.module_path, &requirement.version, description)
                    .as_bytes(),
            )?,
            Outcome::Failed { requirement, error } => err.write_all(
                format_failure(&requirement.module_path, &**error).as_bytes(),
            )?,
        }
    }
    out.flush()?;
    err.flush()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ExpmodError;
    use crate::modfile::Requirement;
    use crate::reference::RepositoryRef;

    #[test]
    fn entry_format() {
        assert_eq!(
            format_entry("gopkg.in/yaml.v3", "v3.0.1", "YAML support for the Go language."),
            "gopkg.in/yaml.v3 v3.0.1:\n\tYAML support for the Go language.\n"
        );
    }

    #[test]
    fn entries_and_failures_go_to_their_streams() {
        let outcomes = vec![
            Outcome::Described {
                requirement: Requirement::new("github.com/a/b", "v1.0.0", false),
                repository: RepositoryRef::new("a", "b"),
                description: "first".to_string(),
                cached: true,
            },
            Outcome::Failed {
                requirement: Requirement::new("example.com/broken", "v0.1.0", false),
                error: Arc::new(ExpmodError::InvalidReference {
                    path: "example.com/broken".to_string(),
                }),
            },
            Outcome::Described {
                requirement: Requirement::new("github.com/c/d", "v2.0.0", false),
                repository: RepositoryRef::new("c", "d"),
                description: String::new(),
                cached: false,
            },
        ];

        let mut out = Vec::new();
        let mut err = Vec::new();
        write_report(&mut out, &mut err, &outcomes).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "github.com/a/b v1.0.0:\n\tfirst\ngithub.com/c/d v2.0.0:\n\t\n"
        );
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "error: example.com/broken - can't determine repository for 'example.com/broken'\n"
        );
    }
}
