//! Requirement line parsing.
//!
//! `requires.txt` declares one requirement per non-empty line:
//! `name ['[' extra ']'] [ws* ('=='|'>='|'>') ws* version]`. Name and extra
//! are restricted to `[A-Za-z0-9._-]+`, versions to `[0-9.]+`. The regex is
//! anchored to the whole trimmed line — silently truncating a malformed
//! requirement would corrupt the graph, so a partial match is an error.

use crate::error::{IndexError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

static REQUIREMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9._-]+)(?:\[([A-Za-z0-9._-]+)\])?\s*(?:(==|>=|>)\s*([0-9.]+))?$")
        .expect("requirement regex")
});

/// Version comparison operator in a requirement constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintOp {
    /// `==`
    #[serde(rename = "==")]
    Eq,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
    /// `>`
    #[serde(rename = ">")]
    Gt,
}

impl ConstraintOp {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Self::Eq),
            ">=" => Some(Self::Ge),
            ">" => Some(Self::Gt),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Gt => ">",
        })
    }
}

/// A version bound on a requirement.
///
/// Operator and version travel together: a requirement either has both or
/// has neither, which is why [`Requirement::constraint`] is a single
/// `Option` rather than two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConstraint {
    pub op: ConstraintOp,
    pub version: String,
}

/// One parsed line of requirements metadata.
///
/// The extra, when present, names an optional sub-feature requested from the
/// package; it does not change graph identity — edges are keyed on the name
/// alone.
///
/// # Examples
///
/// ```
/// use pypigraph_index::{ConstraintOp, Requirement};
///
/// let req: Requirement = "celery[redis] >= 3.0".parse().unwrap();
/// assert_eq!(req.name, "celery");
/// assert_eq!(req.extra.as_deref(), Some("redis"));
/// let constraint = req.constraint.as_ref().unwrap();
/// assert_eq!(constraint.op, ConstraintOp::Ge);
/// assert_eq!(constraint.version, "3.0");
///
/// assert!("foo >= ".parse::<Requirement>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<VersionConstraint>,
}

impl FromStr for Requirement {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        let parse_error = || IndexError::RequirementParse { line: s.to_owned() };

        let trimmed = s.trim();
        let caps = REQUIREMENT_RE.captures(trimmed).ok_or_else(parse_error)?;

        let constraint = match (caps.get(3), caps.get(4)) {
            (Some(op), Some(version)) => Some(VersionConstraint {
                // The alternation guarantees a known token; the error arm
                // keeps the parser total anyway.
                op: ConstraintOp::from_token(op.as_str()).ok_or_else(parse_error)?,
                version: version.as_str().to_owned(),
            }),
            _ => None,
        };

        Ok(Self {
            name: caps[1].to_owned(),
            extra: caps.get(2).map(|m| m.as_str().to_owned()),
            constraint,
        })
    }
}

impl fmt::Display for Requirement {
    /// Renders the canonical form, without interior whitespace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(extra) = &self.extra {
            write!(f, "[{extra}]")?;
        }
        if let Some(constraint) = &self.constraint {
            write!(f, "{}{}", constraint.op, constraint.version)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Requirement {
        line.parse().unwrap()
    }

    #[test]
    fn test_bare_name() {
        let req = parse("requests");
        assert_eq!(req.name, "requests");
        assert_eq!(req.extra, None);
        assert_eq!(req.constraint, None);
    }

    #[test]
    fn test_name_with_dots_and_dashes() {
        assert_eq!(parse("zope.interface").name, "zope.interface");
        assert_eq!(parse("python-dateutil").name, "python-dateutil");
    }

    #[test]
    fn test_constraint_operators() {
        assert_eq!(parse("foo==1.0").constraint.unwrap().op, ConstraintOp::Eq);
        assert_eq!(parse("foo>=1.0").constraint.unwrap().op, ConstraintOp::Ge);
        assert_eq!(parse("foo>1.0").constraint.unwrap().op, ConstraintOp::Gt);
    }

    #[test]
    fn test_whitespace_around_operator() {
        let req = parse("Django >= 1.5.1");
        assert_eq!(req.name, "Django");
        let constraint = req.constraint.unwrap();
        assert_eq!(constraint.op, ConstraintOp::Ge);
        assert_eq!(constraint.version, "1.5.1");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let req = parse("  requests==2.0  ");
        assert_eq!(req.name, "requests");
    }

    #[test]
    fn test_extra() {
        let req = parse("celery[redis]");
        assert_eq!(req.name, "celery");
        assert_eq!(req.extra.as_deref(), Some("redis"));
        assert_eq!(req.constraint, None);
    }

    #[test]
    fn test_malformed_lines_fail_not_truncate() {
        for line in [
            "foo >= ",
            "foo==1.0==2.0",
            "foo bar",
            "foo[",
            "foo[extra",
            "foo==",
            "foo>=1.0,<2.0",
            "-e git+https://example.com/x.git",
            "",
        ] {
            let result = line.parse::<Requirement>();
            assert!(result.is_err(), "expected failure for {line:?}");
            if !line.is_empty() {
                let message = result.unwrap_err().to_string();
                assert!(message.contains(line.trim()), "message should carry the raw line");
            }
        }
    }

    #[test]
    fn test_display_round_trips() {
        for line in ["requests", "celery[redis]", "Django >= 1.5.1", "foo==1.0"] {
            let req = parse(line);
            let rendered = req.to_string();
            assert_eq!(parse(&rendered), req, "round trip for {line:?}");
        }
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(parse("Django >= 1.5.1").to_string(), "Django>=1.5.1");
        assert_eq!(parse("celery[redis]==3.0").to_string(), "celery[redis]==3.0");
    }

    #[test]
    fn test_serialize() {
        let req = parse("flask>=0.9");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["name"], "flask");
        assert_eq!(json["constraint"]["op"], ">=");
        assert_eq!(json["constraint"]["version"], "0.9");
        assert!(json.get("extra").is_none());
    }
}
