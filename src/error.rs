//! Error types for stat resolution.
//!
//! Resolution itself never fails: malformed modifiers are skipped.
//! The fallible edges of the crate (strict modifier parsing, label lookup,
//! configuration loading, skill-check assembly and the dependency graph)
//! report through the `StatError` enum.

use crate::graph::StatNode;
use crate::stat_id::{Attribute, Skill};
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[StatNode]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|node| node.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors reported by the fallible parts of the crate.
///
/// # Examples
///
/// ```rust
/// use sheetstat::StatError;
///
/// let err = StatError::InvalidModifier("x2".to_string());
/// assert_eq!(err.to_string(), "Invalid modifier: x2");
/// ```
#[derive(Debug, Error)]
pub enum StatError {
    /// A dependency cycle was detected in the stat graph.
    ///
    /// Contains the path of nodes involved in the cycle, closed on
    /// the node it started from.
    #[error("Cycle detected: {}", format_cycle_path(.path))]
    Cycle { path: Vec<StatNode> },

    /// A modifier string is neither a signed integer nor a `/n` divisor.
    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    /// A host label does not name any known attribute, stat or skill.
    #[error("Unknown stat label: {0}")]
    UnknownLabel(String),

    /// A skill check was requested against an attribute that does not own the skill.
    #[error("Skill {skill} belongs to {expected}, not {requested}")]
    SkillAttributeMismatch {
        skill: Skill,
        expected: Attribute,
        requested: Attribute,
    },

    /// The resolver configuration could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The resolver configuration is not valid TOML for `ResolverConfig`.
    #[error("Failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    /// The resolver configuration parsed but holds unusable values.
    #[error("Configuration validation error: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_id::CoreStat;

    #[test]
    fn test_error_display() {
        let err = StatError::UnknownLabel("WITCHER.Actor.Stat.Foo".to_string());
        assert!(err.to_string().contains("WITCHER.Actor.Stat.Foo"));
    }

    #[test]
    fn test_cycle_error_display() {
        let a = StatNode::Base;
        let b = StatNode::Core(CoreStat::Stun);
        let err = StatError::Cycle {
            path: vec![a, b, a],
        };
        let display = err.to_string();
        assert!(display.contains("Cycle detected"));
        assert!(display.contains("base"));
        assert!(display.contains("stun"));
        assert!(display.contains(" -> "));
    }

    #[test]
    fn test_mismatch_display() {
        let err = StatError::SkillAttributeMismatch {
            skill: Skill::Dodge,
            expected: Attribute::Ref,
            requested: Attribute::Dex,
        };
        assert_eq!(err.to_string(), "Skill dodge belongs to ref, not dex");
    }
}
