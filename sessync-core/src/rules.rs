//! Rewrite rules and the rewrite engine.
//!
//! A [`RewriteRule`] pairs two spellings of the same path fragment, one valid on
//! the remote host and one valid locally. A [`RuleSet`] orients the rules for a
//! [`Direction`] and applies them as literal substring replacements.
//!
//! # Ordering
//!
//! Rules are applied longest pattern first. Patterns are often substrings of
//! other patterns (`-var-tmp` inside `-var-tmp-vibe`), and the general one
//! would otherwise consume the specific one before it could match. For any
//! two patterns where one contains the other, the longer is applied first.
//! Equal lengths keep configuration order (the sort is stable).

use std::borrow::Cow;
use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;

use crate::types::Direction;

/// A pair of equivalent path fragments, one per side of the sync boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteRule {
    pub remote: String,
    pub local: String,
}

impl RewriteRule {
    pub fn new(remote: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            local: local.into(),
        }
    }

    /// `(pattern, replacement)` for the given direction.
    pub fn oriented(&self, direction: Direction) -> (&str, &str) {
        match direction {
            Direction::RemoteToLocal => (&self.remote, &self.local),
            Direction::LocalToRemote => (&self.local, &self.remote),
        }
    }

    /// A rule that can never change its input.
    pub fn is_noop(&self) -> bool {
        self.remote.is_empty() || self.local.is_empty() || self.remote == self.local
    }
}

/// A statically detectable interference between two rules of one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collision {
    /// A later-applied pattern occurs inside an earlier rule's replacement,
    /// so text produced by the earlier rule would be rewritten again.
    Cascade {
        earlier_pattern: String,
        earlier_replacement: String,
        later_pattern: String,
    },
    /// Two rules share a pattern; only the first can ever match.
    DuplicatePattern { pattern: String },
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collision::Cascade {
                earlier_pattern,
                earlier_replacement,
                later_pattern,
            } => write!(
                f,
                "replacement '{earlier_replacement}' (for '{earlier_pattern}') contains pattern '{later_pattern}'"
            ),
            Collision::DuplicatePattern { pattern } => {
                write!(f, "pattern '{pattern}' appears in more than one rule")
            }
        }
    }
}

/// Rules oriented for one direction, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    direction: Direction,
    pairs: Vec<(String, String)>,
}

impl RuleSet {
    /// Orient `rules` for `direction`, drop no-op rules and sort longest pattern first.
    pub fn build(rules: &[RewriteRule], direction: Direction) -> Self {
        let mut pairs: Vec<(String, String)> = rules
            .iter()
            .filter(|rule| !rule.is_noop())
            .map(|rule| {
                let (pattern, replacement) = rule.oriented(direction);
                (pattern.to_owned(), replacement.to_owned())
            })
            .collect();
        pairs.sort_by_key(|(pattern, _)| Reverse(pattern.len()));
        Self { direction, pairs }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// `(pattern, replacement)` pairs in application order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply every rule, in order, over the cumulative result.
    ///
    /// Returns the input borrowed when no pattern occurs in it.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for (pattern, replacement) in &self.pairs {
            if out.contains(pattern.as_str()) {
                out = Cow::Owned(out.replace(pattern.as_str(), replacement));
            }
        }
        out
    }

    /// Every pair of rules in this set that interfere with each other.
    pub fn collisions(&self) -> Vec<Collision> {
        let mut found = Vec::new();
        for (i, (earlier_pattern, earlier_replacement)) in self.pairs.iter().enumerate() {
            for (later_pattern, _) in &self.pairs[i + 1..] {
                if later_pattern == earlier_pattern {
                    found.push(Collision::DuplicatePattern {
                        pattern: later_pattern.clone(),
                    });
                } else if earlier_replacement.contains(later_pattern.as_str()) {
                    found.push(Collision::Cascade {
                        earlier_pattern: earlier_pattern.clone(),
                        earlier_replacement: earlier_replacement.clone(),
                        later_pattern: later_pattern.clone(),
                    });
                }
            }
        }
        found
    }
}

/// Rewrite `text` with `rules` oriented for `direction`.
pub fn rewrite(text: &str, rules: &[RewriteRule], direction: Direction) -> String {
    RuleSet::build(rules, direction).apply(text).into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
