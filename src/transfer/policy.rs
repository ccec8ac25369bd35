//! Collision policies, operator remediation choices and item states.

use std::fmt;
use std::str::FromStr;

/// What to do when a paste target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Paste under the first free `name_copyN.ext` next to the target.
    #[default]
    CreateSibling,
    /// Record the collision as an error and let the operator decide.
    ResolveLater,
    /// Treat the existing target as the result; nothing is copied.
    MarkResolved,
}

impl CollisionPolicy {
    /// Lenient parse: case-insensitive, short and long spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sibling" | "create-sibling" | "createsibling" => Some(CollisionPolicy::CreateSibling),
            "later" | "resolve-later" | "resolvelater" => Some(CollisionPolicy::ResolveLater),
            "mark" | "mark-resolved" | "markresolved" => Some(CollisionPolicy::MarkResolved),
            _ => None,
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollisionPolicy::CreateSibling => "create-sibling",
            CollisionPolicy::ResolveLater => "resolve-later",
            CollisionPolicy::MarkResolved => "mark-resolved",
        };
        f.write_str(s)
    }
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollisionPolicy::parse(s).ok_or_else(|| format!("invalid collision policy: {s} (expected sibling|later|mark)"))
    }
}

/// Operator remediation for a failed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSolution {
    Skip,
    Retry,
    Cancel,
}

impl ErrorSolution {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Some(ErrorSolution::Skip),
            "retry" => Some(ErrorSolution::Retry),
            "cancel" | "abort" => Some(ErrorSolution::Cancel),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorSolution::Skip => "skip",
            ErrorSolution::Retry => "retry",
            ErrorSolution::Cancel => "cancel",
        };
        f.write_str(s)
    }
}

impl FromStr for ErrorSolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorSolution::parse(s).ok_or_else(|| format!("invalid error solution: {s} (expected skip|retry|cancel)"))
    }
}

/// Progress of a single item. States only move forward, except that a
/// retried item may restart detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ItemState {
    Init,
    CollisionDetected,
    CollisionResolved,
    TargetCopied,
    Done,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemState::Init => "init",
            ItemState::CollisionDetected => "collision-detected",
            ItemState::CollisionResolved => "collision-resolved",
            ItemState::TargetCopied => "target-copied",
            ItemState::Done => "done",
        };
        f.write_str(s)
    }
}
