//! Guard Engine: composable checks over a precomputed [`GuardContext`],
//! a severity ladder, and outcome aggregation.
//!
//! Guards are pure functions — they never issue their own queries. All
//! state they need is populated once per dispatch by the caller (typically
//! `emergent-server`'s tool layer, using `emergent-client` to fill in counts
//! and booleans) via [`GuardContext`].

mod context;
mod sets;

pub use context::{ArtifactAddKind, GuardContext};
pub use sets::{archive_guards, artifact_guards, pre_change_guards};

use std::fmt;

/// Guard severity, in order of strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational only.
    Suggestion,
    /// Advisory; surfaced in the result, never blocks.
    Warning,
    /// Refuse unless the caller set `force=true`.
    SoftBlock,
    /// Refuse the operation. No override.
    HardBlock,
}

/// The result of evaluating one guard's predicate.
#[derive(Debug, Clone)]
pub struct GuardCheck {
    pub passed: bool,
    /// Present when `passed` is false: what's wrong.
    pub message: Option<String>,
    /// Present when `passed` is false: the next action the caller should
    /// take.
    pub remedy: Option<String>,
}

impl GuardCheck {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
            remedy: None,
        }
    }

    pub fn fail(message: impl Into<String>, remedy: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
            remedy: Some(remedy.into()),
        }
    }
}

/// A named, severity-tagged predicate evaluated against a [`GuardContext`].
///
/// Guard predicates are plain function pointers rather than trait objects:
/// the guard set is closed (defined entirely in `sets.rs`) and every guard
/// is a pure function, so there is no dynamic-dispatch or state-capture
/// need that would justify `Box<dyn Fn>`.
#[derive(Clone, Copy)]
pub struct Guard {
    pub id: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub check: fn(&GuardContext) -> GuardCheck,
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .finish()
    }
}

/// One guard's evaluated result, retained for the outcome's `results` list.
#[derive(Debug, Clone)]
pub struct GuardResult {
    pub id: &'static str,
    pub severity: Severity,
    pub check: GuardCheck,
}

/// The aggregated outcome of running a guard set once.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub blocked: bool,
    pub block_message: Option<String>,
    pub advisory_message: Option<String>,
    pub results: Vec<GuardResult>,
}

/// Runs `guards` in order over `ctx`, collecting all results and computing
/// the aggregated [`Outcome`].
///
/// `Blocked = any HARD_BLOCK fail, or any SOFT_BLOCK fail without force.`
/// Running the same guard set over the same context always yields an
/// identical outcome since guards are pure.
pub fn run(guards: &[Guard], ctx: &GuardContext) -> Outcome {
    let results: Vec<GuardResult> = guards
        .iter()
        .map(|g| GuardResult {
            id: g.id,
            severity: g.severity,
            check: (g.check)(ctx),
        })
        .collect();

    let mut blocking_lines = Vec::new();
    let mut advisory_lines = Vec::new();
    let mut blocked = false;

    let mut n = 0usize;
    for result in &results {
        if result.check.passed {
            continue;
        }
        let is_blocking = match result.severity {
            Severity::HardBlock => true,
            Severity::SoftBlock => !ctx.force,
            Severity::Warning | Severity::Suggestion => false,
        };

        if is_blocking {
            blocked = true;
            n += 1;
            blocking_lines.push(format!(
                "{}. [{}] {} — {}",
                n,
                result.id,
                result.check.message.as_deref().unwrap_or("failed"),
                result.check.remedy.as_deref().unwrap_or("no remedy available"),
            ));
        } else if matches!(result.severity, Severity::Warning | Severity::Suggestion) {
            advisory_lines.push(format!(
                "[{}:{}] {}",
                match result.severity {
                    Severity::Warning => "warning",
                    Severity::Suggestion => "suggestion",
                    _ => unreachable!(),
                },
                result.id,
                result.check.message.as_deref().unwrap_or("advisory"),
            ));
        }
    }

    Outcome {
        blocked,
        block_message: (!blocking_lines.is_empty()).then(|| blocking_lines.join("\n")),
        advisory_message: (!advisory_lines.is_empty()).then(|| advisory_lines.join("\n")),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_fail(severity: Severity, id: &'static str) -> Guard {
        Guard {
            id,
            description: "test guard",
            severity,
            check: |_ctx| GuardCheck::fail("nope", "do the thing"),
        }
    }

    #[test]
    fn hard_block_always_blocks() {
        let guards = [always_fail(Severity::HardBlock, "hard")];
        let ctx = GuardContext::default();
        let outcome = run(&guards, &ctx);
        assert!(outcome.blocked);
        assert!(outcome.block_message.unwrap().contains("hard"));
    }

    #[test]
    fn soft_block_is_overridden_by_force() {
        let guards = [always_fail(Severity::SoftBlock, "soft")];
        let mut ctx = GuardContext::default();
        ctx.force = true;
        let outcome = run(&guards, &ctx);
        assert!(!outcome.blocked);
        assert!(outcome.block_message.is_none());
    }

    #[test]
    fn soft_block_blocks_without_force() {
        let guards = [always_fail(Severity::SoftBlock, "soft")];
        let ctx = GuardContext::default();
        let outcome = run(&guards, &ctx);
        assert!(outcome.blocked);
    }

    #[test]
    fn warnings_never_block_and_surface_as_advisory() {
        let guards = [always_fail(Severity::Warning, "warn")];
        let ctx = GuardContext::default();
        let outcome = run(&guards, &ctx);
        assert!(!outcome.blocked);
        assert!(outcome.advisory_message.unwrap().contains("warn"));
    }

    #[test]
    fn determinism_same_context_same_outcome() {
        let guards = [
            always_fail(Severity::HardBlock, "a"),
            always_fail(Severity::Warning, "b"),
        ];
        let ctx = GuardContext::default();
        let o1 = run(&guards, &ctx);
        let o2 = run(&guards, &ctx);
        assert_eq!(o1.blocked, o2.blocked);
        assert_eq!(o1.block_message, o2.block_message);
        assert_eq!(o1.advisory_message, o2.advisory_message);
    }
}
