//! The Readiness Machine (§4.F): the core invariant gating workflow
//! progression. Marks workflow artifacts ready only once every workflow
//! child is ready, and reverts a parent to draft the moment a new child is
//! attached underneath it.

mod blocker;
mod error;
mod invalidate;
mod mark_ready;

pub use blocker::Blocker;
pub use error::ReadinessError;
pub use invalidate::revert_if_ready;
pub use mark_ready::{is_ready, mark_ready, MarkReadyOutcome};

#[cfg(test)]
mod tests {
    //! These exercise the pure helpers only; full `mark_ready`/`revert_if_ready`
    //! round-trips against a live `BackendClient` are covered by
    //! `emergent-server`'s integration tests against a mock backend double,
    //! since both functions need network I/O to run end to end.

    use super::*;
    use emergent_model::Object;
    use serde_json::{json, Map};

    fn obj(object_type: &str, status: Option<&str>, name: &str) -> Object {
        let mut properties = Map::new();
        properties.insert("name".into(), json!(name));
        if let Some(s) = status {
            properties.insert("status".into(), json!(s));
        }
        Object {
            id: "v1".into(),
            canonical_id: "c1".into(),
            object_type: object_type.into(),
            key: None,
            properties,
            labels: vec![],
        }
    }

    #[test]
    fn is_ready_treats_missing_status_as_draft() {
        assert!(!is_ready(&obj("Requirement", None, "x")));
        assert!(!is_ready(&obj("Requirement", Some("draft"), "x")));
        assert!(is_ready(&obj("Requirement", Some("ready"), "x")));
    }

    #[test]
    fn blocker_reports_missing_status_as_draft() {
        let b = Blocker::from_object(&obj("Scenario", None, "given-x"));
        assert_eq!(b.status, "draft");
        assert_eq!(b.entity_type, "Scenario");
        assert_eq!(b.name, "given-x");
    }

    #[test]
    fn blocked_outcome_carries_a_remedy() {
        let outcome = MarkReadyOutcome::Blocked {
            id: "v1".into(),
            blockers: vec![Blocker::from_object(&obj("Scenario", None, "x"))],
        };
        assert!(outcome.remedy().unwrap().contains("spec_mark_ready"));
    }

    #[test]
    fn already_ready_outcome_has_no_remedy() {
        let outcome = MarkReadyOutcome::AlreadyReady { id: "v1".into() };
        assert!(outcome.remedy().is_none());
    }
}
