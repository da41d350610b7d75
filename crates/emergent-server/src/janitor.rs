//! The janitor: periodic (or on-demand, via `janitor_run`) invariant
//! checks over the whole graph, emitting `MaintenanceIssue`s and,
//! optionally, a follow-up maintenance `Proposal` and per-category
//! `Improvement`s.
//!
//! Runs as the janitor `Agent` (upserted here, self-referentially, the
//! same way any other agent would identify itself to the backend): a
//! named actor named "janitor" with `agent_type = "maintenance"`.

use emergent_client::{BackendClient, ClientError, EdgeDirection};
use emergent_config::JanitorConfig;
use emergent_model::{
    is_kebab_case, Agent, EntityType, Improvement, IssueSeverity, MaintenanceIssue, Proposal,
    Task, ToProps,
};
use serde_json::Map;
use std::collections::HashMap;
use tracing::{info, warn};

/// One invariant violation found during a run, before it's persisted as a
/// `MaintenanceIssue` object.
#[derive(Debug, Clone)]
pub struct Issue {
    pub issue_type: &'static str,
    pub severity: IssueSeverity,
    pub entity_type: String,
    pub entity_id: String,
    pub description: String,
    pub suggestion: Option<String>,
}

/// What one janitor run accomplished.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct JanitorReport {
    pub agent_id: String,
    pub issues_found: usize,
    pub issue_ids: Vec<String>,
    pub proposal_id: Option<String>,
    pub improvement_ids: Vec<String>,
}

/// Runs every invariant check once and, per `config`, persists findings
/// and follow-up work. Per-issue write failures are logged and skipped
/// rather than aborting the whole run — one bad object must not block the
/// rest of the sweep.
pub async fn run(client: &BackendClient, config: &JanitorConfig) -> Result<JanitorReport, ClientError> {
    let agent = client
        .upsert_object(
            EntityType::Agent,
            "janitor",
            Agent {
                name: "janitor".to_string(),
                agent_type: "maintenance".to_string(),
            }
            .to_props(),
        )
        .await?;

    let mut issues = Vec::new();
    issues.extend(check_naming_conventions(client).await?);
    issues.extend(check_orphaned_artifacts(client).await?);
    issues.extend(check_requirements_without_scenarios(client).await?);
    issues.extend(check_ready_specs_with_draft_children(client).await?);
    issues.extend(check_empty_changes(client).await?);
    issues.extend(check_stale_changes(client, config.stale_change_days).await?);

    log_summary(&issues);

    let mut issue_ids = Vec::new();
    for issue in &issues {
        match persist_issue(client, issue).await {
            Ok(id) => issue_ids.push(id),
            Err(e) => {
                tracing::warn!(error = %e, issue_type = issue.issue_type, "failed to persist maintenance issue");
            }
        }
    }

    let relevant: Vec<&Issue> = issues
        .iter()
        .filter(|i| config.improvement_severities.contains(&i.severity.as_str().to_string()))
        .collect();

    let mut proposal_id = None;
    if config.create_proposal && !relevant.is_empty() {
        proposal_id = create_maintenance_proposal(client, &agent.id, relevant.len())
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to create maintenance proposal");
                None
            });
    }

    let mut improvement_ids = Vec::new();
    if config.create_improvements {
        improvement_ids = create_improvements(client, &agent.id, &relevant)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to create improvements");
                Vec::new()
            });
    }

    Ok(JanitorReport {
        agent_id: agent.id,
        issues_found: issues.len(),
        issue_ids,
        proposal_id,
        improvement_ids,
    })
}

/// Logs the structured summary §4.J step 3 requires: counts by issue type
/// and severity in one record, plus an individual WARN for each critical
/// issue so it surfaces on its own in the log stream.
fn log_summary(issues: &[Issue]) {
    let mut by_severity: HashMap<&'static str, usize> = HashMap::new();
    let mut by_type: HashMap<&'static str, usize> = HashMap::new();
    for issue in issues {
        *by_severity.entry(issue.severity.as_str()).or_insert(0) += 1;
        *by_type.entry(issue.issue_type).or_insert(0) += 1;
    }

    info!(
        total = issues.len(),
        critical = by_severity.get("critical").copied().unwrap_or(0),
        warning = by_severity.get("warning").copied().unwrap_or(0),
        suggestion = by_severity.get("suggestion").copied().unwrap_or(0),
        by_type = ?by_type,
        "janitor sweep complete"
    );

    for issue in issues.iter().filter(|i| i.severity == IssueSeverity::Critical) {
        warn!(
            issue_type = issue.issue_type,
            entity_type = %issue.entity_type,
            entity_id = %issue.entity_id,
            "{}",
            issue.description
        );
    }
}

async fn persist_issue(client: &BackendClient, issue: &Issue) -> Result<String, ClientError> {
    let dto = MaintenanceIssue {
        issue_type: issue.issue_type.to_string(),
        severity: issue.severity,
        entity_type: issue.entity_type.clone(),
        entity_id: issue.entity_id.clone(),
        description: issue.description.clone(),
        suggestion: issue.suggestion.clone(),
    };
    let obj = client
        .create_object(EntityType::MaintenanceIssue, None, dto.to_props(), vec![])
        .await?;
    client
        .create_relationship("affects_entity", &obj.id, &issue.entity_id, Map::new())
        .await?;
    Ok(obj.id)
}

async fn create_maintenance_proposal(
    client: &BackendClient,
    agent_id: &str,
    issue_count: usize,
) -> Result<Option<String>, ClientError> {
    let proposal = Proposal {
        intent: format!("Address {issue_count} maintenance issue(s) found by the janitor"),
        rationale: Some("Automatically generated by a scheduled janitor run.".to_string()),
        status: Default::default(),
    };
    let obj = client
        .create_object(EntityType::Proposal, None, proposal.to_props(), vec![])
        .await?;
    client
        .create_relationship("proposed_by", &obj.id, agent_id, Map::new())
        .await?;
    Ok(Some(obj.id))
}

async fn create_improvements(
    client: &BackendClient,
    agent_id: &str,
    issues: &[&Issue],
) -> Result<Vec<String>, ClientError> {
    let mut categories: Vec<&'static str> = issues.iter().map(|i| i.issue_type).collect();
    categories.sort_unstable();
    categories.dedup();

    let mut ids = Vec::new();
    for category in categories {
        let in_category: Vec<&&Issue> = issues.iter().filter(|i| i.issue_type == category).collect();
        let improvement = Improvement {
            title: format!("Resolve {} issue(s) ({category})", in_category.len()),
            category: category.to_string(),
            complexity_points: in_category.len().min(8) as i64,
        };
        let obj = client
            .create_object(EntityType::Improvement, None, improvement.to_props(), vec![])
            .await?;
        client
            .create_relationship("proposed_by", &obj.id, agent_id, Map::new())
            .await?;

        for (n, issue) in in_category.iter().enumerate() {
            let task = Task {
                number: format!("{}", n + 1),
                description: issue.description.clone(),
                status: Default::default(),
                complexity_points: Some(1),
                verification: None,
            };
            let task_obj = client
                .create_object(EntityType::Task, None, task.to_props(), vec![])
                .await?;
            client
                .create_relationship("has_subtask", &obj.id, &task_obj.id, Map::new())
                .await?;
        }

        ids.push(obj.id);
    }
    Ok(ids)
}

async fn check_naming_conventions(client: &BackendClient) -> Result<Vec<Issue>, ClientError> {
    const NAMED_TYPES: &[EntityType] = &[
        EntityType::Change,
        EntityType::Spec,
        EntityType::Requirement,
        EntityType::Scenario,
        EntityType::Pattern,
        EntityType::Actor,
        EntityType::Agent,
        EntityType::TestCase,
        EntityType::ApiContract,
    ];

    let mut issues = Vec::new();
    for &entity_type in NAMED_TYPES {
        let objects = client.list_objects(entity_type, None, 10_000).await?;
        for obj in objects {
            if let Some(name) = obj.name() {
                if !is_kebab_case(name) {
                    issues.push(Issue {
                        issue_type: "naming_convention",
                        severity: IssueSeverity::Warning,
                        entity_type: entity_type.as_str().to_string(),
                        entity_id: obj.id.clone(),
                        description: format!("{} name {name:?} is not kebab-case", entity_type.as_str()),
                        suggestion: Some("rename to kebab-case (lowercase, hyphen-separated)".to_string()),
                    });
                }
            }
        }
    }
    Ok(issues)
}

async fn check_orphaned_artifacts(client: &BackendClient) -> Result<Vec<Issue>, ClientError> {
    const STRUCTURAL_CHILDREN: &[EntityType] = &[
        EntityType::Proposal,
        EntityType::Spec,
        EntityType::Design,
        EntityType::Task,
    ];

    let mut issues = Vec::new();
    for &entity_type in STRUCTURAL_CHILDREN {
        let objects = client.list_objects(entity_type, None, 10_000).await?;
        for obj in objects {
            let incoming = client.get_edges(&obj.id, EdgeDirection::In, None).await?;
            if incoming.is_empty() {
                issues.push(Issue {
                    issue_type: "orphaned_artifact",
                    severity: IssueSeverity::Warning,
                    entity_type: entity_type.as_str().to_string(),
                    entity_id: obj.id.clone(),
                    description: format!("{} has no parent Change", entity_type.as_str()),
                    suggestion: Some("link it under a Change, or delete it if abandoned".to_string()),
                });
            }
        }
    }
    Ok(issues)
}

async fn check_requirements_without_scenarios(client: &BackendClient) -> Result<Vec<Issue>, ClientError> {
    let requirements = client.list_objects(EntityType::Requirement, None, 10_000).await?;
    let mut issues = Vec::new();
    for req in requirements {
        let children = client
            .get_edges(&req.id, EdgeDirection::Out, Some("has_scenario"))
            .await?;
        if children.is_empty() {
            issues.push(Issue {
                issue_type: "requirement_without_scenarios",
                severity: IssueSeverity::Suggestion,
                entity_type: EntityType::Requirement.as_str().to_string(),
                entity_id: req.id.clone(),
                description: "Requirement has no Scenarios".to_string(),
                suggestion: Some("add at least one Scenario describing how this requirement is verified".to_string()),
            });
        }
    }
    Ok(issues)
}

async fn check_ready_specs_with_draft_children(client: &BackendClient) -> Result<Vec<Issue>, ClientError> {
    let specs = client.list_objects(EntityType::Spec, None, 10_000).await?;
    let mut issues = Vec::new();
    for spec in specs {
        if spec.status() != Some("ready") {
            continue;
        }
        let children = client
            .get_edges(&spec.id, EdgeDirection::Out, Some("has_requirement"))
            .await?;
        for edge in children {
            let child = match client.get_object(&edge.dst_id).await {
                Ok(c) => c,
                Err(_) => continue,
            };
            if child.status() != Some("ready") {
                issues.push(Issue {
                    issue_type: "ready_spec_draft_child",
                    severity: IssueSeverity::Critical,
                    entity_type: EntityType::Spec.as_str().to_string(),
                    entity_id: spec.id.clone(),
                    description: format!(
                        "Spec is ready but its Requirement {} is still draft",
                        child.id
                    ),
                    suggestion: Some("this violates the readiness invariant; investigate how the Spec was marked ready".to_string()),
                });
            }
        }
    }
    Ok(issues)
}

async fn check_empty_changes(client: &BackendClient) -> Result<Vec<Issue>, ClientError> {
    let changes = client.list_objects(EntityType::Change, None, 10_000).await?;
    let mut issues = Vec::new();
    for change in changes {
        if change.status() == Some("archived") {
            continue;
        }
        let children = client.get_edges(&change.id, EdgeDirection::Out, None).await?;
        if children.is_empty() {
            issues.push(Issue {
                issue_type: "empty_change",
                severity: IssueSeverity::Warning,
                entity_type: EntityType::Change.as_str().to_string(),
                entity_id: change.id.clone(),
                description: "Change has no artifacts at all".to_string(),
                suggestion: Some("add a Proposal via spec_artifact, or archive it if abandoned".to_string()),
            });
        }
    }
    Ok(issues)
}

async fn check_stale_changes(client: &BackendClient, stale_days: u64) -> Result<Vec<Issue>, ClientError> {
    let changes = client.list_objects(EntityType::Change, None, 10_000).await?;
    let mut issues = Vec::new();
    let cutoff = chrono::Utc::now() - chrono::Duration::days(stale_days as i64);

    for change in changes {
        if change.status() == Some("archived") {
            continue;
        }
        // `updated_at` is stamped by the backend outside this crate's DTO
        // layer; skip the check entirely when it isn't present rather than
        // treating absence as staleness.
        let Some(updated_raw) = change.properties.get("updated_at").and_then(|v| v.as_str()) else {
            continue;
        };
        let Ok(updated_at) = chrono::DateTime::parse_from_rfc3339(updated_raw) else {
            continue;
        };
        if updated_at.with_timezone(&chrono::Utc) < cutoff {
            issues.push(Issue {
                issue_type: "stale_change",
                severity: IssueSeverity::Suggestion,
                entity_type: EntityType::Change.as_str().to_string(),
                entity_id: change.id.clone(),
                description: format!("Change has had no activity in over {stale_days} day(s)"),
                suggestion: Some("revisit, progress, or archive this Change".to_string()),
            });
        }
    }
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_severity_round_trips_to_string() {
        assert_eq!(IssueSeverity::Critical.as_str(), "critical");
        assert_eq!(IssueSeverity::Warning.as_str(), "warning");
        assert_eq!(IssueSeverity::Suggestion.as_str(), "suggestion");
    }
}
