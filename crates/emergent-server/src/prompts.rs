//! MCP prompts: canned conversation starters surfaced via `prompts/list` and
//! `prompts/get`. Follows the same closed-trait shape as [`crate::tools::Tool`]
//! (§9: "Prompts and resources follow the same pattern over smaller
//! contracts").

use crate::context::ToolContext;
use crate::tools::ToolError;
use async_trait::async_trait;
use emergent_protocol::{ContentBlock, PromptArgument, PromptDefinition, PromptGetResult, PromptMessage};
use serde_json::Value;

#[async_trait]
pub trait Prompt: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn arguments(&self) -> Vec<PromptArgument> {
        Vec::new()
    }

    async fn get(&self, ctx: &ToolContext, args: Value) -> Result<PromptGetResult, ToolError>;

    fn definition(&self) -> PromptDefinition {
        PromptDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            arguments: self.arguments(),
        }
    }
}

pub fn all_prompts() -> Vec<Box<dyn Prompt>> {
    vec![
        Box::new(StartChangePrompt),
        Box::new(ArchiveChecklistPrompt),
    ]
}

/// Walks an agent through the happy-path workflow (S1 in §8): propose,
/// specify, design, implement.
struct StartChangePrompt;

#[async_trait]
impl Prompt for StartChangePrompt {
    fn name(&self) -> &'static str {
        "start_change"
    }

    fn description(&self) -> &'static str {
        "Outlines the propose -> specify -> design -> implement workflow for a new Change."
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![PromptArgument {
            name: "name".to_string(),
            description: "kebab-case name for the new Change".to_string(),
            required: true,
        }]
    }

    async fn get(&self, _ctx: &ToolContext, args: Value) -> Result<PromptGetResult, ToolError> {
        let name = args
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::invalid_args("missing required field `name`"))?;

        let text = format!(
            "Start a new Change named {name:?}:\n\
             1. spec_new(name={name:?}) to create the Change.\n\
             2. spec_artifact(kind=\"proposal\", ...) then spec_mark_ready on it.\n\
             3. spec_artifact(kind=\"spec\", ...), then requirements and scenarios under it.\n\
             4. Mark each Scenario ready, then its Requirement, then the Spec.\n\
             5. spec_artifact(kind=\"design\", ...), then spec_mark_ready on it.\n\
             6. spec_artifact(kind=\"task\", ...) for each unit of implementation work.\n\
             Use spec_status at any point to see which stage the Change is in."
        );

        Ok(PromptGetResult {
            description: Some(self.description().to_string()),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ContentBlock::text(text),
            }],
        })
    }
}

/// Reminds an agent what `spec_archive`'s SOFT_BLOCK guards check before
/// archiving a Change.
struct ArchiveChecklistPrompt;

#[async_trait]
impl Prompt for ArchiveChecklistPrompt {
    fn name(&self) -> &'static str {
        "archive_checklist"
    }

    fn description(&self) -> &'static str {
        "Lists what spec_archive checks before a Change can be archived."
    }

    async fn get(&self, _ctx: &ToolContext, _args: Value) -> Result<PromptGetResult, ToolError> {
        let text = "Before archiving a Change, spec_archive checks (both SOFT_BLOCK, \
                     overridable with force=true):\n\
                     1. artifact_completeness — the Change has a Proposal and a Design.\n\
                     2. task_completion — every Task on the Change is completed.\n\
                     Run spec_status first to see outstanding Tasks."
            .to_string();

        Ok(PromptGetResult {
            description: Some(self.description().to_string()),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ContentBlock::text(text),
            }],
        })
    }
}
