//! MCP resources: static reference text surfaced via `resources/list` and
//! `resources/read`.

use crate::context::ToolContext;
use crate::tools::ToolError;
use async_trait::async_trait;
use emergent_protocol::{ResourceContents, ResourceDefinition, ResourceReadResult};

#[async_trait]
pub trait Resource: Send + Sync {
    fn uri(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> Option<&'static str> {
        None
    }
    fn mime_type(&self) -> Option<&'static str> {
        Some("text/plain")
    }

    async fn read(&self, ctx: &ToolContext) -> Result<ResourceReadResult, ToolError>;

    fn definition(&self) -> ResourceDefinition {
        ResourceDefinition {
            uri: self.uri().to_string(),
            name: self.name().to_string(),
            description: self.description().map(str::to_string),
            mime_type: self.mime_type().map(str::to_string),
        }
    }
}

pub fn all_resources() -> Vec<Box<dyn Resource>> {
    vec![Box::new(WorkflowGuideResource), Box::new(GlossaryResource)]
}

/// A static description of the readiness/guard workflow, for clients that
/// want to render it without calling a prompt.
struct WorkflowGuideResource;

#[async_trait]
impl Resource for WorkflowGuideResource {
    fn uri(&self) -> &'static str {
        "emergent://docs/workflow"
    }

    fn name(&self) -> &'static str {
        "Workflow guide"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Explains the Change -> Proposal -> Spec -> Requirement -> Scenario -> Design -> Task readiness cascade.")
    }

    async fn read(&self, _ctx: &ToolContext) -> Result<ResourceReadResult, ToolError> {
        let text = "Workflow artifacts (Proposal, Spec, Requirement, Scenario, Design) carry \
                     a draft/ready status. A parent may be marked ready only once every \
                     workflow child it owns is ready; adding a new child under a ready parent \
                     reverts that parent to draft. Guard sets enforce ordering: a Proposal must \
                     be ready before any Spec; all Specs must be ready before a Design; a Design \
                     must be ready before any Task."
            .to_string();

        Ok(ResourceReadResult {
            contents: vec![ResourceContents {
                uri: self.uri().to_string(),
                mime_type: self.mime_type().map(str::to_string),
                text,
            }],
        })
    }
}

/// The entity/relationship glossary, condensed from §3.2-3.3.
struct GlossaryResource;

#[async_trait]
impl Resource for GlossaryResource {
    fn uri(&self) -> &'static str {
        "emergent://docs/glossary"
    }

    fn name(&self) -> &'static str {
        "Entity and relationship glossary"
    }

    async fn read(&self, _ctx: &ToolContext) -> Result<ResourceReadResult, ToolError> {
        let types: Vec<&str> = emergent_model::EntityType::ALL.iter().map(|t| t.as_str()).collect();
        let rels: Vec<&str> = emergent_model::RelationshipType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect();
        let text = format!(
            "Entity types: {}\n\nRelationship types: {}",
            types.join(", "),
            rels.join(", ")
        );

        Ok(ResourceReadResult {
            contents: vec![ResourceContents {
                uri: self.uri().to_string(),
                mime_type: self.mime_type().map(str::to_string),
                text,
            }],
        })
    }
}
