//! The Tool/Prompt/Resource Registry (§4.G): a triple-indexed catalogue
//! populated once at startup and read-only thereafter (§9: "global state").

use crate::prompts::Prompt;
use crate::resources::Resource;
use crate::tools::Tool;
use emergent_protocol::{PromptDefinition, ResourceDefinition, ToolDefinition};
use std::collections::HashMap;

/// Holds every registered tool, prompt, and resource, indexed by name (or
/// URI, for resources).
pub struct Registry {
    tools: HashMap<String, Box<dyn Tool>>,
    prompts: HashMap<String, Box<dyn Prompt>>,
    resources: HashMap<String, Box<dyn Resource>>,
}

impl Registry {
    /// Build the registry with every tool/prompt/resource this server
    /// exposes. Called once at startup by both transports.
    pub fn build() -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
            prompts: HashMap::new(),
            resources: HashMap::new(),
        };

        for tool in crate::tools::workflow_tools() {
            registry.register_tool(tool);
        }
        for tool in crate::tools::query_tools() {
            registry.register_tool(tool);
        }
        for tool in crate::tools::task_tools() {
            registry.register_tool(tool);
        }
        for tool in crate::tools::pattern_tools() {
            registry.register_tool(tool);
        }
        for tool in crate::tools::constitution_tools() {
            registry.register_tool(tool);
        }
        for tool in crate::tools::sync_tools() {
            registry.register_tool(tool);
        }
        for tool in crate::tools::janitor_tools() {
            registry.register_tool(tool);
        }

        for prompt in crate::prompts::all_prompts() {
            registry.register_prompt(prompt);
        }
        for resource in crate::resources::all_resources() {
            registry.register_resource(resource);
        }

        registry
    }

    fn register_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    fn register_prompt(&mut self, prompt: Box<dyn Prompt>) {
        self.prompts.insert(prompt.name().to_string(), prompt);
    }

    fn register_resource(&mut self, resource: Box<dyn Resource>) {
        self.resources.insert(resource.uri().to_string(), resource);
    }

    pub fn tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn prompt(&self, name: &str) -> Option<&dyn Prompt> {
        self.prompts.get(name).map(|p| p.as_ref())
    }

    pub fn resource(&self, uri: &str) -> Option<&dyn Resource> {
        self.resources.get(uri).map(|r| r.as_ref())
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<_> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn prompt_definitions(&self) -> Vec<PromptDefinition> {
        let mut defs: Vec<_> = self.prompts.values().map(|p| p.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    pub fn resource_definitions(&self) -> Vec<ResourceDefinition> {
        let mut defs: Vec<_> = self.resources.values().map(|r| r.definition()).collect();
        defs.sort_by(|a, b| a.uri.cmp(&b.uri));
        defs
    }

    pub fn has_prompts(&self) -> bool {
        !self.prompts.is_empty()
    }

    pub fn has_resources(&self) -> bool {
        !self.resources.is_empty()
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_populates_every_tool_category() {
        let registry = Registry::build();
        assert!(registry.tool("spec_new").is_some());
        assert!(registry.tool("object_get").is_some());
        assert!(registry.tool("task_create").is_some());
        assert!(registry.tool("pattern_create").is_some());
        assert!(registry.tool("constitution_create").is_some());
        assert!(registry.tool("sync_get_status").is_some());
        assert!(registry.tool("janitor_run").is_some());
        assert!(registry.tool_definitions().len() >= 25);
    }

    #[test]
    fn unknown_tool_is_none() {
        let registry = Registry::build();
        assert!(registry.tool("does_not_exist").is_none());
    }

    #[test]
    fn definitions_are_sorted_by_name() {
        let registry = Registry::build();
        let defs = registry.tool_definitions();
        let mut sorted = defs.clone();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            defs.iter().map(|d| &d.name).collect::<Vec<_>>(),
            sorted.iter().map(|d| &d.name).collect::<Vec<_>>()
        );
    }
}
