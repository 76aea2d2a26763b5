//! Tool registry keyed by definition name.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use hcommon::Registry;
use hprovider::ToolDefinition;

use crate::{FunctionTool, Tool, ToolError, ToolExecutionContext};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tool`, replacing any tool with the same name.
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        let name = tool.definition().name;
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn register_fn<F, Fut>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(String, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler));
    }

    pub fn register_sync_fn<F>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(String, ToolExecutionContext) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register_fn(definition, move |args_json, context| {
            let output = handler(args_json, context);
            async move { output }
        });
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    /// All registered definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions = self
            .tools
            .values()
            .map(|tool| tool.definition())
            .collect::<Vec<_>>();
        definitions.sort_by(|left, right| left.name.cmp(&right.name));
        definitions
    }

    /// Resolves enabled tool names to definitions in name order.
    ///
    /// Every name must be registered; unknown names are reported together.
    pub fn resolve(&self, names: &BTreeSet<String>) -> Result<Vec<ToolDefinition>, ToolError> {
        let unknown = names
            .iter()
            .filter(|name| !self.contains(name))
            .map(String::as_str)
            .collect::<Vec<_>>();

        if !unknown.is_empty() {
            return Err(ToolError::not_found(format!(
                "no tool registered for: {}",
                unknown.join(", ")
            )));
        }

        Ok(names
            .iter()
            .filter_map(|name| self.tools.get(name.as_str()))
            .map(|tool| tool.definition())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .definitions()
            .into_iter()
            .map(|definition| definition.name)
            .collect::<Vec<_>>();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolErrorKind;

    fn definition(name: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_string(),
            description: format!("{name} tool"),
            input_schema: r#"{"type":"object"}"#.to_string(),
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for name in ["weather", "clock", "search"] {
            registry.register_sync_fn(definition(name), |args, _ctx| Ok(args));
        }
        registry
    }

    #[test]
    fn resolve_returns_definitions_in_name_order() {
        let names = BTreeSet::from(["weather".to_string(), "clock".to_string()]);
        let resolved = registry().resolve(&names).expect("both tools exist");

        let resolved_names = resolved.iter().map(|d| d.name.as_str()).collect::<Vec<_>>();
        assert_eq!(resolved_names, vec!["clock", "weather"]);
        assert_eq!(resolved[0].description, "clock tool");
    }

    #[test]
    fn resolve_fails_on_unknown_names_instead_of_dropping_them() {
        let names = BTreeSet::from([
            "weather".to_string(),
            "stocks".to_string(),
            "calendar".to_string(),
        ]);
        let error = registry().resolve(&names).expect_err("unknown tools must fail");

        assert_eq!(error.kind, ToolErrorKind::NotFound);
        assert_eq!(error.message, "no tool registered for: calendar, stocks");
    }

    #[test]
    fn resolving_no_names_yields_no_definitions() {
        let resolved = ToolRegistry::new()
            .resolve(&BTreeSet::new())
            .expect("empty set resolves");
        assert!(resolved.is_empty());
    }

    #[test]
    fn registry_tracks_registration_lifecycle() {
        let mut registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("clock"));

        registry.register_sync_fn(definition("clock"), |_args, _ctx| Ok("noon".to_string()));
        assert_eq!(registry.len(), 3);

        assert!(registry.remove("clock").is_some());
        assert!(!registry.contains("clock"));
        assert_eq!(
            format!("{registry:?}"),
            "ToolRegistry { tools: [\"search\", \"weather\"] }"
        );
    }
}
