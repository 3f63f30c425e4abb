//! Tool sets and the shared registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{Tool, ToolSpec};

/// A mapping from tool name to tool.
///
/// Not synchronized: do not mutate a set while invocations that borrow it are
/// in flight. Use [`Registry`] when tools are added or removed concurrently.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ToolSet::insert`].
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.insert(tool);
        self
    }

    /// Add a tool under its own name, returning any tool it replaced.
    pub fn insert(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        self.tools.insert(tool.name().to_string(), tool)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Specifications of every tool, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.names())
            .finish()
    }
}

impl FromIterator<Arc<dyn Tool>> for ToolSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Tool>>>(iter: I) -> Self {
        let mut set = Self::new();
        for tool in iter {
            set.insert(tool);
        }
        set
    }
}

/// A [`ToolSet`] guarded by a read-write lock.
///
/// Lookups clone the tool handle and release the lock before the caller runs
/// it, so registration never waits on a running tool.
#[derive(Debug, Default)]
pub struct Registry {
    tools: RwLock<ToolSet>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_set(set: ToolSet) -> Self {
        Self {
            tools: RwLock::new(set),
        }
    }

    /// Register a tool, replacing any tool with the same name.
    pub async fn register(&self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_string();
        let previous = self.tools.write().await.insert(tool);
        tracing::info!(tool = %name, replaced = previous.is_some(), "tool registered");
        previous
    }

    pub async fn unregister(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let removed = self.tools.write().await.remove(name);
        if removed.is_some() {
            tracing::info!(tool = %name, "tool unregistered");
        }
        removed
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().await.get(name)
    }

    pub async fn list(&self) -> Vec<String> {
        self.tools.read().await.names()
    }

    pub async fn specs(&self) -> Vec<ToolSpec> {
        self.tools.read().await.specs()
    }

    /// A point-in-time copy of the registered tools.
    pub async fn snapshot(&self) -> ToolSet {
        self.tools.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arguments, Context, ParameterSchema, ToolError};
    use async_trait::async_trait;
    use serde_json::Value;

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn schema(&self) -> ParameterSchema {
            ParameterSchema::object()
        }

        async fn execute(&self, _ctx: Context, _args: Arguments) -> Result<Value, ToolError> {
            Ok(Value::from(self.0))
        }
    }

    #[test]
    fn insert_get_remove() {
        let mut set = ToolSet::new().with(Arc::new(Named("b"))).with(Arc::new(Named("a")));
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["a", "b"]);
        assert!(set.get("a").is_some());

        assert!(set.remove("a").is_some());
        assert!(!set.contains("a"));
        assert!(set.remove("a").is_none());
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut set = ToolSet::new();
        assert!(set.insert(Arc::new(Named("x"))).is_none());
        assert!(set.insert(Arc::new(Named("x"))).is_some());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn shared_tool_in_two_sets() {
        let tool: Arc<dyn Tool> = Arc::new(Named("shared"));
        let first: ToolSet = [tool.clone()].into_iter().collect();
        let second = ToolSet::new().with(tool.clone());
        assert!(Arc::ptr_eq(&first.get("shared").unwrap(), &second.get("shared").unwrap()));
    }

    #[tokio::test]
    async fn registry_register_and_snapshot() {
        let registry = Registry::new();
        registry.register(Arc::new(Named("a"))).await;
        let snapshot = registry.snapshot().await;

        registry.register(Arc::new(Named("b"))).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.list().await, vec!["a", "b"]);

        assert!(registry.unregister("a").await.is_some());
        assert!(registry.get("a").await.is_none());
        assert_eq!(registry.specs().await.len(), 1);
    }
}
