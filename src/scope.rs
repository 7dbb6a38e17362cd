use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::environment::{ExecutionEnvironment, OperationBuilder};
use crate::error::GraphError;
use crate::operation::Operation;

fn component_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9.][A-Za-z0-9_.\-]*$").unwrap())
}

fn node_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9.][A-Za-z0-9_.\-/]*$").unwrap())
}

/// Whether `name` is usable as a fully qualified node name (`outer/inner/op`).
pub fn is_valid_node_name(name: &str) -> bool {
    node_name_pattern().is_match(name)
}

fn check_component(name: &str) -> Result<(), GraphError> {
    if component_pattern().is_match(name) {
        Ok(())
    } else {
        Err(GraphError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
struct NameScope {
    prefix: Option<String>,
    op_name: Option<String>,
    ids: Rc<RefCell<HashMap<String, usize>>>,
}

impl NameScope {
    fn make_unique(&self, id: &str) -> String {
        let mut ids = self.ids.borrow_mut();
        let seen = ids.entry(id.to_string()).or_insert(0);
        let unique = if *seen == 0 {
            id.to_string()
        } else {
            format!("{}_{}", id, seen)
        };
        *seen += 1;
        unique
    }

    fn qualify(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix, name),
            None => name.to_string(),
        }
    }

    fn with_sub_scope(&self, name: &str) -> Result<Self, GraphError> {
        check_component(name)?;
        let unique = self.make_unique(name);
        Ok(Self {
            prefix: Some(self.qualify(&unique)),
            op_name: None,
            ids: Rc::default(),
        })
    }

    fn with_name(&self, name: &str) -> Result<Self, GraphError> {
        check_component(name)?;
        Ok(Self {
            prefix: self.prefix.clone(),
            op_name: Some(name.to_string()),
            ids: Rc::clone(&self.ids),
        })
    }

    fn make_op_name(&self, default: &str) -> Result<String, GraphError> {
        let name = match &self.op_name {
            Some(explicit) => explicit.clone(),
            None => {
                check_component(default)?;
                self.make_unique(default)
            }
        };
        Ok(self.qualify(&name))
    }
}

/// Context in which operations are created: the target environment, a name
/// scope, and settings applied to every operation built through it.
///
/// Scopes are cheap to clone. Clones share name counters.
#[derive(Clone)]
pub struct Scope<'g> {
    env: &'g dyn ExecutionEnvironment,
    names: NameScope,
    device: Option<String>,
    control_deps: Vec<Operation>,
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("prefix", &self.names.prefix)
            .field("op_name", &self.names.op_name)
            .field("device", &self.device)
            .field("control_deps", &self.control_deps.len())
            .finish()
    }
}

impl<'g> Scope<'g> {
    pub fn new(env: &'g dyn ExecutionEnvironment) -> Self {
        Self {
            env,
            names: NameScope::default(),
            device: None,
            control_deps: Vec::new(),
        }
    }

    pub fn env(&self) -> &'g dyn ExecutionEnvironment {
        self.env
    }

    /// Child scope whose operations are prefixed with `parent/name`.
    ///
    /// Reusing a sub-scope name yields `name_1`, `name_2`, ... The child gets
    /// its own name counters.
    pub fn with_sub_scope(&self, name: &str) -> Result<Self, GraphError> {
        Ok(Self {
            names: self.names.with_sub_scope(name)?,
            ..self.clone()
        })
    }

    /// Scope that names the next operation exactly `name` (under the current
    /// prefix).
    pub fn with_name(&self, name: &str) -> Result<Self, GraphError> {
        Ok(Self {
            names: self.names.with_name(name)?,
            ..self.clone()
        })
    }

    pub fn with_device(&self, device: &str) -> Self {
        Self {
            device: Some(device.to_string()),
            ..self.clone()
        }
    }

    /// Scope whose operations run after each of `operations`.
    pub fn with_control_dependencies(&self, operations: &[Operation]) -> Self {
        Self {
            control_deps: operations.to_vec(),
            ..self.clone()
        }
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn control_dependencies(&self) -> &[Operation] {
        &self.control_deps
    }

    /// Fully qualified name for a new operation whose default name is
    /// `default` (usually its type).
    pub fn make_op_name(&self, default: &str) -> Result<String, GraphError> {
        let name = self.names.make_op_name(default)?;
        tracing::trace!(default, name = %name, "assigned operation name");
        Ok(name)
    }

    /// Forward the scope's device and control dependencies to `builder`.
    pub fn apply(&self, builder: &mut (dyn OperationBuilder + '_)) {
        if let Some(device) = &self.device {
            builder.set_device(device);
        }
        for operation in &self.control_deps {
            builder.add_control_input(operation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Graph;

    #[test]
    fn default_names_are_made_unique() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        assert_eq!(scope.make_op_name("Conv2D").unwrap(), "Conv2D");
        assert_eq!(scope.make_op_name("Conv2D").unwrap(), "Conv2D_1");
        assert_eq!(scope.make_op_name("Conv2D").unwrap(), "Conv2D_2");
        assert_eq!(scope.make_op_name("MatMul").unwrap(), "MatMul");
    }

    #[test]
    fn sub_scopes_prefix_names_with_fresh_counters() {
        let graph = Graph::new();
        let root = Scope::new(&graph);
        root.make_op_name("Add").unwrap();

        let layer = root.with_sub_scope("layer").unwrap();
        assert_eq!(layer.make_op_name("Add").unwrap(), "layer/Add");

        let again = root.with_sub_scope("layer").unwrap();
        assert_eq!(again.make_op_name("Add").unwrap(), "layer_1/Add");

        let nested = layer.with_sub_scope("dense").unwrap();
        assert_eq!(nested.make_op_name("MatMul").unwrap(), "layer/dense/MatMul");
    }

    #[test]
    fn explicit_names_are_used_verbatim() {
        let graph = Graph::new();
        let scope = Scope::new(&graph).with_sub_scope("net").unwrap();
        let named = scope.with_name("logits").unwrap();
        assert_eq!(named.make_op_name("MatMul").unwrap(), "net/logits");
        assert_eq!(scope.make_op_name("MatMul").unwrap(), "net/MatMul");
    }

    #[test]
    fn rejects_invalid_names() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        assert!(matches!(
            scope.with_sub_scope("_hidden"),
            Err(GraphError::InvalidName { .. })
        ));
        assert!(scope.with_name("a/b").is_err());
        assert!(scope.make_op_name("").is_err());
        assert!(is_valid_node_name("outer/inner/op_1"));
        assert!(!is_valid_node_name("bad name"));
    }

    #[test]
    fn derived_scopes_keep_settings() {
        let graph = Graph::new();
        let scope = Scope::new(&graph).with_device("/cpu:0");
        let child = scope.with_sub_scope("block").unwrap();
        assert_eq!(child.device(), Some("/cpu:0"));
        assert!(child.control_dependencies().is_empty());
    }
}
