use std::collections::{BTreeMap, HashMap, HashSet};

use crate::backend::Graph;
use crate::error::GraphError;
use crate::graph::{DataType, GraphDef, InputRef, NodeDef, parse_control_ref, parse_input_ref};
use crate::registry::OpRegistry;

/// Operator types whose outputs are fed from outside the graph.
const FEED_OPS: [&str; 2] = ["Placeholder", "PlaceholderWithDefault"];

#[derive(Debug)]
pub struct ValidationArtifacts {
    /// Placeholder endpoints and their element types.
    pub input_names_to_types: BTreeMap<String, DataType>,
    /// Endpoints nothing in the graph consumes.
    pub output_names_to_types: BTreeMap<String, DataType>,
    pub endpoint_to_dependent_operations: BTreeMap<String, Vec<String>>,
    /// Endpoint to the type of the operation producing it.
    pub endpoint_to_producing_operation: BTreeMap<String, String>,
}

pub struct GraphValidator<'a> {
    graph: &'a GraphDef,
    registry: &'a OpRegistry,
    processed_nodes: HashSet<&'a str>,
    endpoint_to_dependents: BTreeMap<String, Vec<String>>,
}

impl<'a> GraphValidator<'a> {
    pub fn new(graph: &'a GraphDef, registry: &'a OpRegistry) -> Self {
        Self {
            graph,
            registry,
            processed_nodes: HashSet::new(),
            endpoint_to_dependents: BTreeMap::new(),
        }
    }

    pub fn validate(mut self) -> Result<ValidationArtifacts, GraphError> {
        if self.graph.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }

        self.validate_references()?;

        // Replaying the nodes applies every per-node check of the backend.
        let replay = Graph::with_registry(self.registry.clone());
        let operations = replay.import_graph_def(self.graph)?;

        let mut inputs = BTreeMap::new();
        let mut outputs = BTreeMap::new();
        let mut producers = BTreeMap::new();
        for operation in &operations {
            for index in 0..operation.num_outputs() {
                let endpoint = format!("{}:{}", operation.name(), index);
                let data_type = operation.output_type(index)?;
                if FEED_OPS.contains(&operation.op_type()) {
                    inputs.insert(endpoint.clone(), data_type);
                }
                if !self.endpoint_to_dependents.contains_key(&endpoint) {
                    outputs.insert(endpoint.clone(), data_type);
                }
                producers.insert(endpoint, operation.op_type().to_string());
            }
        }
        tracing::debug!(
            nodes = operations.len(),
            inputs = inputs.len(),
            outputs = outputs.len(),
            "validated graph"
        );

        Ok(ValidationArtifacts {
            input_names_to_types: inputs,
            output_names_to_types: outputs,
            endpoint_to_dependent_operations: self.endpoint_to_dependents,
            endpoint_to_producing_operation: producers,
        })
    }

    /// Every reference must be well formed and point at an earlier node.
    fn validate_references(&mut self) -> Result<(), GraphError> {
        let graph = self.graph;
        let mut seen: HashMap<&str, &NodeDef> = HashMap::new();
        for node in &graph.nodes {
            if seen.insert(node.name.as_str(), node).is_some() {
                return Err(GraphError::DuplicateOperationName {
                    name: node.name.clone(),
                });
            }
            for reference in node.data_references() {
                let Some(InputRef::Data {
                    node: producer,
                    index,
                }) = parse_input_ref(reference)
                else {
                    return Err(GraphError::InvalidOperandReference {
                        operation: node.name.clone(),
                        operand: reference.clone(),
                    });
                };
                if !self.processed_nodes.contains(producer) {
                    return Err(GraphError::OperandNotReady {
                        operation: node.name.clone(),
                        operand: reference.clone(),
                    });
                }
                self.endpoint_to_dependents
                    .entry(format!("{}:{}", producer, index))
                    .or_default()
                    .push(node.name.clone());
            }
            for reference in &node.control_inputs {
                let Some(producer) = parse_control_ref(reference) else {
                    return Err(GraphError::InvalidOperandReference {
                        operation: node.name.clone(),
                        operand: reference.clone(),
                    });
                };
                if !self.processed_nodes.contains(producer) {
                    return Err(GraphError::OperandNotReady {
                        operation: node.name.clone(),
                        operand: reference.clone(),
                    });
                }
            }
            self.processed_nodes.insert(node.name.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttrValue, NodeInput, Tensor};

    fn node(name: &str, op: &str, inputs: Vec<NodeInput>) -> NodeDef {
        NodeDef {
            name: name.to_string(),
            op: op.to_string(),
            inputs,
            control_inputs: Vec::new(),
            device: None,
            attrs: BTreeMap::new(),
        }
    }

    fn placeholder(name: &str) -> NodeDef {
        let mut node = node(name, "Placeholder", vec![]);
        node.attrs
            .insert("dtype".to_string(), AttrValue::Type(DataType::Float));
        node
    }

    fn matmul_graph() -> GraphDef {
        GraphDef {
            version: 1,
            nodes: vec![
                placeholder("x"),
                placeholder("w"),
                node(
                    "mm",
                    "MatMul",
                    vec![NodeInput::Single("x".into()), NodeInput::Single("w:0".into())],
                ),
            ],
        }
    }

    #[test]
    fn validates_and_collects_artifacts() {
        let registry = OpRegistry::with_defaults();
        let graph = matmul_graph();
        let artifacts = GraphValidator::new(&graph, &registry).validate().unwrap();

        assert_eq!(artifacts.input_names_to_types.len(), 2);
        assert_eq!(
            artifacts.output_names_to_types.get("mm:0"),
            Some(&DataType::Float)
        );
        assert_eq!(artifacts.output_names_to_types.len(), 1);
        assert_eq!(
            artifacts.endpoint_to_dependent_operations.get("x:0"),
            Some(&vec!["mm".to_string()])
        );
        assert_eq!(
            artifacts.endpoint_to_producing_operation.get("mm:0").map(String::as_str),
            Some("MatMul")
        );
    }

    #[test]
    fn rejects_empty_graph() {
        let registry = OpRegistry::with_defaults();
        let graph = GraphDef::default();
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn rejects_forward_and_malformed_references() {
        let registry = OpRegistry::with_defaults();
        let mut graph = matmul_graph();
        graph.nodes.swap(0, 2);
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::OperandNotReady { .. })
        ));

        let mut graph = matmul_graph();
        graph.nodes[2].inputs[1] = NodeInput::Single("w:zero".into());
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::InvalidOperandReference { .. })
        ));
    }

    #[test]
    fn checks_control_inputs() {
        let registry = OpRegistry::with_defaults();
        let mut graph = matmul_graph();
        graph.nodes[2].control_inputs = vec!["^x".to_string(), "w".to_string()];
        let artifacts = GraphValidator::new(&graph, &registry).validate().unwrap();
        assert_eq!(
            artifacts.endpoint_to_dependent_operations.get("w:0"),
            Some(&vec!["mm".to_string()])
        );

        graph.nodes[2].control_inputs = vec!["^x:0".to_string()];
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::InvalidOperandReference { operand, .. }) if operand == "^x:0"
        ));

        graph.nodes[1].control_inputs = vec!["^mm".to_string()];
        graph.nodes[2].control_inputs.clear();
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::OperandNotReady { operand, .. }) if operand == "^mm"
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let registry = OpRegistry::with_defaults();
        let mut graph = matmul_graph();
        graph.nodes.push(placeholder("x"));
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::DuplicateOperationName { .. })
        ));
    }

    #[test]
    fn reports_registry_violations() {
        let registry = OpRegistry::with_defaults();
        let mut graph = matmul_graph();
        let mut constant = node("c", "Const", vec![]);
        constant
            .attrs
            .insert("value".to_string(), AttrValue::Tensor(Tensor::scalar(1i32)));
        constant
            .attrs
            .insert("dtype".to_string(), AttrValue::Type(DataType::Int32));
        graph.nodes.push(constant);
        graph.nodes.push(node(
            "bad",
            "MatMul",
            vec![NodeInput::Single("mm:0".into()), NodeInput::Single("c:0".into())],
        ));
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::InputTypeMismatch { .. })
        ));

        graph.nodes.pop();
        graph.nodes.push(node("odd", "Mystery", vec![]));
        assert!(matches!(
            GraphValidator::new(&graph, &registry).validate(),
            Err(GraphError::UnknownOperation { .. })
        ));
    }
}
