//! In-memory graph-construction engine.
//!
//! [`Graph`] records nodes built through the [`ExecutionEnvironment`]
//! interface and checks each of them against its [`OpRegistry`] when the
//! builder is finalized. It never executes anything.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::environment::{ExecutionEnvironment, OperationBuilder};
use crate::error::GraphError;
use crate::graph::{
    AttrValue, GraphDef, InputRef, NodeDef, NodeInput, parse_control_ref, parse_input_ref,
};
use crate::operation::{Endpoint, Operation, OperationState};
use crate::registry::{InputTypes, OpRegistry};
use crate::scope::is_valid_node_name;
use crate::types::Untyped;

pub const GRAPH_DEF_VERSION: u32 = 1;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Default)]
struct GraphState {
    operations: Vec<Operation>,
    nodes: Vec<NodeDef>,
    by_name: HashMap<String, usize>,
}

#[derive(Debug)]
pub struct Graph {
    id: u64,
    registry: OpRegistry,
    state: RefCell<GraphState>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Empty graph that knows every built-in operator.
    pub fn new() -> Self {
        Self::with_registry(OpRegistry::with_defaults())
    }

    pub fn with_registry(registry: OpRegistry) -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            registry,
            state: RefCell::new(GraphState::default()),
        }
    }

    pub fn registry(&self) -> &OpRegistry {
        &self.registry
    }

    pub fn operation(&self, name: &str) -> Option<Operation> {
        let state = self.state.borrow();
        state
            .by_name
            .get(name)
            .map(|&idx| state.operations[idx].clone())
    }

    /// Operations in creation order.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    pub fn num_operations(&self) -> usize {
        self.state.borrow().operations.len()
    }

    /// Serialized form of the node called `name`.
    pub fn node_def(&self, name: &str) -> Option<NodeDef> {
        let state = self.state.borrow();
        state.by_name.get(name).map(|&idx| state.nodes[idx].clone())
    }

    pub fn to_graph_def(&self) -> GraphDef {
        GraphDef {
            version: GRAPH_DEF_VERSION,
            nodes: self.state.borrow().nodes.clone(),
        }
    }

    /// Replay the nodes of `graph_def` into this graph. Every node goes
    /// through the builder interface, so the usual checks apply; inputs must
    /// refer to nodes that appear earlier. Either every node is added or,
    /// on error, none is.
    pub fn import_graph_def(&self, graph_def: &GraphDef) -> Result<Vec<Operation>, GraphError> {
        let checkpoint = self.num_operations();
        self.replay(graph_def).inspect_err(|err| {
            self.truncate(checkpoint);
            tracing::debug!(error = %err, kept = checkpoint, "rolled back graph import");
        })
    }

    fn truncate(&self, len: usize) {
        let mut state = self.state.borrow_mut();
        let removed: Vec<NodeDef> = state.nodes.drain(len..).collect();
        for node in &removed {
            state.by_name.remove(&node.name);
        }
        state.operations.truncate(len);
    }

    fn replay(&self, graph_def: &GraphDef) -> Result<Vec<Operation>, GraphError> {
        let mut imported = Vec::with_capacity(graph_def.nodes.len());
        for node in &graph_def.nodes {
            let mut builder = self.op_builder(&node.op, &node.name)?;
            for input in &node.inputs {
                match input {
                    NodeInput::Single(reference) => {
                        builder.add_input(self.resolve_data_ref(&node.name, reference)?);
                    }
                    NodeInput::List(references) => {
                        let endpoints = references
                            .iter()
                            .map(|reference| self.resolve_data_ref(&node.name, reference))
                            .collect::<Result<Vec<_>, _>>()?;
                        builder.add_input_list(endpoints);
                    }
                }
            }
            for reference in &node.control_inputs {
                let operation = self.resolve_control_ref(&node.name, reference)?;
                builder.add_control_input(&operation);
            }
            if let Some(device) = &node.device {
                builder.set_device(device);
            }
            for (name, value) in &node.attrs {
                builder.set_attr(name, value.clone());
            }
            let operation = builder.build()?;
            tracing::debug!(name = %node.name, op = %node.op, "imported node");
            imported.push(operation);
        }
        Ok(imported)
    }

    fn resolve_data_ref(&self, operation: &str, reference: &str) -> Result<Endpoint, GraphError> {
        let invalid = || GraphError::InvalidOperandReference {
            operation: operation.to_string(),
            operand: reference.to_string(),
        };
        let Some(InputRef::Data { node, index }) = parse_input_ref(reference) else {
            return Err(invalid());
        };
        let producer = self
            .operation(node)
            .ok_or_else(|| GraphError::OperandNotReady {
                operation: operation.to_string(),
                operand: reference.to_string(),
            })?;
        Ok(producer.output::<Untyped>(index)?.into_endpoint())
    }

    fn resolve_control_ref(&self, operation: &str, reference: &str) -> Result<Operation, GraphError> {
        let node = parse_control_ref(reference).ok_or_else(|| {
            GraphError::InvalidOperandReference {
                operation: operation.to_string(),
                operand: reference.to_string(),
            }
        })?;
        self.operation(node)
            .ok_or_else(|| GraphError::OperandNotReady {
                operation: operation.to_string(),
                operand: reference.to_string(),
            })
    }
}

impl ExecutionEnvironment for Graph {
    fn op_builder(
        &self,
        op_type: &str,
        name: &str,
    ) -> Result<Box<dyn OperationBuilder + '_>, GraphError> {
        self.registry.get(op_type)?;
        if !is_valid_node_name(name) {
            return Err(GraphError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(Box::new(GraphOperationBuilder {
            graph: self,
            op_type: op_type.to_string(),
            name: name.to_string(),
            inputs: Vec::new(),
            control_inputs: Vec::new(),
            device: None,
            attrs: BTreeMap::new(),
        }))
    }
}

#[derive(Debug)]
enum PendingInput {
    Single(Endpoint),
    List(Vec<Endpoint>),
}

impl PendingInput {
    fn endpoints(&self) -> &[Endpoint] {
        match self {
            PendingInput::Single(endpoint) => std::slice::from_ref(endpoint),
            PendingInput::List(endpoints) => endpoints,
        }
    }

    fn types(&self) -> InputTypes {
        match self {
            PendingInput::Single(endpoint) => InputTypes::Single(endpoint.data_type()),
            PendingInput::List(endpoints) => {
                InputTypes::List(endpoints.iter().map(Endpoint::data_type).collect())
            }
        }
    }

    fn to_node_input(&self) -> NodeInput {
        match self {
            PendingInput::Single(endpoint) => NodeInput::Single(endpoint.to_string()),
            PendingInput::List(endpoints) => {
                NodeInput::List(endpoints.iter().map(ToString::to_string).collect())
            }
        }
    }
}

struct GraphOperationBuilder<'g> {
    graph: &'g Graph,
    op_type: String,
    name: String,
    inputs: Vec<PendingInput>,
    control_inputs: Vec<Operation>,
    device: Option<String>,
    attrs: BTreeMap<String, AttrValue>,
}

impl GraphOperationBuilder<'_> {
    fn check_owned(&self, operation: &Operation, operand: String) -> Result<(), GraphError> {
        if operation.graph_id() != self.graph.id {
            return Err(GraphError::ForeignOperand {
                operation: self.name.clone(),
                operand,
            });
        }
        Ok(())
    }
}

impl OperationBuilder for GraphOperationBuilder<'_> {
    fn add_input(&mut self, input: Endpoint) {
        self.inputs.push(PendingInput::Single(input));
    }

    fn add_input_list(&mut self, inputs: Vec<Endpoint>) {
        self.inputs.push(PendingInput::List(inputs));
    }

    fn add_control_input(&mut self, operation: &Operation) {
        if !self.control_inputs.contains(operation) {
            self.control_inputs.push(operation.clone());
        }
    }

    fn set_device(&mut self, device: &str) {
        self.device = Some(device.to_string());
    }

    fn set_attr(&mut self, name: &str, value: AttrValue) {
        self.attrs.insert(name.to_string(), value);
    }

    fn build(self: Box<Self>) -> Result<Operation, GraphError> {
        let this = *self;
        for endpoint in this.inputs.iter().flat_map(PendingInput::endpoints) {
            this.check_owned(endpoint.operation(), endpoint.to_string())?;
        }
        for operation in &this.control_inputs {
            this.check_owned(operation, format!("^{}", operation.name()))?;
        }
        if this.graph.state.borrow().by_name.contains_key(&this.name) {
            return Err(GraphError::DuplicateOperationName { name: this.name });
        }

        let def = this.graph.registry.get(&this.op_type)?;
        let input_types: Vec<InputTypes> = this.inputs.iter().map(PendingInput::types).collect();
        let resolved = def.resolve(&this.name, &input_types, this.attrs)?;
        for (arg, input) in def.inputs.iter().zip(&this.inputs) {
            if !arg.is_ref {
                continue;
            }
            if let Some(endpoint) = input
                .endpoints()
                .iter()
                .find(|endpoint| !endpoint.is_ref())
            {
                return Err(GraphError::RefInputRequired {
                    operation: this.name.clone(),
                    arg: arg.name.clone(),
                    operand: endpoint.to_string(),
                });
            }
        }

        let node = NodeDef {
            name: this.name.clone(),
            op: this.op_type.clone(),
            inputs: this.inputs.iter().map(PendingInput::to_node_input).collect(),
            control_inputs: this
                .control_inputs
                .iter()
                .map(|op| format!("^{}", op.name()))
                .collect(),
            device: this.device.clone(),
            attrs: resolved.attrs,
        };
        let operation = Operation::new(OperationState {
            graph_id: this.graph.id,
            name: this.name,
            op_type: this.op_type,
            device: this.device,
            inputs: resolved.inputs,
            outputs: resolved.outputs,
            output_types: resolved.output_types,
            output_refs: resolved.output_refs,
        });

        let mut state = this.graph.state.borrow_mut();
        let idx = state.operations.len();
        state.by_name.insert(node.name.clone(), idx);
        state.nodes.push(node);
        state.operations.push(operation.clone());
        tracing::debug!(
            name = operation.name(),
            op = operation.op_type(),
            outputs = operation.num_outputs(),
            "built operation"
        );
        Ok(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DataType, Shape, Tensor};

    fn constant(graph: &Graph, name: &str, value: f32) -> Operation {
        let mut builder = graph.op_builder("Const", name).unwrap();
        builder.set_attr("value", Tensor::scalar(value).into());
        builder.set_attr("dtype", DataType::Float.into());
        builder.build().unwrap()
    }

    #[test]
    fn records_nodes_with_inferred_attributes() {
        let graph = Graph::new();
        let a = constant(&graph, "a", 1.0);
        let b = constant(&graph, "b", 2.0);

        let mut builder = graph.op_builder("AddN", "sum").unwrap();
        builder.add_input_list(vec![
            a.output::<f32>(0).unwrap().into_endpoint(),
            b.output::<f32>(0).unwrap().into_endpoint(),
        ]);
        let sum = builder.build().unwrap();

        assert_eq!(sum.num_outputs(), 1);
        assert_eq!(sum.output_type(0).unwrap(), DataType::Float);
        assert_eq!(sum.input_list_length("inputs").unwrap(), 2);
        let node = graph.node_def("sum").unwrap();
        assert_eq!(node.inputs, vec![NodeInput::List(vec!["a:0".into(), "b:0".into()])]);
        assert_eq!(node.attr("N"), Some(&AttrValue::Int(2)));
        assert_eq!(node.attr("T"), Some(&AttrValue::Type(DataType::Float)));
        assert_eq!(graph.num_operations(), 3);
    }

    #[test]
    fn rejects_unknown_types_and_bad_names() {
        let graph = Graph::new();
        assert!(matches!(
            graph.op_builder("NoSuchOp", "x"),
            Err(GraphError::UnknownOperation { .. })
        ));
        assert!(matches!(
            graph.op_builder("Const", "has space"),
            Err(GraphError::InvalidName { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let graph = Graph::new();
        constant(&graph, "c", 1.0);
        let mut builder = graph.op_builder("Const", "c").unwrap();
        builder.set_attr("value", Tensor::scalar(2.0f32).into());
        builder.set_attr("dtype", DataType::Float.into());
        assert!(matches!(
            builder.build(),
            Err(GraphError::DuplicateOperationName { .. })
        ));
        assert_eq!(graph.num_operations(), 1);
    }

    #[test]
    fn rejects_operands_from_another_graph() {
        let first = Graph::new();
        let second = Graph::new();
        let foreign = constant(&first, "x", 1.0);

        let mut builder = second.op_builder("Sign", "sign").unwrap();
        builder.add_input(foreign.output::<f32>(0).unwrap().into_endpoint());
        assert!(matches!(
            builder.build(),
            Err(GraphError::ForeignOperand { operand, .. }) if operand == "x:0"
        ));
        assert_eq!(second.num_operations(), 0);
    }

    #[test]
    fn missing_required_attribute_is_reported() {
        let graph = Graph::new();
        let mut builder = graph.op_builder("Const", "c").unwrap();
        builder.set_attr("dtype", DataType::Float.into());
        assert!(matches!(
            builder.build(),
            Err(GraphError::MissingAttribute { attr, .. }) if attr == "value"
        ));
    }

    #[test]
    fn records_device_and_control_inputs() {
        let graph = Graph::new();
        let init = constant(&graph, "init", 0.0);
        let mut builder = graph.op_builder("Const", "after").unwrap();
        builder.set_attr("value", Tensor::scalar(1.0f32).into());
        builder.set_attr("dtype", DataType::Float.into());
        builder.set_device("/cpu:0");
        builder.add_control_input(&init);
        builder.add_control_input(&init);
        let after = builder.build().unwrap();

        assert_eq!(after.device(), Some("/cpu:0"));
        let node = graph.node_def("after").unwrap();
        assert_eq!(node.control_inputs, vec!["^init".to_string()]);
    }

    #[test]
    fn graph_def_import_reproduces_nodes() {
        let graph = Graph::new();
        let init = constant(&graph, "init", 0.0);
        let x = constant(&graph, "x", 3.0);
        let mut builder = graph.op_builder("Sign", "scope/sign").unwrap();
        builder.add_input(x.output::<f32>(0).unwrap().into_endpoint());
        builder.add_control_input(&init);
        builder.build().unwrap();

        let exported = graph.to_graph_def();
        let copy = Graph::new();
        let imported = copy.import_graph_def(&exported).unwrap();
        assert_eq!(imported.len(), 3);
        assert_eq!(copy.to_graph_def(), exported);
        assert_eq!(copy.operation("scope/sign").unwrap().op_type(), "Sign");
    }

    #[test]
    fn import_rejects_corrupt_constant_tensors() {
        let graph_def: GraphDef = serde_json::from_value(serde_json::json!({
            "nodes": [{
                "name": "c",
                "op": "Const",
                "attrs": {
                    "dtype": {"kind": "type", "value": "int32"},
                    "value": {"kind": "tensor", "value": {
                        "data_type": "float", "shape": [4], "content": "AAA="
                    }}
                }
            }]
        }))
        .unwrap();
        let graph = Graph::new();
        assert!(matches!(
            graph.import_graph_def(&graph_def),
            Err(GraphError::InvalidAttrValue { attr, .. }) if attr == "value"
        ));

        let mut builder = graph.op_builder("Const", "c").unwrap();
        builder.set_attr("value", Tensor::scalar(1.0f32).into());
        builder.set_attr("dtype", DataType::Int32.into());
        assert!(matches!(
            builder.build(),
            Err(GraphError::InvalidAttrValue { reason, .. }) if reason.contains("dtype")
        ));
        assert_eq!(graph.num_operations(), 0);
    }

    #[test]
    fn failed_import_leaves_graph_unchanged() {
        let graph = Graph::new();
        constant(&graph, "existing", 1.0);
        let graph_def: GraphDef = serde_json::from_value(serde_json::json!({
            "nodes": [
                {"name": "p", "op": "Placeholder",
                 "attrs": {"dtype": {"kind": "type", "value": "float"}}},
                {"name": "bad", "op": "NoSuchOp"}
            ]
        }))
        .unwrap();
        assert!(matches!(
            graph.import_graph_def(&graph_def),
            Err(GraphError::UnknownOperation { .. })
        ));
        assert_eq!(graph.num_operations(), 1);
        assert!(graph.operation("p").is_none());
        assert!(graph.node_def("p").is_none());

        let mut fixed = graph_def.clone();
        fixed.nodes.pop();
        let imported = graph.import_graph_def(&fixed).unwrap();
        assert_eq!(imported[0].name(), "p");
        assert_eq!(graph.num_operations(), 2);
        assert_eq!(graph.operation("existing").unwrap().op_type(), "Const");
    }

    #[test]
    fn control_references_use_one_grammar() {
        let graph_def = |control: &str| -> GraphDef {
            serde_json::from_value(serde_json::json!({
                "nodes": [
                    {"name": "x", "op": "Placeholder",
                     "attrs": {"dtype": {"kind": "type", "value": "float"}}},
                    {"name": "y", "op": "Placeholder", "control_inputs": [control],
                     "attrs": {"dtype": {"kind": "type", "value": "float"}}}
                ]
            }))
            .unwrap()
        };
        for accepted in ["^x", "x"] {
            let graph = Graph::new();
            graph.import_graph_def(&graph_def(accepted)).unwrap();
            assert_eq!(graph.node_def("y").unwrap().control_inputs, vec!["^x".to_string()]);
        }
        for rejected in ["^x:0", "x:0", "^"] {
            let graph = Graph::new();
            assert!(matches!(
                graph.import_graph_def(&graph_def(rejected)),
                Err(GraphError::InvalidOperandReference { .. })
            ));
        }
    }

    #[test]
    fn import_requires_producers_first() {
        let graph_def: GraphDef = serde_json::from_value(serde_json::json!({
            "nodes": [{"name": "sign", "op": "Sign", "inputs": ["x:0"]}]
        }))
        .unwrap();
        let graph = Graph::new();
        assert!(matches!(
            graph.import_graph_def(&graph_def),
            Err(GraphError::OperandNotReady { .. })
        ));
    }

    #[test]
    fn imported_variables_keep_reference_slots() {
        let graph = Graph::new();
        let mut builder = graph.op_builder("VariableV2", "v").unwrap();
        builder.set_attr("shape", Shape::scalar().into());
        builder.set_attr("dtype", DataType::Float.into());
        let variable = builder.build().unwrap();
        let value = constant(&graph, "c", 2.0);
        let mut builder = graph.op_builder("Assign", "assign").unwrap();
        builder.add_input(variable.output::<f32>(0).unwrap().into_endpoint());
        builder.add_input(value.output::<f32>(0).unwrap().into_endpoint());
        builder.build().unwrap();

        let mut exported = graph.to_graph_def();
        let copy = Graph::new();
        copy.import_graph_def(&exported).unwrap();
        assert!(copy.operation("v").unwrap().output_is_ref(0));
        assert!(copy.operation("assign").unwrap().output_is_ref(0));
        assert!(!copy.operation("c").unwrap().output_is_ref(0));

        exported.nodes[2].inputs[0] = NodeInput::Single("c:0".into());
        let err = Graph::new().import_graph_def(&exported).unwrap_err();
        assert!(matches!(
            err,
            GraphError::RefInputRequired { ref operation, ref operand, .. }
                if operation == "assign" && operand == "c:0"
        ));
    }
}
