use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::GraphError;
use crate::graph::DataType;
use crate::registry::ArgLayout;
use crate::types::Untyped;

#[derive(Debug)]
pub(crate) struct OperationState {
    pub(crate) graph_id: u64,
    pub(crate) name: String,
    pub(crate) op_type: String,
    pub(crate) device: Option<String>,
    pub(crate) inputs: Vec<ArgLayout>,
    pub(crate) outputs: Vec<ArgLayout>,
    pub(crate) output_types: Vec<DataType>,
    pub(crate) output_refs: Vec<bool>,
}

/// Handle to a finalized node. Clones share the same node.
#[derive(Debug, Clone)]
pub struct Operation {
    state: Rc<OperationState>,
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for Operation {}

impl Operation {
    pub(crate) fn new(state: OperationState) -> Self {
        Self {
            state: Rc::new(state),
        }
    }

    pub(crate) fn graph_id(&self) -> u64 {
        self.state.graph_id
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn op_type(&self) -> &str {
        &self.state.op_type
    }

    pub fn device(&self) -> Option<&str> {
        self.state.device.as_deref()
    }

    pub fn num_outputs(&self) -> usize {
        self.state.output_types.len()
    }

    pub fn output_type(&self, index: usize) -> Result<DataType, GraphError> {
        self.state
            .output_types
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Whether output slot `index` is a reference to a mutable buffer.
    pub fn output_is_ref(&self, index: usize) -> bool {
        self.state.output_refs.get(index).copied().unwrap_or(false)
    }

    /// Typed handle to output slot `index`.
    ///
    /// The element tag is not checked against the slot's dtype; wrappers pick
    /// the tag from the operator definition.
    pub fn output<T>(&self, index: usize) -> Result<Output<T>, GraphError> {
        if index >= self.num_outputs() {
            return Err(self.out_of_range(index));
        }
        Ok(Output::from_endpoint(Endpoint {
            operation: self.clone(),
            index,
        }))
    }

    /// Handles to `len` consecutive output slots starting at `start`.
    pub fn output_list<T>(&self, start: usize, len: usize) -> Result<Vec<Output<T>>, GraphError> {
        let end = start.saturating_add(len);
        if end > self.num_outputs() {
            return Err(self.out_of_range(end.saturating_sub(1)));
        }
        (start..end).map(|index| self.output(index)).collect()
    }

    /// Number of slots produced by the output argument `name`.
    pub fn output_list_length(&self, name: &str) -> Result<usize, GraphError> {
        self.arg_len(&self.state.outputs, name)
    }

    /// Number of operands fed into the input argument `name`.
    pub fn input_list_length(&self, name: &str) -> Result<usize, GraphError> {
        self.arg_len(&self.state.inputs, name)
    }

    fn arg_len(&self, layout: &[ArgLayout], name: &str) -> Result<usize, GraphError> {
        layout
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| arg.len)
            .ok_or_else(|| GraphError::UnknownArgument {
                operation: self.name().to_string(),
                name: name.to_string(),
            })
    }

    fn out_of_range(&self, index: usize) -> GraphError {
        GraphError::InvalidOutputIndex {
            operation: self.name().to_string(),
            index,
            count: self.num_outputs(),
        }
    }
}

/// Untyped reference to one output slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    operation: Operation,
    index: usize,
}

impl Endpoint {
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn data_type(&self) -> DataType {
        self.operation.state.output_types[self.index]
    }

    /// True when the slot refers to a mutable buffer rather than a value.
    pub fn is_ref(&self) -> bool {
        self.operation.output_is_ref(self.index)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operation.name(), self.index)
    }
}

/// Symbolic handle to an output slot whose elements are of type `T`.
pub struct Output<T> {
    endpoint: Endpoint,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Output<T> {
    fn from_endpoint(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            _marker: PhantomData,
        }
    }

    pub fn op(&self) -> &Operation {
        &self.endpoint.operation
    }

    pub fn index(&self) -> usize {
        self.endpoint.index
    }

    pub fn data_type(&self) -> DataType {
        self.endpoint.data_type()
    }

    pub fn is_ref(&self) -> bool {
        self.endpoint.is_ref()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn into_endpoint(self) -> Endpoint {
        self.endpoint
    }

    /// Drop the element tag, e.g. to feed a heterogeneous list input.
    pub fn untyped(&self) -> Output<Untyped> {
        Output::from_endpoint(self.endpoint.clone())
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Output::from_endpoint(self.endpoint.clone())
    }
}

impl<T> PartialEq for Output<T> {
    fn eq(&self, other: &Self) -> bool {
        self.endpoint == other.endpoint
    }
}

impl<T> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Output({}, {})", self.endpoint, self.data_type())
    }
}

impl<T> fmt::Display for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.endpoint.fmt(f)
    }
}

/// Anything that can be fed as an input: an [`Output`] or a single-output
/// operator wrapper.
pub trait Operand<T> {
    fn as_output(&self) -> Output<T>;
}

impl<T> Operand<T> for Output<T> {
    fn as_output(&self) -> Output<T> {
        self.clone()
    }
}

/// Implemented by every operator wrapper.
pub trait PrimitiveOp {
    fn operation(&self) -> &Operation;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_operation() -> Operation {
        Operation::new(OperationState {
            graph_id: 7,
            name: "split".to_string(),
            op_type: "SparseSplit".to_string(),
            device: None,
            inputs: vec![ArgLayout {
                name: "values".to_string(),
                start: 0,
                len: 1,
            }],
            outputs: vec![
                ArgLayout {
                    name: "output_indices".to_string(),
                    start: 0,
                    len: 2,
                },
                ArgLayout {
                    name: "output_values".to_string(),
                    start: 2,
                    len: 2,
                },
            ],
            output_types: vec![
                DataType::Int64,
                DataType::Int64,
                DataType::Float,
                DataType::Float,
            ],
            output_refs: vec![false; 4],
        })
    }

    #[test]
    fn list_outputs_are_consecutive_slots() {
        let op = split_operation();
        let len = op.output_list_length("output_values").unwrap();
        let values = op.output_list::<f32>(2, len).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].index(), 2);
        assert_eq!(values[1].index(), 3);
        assert_eq!(values[1].data_type(), DataType::Float);
        assert_eq!(values[0].to_string(), "split:2");
    }

    #[test]
    fn rejects_out_of_range_slots() {
        let op = split_operation();
        assert!(matches!(
            op.output::<f32>(4),
            Err(GraphError::InvalidOutputIndex { index: 4, count: 4, .. })
        ));
        assert!(op.output_list::<i64>(3, 2).is_err());
        assert!(op.output_list::<i64>(4, 0).unwrap().is_empty());
    }

    #[test]
    fn unknown_argument_names_are_errors() {
        let op = split_operation();
        assert_eq!(op.input_list_length("values").unwrap(), 1);
        assert!(matches!(
            op.output_list_length("missing"),
            Err(GraphError::UnknownArgument { .. })
        ));
    }

    #[test]
    fn clones_share_identity() {
        let op = split_operation();
        let first = op.output::<i64>(0).unwrap();
        assert_eq!(first.op(), &op);
        assert_ne!(op, split_operation());
        assert_eq!(first.untyped().endpoint(), first.endpoint());
    }
}
