//! Queues, stacks and partitioning.
//!
//! Queue and stack operators exchange a `Resource` handle; the element
//! types of queue components are only known when the graph is built, so
//! component lists are untyped.

use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::graph::{DataType, Shape};
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;
use crate::types::{Resource, TensorType, Untyped};

#[derive(Debug, Clone, Default)]
pub struct FifoQueueV2Options {
    shapes: Option<Vec<Shape>>,
    capacity: Option<i64>,
    container: Option<String>,
    shared_name: Option<String>,
}

impl FifoQueueV2Options {
    /// One shape per component.
    pub fn shapes(mut self, shapes: Vec<Shape>) -> Self {
        self.shapes = Some(shapes);
        self
    }

    /// Upper bound on the number of elements; negative means unbounded.
    pub fn capacity(mut self, capacity: i64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn container(mut self, container: &str) -> Self {
        self.container = Some(container.to_string());
        self
    }

    pub fn shared_name(mut self, shared_name: &str) -> Self {
        self.shared_name = Some(shared_name.to_string());
        self
    }
}

/// First-in first-out queue (`FIFOQueueV2`).
#[derive(Debug, Clone)]
pub struct FifoQueueV2 {
    operation: Operation,
    handle: Output<Resource>,
}

impl FifoQueueV2 {
    pub fn new(
        scope: &Scope<'_>,
        component_types: &[DataType],
        options: FifoQueueV2Options,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("FIFOQueueV2")
            .attr("component_types", component_types)
            .attr_opt("shapes", options.shapes)
            .attr_opt("capacity", options.capacity)
            .attr_opt("container", options.container)
            .attr_opt("shared_name", options.shared_name)
            .build(scope)?;
        let handle = operation.output(0)?;
        Ok(Self { operation, handle })
    }

    pub fn handle(&self) -> &Output<Resource> {
        &self.handle
    }
}

impl_op!([] FifoQueueV2, handle: Resource);

#[derive(Debug, Clone, Default)]
pub struct QueueOptions {
    timeout_ms: Option<i64>,
}

impl QueueOptions {
    /// Fail after this many milliseconds if the queue is full or empty.
    pub fn timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Enqueues one tuple of components. Produces no outputs.
#[derive(Debug, Clone)]
pub struct QueueEnqueueV2 {
    operation: Operation,
}

impl QueueEnqueueV2 {
    pub fn new(
        scope: &Scope<'_>,
        handle: &impl Operand<Resource>,
        components: &[Output<Untyped>],
        options: QueueOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("QueueEnqueueV2")
            .input(handle)
            .input_list(components)
            .attr_opt("timeout_ms", options.timeout_ms)
            .build(scope)?;
        Ok(Self { operation })
    }
}

impl_op!([] QueueEnqueueV2);

/// Dequeues one tuple of components.
#[derive(Debug, Clone)]
pub struct QueueDequeueV2 {
    operation: Operation,
    components: Vec<Output<Untyped>>,
}

impl QueueDequeueV2 {
    pub fn new(
        scope: &Scope<'_>,
        handle: &impl Operand<Resource>,
        component_types: &[DataType],
        options: QueueOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("QueueDequeueV2")
            .input(handle)
            .attr("component_types", component_types)
            .attr_opt("timeout_ms", options.timeout_ms)
            .build(scope)?;
        let len = operation.output_list_length("components")?;
        let components = operation.output_list(0, len)?;
        Ok(Self {
            operation,
            components,
        })
    }

    pub fn components(&self) -> &[Output<Untyped>] {
        &self.components
    }
}

impl_op!([] QueueDequeueV2, list components: Untyped);

#[derive(Debug, Clone)]
pub struct QueueSizeV2 {
    operation: Operation,
    size: Output<i32>,
}

impl QueueSizeV2 {
    pub fn new(scope: &Scope<'_>, handle: &impl Operand<Resource>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("QueueSizeV2").input(handle).build(scope)?;
        let size = operation.output(0)?;
        Ok(Self { operation, size })
    }

    pub fn size(&self) -> &Output<i32> {
        &self.size
    }
}

impl_op!([] QueueSizeV2, size: i32);

/// Routes each slice of `data` to the output named by `partitions`.
#[derive(Debug, Clone)]
pub struct DynamicPartition<T> {
    operation: Operation,
    outputs: Vec<Output<T>>,
}

impl<T> DynamicPartition<T> {
    pub fn new(
        scope: &Scope<'_>,
        data: &impl Operand<T>,
        partitions: &impl Operand<i32>,
        num_partitions: i64,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("DynamicPartition")
            .input(data)
            .input(partitions)
            .attr("num_partitions", num_partitions)
            .build(scope)?;
        let len = operation.output_list_length("outputs")?;
        let outputs = operation.output_list(0, len)?;
        Ok(Self { operation, outputs })
    }

    pub fn outputs(&self) -> &[Output<T>] {
        &self.outputs
    }
}

impl_op!([T] DynamicPartition<T>, list outputs: T);

#[derive(Debug, Clone, Default)]
pub struct StackV2Options {
    stack_name: Option<String>,
}

impl StackV2Options {
    pub fn stack_name(mut self, stack_name: &str) -> Self {
        self.stack_name = Some(stack_name.to_string());
        self
    }
}

/// Stack of elements of type `T`.
#[derive(Debug, Clone)]
pub struct StackV2 {
    operation: Operation,
    handle: Output<Resource>,
}

impl StackV2 {
    pub fn new<T: TensorType>(
        scope: &Scope<'_>,
        max_size: &impl Operand<i32>,
        options: StackV2Options,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("StackV2")
            .input(max_size)
            .attr("elem_type", T::DATA_TYPE)
            .attr_opt("stack_name", options.stack_name)
            .build(scope)?;
        let handle = operation.output(0)?;
        Ok(Self { operation, handle })
    }

    pub fn handle(&self) -> &Output<Resource> {
        &self.handle
    }
}

impl_op!([] StackV2, handle: Resource);

#[derive(Debug, Clone, Default)]
pub struct StackPushV2Options {
    swap_memory: Option<bool>,
}

impl StackPushV2Options {
    pub fn swap_memory(mut self, swap_memory: bool) -> Self {
        self.swap_memory = Some(swap_memory);
        self
    }
}

#[derive(Debug, Clone)]
pub struct StackPushV2<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> StackPushV2<T> {
    pub fn new(
        scope: &Scope<'_>,
        handle: &impl Operand<Resource>,
        elem: &impl Operand<T>,
        options: StackPushV2Options,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("StackPushV2")
            .input(handle)
            .input(elem)
            .attr_opt("swap_memory", options.swap_memory)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] StackPushV2<T>, output: T);

#[derive(Debug, Clone)]
pub struct StackPopV2<T> {
    operation: Operation,
    elem: Output<T>,
}

impl<T: TensorType> StackPopV2<T> {
    pub fn new(scope: &Scope<'_>, handle: &impl Operand<Resource>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("StackPopV2")
            .input(handle)
            .attr("elem_type", T::DATA_TYPE)
            .build(scope)?;
        let elem = operation.output(0)?;
        Ok(Self { operation, elem })
    }

    pub fn elem(&self) -> &Output<T> {
        &self.elem
    }
}

impl_op!([T] StackPopV2<T>, elem: T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Graph;
    use crate::graph::{AttrValue, NodeInput};
    use crate::ops::core::Constant;
    use crate::ops::test_util::placeholder;
    use crate::operation::PrimitiveOp;

    #[test]
    fn queue_round_trip_through_graph() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let types = [DataType::Float, DataType::Int64];
        let queue = FifoQueueV2::new(&scope, &types, FifoQueueV2Options::default().capacity(8))
            .unwrap();

        let features = placeholder::<f32>(&scope).untyped();
        let label = placeholder::<i64>(&scope).untyped();
        let enqueue =
            QueueEnqueueV2::new(&scope, &queue, &[features, label], QueueOptions::default())
                .unwrap();
        assert_eq!(enqueue.operation().num_outputs(), 0);

        let dequeue = QueueDequeueV2::new(&scope, &queue, &types, QueueOptions::default())
            .unwrap();
        let dequeued: Vec<DataType> = dequeue.components().iter().map(|c| c.data_type()).collect();
        assert_eq!(dequeued, types.to_vec());
        let size = QueueSizeV2::new(&scope, &queue).unwrap();
        assert_eq!(size.size().data_type(), DataType::Int32);

        let node = graph.node_def("FIFOQueueV2").unwrap();
        assert_eq!(node.attr("capacity"), Some(&AttrValue::Int(8)));
        assert!(node.attr("shapes").is_none());
        let node = graph.node_def("QueueEnqueueV2").unwrap();
        assert_eq!(
            node.inputs[1],
            NodeInput::List(vec!["Placeholder:0".into(), "Placeholder_1:0".into()])
        );
        assert_eq!(
            node.attr("Tcomponents"),
            Some(&AttrValue::TypeList(types.to_vec()))
        );
    }

    #[test]
    fn queue_requires_component_types() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let err = FifoQueueV2::new(&scope, &[], FifoQueueV2Options::default()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidAttrValue { attr, .. } if attr == "component_types"
        ));
    }

    #[test]
    fn dynamic_partition_list_length_matches_attribute() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let data = placeholder::<f32>(&scope);
        let partitions = placeholder::<i32>(&scope);
        let parts = DynamicPartition::new(&scope, &data, &partitions, 4).unwrap();
        assert_eq!(parts.outputs().len(), 4);
        let slots: Vec<usize> = parts.into_iter().map(|o| o.index()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn stack_push_and_pop() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let max_size = Constant::scalar(&scope, 16i32).unwrap();
        let stack = StackV2::new::<f32>(&scope, &max_size, StackV2Options::default()).unwrap();
        let elem = placeholder::<f32>(&scope);
        let pushed =
            StackPushV2::new(&scope, &stack, &elem, StackPushV2Options::default()).unwrap();
        assert_eq!(pushed.output().data_type(), elem.data_type());

        let popped = StackPopV2::<f32>::new(
            &scope.with_control_dependencies(&[pushed.operation().clone()]),
            &stack,
        )
        .unwrap();
        assert_eq!(popped.elem().data_type(), DataType::Float);
        assert_eq!(
            graph.node_def("StackPopV2").unwrap().control_inputs,
            vec!["^StackPushV2".to_string()]
        );
        assert_eq!(
            graph.node_def("StackV2").unwrap().attr("elem_type"),
            Some(&AttrValue::Type(DataType::Float))
        );
    }
}
