//! Frames, merges and scheduling-only nodes.

use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;

/// Node with no inputs or outputs, used to group control dependencies.
#[derive(Debug, Clone)]
pub struct NoOp {
    operation: Operation,
}

impl NoOp {
    pub fn new(scope: &Scope<'_>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("NoOp").build(scope)?;
        Ok(Self { operation })
    }
}

impl_op!([] NoOp);

#[derive(Debug, Clone)]
pub struct ControlTrigger {
    operation: Operation,
}

impl ControlTrigger {
    pub fn new(scope: &Scope<'_>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ControlTrigger").build(scope)?;
        Ok(Self { operation })
    }
}

impl_op!([] ControlTrigger);

#[derive(Debug, Clone, Default)]
pub struct AbortOptions {
    error_msg: Option<String>,
    exit_without_error: Option<bool>,
}

impl AbortOptions {
    pub fn error_msg(mut self, error_msg: &str) -> Self {
        self.error_msg = Some(error_msg.to_string());
        self
    }

    pub fn exit_without_error(mut self, exit_without_error: bool) -> Self {
        self.exit_without_error = Some(exit_without_error);
        self
    }
}

/// Stops the process when run.
#[derive(Debug, Clone)]
pub struct Abort {
    operation: Operation,
}

impl Abort {
    pub fn new(scope: &Scope<'_>, options: AbortOptions) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Abort")
            .attr_opt("error_msg", options.error_msg)
            .attr_opt("exit_without_error", options.exit_without_error)
            .build(scope)?;
        Ok(Self { operation })
    }
}

impl_op!([] Abort);

#[derive(Debug, Clone, Default)]
pub struct EnterOptions {
    is_constant: Option<bool>,
    parallel_iterations: Option<i64>,
}

impl EnterOptions {
    /// Treat the output as loop invariant inside the child frame.
    pub fn is_constant(mut self, is_constant: bool) -> Self {
        self.is_constant = Some(is_constant);
        self
    }

    pub fn parallel_iterations(mut self, parallel_iterations: i64) -> Self {
        self.parallel_iterations = Some(parallel_iterations);
        self
    }
}

/// Makes `data` visible inside the child frame `frame_name`.
#[derive(Debug, Clone)]
pub struct Enter<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> Enter<T> {
    pub fn new(
        scope: &Scope<'_>,
        data: &impl Operand<T>,
        frame_name: &str,
        options: EnterOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Enter")
            .input(data)
            .attr("frame_name", frame_name)
            .attr_opt("is_constant", options.is_constant)
            .attr_opt("parallel_iterations", options.parallel_iterations)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Enter<T>, output: T);

/// Forwards whichever of `inputs` becomes available first.
#[derive(Debug, Clone)]
pub struct Merge<T> {
    operation: Operation,
    output: Output<T>,
    value_index: Output<i32>,
}

impl<T> Merge<T> {
    pub fn new<O: Operand<T>>(scope: &Scope<'_>, inputs: &[O]) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Merge").input_list(inputs).build(scope)?;
        let output = operation.output(0)?;
        let value_index = operation.output(1)?;
        Ok(Self {
            operation,
            output,
            value_index,
        })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }

    /// Position in `inputs` of the forwarded value.
    pub fn value_index(&self) -> &Output<i32> {
        &self.value_index
    }
}

impl_op!([T] Merge<T>);

/// Routes a reference to `output_true` or `output_false` depending on `pred`.
#[derive(Debug, Clone)]
pub struct RefSwitch<T> {
    operation: Operation,
    output_false: Output<T>,
    output_true: Output<T>,
}

impl<T> RefSwitch<T> {
    pub fn new(
        scope: &Scope<'_>,
        data: &impl Operand<T>,
        pred: &impl Operand<bool>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("RefSwitch")
            .input(data)
            .input(pred)
            .build(scope)?;
        let output_false = operation.output(0)?;
        let output_true = operation.output(1)?;
        Ok(Self {
            operation,
            output_false,
            output_true,
        })
    }

    pub fn output_false(&self) -> &Output<T> {
        &self.output_false
    }

    pub fn output_true(&self) -> &Output<T> {
        &self.output_true
    }
}

impl_op!([T] RefSwitch<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Graph;
    use crate::graph::{AttrValue, DataType, NodeInput, Shape};
    use crate::operation::PrimitiveOp;
    use crate::ops::state::{VariableOptions, VariableV2};
    use crate::ops::test_util::placeholder;

    #[test]
    fn merge_takes_a_list_and_has_two_outputs() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let a = placeholder::<f32>(&scope.with_name("a").unwrap());
        let b = placeholder::<f32>(&scope.with_name("b").unwrap());
        let merge = Merge::new(&scope, &[a, b]).unwrap();
        assert_eq!(merge.operation().num_outputs(), 2);
        assert_eq!(merge.output().data_type(), DataType::Float);
        assert_eq!(merge.value_index().data_type(), DataType::Int32);
        assert_eq!(merge.value_index().index(), 1);

        let node = graph.node_def("Merge").unwrap();
        assert_eq!(node.inputs, vec![NodeInput::List(vec!["a:0".into(), "b:0".into()])]);
        assert_eq!(node.attr("N"), Some(&AttrValue::Int(2)));

        let err = Merge::<f32>::new::<Output<f32>>(&scope, &[]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidAttrValue { ref attr, .. } if attr == "N"));
    }

    #[test]
    fn enter_requires_a_frame_name() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let data = placeholder::<i32>(&scope);
        let enter = Enter::new(
            &scope,
            &data,
            "while/loop",
            EnterOptions::default().parallel_iterations(32),
        )
        .unwrap();
        assert_eq!(enter.output().data_type(), DataType::Int32);
        let node = graph.node_def("Enter").unwrap();
        assert_eq!(node.attr("frame_name"), Some(&AttrValue::String("while/loop".into())));
        assert_eq!(node.attr("parallel_iterations"), Some(&AttrValue::Int(32)));
        assert!(node.attr("is_constant").is_none());

        let err = OpDescriptor::new("Enter")
            .input(&data)
            .build(&scope)
            .unwrap_err();
        assert!(matches!(err, GraphError::MissingAttribute { ref attr, .. } if attr == "frame_name"));
    }

    #[test]
    fn ref_switch_forwards_references() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let var = VariableV2::<f32>::new(&scope, Shape::make(&[3]), VariableOptions::default())
            .unwrap();
        let pred = placeholder::<bool>(&scope);
        let switch = RefSwitch::new(&scope, &var, &pred).unwrap();
        assert!(switch.output_false().is_ref());
        assert!(switch.output_true().is_ref());
        assert_eq!(switch.output_true().index(), 1);

        let value = placeholder::<f32>(&scope.with_name("value").unwrap());
        let err = RefSwitch::new(&scope, &value, &pred).unwrap_err();
        assert!(matches!(err, GraphError::RefInputRequired { ref arg, .. } if arg == "data"));
    }

    #[test]
    fn scheduling_nodes_have_no_outputs() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let noop = NoOp::new(&scope).unwrap();
        let trigger = ControlTrigger::new(
            &scope.with_control_dependencies(&[noop.operation().clone()]),
        )
        .unwrap();
        let abort = Abort::new(
            &scope.with_control_dependencies(&[trigger.operation().clone()]),
            AbortOptions::default().error_msg("stop"),
        )
        .unwrap();
        assert_eq!(noop.operation().num_outputs(), 0);
        assert_eq!(trigger.operation().num_outputs(), 0);
        assert_eq!(abort.operation().num_outputs(), 0);

        let node = graph.node_def("Abort").unwrap();
        assert_eq!(node.control_inputs, vec!["^ControlTrigger".to_string()]);
        assert_eq!(node.attr("error_msg"), Some(&AttrValue::String("stop".into())));
        assert!(node.attr("exit_without_error").is_none());
    }
}
