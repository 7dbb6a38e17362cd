//! Data-only description of a node and the single function that builds it.
//!
//! Every typed wrapper in [`crate::ops`] fills an [`OpDescriptor`] and calls
//! [`OpDescriptor::build`]; it can also be used directly for operators that
//! have no wrapper.

use crate::error::GraphError;
use crate::graph::AttrValue;
use crate::operation::{Endpoint, Operand, Operation};
use crate::scope::Scope;

#[derive(Debug, Clone)]
enum DescriptorInput {
    Single(Endpoint),
    List(Vec<Endpoint>),
}

#[derive(Debug, Clone)]
pub struct OpDescriptor {
    op_type: String,
    inputs: Vec<DescriptorInput>,
    attrs: Vec<(String, AttrValue)>,
}

impl OpDescriptor {
    pub fn new(op_type: &str) -> Self {
        Self {
            op_type: op_type.to_string(),
            inputs: Vec::new(),
            attrs: Vec::new(),
        }
    }

    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    pub fn input<T>(mut self, operand: &impl Operand<T>) -> Self {
        self.inputs
            .push(DescriptorInput::Single(operand.as_output().into_endpoint()));
        self
    }

    /// Feed one list-typed input, keeping the order of `operands`.
    pub fn input_list<T, O: Operand<T>>(mut self, operands: &[O]) -> Self {
        let endpoints = operands
            .iter()
            .map(|operand| operand.as_output().into_endpoint())
            .collect();
        self.inputs.push(DescriptorInput::List(endpoints));
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    /// Set `name` only when `value` is present; otherwise the engine default
    /// applies.
    pub fn attr_opt<V: Into<AttrValue>>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Register the node in the scope's environment.
    ///
    /// Inputs are added first, then the scope's device and control
    /// dependencies, then attributes.
    pub fn build(self, scope: &Scope<'_>) -> Result<Operation, GraphError> {
        let name = scope.make_op_name(&self.op_type)?;
        let mut builder = scope.env().op_builder(&self.op_type, &name)?;
        for input in self.inputs {
            match input {
                DescriptorInput::Single(endpoint) => builder.add_input(endpoint),
                DescriptorInput::List(endpoints) => builder.add_input_list(endpoints),
            }
        }
        scope.apply(builder.as_mut());
        for (name, value) in self.attrs {
            builder.set_attr(&name, value);
        }
        builder.build()
    }
}
