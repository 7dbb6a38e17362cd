//! Mutable tensors and the operators that update them.
//!
//! Variables hand out reference outputs. Inputs such as `Assign::ref` only
//! accept such references; feeding a plain value fails at build time with
//! [`GraphError::RefInputRequired`].

use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::graph::Shape;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;
use crate::types::{Resource, TensorType};

#[derive(Debug, Clone, Default)]
pub struct VariableOptions {
    container: Option<String>,
    shared_name: Option<String>,
}

impl VariableOptions {
    /// Container the variable is placed in; empty means the default one.
    pub fn container(mut self, container: &str) -> Self {
        self.container = Some(container.to_string());
        self
    }

    /// Name under which the variable is shared across sessions.
    pub fn shared_name(mut self, shared_name: &str) -> Self {
        self.shared_name = Some(shared_name.to_string());
        self
    }
}

fn variable_descriptor<T: TensorType>(
    op_type: &str,
    shape: Shape,
    options: VariableOptions,
) -> OpDescriptor {
    OpDescriptor::new(op_type)
        .attr("shape", shape)
        .attr("dtype", T::DATA_TYPE)
        .attr_opt("container", options.container)
        .attr_opt("shared_name", options.shared_name)
}

/// Legacy variable node. Prefer [`VariableV2`].
#[derive(Debug, Clone)]
pub struct Variable<T> {
    operation: Operation,
    reference: Output<T>,
}

impl<T: TensorType> Variable<T> {
    pub fn new(scope: &Scope<'_>, shape: Shape, options: VariableOptions) -> Result<Self, GraphError> {
        let operation = variable_descriptor::<T>("Variable", shape, options).build(scope)?;
        let reference = operation.output(0)?;
        Ok(Self {
            operation,
            reference,
        })
    }

    pub fn reference(&self) -> &Output<T> {
        &self.reference
    }
}

impl_op!([T] Variable<T>, reference: T);

/// Tensor state that persists across steps.
#[derive(Debug, Clone)]
pub struct VariableV2<T> {
    operation: Operation,
    reference: Output<T>,
}

impl<T: TensorType> VariableV2<T> {
    pub fn new(scope: &Scope<'_>, shape: Shape, options: VariableOptions) -> Result<Self, GraphError> {
        let operation = variable_descriptor::<T>("VariableV2", shape, options).build(scope)?;
        let reference = operation.output(0)?;
        Ok(Self {
            operation,
            reference,
        })
    }

    pub fn reference(&self) -> &Output<T> {
        &self.reference
    }
}

impl_op!([T] VariableV2<T>, reference: T);

/// Mutable tensor that only lives for one step.
#[derive(Debug, Clone)]
pub struct TemporaryVariable<T> {
    operation: Operation,
    reference: Output<T>,
}

impl<T: TensorType> TemporaryVariable<T> {
    pub fn new(scope: &Scope<'_>, shape: Shape, var_name: Option<&str>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("TemporaryVariable")
            .attr("shape", shape)
            .attr("dtype", T::DATA_TYPE)
            .attr_opt("var_name", var_name)
            .build(scope)?;
        let reference = operation.output(0)?;
        Ok(Self {
            operation,
            reference,
        })
    }

    pub fn reference(&self) -> &Output<T> {
        &self.reference
    }
}

impl_op!([T] TemporaryVariable<T>, reference: T);

#[derive(Debug, Clone, Default)]
pub struct AssignOptions {
    validate_shape: Option<bool>,
    use_locking: Option<bool>,
}

impl AssignOptions {
    /// Require `value` to have the shape of the variable.
    pub fn validate_shape(mut self, validate_shape: bool) -> Self {
        self.validate_shape = Some(validate_shape);
        self
    }

    pub fn use_locking(mut self, use_locking: bool) -> Self {
        self.use_locking = Some(use_locking);
        self
    }
}

/// Writes `value` into the variable behind `reference`.
#[derive(Debug, Clone)]
pub struct Assign<T> {
    operation: Operation,
    output_ref: Output<T>,
}

impl<T> Assign<T> {
    pub fn new(
        scope: &Scope<'_>,
        reference: &impl Operand<T>,
        value: &impl Operand<T>,
        options: AssignOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Assign")
            .input(reference)
            .input(value)
            .attr_opt("validate_shape", options.validate_shape)
            .attr_opt("use_locking", options.use_locking)
            .build(scope)?;
        let output_ref = operation.output(0)?;
        Ok(Self {
            operation,
            output_ref,
        })
    }

    /// The updated variable, still a reference.
    pub fn output_ref(&self) -> &Output<T> {
        &self.output_ref
    }
}

impl_op!([T] Assign<T>, output_ref: T);

#[derive(Debug, Clone, Default)]
pub struct ScatterSubOptions {
    use_locking: Option<bool>,
}

impl ScatterSubOptions {
    pub fn use_locking(mut self, use_locking: bool) -> Self {
        self.use_locking = Some(use_locking);
        self
    }
}

/// Subtracts `updates` from the rows of the variable selected by `indices`.
#[derive(Debug, Clone)]
pub struct ScatterSub<T> {
    operation: Operation,
    output_ref: Output<T>,
}

impl<T> ScatterSub<T> {
    pub fn new<I>(
        scope: &Scope<'_>,
        reference: &impl Operand<T>,
        indices: &impl Operand<I>,
        updates: &impl Operand<T>,
        options: ScatterSubOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ScatterSub")
            .input(reference)
            .input(indices)
            .input(updates)
            .attr_opt("use_locking", options.use_locking)
            .build(scope)?;
        let output_ref = operation.output(0)?;
        Ok(Self {
            operation,
            output_ref,
        })
    }

    pub fn output_ref(&self) -> &Output<T> {
        &self.output_ref
    }
}

impl_op!([T] ScatterSub<T>, output_ref: T);

#[derive(Debug, Clone)]
pub struct IsVariableInitialized {
    operation: Operation,
    is_initialized: Output<bool>,
}

impl IsVariableInitialized {
    pub fn new<T>(scope: &Scope<'_>, reference: &impl Operand<T>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("IsVariableInitialized")
            .input(reference)
            .build(scope)?;
        let is_initialized = operation.output(0)?;
        Ok(Self {
            operation,
            is_initialized,
        })
    }

    pub fn is_initialized(&self) -> &Output<bool> {
        &self.is_initialized
    }
}

impl_op!([] IsVariableInitialized, is_initialized: bool);

/// Counter stored in a resource variable, incremented until `limit`.
#[derive(Debug, Clone)]
pub struct ResourceCountUpTo<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T: TensorType> ResourceCountUpTo<T> {
    pub fn new(
        scope: &Scope<'_>,
        resource: &impl Operand<Resource>,
        limit: i64,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ResourceCountUpTo")
            .input(resource)
            .attr("limit", limit)
            .attr("T", T::DATA_TYPE)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] ResourceCountUpTo<T>, output: T);
