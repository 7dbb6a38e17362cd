//! Operators over string tensors.

use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;

#[derive(Debug, Clone, Default)]
pub struct AsStringOptions {
    precision: Option<i64>,
    scientific: Option<bool>,
    shortest: Option<bool>,
    width: Option<i64>,
    fill: Option<String>,
}

impl AsStringOptions {
    /// Digits after the decimal point for floats; `-1` leaves it to the engine.
    pub fn precision(mut self, precision: i64) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn scientific(mut self, scientific: bool) -> Self {
        self.scientific = Some(scientific);
        self
    }

    pub fn shortest(mut self, shortest: bool) -> Self {
        self.shortest = Some(shortest);
        self
    }

    pub fn width(mut self, width: i64) -> Self {
        self.width = Some(width);
        self
    }

    /// Single character used to pad up to `width`.
    pub fn fill(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_string());
        self
    }
}

/// Formats every element of a numeric or boolean tensor.
#[derive(Debug, Clone)]
pub struct AsString {
    operation: Operation,
    output: Output<String>,
}

impl AsString {
    pub fn new<T>(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        options: AsStringOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("AsString")
            .input(input)
            .attr_opt("precision", options.precision)
            .attr_opt("scientific", options.scientific)
            .attr_opt("shortest", options.shortest)
            .attr_opt("width", options.width)
            .attr_opt("fill", options.fill)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<String> {
        &self.output
    }
}

impl_op!([] AsString, output: String);

#[derive(Debug, Clone, Default)]
pub struct ReduceJoinOptions {
    keep_dims: Option<bool>,
    separator: Option<String>,
}

impl ReduceJoinOptions {
    pub fn keep_dims(mut self, keep_dims: bool) -> Self {
        self.keep_dims = Some(keep_dims);
        self
    }

    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = Some(separator.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReduceJoin {
    operation: Operation,
    output: Output<String>,
}

impl ReduceJoin {
    pub fn new(
        scope: &Scope<'_>,
        inputs: &impl Operand<String>,
        reduction_indices: &impl Operand<i32>,
        options: ReduceJoinOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ReduceJoin")
            .input(inputs)
            .input(reduction_indices)
            .attr_opt("keep_dims", options.keep_dims)
            .attr_opt("separator", options.separator)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<String> {
        &self.output
    }
}

impl_op!([] ReduceJoin, output: String);

/// Element-wise concatenation of a list of string tensors.
#[derive(Debug, Clone)]
pub struct StringJoin {
    operation: Operation,
    output: Output<String>,
}

impl StringJoin {
    pub fn new<O: Operand<String>>(
        scope: &Scope<'_>,
        inputs: &[O],
        separator: Option<&str>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("StringJoin")
            .input_list(inputs)
            .attr_opt("separator", separator)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<String> {
        &self.output
    }
}

impl_op!([] StringJoin, output: String);

/// Splits each string of a rank-1 tensor into a sparse tensor of tokens.
#[derive(Debug, Clone)]
pub struct StringSplit {
    operation: Operation,
    indices: Output<i64>,
    values: Output<String>,
    shape: Output<i64>,
}

impl StringSplit {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<String>,
        delimiter: &impl Operand<String>,
        skip_empty: Option<bool>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("StringSplit")
            .input(input)
            .input(delimiter)
            .attr_opt("skip_empty", skip_empty)
            .build(scope)?;
        Ok(Self {
            indices: operation.output(0)?,
            values: operation.output(1)?,
            shape: operation.output(2)?,
            operation,
        })
    }

    pub fn indices(&self) -> &Output<i64> {
        &self.indices
    }

    pub fn values(&self) -> &Output<String> {
        &self.values
    }

    pub fn shape(&self) -> &Output<i64> {
        &self.shape
    }
}

impl_op!([] StringSplit);

/// Keyed hash of each string, reduced modulo `num_buckets`.
#[derive(Debug, Clone)]
pub struct StringToHashBucketStrong {
    operation: Operation,
    output: Output<i64>,
}

impl StringToHashBucketStrong {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<String>,
        num_buckets: i64,
        key: &[i64],
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("StringToHashBucketStrong")
            .input(input)
            .attr("num_buckets", num_buckets)
            .attr("key", key)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<i64> {
        &self.output
    }
}

impl_op!([] StringToHashBucketStrong, output: i64);

#[derive(Debug, Clone)]
pub struct Substr {
    operation: Operation,
    output: Output<String>,
}

impl Substr {
    pub fn new<T>(
        scope: &Scope<'_>,
        input: &impl Operand<String>,
        pos: &impl Operand<T>,
        len: &impl Operand<T>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Substr")
            .input(input)
            .input(pos)
            .input(len)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<String> {
        &self.output
    }
}

impl_op!([] Substr, output: String);
