//! Operators on sparse tensors in COO form: an `indices` matrix, a `values`
//! vector and a dense `shape` vector.

use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;

#[derive(Debug, Clone)]
pub struct SparseAdd<T> {
    operation: Operation,
    sum_indices: Output<i64>,
    sum_values: Output<T>,
    sum_shape: Output<i64>,
}

impl<T> SparseAdd<T> {
    /// Entries of the sum whose magnitude is below `thresh` are dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn new<R>(
        scope: &Scope<'_>,
        a_indices: &impl Operand<i64>,
        a_values: &impl Operand<T>,
        a_shape: &impl Operand<i64>,
        b_indices: &impl Operand<i64>,
        b_values: &impl Operand<T>,
        b_shape: &impl Operand<i64>,
        thresh: &impl Operand<R>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SparseAdd")
            .input(a_indices)
            .input(a_values)
            .input(a_shape)
            .input(b_indices)
            .input(b_values)
            .input(b_shape)
            .input(thresh)
            .build(scope)?;
        Ok(Self {
            sum_indices: operation.output(0)?,
            sum_values: operation.output(1)?,
            sum_shape: operation.output(2)?,
            operation,
        })
    }

    pub fn sum_indices(&self) -> &Output<i64> {
        &self.sum_indices
    }

    pub fn sum_values(&self) -> &Output<T> {
        &self.sum_values
    }

    pub fn sum_shape(&self) -> &Output<i64> {
        &self.sum_shape
    }
}

impl_op!([T] SparseAdd<T>);

/// Concatenates sparse tensors along `concat_dim`. The three lists hold one
/// entry per input tensor.
#[derive(Debug, Clone)]
pub struct SparseConcat<T> {
    operation: Operation,
    output_indices: Output<i64>,
    output_values: Output<T>,
    output_shape: Output<i64>,
}

impl<T> SparseConcat<T> {
    pub fn new(
        scope: &Scope<'_>,
        indices: &[impl Operand<i64>],
        values: &[impl Operand<T>],
        shapes: &[impl Operand<i64>],
        concat_dim: i64,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SparseConcat")
            .input_list(indices)
            .input_list(values)
            .input_list(shapes)
            .attr("concat_dim", concat_dim)
            .build(scope)?;
        Ok(Self {
            output_indices: operation.output(0)?,
            output_values: operation.output(1)?,
            output_shape: operation.output(2)?,
            operation,
        })
    }

    pub fn output_indices(&self) -> &Output<i64> {
        &self.output_indices
    }

    pub fn output_values(&self) -> &Output<T> {
        &self.output_values
    }

    pub fn output_shape(&self) -> &Output<i64> {
        &self.output_shape
    }
}

impl_op!([T] SparseConcat<T>);

#[derive(Debug, Clone, Default)]
pub struct SparseToDenseOptions {
    validate_indices: Option<bool>,
}

impl SparseToDenseOptions {
    pub fn validate_indices(mut self, validate: bool) -> Self {
        self.validate_indices = Some(validate);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SparseToDense<T> {
    operation: Operation,
    dense: Output<T>,
}

impl<T> SparseToDense<T> {
    pub fn new<I>(
        scope: &Scope<'_>,
        sparse_indices: &impl Operand<I>,
        output_shape: &impl Operand<I>,
        sparse_values: &impl Operand<T>,
        default_value: &impl Operand<T>,
        options: SparseToDenseOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SparseToDense")
            .input(sparse_indices)
            .input(output_shape)
            .input(sparse_values)
            .input(default_value)
            .attr_opt("validate_indices", options.validate_indices)
            .build(scope)?;
        let dense = operation.output(0)?;
        Ok(Self { operation, dense })
    }

    pub fn dense(&self) -> &Output<T> {
        &self.dense
    }
}

impl_op!([T] SparseToDense<T>, dense: T);

#[derive(Debug, Clone)]
pub struct SparseReshape {
    operation: Operation,
    output_indices: Output<i64>,
    output_shape: Output<i64>,
}

impl SparseReshape {
    pub fn new(
        scope: &Scope<'_>,
        input_indices: &impl Operand<i64>,
        input_shape: &impl Operand<i64>,
        new_shape: &impl Operand<i64>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SparseReshape")
            .input(input_indices)
            .input(input_shape)
            .input(new_shape)
            .build(scope)?;
        Ok(Self {
            output_indices: operation.output(0)?,
            output_shape: operation.output(1)?,
            operation,
        })
    }

    pub fn output_indices(&self) -> &Output<i64> {
        &self.output_indices
    }

    pub fn output_shape(&self) -> &Output<i64> {
        &self.output_shape
    }
}

impl_op!([] SparseReshape);

/// Splits a sparse tensor into `num_split` pieces along `split_dim`.
///
/// Each of the three outputs is a list with one entry per piece.
#[derive(Debug, Clone)]
pub struct SparseSplit<T> {
    operation: Operation,
    output_indices: Vec<Output<i64>>,
    output_values: Vec<Output<T>>,
    output_shape: Vec<Output<i64>>,
}

impl<T> SparseSplit<T> {
    pub fn new(
        scope: &Scope<'_>,
        split_dim: &impl Operand<i64>,
        indices: &impl Operand<i64>,
        values: &impl Operand<T>,
        shape: &impl Operand<i64>,
        num_split: i64,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SparseSplit")
            .input(split_dim)
            .input(indices)
            .input(values)
            .input(shape)
            .attr("num_split", num_split)
            .build(scope)?;

        let mut next = 0;
        let len = operation.output_list_length("output_indices")?;
        let output_indices = operation.output_list(next, len)?;
        next += len;
        let len = operation.output_list_length("output_values")?;
        let output_values = operation.output_list(next, len)?;
        next += len;
        let len = operation.output_list_length("output_shape")?;
        let output_shape = operation.output_list(next, len)?;

        Ok(Self {
            operation,
            output_indices,
            output_values,
            output_shape,
        })
    }

    pub fn output_indices(&self) -> &[Output<i64>] {
        &self.output_indices
    }

    pub fn output_values(&self) -> &[Output<T>] {
        &self.output_values
    }

    pub fn output_shape(&self) -> &[Output<i64>] {
        &self.output_shape
    }
}

impl_op!([T] SparseSplit<T>);

#[derive(Debug, Clone, Default)]
pub struct SparseReduceSumOptions {
    keep_dims: Option<bool>,
}

impl SparseReduceSumOptions {
    pub fn keep_dims(mut self, keep_dims: bool) -> Self {
        self.keep_dims = Some(keep_dims);
        self
    }
}

/// Sum over `reduction_axes`, producing a dense tensor.
#[derive(Debug, Clone)]
pub struct SparseReduceSum<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> SparseReduceSum<T> {
    pub fn new(
        scope: &Scope<'_>,
        input_indices: &impl Operand<i64>,
        input_values: &impl Operand<T>,
        input_shape: &impl Operand<i64>,
        reduction_axes: &impl Operand<i32>,
        options: SparseReduceSumOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SparseReduceSum")
            .input(input_indices)
            .input(input_values)
            .input(input_shape)
            .input(reduction_axes)
            .attr_opt("keep_dims", options.keep_dims)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] SparseReduceSum<T>, output: T);
