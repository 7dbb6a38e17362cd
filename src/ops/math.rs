use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;
use crate::types::TensorType;

/// Element-wise sum of all inputs.
#[derive(Debug, Clone)]
pub struct AddN<T> {
    operation: Operation,
    sum: Output<T>,
}

impl<T> AddN<T> {
    pub fn new(scope: &Scope<'_>, inputs: &[impl Operand<T>]) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("AddN").input_list(inputs).build(scope)?;
        let sum = operation.output(0)?;
        Ok(Self { operation, sum })
    }

    pub fn sum(&self) -> &Output<T> {
        &self.sum
    }
}

impl_op!([T] AddN<T>, sum: T);

#[derive(Debug, Clone, Default)]
pub struct MatMulOptions {
    transpose_a: Option<bool>,
    transpose_b: Option<bool>,
}

impl MatMulOptions {
    pub fn transpose_a(mut self, transpose: bool) -> Self {
        self.transpose_a = Some(transpose);
        self
    }

    pub fn transpose_b(mut self, transpose: bool) -> Self {
        self.transpose_b = Some(transpose);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MatMul<T> {
    operation: Operation,
    product: Output<T>,
}

impl<T> MatMul<T> {
    pub fn new(
        scope: &Scope<'_>,
        a: &impl Operand<T>,
        b: &impl Operand<T>,
        options: MatMulOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("MatMul")
            .input(a)
            .input(b)
            .attr_opt("transpose_a", options.transpose_a)
            .attr_opt("transpose_b", options.transpose_b)
            .build(scope)?;
        let product = operation.output(0)?;
        Ok(Self { operation, product })
    }

    pub fn product(&self) -> &Output<T> {
        &self.product
    }
}

impl_op!([T] MatMul<T>, product: T);

#[derive(Debug, Clone, Default)]
pub struct CastOptions {
    truncate: Option<bool>,
}

impl CastOptions {
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = Some(truncate);
        self
    }
}

/// Converts elements to `U`.
#[derive(Debug, Clone)]
pub struct Cast<U> {
    operation: Operation,
    y: Output<U>,
}

impl<U: TensorType> Cast<U> {
    pub fn new<T>(
        scope: &Scope<'_>,
        x: &impl Operand<T>,
        options: CastOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Cast")
            .input(x)
            .attr("DstT", U::DATA_TYPE)
            .attr_opt("Truncate", options.truncate)
            .build(scope)?;
        let y = operation.output(0)?;
        Ok(Self { operation, y })
    }

    pub fn y(&self) -> &Output<U> {
        &self.y
    }
}

impl_op!([U] Cast<U>, y: U);

/// Sequence `start, start + delta, ...` up to but excluding `limit`.
#[derive(Debug, Clone)]
pub struct Range<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> Range<T> {
    pub fn new(
        scope: &Scope<'_>,
        start: &impl Operand<T>,
        limit: &impl Operand<T>,
        delta: &impl Operand<T>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Range")
            .input(start)
            .input(limit)
            .input(delta)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Range<T>, output: T);

/// Picks elements from `t` where `condition` holds and from `e` elsewhere.
#[derive(Debug, Clone)]
pub struct Select<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> Select<T> {
    pub fn new(
        scope: &Scope<'_>,
        condition: &impl Operand<bool>,
        t: &impl Operand<T>,
        e: &impl Operand<T>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Select")
            .input(condition)
            .input(t)
            .input(e)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Select<T>, output: T);

#[derive(Debug, Clone)]
pub struct Sign<T> {
    operation: Operation,
    y: Output<T>,
}

impl<T> Sign<T> {
    pub fn new(scope: &Scope<'_>, x: &impl Operand<T>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Sign").input(x).build(scope)?;
        let y = operation.output(0)?;
        Ok(Self { operation, y })
    }

    pub fn y(&self) -> &Output<T> {
        &self.y
    }
}

impl_op!([T] Sign<T>, y: T);

/// Index of the smallest value along `dimension`.
#[derive(Debug, Clone)]
pub struct ArgMin<U> {
    operation: Operation,
    output: Output<U>,
}

impl<U: TensorType> ArgMin<U> {
    pub fn new<T, I>(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        dimension: &impl Operand<I>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ArgMin")
            .input(input)
            .input(dimension)
            .attr("output_type", U::DATA_TYPE)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<U> {
        &self.output
    }
}

impl_op!([U] ArgMin<U>, output: U);

#[derive(Debug, Clone, Default)]
pub struct CumsumOptions {
    exclusive: Option<bool>,
    reverse: Option<bool>,
}

impl CumsumOptions {
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = Some(exclusive);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Cumsum<T> {
    operation: Operation,
    out: Output<T>,
}

impl<T> Cumsum<T> {
    pub fn new<I>(
        scope: &Scope<'_>,
        x: &impl Operand<T>,
        axis: &impl Operand<I>,
        options: CumsumOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Cumsum")
            .input(x)
            .input(axis)
            .attr_opt("exclusive", options.exclusive)
            .attr_opt("reverse", options.reverse)
            .build(scope)?;
        let out = operation.output(0)?;
        Ok(Self { operation, out })
    }

    pub fn out(&self) -> &Output<T> {
        &self.out
    }
}

impl_op!([T] Cumsum<T>, out: T);

#[derive(Debug, Clone, Default)]
pub struct ApproximateEqualOptions {
    tolerance: Option<f32>,
}

impl ApproximateEqualOptions {
    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
}

/// `abs(x - y) < tolerance`, element-wise.
#[derive(Debug, Clone)]
pub struct ApproximateEqual {
    operation: Operation,
    z: Output<bool>,
}

impl ApproximateEqual {
    pub fn new<T>(
        scope: &Scope<'_>,
        x: &impl Operand<T>,
        y: &impl Operand<T>,
        options: ApproximateEqualOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ApproximateEqual")
            .input(x)
            .input(y)
            .attr_opt("tolerance", options.tolerance)
            .build(scope)?;
        let z = operation.output(0)?;
        Ok(Self { operation, z })
    }

    pub fn z(&self) -> &Output<bool> {
        &self.z
    }
}

impl_op!([] ApproximateEqual, z: bool);
