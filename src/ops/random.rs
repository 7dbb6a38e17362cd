//! Seeded random sampling.
//!
//! Every operator here takes a [`SeedOptions`]. When both seeds are unset
//! the engine picks a random seed.

use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;
use crate::types::TensorType;

#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    seed: Option<i64>,
    seed2: Option<i64>,
}

impl SeedOptions {
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Second seed, used to avoid seed collisions.
    pub fn seed2(mut self, seed2: i64) -> Self {
        self.seed2 = Some(seed2);
        self
    }

    fn apply(self, descriptor: OpDescriptor) -> OpDescriptor {
        descriptor
            .attr_opt("seed", self.seed)
            .attr_opt("seed2", self.seed2)
    }
}

/// Shuffles `value` along its first dimension.
#[derive(Debug, Clone)]
pub struct RandomShuffle<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> RandomShuffle<T> {
    pub fn new(
        scope: &Scope<'_>,
        value: &impl Operand<T>,
        options: SeedOptions,
    ) -> Result<Self, GraphError> {
        let operation = options
            .apply(OpDescriptor::new("RandomShuffle").input(value))
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] RandomShuffle<T>, output: T);

/// Normal samples truncated to `[minvals, maxvals]`, one batch per row of
/// the parameter tensors.
#[derive(Debug, Clone)]
pub struct ParameterizedTruncatedNormal<U> {
    operation: Operation,
    output: Output<U>,
}

impl<U> ParameterizedTruncatedNormal<U> {
    pub fn new<T>(
        scope: &Scope<'_>,
        shape: &impl Operand<T>,
        means: &impl Operand<U>,
        stdevs: &impl Operand<U>,
        minvals: &impl Operand<U>,
        maxvals: &impl Operand<U>,
        options: SeedOptions,
    ) -> Result<Self, GraphError> {
        let descriptor = OpDescriptor::new("ParameterizedTruncatedNormal")
            .input(shape)
            .input(means)
            .input(stdevs)
            .input(minvals)
            .input(maxvals);
        let operation = options.apply(descriptor).build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<U> {
        &self.output
    }
}

impl_op!([U] ParameterizedTruncatedNormal<U>, output: U);

/// Poisson samples of element type `V`, one set per rate.
#[derive(Debug, Clone)]
pub struct RandomPoissonV2<V> {
    operation: Operation,
    output: Output<V>,
}

impl<V: TensorType> RandomPoissonV2<V> {
    pub fn new<S, R>(
        scope: &Scope<'_>,
        shape: &impl Operand<S>,
        rate: &impl Operand<R>,
        options: SeedOptions,
    ) -> Result<Self, GraphError> {
        let descriptor = OpDescriptor::new("RandomPoissonV2")
            .input(shape)
            .input(rate)
            .attr("dtype", V::DATA_TYPE);
        let operation = options.apply(descriptor).build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<V> {
        &self.output
    }
}

impl_op!([V] RandomPoissonV2<V>, output: V);
