use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;

#[derive(Debug, Clone, Default)]
pub struct Conv2DOptions {
    use_cudnn_on_gpu: Option<bool>,
    data_format: Option<String>,
    dilations: Option<Vec<i64>>,
}

impl Conv2DOptions {
    pub fn use_cudnn_on_gpu(mut self, use_cudnn: bool) -> Self {
        self.use_cudnn_on_gpu = Some(use_cudnn);
        self
    }

    /// `NHWC` or `NCHW`.
    pub fn data_format(mut self, data_format: &str) -> Self {
        self.data_format = Some(data_format.to_string());
        self
    }

    /// Dilation factor per input dimension, in `data_format` order.
    pub fn dilations(mut self, dilations: &[i64]) -> Self {
        self.dilations = Some(dilations.to_vec());
        self
    }
}

/// 2-D convolution of a 4-D `input` with a 4-D `filter`.
#[derive(Debug, Clone)]
pub struct Conv2D<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> Conv2D<T> {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        filter: &impl Operand<T>,
        strides: &[i64],
        padding: &str,
        options: Conv2DOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Conv2D")
            .input(input)
            .input(filter)
            .attr("strides", strides)
            .attr("padding", padding)
            .attr_opt("use_cudnn_on_gpu", options.use_cudnn_on_gpu)
            .attr_opt("data_format", options.data_format)
            .attr_opt("dilations", options.dilations)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Conv2D<T>, output: T);

#[derive(Debug, Clone, Default)]
pub struct BiasAddOptions {
    data_format: Option<String>,
}

impl BiasAddOptions {
    pub fn data_format(mut self, data_format: &str) -> Self {
        self.data_format = Some(data_format.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct BiasAdd<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> BiasAdd<T> {
    pub fn new(
        scope: &Scope<'_>,
        value: &impl Operand<T>,
        bias: &impl Operand<T>,
        options: BiasAddOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("BiasAdd")
            .input(value)
            .input(bias)
            .attr_opt("data_format", options.data_format)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] BiasAdd<T>, output: T);

#[derive(Debug, Clone, Default)]
pub struct MaxPoolV2Options {
    data_format: Option<String>,
}

impl MaxPoolV2Options {
    pub fn data_format(mut self, data_format: &str) -> Self {
        self.data_format = Some(data_format.to_string());
        self
    }
}

/// Max pooling with window size and strides given as tensors.
#[derive(Debug, Clone)]
pub struct MaxPoolV2<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> MaxPoolV2<T> {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        ksize: &impl Operand<i32>,
        strides: &impl Operand<i32>,
        padding: &str,
        options: MaxPoolV2Options,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("MaxPoolV2")
            .input(input)
            .input(ksize)
            .input(strides)
            .attr("padding", padding)
            .attr_opt("data_format", options.data_format)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] MaxPoolV2<T>, output: T);

#[derive(Debug, Clone, Default)]
pub struct FusedBatchNormOptions {
    epsilon: Option<f32>,
    data_format: Option<String>,
    is_training: Option<bool>,
}

impl FusedBatchNormOptions {
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn data_format(mut self, data_format: &str) -> Self {
        self.data_format = Some(data_format.to_string());
        self
    }

    pub fn is_training(mut self, is_training: bool) -> Self {
        self.is_training = Some(is_training);
        self
    }
}

#[derive(Debug, Clone)]
pub struct FusedBatchNorm<T> {
    operation: Operation,
    y: Output<T>,
    batch_mean: Output<T>,
    batch_variance: Output<T>,
    reserve_space_1: Output<T>,
    reserve_space_2: Output<T>,
}

impl<T> FusedBatchNorm<T> {
    pub fn new(
        scope: &Scope<'_>,
        x: &impl Operand<T>,
        scale: &impl Operand<T>,
        offset: &impl Operand<T>,
        mean: &impl Operand<T>,
        variance: &impl Operand<T>,
        options: FusedBatchNormOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("FusedBatchNorm")
            .input(x)
            .input(scale)
            .input(offset)
            .input(mean)
            .input(variance)
            .attr_opt("epsilon", options.epsilon)
            .attr_opt("data_format", options.data_format)
            .attr_opt("is_training", options.is_training)
            .build(scope)?;
        Ok(Self {
            y: operation.output(0)?,
            batch_mean: operation.output(1)?,
            batch_variance: operation.output(2)?,
            reserve_space_1: operation.output(3)?,
            reserve_space_2: operation.output(4)?,
            operation,
        })
    }

    pub fn y(&self) -> &Output<T> {
        &self.y
    }

    pub fn batch_mean(&self) -> &Output<T> {
        &self.batch_mean
    }

    pub fn batch_variance(&self) -> &Output<T> {
        &self.batch_variance
    }

    pub fn reserve_space_1(&self) -> &Output<T> {
        &self.reserve_space_1
    }

    pub fn reserve_space_2(&self) -> &Output<T> {
        &self.reserve_space_2
    }
}

impl_op!([T] FusedBatchNorm<T>);

#[derive(Debug, Clone, Default)]
pub struct TopKV2Options {
    sorted: Option<bool>,
}

impl TopKV2Options {
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = Some(sorted);
        self
    }
}

/// Values and indices of the `k` largest entries of the last dimension.
#[derive(Debug, Clone)]
pub struct TopKV2<T> {
    operation: Operation,
    values: Output<T>,
    indices: Output<i32>,
}

impl<T> TopKV2<T> {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        k: &impl Operand<i32>,
        options: TopKV2Options,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("TopKV2")
            .input(input)
            .input(k)
            .attr_opt("sorted", options.sorted)
            .build(scope)?;
        let values = operation.output(0)?;
        let indices = operation.output(1)?;
        Ok(Self {
            operation,
            values,
            indices,
        })
    }

    pub fn values(&self) -> &Output<T> {
        &self.values
    }

    pub fn indices(&self) -> &Output<i32> {
        &self.indices
    }
}

impl_op!([T] TopKV2<T>);

#[derive(Debug, Clone)]
pub struct Elu<T> {
    operation: Operation,
    activations: Output<T>,
}

impl<T> Elu<T> {
    pub fn new(scope: &Scope<'_>, features: &impl Operand<T>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Elu").input(features).build(scope)?;
        let activations = operation.output(0)?;
        Ok(Self {
            operation,
            activations,
        })
    }

    pub fn activations(&self) -> &Output<T> {
        &self.activations
    }
}

impl_op!([T] Elu<T>, activations: T);

#[derive(Debug, Clone)]
pub struct Softplus<T> {
    operation: Operation,
    activations: Output<T>,
}

impl<T> Softplus<T> {
    pub fn new(scope: &Scope<'_>, features: &impl Operand<T>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Softplus").input(features).build(scope)?;
        let activations = operation.output(0)?;
        Ok(Self {
            operation,
            activations,
        })
    }

    pub fn activations(&self) -> &Output<T> {
        &self.activations
    }
}

impl_op!([T] Softplus<T>, activations: T);

#[derive(Debug, Clone, Default)]
pub struct LrnOptions {
    depth_radius: Option<i64>,
    bias: Option<f32>,
    alpha: Option<f32>,
    beta: Option<f32>,
}

impl LrnOptions {
    pub fn depth_radius(mut self, depth_radius: i64) -> Self {
        self.depth_radius = Some(depth_radius);
        self
    }

    pub fn bias(mut self, bias: f32) -> Self {
        self.bias = Some(bias);
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn beta(mut self, beta: f32) -> Self {
        self.beta = Some(beta);
        self
    }
}

/// Local response normalization (`LRN`).
#[derive(Debug, Clone)]
pub struct Lrn<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> Lrn<T> {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        options: LrnOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("LRN")
            .input(input)
            .attr_opt("depth_radius", options.depth_radius)
            .attr_opt("bias", options.bias)
            .attr_opt("alpha", options.alpha)
            .attr_opt("beta", options.beta)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Lrn<T>, output: T);

#[derive(Debug, Clone)]
pub struct SoftmaxCrossEntropyWithLogits<T> {
    operation: Operation,
    loss: Output<T>,
    backprop: Output<T>,
}

impl<T> SoftmaxCrossEntropyWithLogits<T> {
    pub fn new(
        scope: &Scope<'_>,
        features: &impl Operand<T>,
        labels: &impl Operand<T>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SoftmaxCrossEntropyWithLogits")
            .input(features)
            .input(labels)
            .build(scope)?;
        let loss = operation.output(0)?;
        let backprop = operation.output(1)?;
        Ok(Self {
            operation,
            loss,
            backprop,
        })
    }

    /// Per-example loss.
    pub fn loss(&self) -> &Output<T> {
        &self.loss
    }

    pub fn backprop(&self) -> &Output<T> {
        &self.backprop
    }
}

impl_op!([T] SoftmaxCrossEntropyWithLogits<T>);

/// Whether each target is among the top `k` predictions.
#[derive(Debug, Clone)]
pub struct InTopKV2 {
    operation: Operation,
    precision: Output<bool>,
}

impl InTopKV2 {
    pub fn new<T>(
        scope: &Scope<'_>,
        predictions: &impl Operand<f32>,
        targets: &impl Operand<T>,
        k: &impl Operand<T>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("InTopKV2")
            .input(predictions)
            .input(targets)
            .input(k)
            .build(scope)?;
        let precision = operation.output(0)?;
        Ok(Self {
            operation,
            precision,
        })
    }

    pub fn precision(&self) -> &Output<bool> {
        &self.precision
    }
}

impl_op!([] InTopKV2, precision: bool);
