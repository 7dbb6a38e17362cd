use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::graph::Shape;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;
use crate::types::{TensorType, Untyped};

/// Copies a tensor, zeroing everything outside a central band of each
/// innermost matrix.
#[derive(Debug, Clone)]
pub struct MatrixBandPart<T> {
    operation: Operation,
    band: Output<T>,
}

impl<T> MatrixBandPart<T> {
    /// `num_lower`/`num_upper` set the number of sub/super-diagonals to keep;
    /// negative keeps the whole triangle.
    pub fn new<I>(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        num_lower: &impl Operand<I>,
        num_upper: &impl Operand<I>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("MatrixBandPart")
            .input(input)
            .input(num_lower)
            .input(num_upper)
            .build(scope)?;
        let band = operation.output(0)?;
        Ok(Self { operation, band })
    }

    pub fn band(&self) -> &Output<T> {
        &self.band
    }
}

impl_op!([T] MatrixBandPart<T>, band: T);

/// Concatenates `values` along `concat_dim`.
#[derive(Debug, Clone)]
pub struct Concat<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> Concat<T> {
    pub fn new(
        scope: &Scope<'_>,
        concat_dim: &impl Operand<i32>,
        values: &[impl Operand<T>],
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Concat")
            .input(concat_dim)
            .input_list(values)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Concat<T>, output: T);

#[derive(Debug, Clone, Default)]
pub struct UnpackOptions {
    axis: Option<i64>,
}

impl UnpackOptions {
    pub fn axis(mut self, axis: i64) -> Self {
        self.axis = Some(axis);
        self
    }
}

/// Splits one dimension of a rank-R tensor into `num` rank-(R-1) tensors.
#[derive(Debug, Clone)]
pub struct Unpack<T> {
    operation: Operation,
    output: Vec<Output<T>>,
}

impl<T> Unpack<T> {
    pub fn new(
        scope: &Scope<'_>,
        value: &impl Operand<T>,
        num: i64,
        options: UnpackOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Unpack")
            .input(value)
            .attr("num", num)
            .attr_opt("axis", options.axis)
            .build(scope)?;
        let len = operation.output_list_length("output")?;
        let output = operation.output_list(0, len)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &[Output<T>] {
        &self.output
    }
}

impl_op!([T] Unpack<T>, list output: T);

/// Shapes of several tensors, one output per input.
#[derive(Debug, Clone)]
pub struct ShapeN<U> {
    operation: Operation,
    output: Vec<Output<U>>,
}

impl<U: TensorType> ShapeN<U> {
    /// `U` is the element type of the shape vectors (`i32` or `i64`).
    pub fn new<T>(scope: &Scope<'_>, input: &[impl Operand<T>]) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ShapeN")
            .input_list(input)
            .attr("out_type", U::DATA_TYPE)
            .build(scope)?;
        let len = operation.output_list_length("output")?;
        let output = operation.output_list(0, len)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &[Output<U>] {
        &self.output
    }
}

impl_op!([U] ShapeN<U>, list output: U);

/// Forwards a list of tensors of possibly different types unchanged.
#[derive(Debug, Clone)]
pub struct IdentityN {
    operation: Operation,
    output: Vec<Output<Untyped>>,
}

impl IdentityN {
    pub fn new(scope: &Scope<'_>, input: &[Output<Untyped>]) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("IdentityN")
            .input_list(input)
            .build(scope)?;
        let len = operation.output_list_length("output")?;
        let output = operation.output_list(0, len)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &[Output<Untyped>] {
        &self.output
    }
}

impl_op!([] IdentityN, list output: Untyped);

#[derive(Debug, Clone, Default)]
pub struct SqueezeOptions {
    squeeze_dims: Option<Vec<i64>>,
}

impl SqueezeOptions {
    /// Only squeeze these dimensions. They must have size 1.
    pub fn squeeze_dims(mut self, dims: &[i64]) -> Self {
        self.squeeze_dims = Some(dims.to_vec());
        self
    }
}

/// Removes dimensions of size 1.
#[derive(Debug, Clone)]
pub struct Squeeze<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> Squeeze<T> {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        options: SqueezeOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Squeeze")
            .input(input)
            .attr_opt("squeeze_dims", options.squeeze_dims)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Squeeze<T>, output: T);

#[derive(Debug, Clone, Default)]
pub struct OneHotOptions {
    axis: Option<i64>,
}

impl OneHotOptions {
    /// Axis to fill; `-1` appends a new innermost axis.
    pub fn axis(mut self, axis: i64) -> Self {
        self.axis = Some(axis);
        self
    }
}

#[derive(Debug, Clone)]
pub struct OneHot<U> {
    operation: Operation,
    output: Output<U>,
}

impl<U> OneHot<U> {
    pub fn new<I>(
        scope: &Scope<'_>,
        indices: &impl Operand<I>,
        depth: &impl Operand<i32>,
        on_value: &impl Operand<U>,
        off_value: &impl Operand<U>,
        options: OneHotOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("OneHot")
            .input(indices)
            .input(depth)
            .input(on_value)
            .input(off_value)
            .attr_opt("axis", options.axis)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<U> {
        &self.output
    }
}

impl_op!([U] OneHot<U>, output: U);

#[derive(Debug, Clone, Default)]
pub struct QuantizeV2Options {
    mode: Option<String>,
    round_mode: Option<String>,
}

impl QuantizeV2Options {
    /// `MIN_COMBINED`, `MIN_FIRST` or `SCALED`.
    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    /// `HALF_AWAY_FROM_ZERO` or `HALF_TO_EVEN`.
    pub fn round_mode(mut self, round_mode: &str) -> Self {
        self.round_mode = Some(round_mode.to_string());
        self
    }
}

/// Quantizes a float tensor into the range `[min_range, max_range]`.
#[derive(Debug, Clone)]
pub struct QuantizeV2<T> {
    operation: Operation,
    output: Output<T>,
    output_min: Output<f32>,
    output_max: Output<f32>,
}

impl<T: TensorType> QuantizeV2<T> {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<f32>,
        min_range: &impl Operand<f32>,
        max_range: &impl Operand<f32>,
        options: QuantizeV2Options,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("QuantizeV2")
            .input(input)
            .input(min_range)
            .input(max_range)
            .attr("T", T::DATA_TYPE)
            .attr_opt("mode", options.mode)
            .attr_opt("round_mode", options.round_mode)
            .build(scope)?;
        let output = operation.output(0)?;
        let output_min = operation.output(1)?;
        let output_max = operation.output(2)?;
        Ok(Self {
            operation,
            output,
            output_min,
            output_max,
        })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }

    /// Actual minimum used to quantize.
    pub fn output_min(&self) -> &Output<f32> {
        &self.output_min
    }

    pub fn output_max(&self) -> &Output<f32> {
        &self.output_max
    }
}

impl_op!([T] QuantizeV2<T>);

#[derive(Debug, Clone, Default)]
pub struct DequantizeOptions {
    mode: Option<String>,
}

impl DequantizeOptions {
    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Dequantize {
    operation: Operation,
    output: Output<f32>,
}

impl Dequantize {
    pub fn new<T>(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        min_range: &impl Operand<f32>,
        max_range: &impl Operand<f32>,
        options: DequantizeOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Dequantize")
            .input(input)
            .input(min_range)
            .input(max_range)
            .attr_opt("mode", options.mode)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<f32> {
        &self.output
    }
}

impl_op!([] Dequantize, output: f32);

/// Reverses the dimensions listed in `axis`.
#[derive(Debug, Clone)]
pub struct ReverseV2<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> ReverseV2<T> {
    pub fn new<I>(
        scope: &Scope<'_>,
        tensor: &impl Operand<T>,
        axis: &impl Operand<I>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ReverseV2")
            .input(tensor)
            .input(axis)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] ReverseV2<T>, output: T);

/// Number of elements of a tensor.
#[derive(Debug, Clone)]
pub struct Size<U> {
    operation: Operation,
    output: Output<U>,
}

impl<U: TensorType> Size<U> {
    pub fn new<T>(scope: &Scope<'_>, input: &impl Operand<T>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Size")
            .input(input)
            .attr("out_type", U::DATA_TYPE)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<U> {
        &self.output
    }
}

impl_op!([U] Size<U>, output: U);

/// Unique elements of a 1-D tensor, the index of each input element in the
/// result and the number of occurrences.
#[derive(Debug, Clone)]
pub struct UniqueWithCounts<T, U> {
    operation: Operation,
    y: Output<T>,
    idx: Output<U>,
    count: Output<U>,
}

impl<T, U: TensorType> UniqueWithCounts<T, U> {
    pub fn new(scope: &Scope<'_>, x: &impl Operand<T>) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("UniqueWithCounts")
            .input(x)
            .attr("out_idx", U::DATA_TYPE)
            .build(scope)?;
        let y = operation.output(0)?;
        let idx = operation.output(1)?;
        let count = operation.output(2)?;
        Ok(Self {
            operation,
            y,
            idx,
            count,
        })
    }

    pub fn y(&self) -> &Output<T> {
        &self.y
    }

    pub fn idx(&self) -> &Output<U> {
        &self.idx
    }

    pub fn count(&self) -> &Output<U> {
        &self.count
    }
}

impl_op!([T, U] UniqueWithCounts<T, U>);

#[derive(Debug, Clone, Default)]
pub struct StridedSliceOptions {
    begin_mask: Option<i64>,
    end_mask: Option<i64>,
    ellipsis_mask: Option<i64>,
    new_axis_mask: Option<i64>,
    shrink_axis_mask: Option<i64>,
}

impl StridedSliceOptions {
    pub fn begin_mask(mut self, mask: i64) -> Self {
        self.begin_mask = Some(mask);
        self
    }

    pub fn end_mask(mut self, mask: i64) -> Self {
        self.end_mask = Some(mask);
        self
    }

    pub fn ellipsis_mask(mut self, mask: i64) -> Self {
        self.ellipsis_mask = Some(mask);
        self
    }

    pub fn new_axis_mask(mut self, mask: i64) -> Self {
        self.new_axis_mask = Some(mask);
        self
    }

    pub fn shrink_axis_mask(mut self, mask: i64) -> Self {
        self.shrink_axis_mask = Some(mask);
        self
    }
}

#[derive(Debug, Clone)]
pub struct StridedSlice<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> StridedSlice<T> {
    pub fn new<I>(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        begin: &impl Operand<I>,
        end: &impl Operand<I>,
        strides: &impl Operand<I>,
        options: StridedSliceOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("StridedSlice")
            .input(input)
            .input(begin)
            .input(end)
            .input(strides)
            .attr_opt("begin_mask", options.begin_mask)
            .attr_opt("end_mask", options.end_mask)
            .attr_opt("ellipsis_mask", options.ellipsis_mask)
            .attr_opt("new_axis_mask", options.new_axis_mask)
            .attr_opt("shrink_axis_mask", options.shrink_axis_mask)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] StridedSlice<T>, output: T);

#[derive(Debug, Clone, Default)]
pub struct DepthToSpaceOptions {
    data_format: Option<String>,
}

impl DepthToSpaceOptions {
    pub fn data_format(mut self, data_format: &str) -> Self {
        self.data_format = Some(data_format.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct DepthToSpace<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> DepthToSpace<T> {
    pub fn new(
        scope: &Scope<'_>,
        input: &impl Operand<T>,
        block_size: i64,
        options: DepthToSpaceOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("DepthToSpace")
            .input(input)
            .attr("block_size", block_size)
            .attr_opt("data_format", options.data_format)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] DepthToSpace<T>, output: T);

/// Tensor backed by a named read-only memory region.
#[derive(Debug, Clone)]
pub struct ImmutableConst<T> {
    operation: Operation,
    tensor: Output<T>,
}

impl<T: TensorType> ImmutableConst<T> {
    pub fn new(
        scope: &Scope<'_>,
        shape: Shape,
        memory_region_name: &str,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ImmutableConst")
            .attr("dtype", T::DATA_TYPE)
            .attr("shape", shape)
            .attr("memory_region_name", memory_region_name)
            .build(scope)?;
        let tensor = operation.output(0)?;
        Ok(Self { operation, tensor })
    }

    pub fn tensor(&self) -> &Output<T> {
        &self.tensor
    }
}

impl_op!([T] ImmutableConst<T>, tensor: T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Graph;
    use crate::graph::{AttrValue, DataType, NodeInput};
    use crate::ops::core::Constant;
    use crate::ops::test_util::placeholder;
    use crate::operation::PrimitiveOp;
    use crate::types::QUInt8;

    #[test]
    fn matrix_band_part_feeds_inputs_in_order() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let input = placeholder::<f32>(&scope);
        let lower = Constant::scalar(&scope, 1i64).unwrap();
        let upper = Constant::scalar(&scope, -1i64).unwrap();
        let band = MatrixBandPart::new(&scope, &input, &lower, &upper).unwrap();

        assert_eq!(band.band().data_type(), DataType::Float);
        let node = graph.node_def("MatrixBandPart").unwrap();
        assert_eq!(
            node.inputs,
            vec![
                NodeInput::Single("Placeholder:0".into()),
                NodeInput::Single("Const:0".into()),
                NodeInput::Single("Const_1:0".into()),
            ]
        );
        assert_eq!(node.attr("Tindex"), Some(&AttrValue::Type(DataType::Int64)));
    }

    #[test]
    fn concat_keeps_dim_first_and_values_as_list() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let dim = Constant::scalar(&scope, 0i32).unwrap();
        let values = [placeholder::<f32>(&scope), placeholder::<f32>(&scope)];
        let concat = Concat::new(&scope, &dim, &values).unwrap();

        assert_eq!(concat.operation().input_list_length("values").unwrap(), 2);
        let node = graph.node_def("Concat").unwrap();
        assert_eq!(node.inputs[0], NodeInput::Single("Const:0".into()));
        assert_eq!(node.attr("N"), Some(&AttrValue::Int(2)));
    }

    #[test]
    fn unpack_yields_one_output_per_slice() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let value = placeholder::<i32>(&scope);
        let unpack = Unpack::new(&scope, &value, 3, UnpackOptions::default()).unwrap();

        assert_eq!(unpack.output().len(), 3);
        let indices: Vec<usize> = unpack.clone().into_iter().map(|o| o.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(graph.node_def("Unpack").unwrap().attr("axis").is_none());

        Unpack::new(&scope, &value, 2, UnpackOptions::default().axis(1)).unwrap();
        assert_eq!(
            graph.node_def("Unpack_1").unwrap().attr("axis"),
            Some(&AttrValue::Int(1))
        );
    }

    #[test]
    fn shape_n_and_size_use_requested_index_type() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let inputs = [placeholder::<f32>(&scope), placeholder::<f32>(&scope)];
        let shapes = ShapeN::<i64>::new(&scope, &inputs).unwrap();
        assert_eq!(shapes.output().len(), 2);
        assert!(shapes.output().iter().all(|o| o.data_type() == DataType::Int64));

        let size = Size::<i32>::new(&scope, &inputs[0]).unwrap();
        assert_eq!(size.output().data_type(), DataType::Int32);
    }

    #[test]
    fn identity_n_preserves_heterogeneous_types() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let a = placeholder::<f32>(&scope).untyped();
        let b = placeholder::<String>(&scope).untyped();
        let identity = IdentityN::new(&scope, &[a, b]).unwrap();

        let types: Vec<DataType> = identity.output().iter().map(|o| o.data_type()).collect();
        assert_eq!(types, vec![DataType::Float, DataType::String]);
    }

    #[test]
    fn squeeze_dims_written_only_when_set() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let input = placeholder::<f32>(&scope);
        Squeeze::new(&scope, &input, SqueezeOptions::default()).unwrap();
        Squeeze::new(&scope, &input, SqueezeOptions::default().squeeze_dims(&[0, 2])).unwrap();

        assert!(graph.node_def("Squeeze").unwrap().attr("squeeze_dims").is_none());
        assert_eq!(
            graph.node_def("Squeeze_1").unwrap().attr("squeeze_dims"),
            Some(&AttrValue::IntList(vec![0, 2]))
        );
    }

    #[test]
    fn quantize_exposes_three_outputs() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let input = placeholder::<f32>(&scope);
        let min = Constant::scalar(&scope, -1.0f32).unwrap();
        let max = Constant::scalar(&scope, 1.0f32).unwrap();
        let quantized = QuantizeV2::<QUInt8>::new(
            &scope,
            &input,
            &min,
            &max,
            QuantizeV2Options::default().mode("SCALED"),
        )
        .unwrap();

        assert_eq!(quantized.output().index(), 0);
        assert_eq!(quantized.output().data_type(), DataType::Quint8);
        assert_eq!(quantized.output_min().index(), 1);
        assert_eq!(quantized.output_max().index(), 2);
        let node = graph.node_def("QuantizeV2").unwrap();
        assert_eq!(node.attr("mode"), Some(&AttrValue::String("SCALED".into())));
        assert!(node.attr("round_mode").is_none());

        let restored = Dequantize::new(
            &scope,
            quantized.output(),
            quantized.output_min(),
            quantized.output_max(),
            DequantizeOptions::default(),
        )
        .unwrap();
        assert_eq!(restored.output().data_type(), DataType::Float);
    }

    #[test]
    fn quantize_rejects_unknown_mode() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let input = placeholder::<f32>(&scope);
        let err = QuantizeV2::<QUInt8>::new(
            &scope,
            &input,
            &input,
            &input,
            QuantizeV2Options::default().mode("FASTEST"),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::InvalidAttrValue { attr, .. } if attr == "mode"));
    }

    #[test]
    fn unique_with_counts_outputs_follow_declaration_order() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let x = placeholder::<i64>(&scope);
        let unique = UniqueWithCounts::<i64, i32>::new(&scope, &x).unwrap();
        assert_eq!(unique.y().data_type(), DataType::Int64);
        assert_eq!(unique.idx().index(), 1);
        assert_eq!(unique.count().data_type(), DataType::Int32);
    }

    #[test]
    fn strided_slice_masks_are_optional() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let input = placeholder::<f32>(&scope);
        let begin = Constant::vector(&scope, &[0i32, 0]).unwrap();
        let end = Constant::vector(&scope, &[1i32, 2]).unwrap();
        let strides = Constant::vector(&scope, &[1i32, 1]).unwrap();
        StridedSlice::new(
            &scope,
            &input,
            &begin,
            &end,
            &strides,
            StridedSliceOptions::default().shrink_axis_mask(1),
        )
        .unwrap();

        let node = graph.node_def("StridedSlice").unwrap();
        assert_eq!(node.attr("shrink_axis_mask"), Some(&AttrValue::Int(1)));
        assert!(node.attr("begin_mask").is_none());
        assert_eq!(node.attr("Index"), Some(&AttrValue::Type(DataType::Int32)));
    }

    #[test]
    fn remaining_array_ops_build() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let input = placeholder::<f32>(&scope);
        let indices = placeholder::<i32>(&scope);
        let depth = Constant::scalar(&scope, 4i32).unwrap();
        let on = Constant::scalar(&scope, 1.0f32).unwrap();
        let off = Constant::scalar(&scope, 0.0f32).unwrap();
        let axis = Constant::vector(&scope, &[0i32]).unwrap();

        let one_hot = OneHot::new(&scope, &indices, &depth, &on, &off, OneHotOptions::default())
            .unwrap();
        assert_eq!(one_hot.output().data_type(), DataType::Float);
        ReverseV2::new(&scope, &input, &axis).unwrap();
        DepthToSpace::new(&scope, &input, 2, DepthToSpaceOptions::default()).unwrap();
        let mapped =
            ImmutableConst::<f32>::new(&scope, Shape::make(&[10]), "weights.bin").unwrap();
        assert_eq!(mapped.tensor().data_type(), DataType::Float);

        let err = DepthToSpace::new(&scope, &input, 1, DepthToSpaceOptions::default());
        assert!(matches!(err, Err(GraphError::InvalidAttrValue { .. })));
    }
}
