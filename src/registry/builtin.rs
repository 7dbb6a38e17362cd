use crate::graph::{AttrType, DataType, Shape};

use super::{ArgDef, AttrDef, OpDef};

fn real_number_types() -> Vec<DataType> {
    vec![
        DataType::Float,
        DataType::Double,
        DataType::Int32,
        DataType::Uint8,
        DataType::Int16,
        DataType::Int8,
        DataType::Int64,
        DataType::Bfloat16,
        DataType::Uint16,
        DataType::Half,
        DataType::Uint32,
        DataType::Uint64,
    ]
}

fn number_types() -> Vec<DataType> {
    let mut types = real_number_types();
    types.extend([
        DataType::Complex64,
        DataType::Complex128,
        DataType::Qint8,
        DataType::Quint8,
        DataType::Qint32,
    ]);
    types
}

fn float_types() -> Vec<DataType> {
    vec![
        DataType::Half,
        DataType::Bfloat16,
        DataType::Float,
        DataType::Double,
    ]
}

fn index_types() -> Vec<DataType> {
    vec![DataType::Int32, DataType::Int64]
}

fn quantized_types() -> Vec<DataType> {
    vec![
        DataType::Qint8,
        DataType::Quint8,
        DataType::Qint32,
        DataType::Qint16,
        DataType::Quint16,
    ]
}

fn type_attr(name: &str) -> AttrDef {
    AttrDef::new(name, AttrType::Type)
}

fn index_attr(name: &str, default: DataType) -> AttrDef {
    type_attr(name)
        .default_value(default)
        .allowed_types(index_types())
}

fn data_format_attr(formats: &[&str]) -> AttrDef {
    AttrDef::new("data_format", AttrType::String)
        .default_value("NHWC")
        .allowed_strings(formats)
}

fn padding_attr() -> AttrDef {
    AttrDef::new("padding", AttrType::String).allowed_strings(&["SAME", "VALID"])
}

fn seed_attrs(def: OpDef) -> OpDef {
    def.attr(AttrDef::new("seed", AttrType::Int).default_value(0i64))
        .attr(AttrDef::new("seed2", AttrType::Int).default_value(0i64))
}

fn unary(name: &str, input: &str, output: &str, types: Vec<DataType>) -> OpDef {
    OpDef::new(name)
        .input(ArgDef::typed(input, "T"))
        .output(ArgDef::typed(output, "T"))
        .attr(type_attr("T").allowed_types(types))
}

pub(super) fn op_defs() -> Vec<OpDef> {
    let mut defs = Vec::new();
    defs.extend(core_ops());
    defs.extend(array_ops());
    defs.extend(math_ops());
    defs.extend(nn_ops());
    defs.extend(image_ops());
    defs.extend(sparse_ops());
    defs.extend(dataflow_ops());
    defs.extend(state_ops());
    defs.extend(control_flow_ops());
    defs.extend(string_ops());
    defs.extend(random_ops());
    defs
}

fn core_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("Const")
            .output(ArgDef::typed("output", "dtype"))
            .attr(AttrDef::new("value", AttrType::Tensor).tensor_type("dtype"))
            .attr(type_attr("dtype"))
            .summary("Returns a constant tensor."),
        OpDef::new("Placeholder")
            .output(ArgDef::typed("output", "dtype"))
            .attr(type_attr("dtype"))
            .attr(AttrDef::new("shape", AttrType::Shape).default_value(Shape::unknown()))
            .summary("A placeholder for a value that will be fed into the computation."),
        OpDef::new("PlaceholderWithDefault")
            .input(ArgDef::typed("input", "dtype"))
            .output(ArgDef::typed("output", "dtype"))
            .attr(type_attr("dtype"))
            .attr(AttrDef::new("shape", AttrType::Shape))
            .summary("A placeholder that passes through `input` when its output is not fed."),
    ]
}

fn array_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("MatrixBandPart")
            .input(ArgDef::typed("input", "T"))
            .input(ArgDef::typed("num_lower", "Tindex"))
            .input(ArgDef::typed("num_upper", "Tindex"))
            .output(ArgDef::typed("band", "T"))
            .attr(type_attr("T"))
            .attr(index_attr("Tindex", DataType::Int64))
            .summary("Copy a tensor setting everything outside a central band to zero."),
        OpDef::new("Concat")
            .input(ArgDef::fixed("concat_dim", DataType::Int32))
            .input(ArgDef::typed_list("values", "T", "N"))
            .output(ArgDef::typed("output", "T"))
            .attr(AttrDef::new("N", AttrType::Int).minimum(2))
            .attr(type_attr("T"))
            .summary("Concatenates tensors along one dimension."),
        OpDef::new("Unpack")
            .input(ArgDef::typed("value", "T"))
            .output(ArgDef::typed_list("output", "T", "num"))
            .attr(AttrDef::new("num", AttrType::Int).minimum(0))
            .attr(type_attr("T"))
            .attr(AttrDef::new("axis", AttrType::Int).default_value(0i64))
            .summary("Unpacks a given dimension of a rank-R tensor into rank-(R-1) tensors."),
        OpDef::new("ShapeN")
            .input(ArgDef::typed_list("input", "T", "N"))
            .output(ArgDef::typed_list("output", "out_type", "N"))
            .attr(AttrDef::new("N", AttrType::Int).minimum(1))
            .attr(type_attr("T"))
            .attr(index_attr("out_type", DataType::Int32))
            .summary("Returns shape of tensors."),
        OpDef::new("IdentityN")
            .input(ArgDef::type_list("input", "T"))
            .output(ArgDef::type_list("output", "T"))
            .attr(AttrDef::new("T", AttrType::TypeList).minimum(1))
            .summary("Returns a list of tensors with the same shapes and contents as the input."),
        OpDef::new("Squeeze")
            .input(ArgDef::typed("input", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T"))
            .attr(AttrDef::new("squeeze_dims", AttrType::IntList).default_value(Vec::<i64>::new()))
            .summary("Removes dimensions of size 1 from the shape of a tensor."),
        OpDef::new("OneHot")
            .input(ArgDef::typed("indices", "TI"))
            .input(ArgDef::fixed("depth", DataType::Int32))
            .input(ArgDef::typed("on_value", "T"))
            .input(ArgDef::typed("off_value", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(AttrDef::new("axis", AttrType::Int).default_value(-1i64))
            .attr(type_attr("T"))
            .attr(
                type_attr("TI")
                    .default_value(DataType::Int64)
                    .allowed_types(vec![DataType::Uint8, DataType::Int32, DataType::Int64]),
            )
            .summary("Returns a one-hot tensor."),
        OpDef::new("QuantizeV2")
            .input(ArgDef::fixed("input", DataType::Float))
            .input(ArgDef::fixed("min_range", DataType::Float))
            .input(ArgDef::fixed("max_range", DataType::Float))
            .output(ArgDef::typed("output", "T"))
            .output(ArgDef::fixed("output_min", DataType::Float))
            .output(ArgDef::fixed("output_max", DataType::Float))
            .attr(type_attr("T").allowed_types(quantized_types()))
            .attr(
                AttrDef::new("mode", AttrType::String)
                    .default_value("MIN_COMBINED")
                    .allowed_strings(&["MIN_COMBINED", "MIN_FIRST", "SCALED"]),
            )
            .attr(
                AttrDef::new("round_mode", AttrType::String)
                    .default_value("HALF_AWAY_FROM_ZERO")
                    .allowed_strings(&["HALF_AWAY_FROM_ZERO", "HALF_TO_EVEN"]),
            )
            .summary("Quantize a float tensor to a quantized type."),
        OpDef::new("Dequantize")
            .input(ArgDef::typed("input", "T"))
            .input(ArgDef::fixed("min_range", DataType::Float))
            .input(ArgDef::fixed("max_range", DataType::Float))
            .output(ArgDef::fixed("output", DataType::Float))
            .attr(type_attr("T").allowed_types(quantized_types()))
            .attr(
                AttrDef::new("mode", AttrType::String)
                    .default_value("MIN_COMBINED")
                    .allowed_strings(&["MIN_COMBINED", "MIN_FIRST", "SCALED"]),
            )
            .summary("Dequantize a quantized tensor into a float tensor."),
        OpDef::new("ReverseV2")
            .input(ArgDef::typed("tensor", "T"))
            .input(ArgDef::typed("axis", "Tidx"))
            .output(ArgDef::typed("output", "T"))
            .attr(index_attr("Tidx", DataType::Int32))
            .attr(type_attr("T"))
            .summary("Reverses specific dimensions of a tensor."),
        OpDef::new("Size")
            .input(ArgDef::typed("input", "T"))
            .output(ArgDef::typed("output", "out_type"))
            .attr(type_attr("T"))
            .attr(index_attr("out_type", DataType::Int32))
            .summary("Returns the size of a tensor."),
        OpDef::new("UniqueWithCounts")
            .input(ArgDef::typed("x", "T"))
            .output(ArgDef::typed("y", "T"))
            .output(ArgDef::typed("idx", "out_idx"))
            .output(ArgDef::typed("count", "out_idx"))
            .attr(type_attr("T"))
            .attr(index_attr("out_idx", DataType::Int32))
            .summary("Finds unique elements in a 1-D tensor and counts them."),
        OpDef::new("StridedSlice")
            .input(ArgDef::typed("input", "T"))
            .input(ArgDef::typed("begin", "Index"))
            .input(ArgDef::typed("end", "Index"))
            .input(ArgDef::typed("strides", "Index"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T"))
            .attr(type_attr("Index").allowed_types(index_types()))
            .attr(AttrDef::new("begin_mask", AttrType::Int).default_value(0i64))
            .attr(AttrDef::new("end_mask", AttrType::Int).default_value(0i64))
            .attr(AttrDef::new("ellipsis_mask", AttrType::Int).default_value(0i64))
            .attr(AttrDef::new("new_axis_mask", AttrType::Int).default_value(0i64))
            .attr(AttrDef::new("shrink_axis_mask", AttrType::Int).default_value(0i64))
            .summary("Return a strided slice from `input`."),
        OpDef::new("DepthToSpace")
            .input(ArgDef::typed("input", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T"))
            .attr(AttrDef::new("block_size", AttrType::Int).minimum(2))
            .attr(data_format_attr(&["NHWC", "NCHW", "NCHW_VECT_C"]))
            .summary("Rearranges data from depth into blocks of spatial data."),
        OpDef::new("ImmutableConst")
            .output(ArgDef::typed("tensor", "dtype"))
            .attr(type_attr("dtype"))
            .attr(AttrDef::new("shape", AttrType::Shape))
            .attr(AttrDef::new("memory_region_name", AttrType::String))
            .summary("Returns an immutable tensor from a memory region."),
    ]
}

fn math_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("AddN")
            .input(ArgDef::typed_list("inputs", "T", "N"))
            .output(ArgDef::typed("sum", "T"))
            .attr(AttrDef::new("N", AttrType::Int).minimum(1))
            .attr(type_attr("T").allowed_types(number_types()))
            .summary("Add all input tensors element wise."),
        OpDef::new("MatMul")
            .input(ArgDef::typed("a", "T"))
            .input(ArgDef::typed("b", "T"))
            .output(ArgDef::typed("product", "T"))
            .attr(AttrDef::new("transpose_a", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("transpose_b", AttrType::Bool).default_value(false))
            .attr(type_attr("T").allowed_types(number_types()))
            .summary("Multiply the matrix `a` by the matrix `b`."),
        OpDef::new("Cast")
            .input(ArgDef::typed("x", "SrcT"))
            .output(ArgDef::typed("y", "DstT"))
            .attr(type_attr("SrcT"))
            .attr(type_attr("DstT"))
            .attr(AttrDef::new("Truncate", AttrType::Bool).default_value(false))
            .summary("Cast `x` of type SrcT to `y` of DstT."),
        OpDef::new("Range")
            .input(ArgDef::typed("start", "Tidx"))
            .input(ArgDef::typed("limit", "Tidx"))
            .input(ArgDef::typed("delta", "Tidx"))
            .output(ArgDef::typed("output", "Tidx"))
            .attr(
                type_attr("Tidx")
                    .default_value(DataType::Int32)
                    .allowed_types(vec![
                        DataType::Bfloat16,
                        DataType::Float,
                        DataType::Double,
                        DataType::Int32,
                        DataType::Int64,
                    ]),
            )
            .summary("Creates a sequence of numbers."),
        OpDef::new("Select")
            .input(ArgDef::fixed("condition", DataType::Bool))
            .input(ArgDef::typed("t", "T"))
            .input(ArgDef::typed("e", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T"))
            .summary("Selects elements from `t` or `e`, depending on `condition`."),
        unary("Sign", "x", "y", number_types())
            .summary("Returns an element-wise indication of the sign of a number."),
        OpDef::new("ArgMin")
            .input(ArgDef::typed("input", "T"))
            .input(ArgDef::typed("dimension", "Tidx"))
            .output(ArgDef::typed("output", "output_type"))
            .attr(type_attr("T").allowed_types(number_types()))
            .attr(index_attr("Tidx", DataType::Int32))
            .attr(index_attr("output_type", DataType::Int64))
            .summary("Returns the index with the smallest value across dimensions of a tensor."),
        OpDef::new("Cumsum")
            .input(ArgDef::typed("x", "T"))
            .input(ArgDef::typed("axis", "Tidx"))
            .output(ArgDef::typed("out", "T"))
            .attr(AttrDef::new("exclusive", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("reverse", AttrType::Bool).default_value(false))
            .attr(type_attr("T").allowed_types(number_types()))
            .attr(index_attr("Tidx", DataType::Int32))
            .summary("Compute the cumulative sum of the tensor `x` along `axis`."),
        OpDef::new("ApproximateEqual")
            .input(ArgDef::typed("x", "T"))
            .input(ArgDef::typed("y", "T"))
            .output(ArgDef::fixed("z", DataType::Bool))
            .attr(type_attr("T").allowed_types(number_types()))
            .attr(AttrDef::new("tolerance", AttrType::Float).default_value(1e-5f32))
            .summary("Returns the truth value of abs(x-y) < tolerance element-wise."),
    ]
}

fn nn_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("Conv2D")
            .input(ArgDef::typed("input", "T"))
            .input(ArgDef::typed("filter", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T").allowed_types(float_types()))
            .attr(AttrDef::new("strides", AttrType::IntList))
            .attr(AttrDef::new("use_cudnn_on_gpu", AttrType::Bool).default_value(true))
            .attr(padding_attr())
            .attr(data_format_attr(&["NHWC", "NCHW"]))
            .attr(AttrDef::new("dilations", AttrType::IntList).default_value(vec![1i64, 1, 1, 1]))
            .summary("Computes a 2-D convolution given 4-D `input` and `filter` tensors."),
        OpDef::new("BiasAdd")
            .input(ArgDef::typed("value", "T"))
            .input(ArgDef::typed("bias", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T").allowed_types(number_types()))
            .attr(data_format_attr(&["NHWC", "NCHW"]))
            .summary("Adds `bias` to `value`."),
        OpDef::new("MaxPoolV2")
            .input(ArgDef::typed("input", "T"))
            .input(ArgDef::fixed("ksize", DataType::Int32))
            .input(ArgDef::fixed("strides", DataType::Int32))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T").default_value(DataType::Float).allowed_types(real_number_types()))
            .attr(padding_attr())
            .attr(data_format_attr(&["NHWC", "NCHW", "NCHW_VECT_C"]))
            .summary("Performs max pooling on the input."),
        OpDef::new("FusedBatchNorm")
            .input(ArgDef::typed("x", "T"))
            .input(ArgDef::typed("scale", "T"))
            .input(ArgDef::typed("offset", "T"))
            .input(ArgDef::typed("mean", "T"))
            .input(ArgDef::typed("variance", "T"))
            .output(ArgDef::typed("y", "T"))
            .output(ArgDef::typed("batch_mean", "T"))
            .output(ArgDef::typed("batch_variance", "T"))
            .output(ArgDef::typed("reserve_space_1", "T"))
            .output(ArgDef::typed("reserve_space_2", "T"))
            .attr(type_attr("T").allowed_types(vec![DataType::Float]))
            .attr(AttrDef::new("epsilon", AttrType::Float).default_value(0.0001f32))
            .attr(data_format_attr(&["NHWC", "NCHW"]))
            .attr(AttrDef::new("is_training", AttrType::Bool).default_value(true))
            .summary("Batch normalization."),
        OpDef::new("TopKV2")
            .input(ArgDef::typed("input", "T"))
            .input(ArgDef::fixed("k", DataType::Int32))
            .output(ArgDef::typed("values", "T"))
            .output(ArgDef::fixed("indices", DataType::Int32))
            .attr(AttrDef::new("sorted", AttrType::Bool).default_value(true))
            .attr(type_attr("T").allowed_types(real_number_types()))
            .summary("Finds values and indices of the `k` largest elements for the last dimension."),
        unary("Elu", "features", "activations", float_types())
            .summary("Computes exponential linear: `exp(features) - 1` if < 0, `features` otherwise."),
        unary("Softplus", "features", "activations", float_types())
            .summary("Computes softplus: `log(exp(features) + 1)`."),
        OpDef::new("LRN")
            .input(ArgDef::typed("input", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(AttrDef::new("depth_radius", AttrType::Int).default_value(5i64))
            .attr(AttrDef::new("bias", AttrType::Float).default_value(1.0f32))
            .attr(AttrDef::new("alpha", AttrType::Float).default_value(1.0f32))
            .attr(AttrDef::new("beta", AttrType::Float).default_value(0.5f32))
            .attr(
                type_attr("T")
                    .default_value(DataType::Float)
                    .allowed_types(vec![DataType::Half, DataType::Bfloat16, DataType::Float]),
            )
            .summary("Local Response Normalization."),
        OpDef::new("SoftmaxCrossEntropyWithLogits")
            .input(ArgDef::typed("features", "T"))
            .input(ArgDef::typed("labels", "T"))
            .output(ArgDef::typed("loss", "T"))
            .output(ArgDef::typed("backprop", "T"))
            .attr(type_attr("T").allowed_types(float_types()))
            .summary("Computes softmax cross entropy cost and gradients to backpropagate."),
        OpDef::new("InTopKV2")
            .input(ArgDef::fixed("predictions", DataType::Float))
            .input(ArgDef::typed("targets", "T"))
            .input(ArgDef::typed("k", "T"))
            .output(ArgDef::fixed("precision", DataType::Bool))
            .attr(index_attr("T", DataType::Int32))
            .summary("Says whether the targets are in the top `K` predictions."),
    ]
}

fn image_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("DecodePng")
            .input(ArgDef::fixed("contents", DataType::String))
            .output(ArgDef::typed("image", "dtype"))
            .attr(AttrDef::new("channels", AttrType::Int).default_value(0i64))
            .attr(
                type_attr("dtype")
                    .default_value(DataType::Uint8)
                    .allowed_types(vec![DataType::Uint8, DataType::Uint16]),
            )
            .summary("Decode a PNG-encoded image to a uint8 or uint16 tensor."),
        OpDef::new("EncodeJpeg")
            .input(ArgDef::fixed("image", DataType::Uint8))
            .output(ArgDef::fixed("contents", DataType::String))
            .attr(
                AttrDef::new("format", AttrType::String)
                    .default_value("")
                    .allowed_strings(&["", "grayscale", "rgb"]),
            )
            .attr(AttrDef::new("quality", AttrType::Int).default_value(95i64))
            .attr(AttrDef::new("progressive", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("optimize_size", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("chroma_downsampling", AttrType::Bool).default_value(true))
            .attr(
                AttrDef::new("density_unit", AttrType::String)
                    .default_value("in")
                    .allowed_strings(&["in", "cm"]),
            )
            .attr(AttrDef::new("x_density", AttrType::Int).default_value(300i64))
            .attr(AttrDef::new("y_density", AttrType::Int).default_value(300i64))
            .attr(AttrDef::new("xmp_metadata", AttrType::String).default_value(""))
            .summary("JPEG-encode an image."),
        OpDef::new("ResizeBicubic")
            .input(ArgDef::typed("images", "T"))
            .input(ArgDef::fixed("size", DataType::Int32))
            .output(ArgDef::fixed("resized_images", DataType::Float))
            .attr(type_attr("T").allowed_types(real_number_types()))
            .attr(AttrDef::new("align_corners", AttrType::Bool).default_value(false))
            .summary("Resize `images` to `size` using bicubic interpolation."),
        OpDef::new("CropAndResize")
            .input(ArgDef::typed("image", "T"))
            .input(ArgDef::fixed("boxes", DataType::Float))
            .input(ArgDef::fixed("box_ind", DataType::Int32))
            .input(ArgDef::fixed("crop_size", DataType::Int32))
            .output(ArgDef::fixed("crops", DataType::Float))
            .attr(type_attr("T").allowed_types(real_number_types()))
            .attr(
                AttrDef::new("method", AttrType::String)
                    .default_value("bilinear")
                    .allowed_strings(&["bilinear", "nearest"]),
            )
            .attr(AttrDef::new("extrapolation_value", AttrType::Float).default_value(0.0f32))
            .summary("Extracts crops from the input image tensor and resizes them."),
        OpDef::new("NonMaxSuppressionV2")
            .input(ArgDef::fixed("boxes", DataType::Float))
            .input(ArgDef::fixed("scores", DataType::Float))
            .input(ArgDef::fixed("max_output_size", DataType::Int32))
            .input(ArgDef::fixed("iou_threshold", DataType::Float))
            .output(ArgDef::fixed("selected_indices", DataType::Int32))
            .summary("Greedily selects a subset of bounding boxes in descending order of score."),
        OpDef::new("SampleDistortedBoundingBoxV2")
            .input(ArgDef::typed("image_size", "T"))
            .input(ArgDef::fixed("bounding_boxes", DataType::Float))
            .input(ArgDef::fixed("min_object_covered", DataType::Float))
            .output(ArgDef::typed("begin", "T"))
            .output(ArgDef::typed("size", "T"))
            .output(ArgDef::fixed("bboxes", DataType::Float))
            .attr(
                type_attr("T").allowed_types(vec![
                    DataType::Uint8,
                    DataType::Int8,
                    DataType::Int16,
                    DataType::Int32,
                    DataType::Int64,
                ]),
            )
            .attr(AttrDef::new("seed", AttrType::Int).default_value(0i64))
            .attr(AttrDef::new("seed2", AttrType::Int).default_value(0i64))
            .attr(
                AttrDef::new("aspect_ratio_range", AttrType::FloatList)
                    .default_value(vec![0.75f32, 1.33]),
            )
            .attr(AttrDef::new("area_range", AttrType::FloatList).default_value(vec![0.05f32, 1.0]))
            .attr(AttrDef::new("max_attempts", AttrType::Int).default_value(100i64))
            .attr(
                AttrDef::new("use_image_if_no_bounding_boxes", AttrType::Bool)
                    .default_value(false),
            )
            .summary("Generate a single randomly distorted bounding box for an image."),
    ]
}

fn sparse_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("SparseAdd")
            .input(ArgDef::fixed("a_indices", DataType::Int64))
            .input(ArgDef::typed("a_values", "T"))
            .input(ArgDef::fixed("a_shape", DataType::Int64))
            .input(ArgDef::fixed("b_indices", DataType::Int64))
            .input(ArgDef::typed("b_values", "T"))
            .input(ArgDef::fixed("b_shape", DataType::Int64))
            .input(ArgDef::typed("thresh", "Treal"))
            .output(ArgDef::fixed("sum_indices", DataType::Int64))
            .output(ArgDef::typed("sum_values", "T"))
            .output(ArgDef::fixed("sum_shape", DataType::Int64))
            .attr(type_attr("T").allowed_types(number_types()))
            .attr(type_attr("Treal").allowed_types(real_number_types()))
            .summary("Adds two `SparseTensor` objects to produce another `SparseTensor`."),
        OpDef::new("SparseConcat")
            .input(ArgDef::fixed_list("indices", DataType::Int64, "N"))
            .input(ArgDef::typed_list("values", "T", "N"))
            .input(ArgDef::fixed_list("shapes", DataType::Int64, "N"))
            .output(ArgDef::fixed("output_indices", DataType::Int64))
            .output(ArgDef::typed("output_values", "T"))
            .output(ArgDef::fixed("output_shape", DataType::Int64))
            .attr(AttrDef::new("concat_dim", AttrType::Int))
            .attr(AttrDef::new("N", AttrType::Int).minimum(2))
            .attr(type_attr("T"))
            .summary("Concatenates a list of `SparseTensor` along the specified dimension."),
        OpDef::new("SparseToDense")
            .input(ArgDef::typed("sparse_indices", "Tindices"))
            .input(ArgDef::typed("output_shape", "Tindices"))
            .input(ArgDef::typed("sparse_values", "T"))
            .input(ArgDef::typed("default_value", "T"))
            .output(ArgDef::typed("dense", "T"))
            .attr(AttrDef::new("validate_indices", AttrType::Bool).default_value(true))
            .attr(type_attr("T"))
            .attr(type_attr("Tindices").allowed_types(index_types()))
            .summary("Converts a sparse representation into a dense tensor."),
        OpDef::new("SparseReshape")
            .input(ArgDef::fixed("input_indices", DataType::Int64))
            .input(ArgDef::fixed("input_shape", DataType::Int64))
            .input(ArgDef::fixed("new_shape", DataType::Int64))
            .output(ArgDef::fixed("output_indices", DataType::Int64))
            .output(ArgDef::fixed("output_shape", DataType::Int64))
            .summary("Reshapes a SparseTensor to represent values in a new dense shape."),
        OpDef::new("SparseSplit")
            .input(ArgDef::fixed("split_dim", DataType::Int64))
            .input(ArgDef::fixed("indices", DataType::Int64))
            .input(ArgDef::typed("values", "T"))
            .input(ArgDef::fixed("shape", DataType::Int64))
            .output(ArgDef::fixed_list("output_indices", DataType::Int64, "num_split"))
            .output(ArgDef::typed_list("output_values", "T", "num_split"))
            .output(ArgDef::fixed_list("output_shape", DataType::Int64, "num_split"))
            .attr(AttrDef::new("num_split", AttrType::Int).minimum(1))
            .attr(type_attr("T"))
            .summary("Split a `SparseTensor` into `num_split` tensors along one dimension."),
        OpDef::new("SparseReduceSum")
            .input(ArgDef::fixed("input_indices", DataType::Int64))
            .input(ArgDef::typed("input_values", "T"))
            .input(ArgDef::fixed("input_shape", DataType::Int64))
            .input(ArgDef::fixed("reduction_axes", DataType::Int32))
            .output(ArgDef::typed("output", "T"))
            .attr(AttrDef::new("keep_dims", AttrType::Bool).default_value(false))
            .attr(type_attr("T").allowed_types(number_types()))
            .summary("Computes the sum of elements across dimensions of a SparseTensor."),
    ]
}

fn dataflow_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("FIFOQueueV2")
            .output(ArgDef::fixed("handle", DataType::Resource))
            .attr(AttrDef::new("component_types", AttrType::TypeList).minimum(1))
            .attr(AttrDef::new("shapes", AttrType::ShapeList).default_value(Vec::<Shape>::new()))
            .attr(AttrDef::new("capacity", AttrType::Int).default_value(-1i64))
            .attr(AttrDef::new("container", AttrType::String).default_value(""))
            .attr(AttrDef::new("shared_name", AttrType::String).default_value(""))
            .summary("A queue that produces elements in first-in first-out order."),
        OpDef::new("QueueEnqueueV2")
            .input(ArgDef::fixed("handle", DataType::Resource))
            .input(ArgDef::type_list("components", "Tcomponents"))
            .attr(AttrDef::new("Tcomponents", AttrType::TypeList).minimum(1))
            .attr(AttrDef::new("timeout_ms", AttrType::Int).default_value(-1i64))
            .summary("Enqueues a tuple of one or more tensors in the given queue."),
        OpDef::new("QueueDequeueV2")
            .input(ArgDef::fixed("handle", DataType::Resource))
            .output(ArgDef::type_list("components", "component_types"))
            .attr(AttrDef::new("component_types", AttrType::TypeList).minimum(1))
            .attr(AttrDef::new("timeout_ms", AttrType::Int).default_value(-1i64))
            .summary("Dequeues a tuple of one or more tensors from the given queue."),
        OpDef::new("QueueSizeV2")
            .input(ArgDef::fixed("handle", DataType::Resource))
            .output(ArgDef::fixed("size", DataType::Int32))
            .summary("Computes the number of elements in the given queue."),
        OpDef::new("DynamicPartition")
            .input(ArgDef::typed("data", "T"))
            .input(ArgDef::fixed("partitions", DataType::Int32))
            .output(ArgDef::typed_list("outputs", "T", "num_partitions"))
            .attr(AttrDef::new("num_partitions", AttrType::Int).minimum(1))
            .attr(type_attr("T"))
            .summary("Partitions `data` into `num_partitions` tensors using indices from `partitions`."),
        OpDef::new("StackV2")
            .input(ArgDef::fixed("max_size", DataType::Int32))
            .output(ArgDef::fixed("handle", DataType::Resource))
            .attr(type_attr("elem_type"))
            .attr(AttrDef::new("stack_name", AttrType::String).default_value(""))
            .summary("A stack that produces elements in first-in last-out order."),
        OpDef::new("StackPushV2")
            .input(ArgDef::fixed("handle", DataType::Resource))
            .input(ArgDef::typed("elem", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T"))
            .attr(AttrDef::new("swap_memory", AttrType::Bool).default_value(false))
            .summary("Push an element onto the stack."),
        OpDef::new("StackPopV2")
            .input(ArgDef::fixed("handle", DataType::Resource))
            .output(ArgDef::typed("elem", "elem_type"))
            .attr(type_attr("elem_type"))
            .summary("Pop the element at the top of the stack."),
    ]
}

fn state_ops() -> Vec<OpDef> {
    let variable = |name: &str| {
        OpDef::new(name)
            .output(ArgDef::typed("ref", "dtype").reference())
            .attr(AttrDef::new("shape", AttrType::Shape))
            .attr(type_attr("dtype"))
            .attr(AttrDef::new("container", AttrType::String).default_value(""))
            .attr(AttrDef::new("shared_name", AttrType::String).default_value(""))
    };
    vec![
        variable("Variable").summary("Use VariableV2 instead."),
        variable("VariableV2")
            .summary("Holds state in the form of a tensor that persists across steps."),
        OpDef::new("TemporaryVariable")
            .output(ArgDef::typed("ref", "dtype").reference())
            .attr(AttrDef::new("shape", AttrType::Shape))
            .attr(type_attr("dtype"))
            .attr(AttrDef::new("var_name", AttrType::String).default_value(""))
            .summary("Returns a tensor that may be mutated, but only persists within a single step."),
        OpDef::new("Assign")
            .input(ArgDef::typed("ref", "T").reference())
            .input(ArgDef::typed("value", "T"))
            .output(ArgDef::typed("output_ref", "T").reference())
            .attr(type_attr("T"))
            .attr(AttrDef::new("validate_shape", AttrType::Bool).default_value(true))
            .attr(AttrDef::new("use_locking", AttrType::Bool).default_value(true))
            .summary("Update `ref` by assigning `value` to it."),
        OpDef::new("ScatterSub")
            .input(ArgDef::typed("ref", "T").reference())
            .input(ArgDef::typed("indices", "Tindices"))
            .input(ArgDef::typed("updates", "T"))
            .output(ArgDef::typed("output_ref", "T").reference())
            .attr(type_attr("T").allowed_types(number_types()))
            .attr(type_attr("Tindices").allowed_types(index_types()))
            .attr(AttrDef::new("use_locking", AttrType::Bool).default_value(false))
            .summary("Subtracts sparse updates to a variable reference."),
        OpDef::new("IsVariableInitialized")
            .input(ArgDef::typed("ref", "dtype").reference())
            .output(ArgDef::fixed("is_initialized", DataType::Bool))
            .attr(type_attr("dtype"))
            .summary("Checks whether a tensor has been initialized."),
        OpDef::new("ResourceCountUpTo")
            .input(ArgDef::fixed("resource", DataType::Resource))
            .output(ArgDef::typed("output", "T"))
            .attr(AttrDef::new("limit", AttrType::Int))
            .attr(type_attr("T").allowed_types(index_types()))
            .summary("Increments the variable pointed to by `resource` until it reaches `limit`."),
    ]
}

fn control_flow_ops() -> Vec<OpDef> {
    vec![
        OpDef::new("NoOp").summary("Does nothing. Only useful as a placeholder for control edges."),
        OpDef::new("ControlTrigger").summary("Does nothing. Serves as a control trigger for scheduling."),
        OpDef::new("Abort")
            .attr(AttrDef::new("error_msg", AttrType::String).default_value(""))
            .attr(AttrDef::new("exit_without_error", AttrType::Bool).default_value(false))
            .summary("Raise an exception to abort the process when called."),
        OpDef::new("Enter")
            .input(ArgDef::typed("data", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T"))
            .attr(AttrDef::new("frame_name", AttrType::String))
            .attr(AttrDef::new("is_constant", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("parallel_iterations", AttrType::Int).default_value(10i64))
            .summary("Creates or finds a child frame, and makes `data` available to the child frame."),
        OpDef::new("Merge")
            .input(ArgDef::typed_list("inputs", "T", "N"))
            .output(ArgDef::typed("output", "T"))
            .output(ArgDef::fixed("value_index", DataType::Int32))
            .attr(type_attr("T"))
            .attr(AttrDef::new("N", AttrType::Int).minimum(1))
            .summary("Forwards the value of an available tensor from `inputs` to `output`."),
        OpDef::new("RefSwitch")
            .input(ArgDef::typed("data", "T").reference())
            .input(ArgDef::fixed("pred", DataType::Bool))
            .output(ArgDef::typed("output_false", "T").reference())
            .output(ArgDef::typed("output_true", "T").reference())
            .attr(type_attr("T"))
            .summary("Forwards the ref tensor `data` to the output port determined by `pred`."),
    ]
}

fn string_ops() -> Vec<OpDef> {
    let printable = vec![
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Complex64,
        DataType::Float,
        DataType::Double,
        DataType::Bool,
    ];
    vec![
        OpDef::new("AsString")
            .input(ArgDef::typed("input", "T"))
            .output(ArgDef::fixed("output", DataType::String))
            .attr(type_attr("T").allowed_types(printable))
            .attr(AttrDef::new("precision", AttrType::Int).default_value(-1i64))
            .attr(AttrDef::new("scientific", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("shortest", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("width", AttrType::Int).default_value(-1i64))
            .attr(AttrDef::new("fill", AttrType::String).default_value(""))
            .summary("Converts each entry in the given tensor to strings."),
        OpDef::new("ReduceJoin")
            .input(ArgDef::fixed("inputs", DataType::String))
            .input(ArgDef::fixed("reduction_indices", DataType::Int32))
            .output(ArgDef::fixed("output", DataType::String))
            .attr(AttrDef::new("keep_dims", AttrType::Bool).default_value(false))
            .attr(AttrDef::new("separator", AttrType::String).default_value(""))
            .summary("Joins a string tensor across the given dimensions."),
        OpDef::new("StringJoin")
            .input(ArgDef::fixed_list("inputs", DataType::String, "N"))
            .output(ArgDef::fixed("output", DataType::String))
            .attr(AttrDef::new("N", AttrType::Int).minimum(1))
            .attr(AttrDef::new("separator", AttrType::String).default_value(""))
            .summary("Joins the strings in the given list of string tensors into one tensor."),
        OpDef::new("StringSplit")
            .input(ArgDef::fixed("input", DataType::String))
            .input(ArgDef::fixed("delimiter", DataType::String))
            .output(ArgDef::fixed("indices", DataType::Int64))
            .output(ArgDef::fixed("values", DataType::String))
            .output(ArgDef::fixed("shape", DataType::Int64))
            .attr(AttrDef::new("skip_empty", AttrType::Bool).default_value(true))
            .summary("Split elements of `input` based on `delimiter` into a SparseTensor."),
        OpDef::new("StringToHashBucketStrong")
            .input(ArgDef::fixed("input", DataType::String))
            .output(ArgDef::fixed("output", DataType::Int64))
            .attr(AttrDef::new("num_buckets", AttrType::Int).minimum(1))
            .attr(AttrDef::new("key", AttrType::IntList).minimum(2))
            .summary("Converts each string in the input tensor to its hash mod by a number of buckets."),
        OpDef::new("Substr")
            .input(ArgDef::fixed("input", DataType::String))
            .input(ArgDef::typed("pos", "T"))
            .input(ArgDef::typed("len", "T"))
            .output(ArgDef::fixed("output", DataType::String))
            .attr(type_attr("T").allowed_types(index_types()))
            .summary("Return substrings from a tensor of strings."),
    ]
}

fn random_ops() -> Vec<OpDef> {
    let sampled = vec![DataType::Half, DataType::Float, DataType::Double];
    let mut poisson = sampled.clone();
    poisson.extend(index_types());
    vec![
        seed_attrs(OpDef::new("RandomShuffle"))
            .input(ArgDef::typed("value", "T"))
            .output(ArgDef::typed("output", "T"))
            .attr(type_attr("T"))
            .summary("Randomly shuffles a tensor along its first dimension."),
        seed_attrs(OpDef::new("ParameterizedTruncatedNormal"))
            .input(ArgDef::typed("shape", "T"))
            .input(ArgDef::typed("means", "dtype"))
            .input(ArgDef::typed("stdevs", "dtype"))
            .input(ArgDef::typed("minvals", "dtype"))
            .input(ArgDef::typed("maxvals", "dtype"))
            .output(ArgDef::typed("output", "dtype"))
            .attr(type_attr("dtype").allowed_types(sampled))
            .attr(type_attr("T").allowed_types(index_types()))
            .summary("Outputs random values from a truncated normal distribution."),
        seed_attrs(OpDef::new("RandomPoissonV2"))
            .input(ArgDef::typed("shape", "S"))
            .input(ArgDef::typed("rate", "R"))
            .output(ArgDef::typed("output", "dtype"))
            .attr(type_attr("S").allowed_types(index_types()))
            .attr(
                type_attr("R")
                    .default_value(DataType::Double)
                    .allowed_types(poisson.clone()),
            )
            .attr(
                type_attr("dtype")
                    .default_value(DataType::Int64)
                    .allowed_types(poisson),
            )
            .summary("Outputs random values from the Poisson distribution(s) described by rate."),
    ]
}
