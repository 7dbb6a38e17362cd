use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;
use crate::types::TensorType;

#[derive(Debug, Clone, Default)]
pub struct DecodePngOptions {
    channels: Option<i64>,
}

impl DecodePngOptions {
    /// Number of color channels; `0` keeps what the image has.
    pub fn channels(mut self, channels: i64) -> Self {
        self.channels = Some(channels);
        self
    }
}

/// Decodes a PNG image into a `u8` or `u16` tensor.
#[derive(Debug, Clone)]
pub struct DecodePng<T> {
    operation: Operation,
    image: Output<T>,
}

impl<T: TensorType> DecodePng<T> {
    pub fn new(
        scope: &Scope<'_>,
        contents: &impl Operand<String>,
        options: DecodePngOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("DecodePng")
            .input(contents)
            .attr("dtype", T::DATA_TYPE)
            .attr_opt("channels", options.channels)
            .build(scope)?;
        let image = operation.output(0)?;
        Ok(Self { operation, image })
    }

    pub fn image(&self) -> &Output<T> {
        &self.image
    }
}

impl_op!([T] DecodePng<T>, image: T);

#[derive(Debug, Clone, Default)]
pub struct EncodeJpegOptions {
    format: Option<String>,
    quality: Option<i64>,
    progressive: Option<bool>,
    optimize_size: Option<bool>,
    chroma_downsampling: Option<bool>,
    density_unit: Option<String>,
    x_density: Option<i64>,
    y_density: Option<i64>,
    xmp_metadata: Option<String>,
}

impl EncodeJpegOptions {
    /// `""`, `"grayscale"` or `"rgb"`.
    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn quality(mut self, quality: i64) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn progressive(mut self, progressive: bool) -> Self {
        self.progressive = Some(progressive);
        self
    }

    pub fn optimize_size(mut self, optimize_size: bool) -> Self {
        self.optimize_size = Some(optimize_size);
        self
    }

    pub fn chroma_downsampling(mut self, chroma_downsampling: bool) -> Self {
        self.chroma_downsampling = Some(chroma_downsampling);
        self
    }

    /// `"in"` or `"cm"`.
    pub fn density_unit(mut self, density_unit: &str) -> Self {
        self.density_unit = Some(density_unit.to_string());
        self
    }

    pub fn x_density(mut self, x_density: i64) -> Self {
        self.x_density = Some(x_density);
        self
    }

    pub fn y_density(mut self, y_density: i64) -> Self {
        self.y_density = Some(y_density);
        self
    }

    pub fn xmp_metadata(mut self, xmp_metadata: &str) -> Self {
        self.xmp_metadata = Some(xmp_metadata.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct EncodeJpeg {
    operation: Operation,
    contents: Output<String>,
}

impl EncodeJpeg {
    pub fn new(
        scope: &Scope<'_>,
        image: &impl Operand<u8>,
        options: EncodeJpegOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("EncodeJpeg")
            .input(image)
            .attr_opt("format", options.format)
            .attr_opt("quality", options.quality)
            .attr_opt("progressive", options.progressive)
            .attr_opt("optimize_size", options.optimize_size)
            .attr_opt("chroma_downsampling", options.chroma_downsampling)
            .attr_opt("density_unit", options.density_unit)
            .attr_opt("x_density", options.x_density)
            .attr_opt("y_density", options.y_density)
            .attr_opt("xmp_metadata", options.xmp_metadata)
            .build(scope)?;
        let contents = operation.output(0)?;
        Ok(Self {
            operation,
            contents,
        })
    }

    pub fn contents(&self) -> &Output<String> {
        &self.contents
    }
}

impl_op!([] EncodeJpeg, contents: String);

#[derive(Debug, Clone, Default)]
pub struct ResizeBicubicOptions {
    align_corners: Option<bool>,
}

impl ResizeBicubicOptions {
    pub fn align_corners(mut self, align_corners: bool) -> Self {
        self.align_corners = Some(align_corners);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ResizeBicubic {
    operation: Operation,
    resized_images: Output<f32>,
}

impl ResizeBicubic {
    pub fn new<T>(
        scope: &Scope<'_>,
        images: &impl Operand<T>,
        size: &impl Operand<i32>,
        options: ResizeBicubicOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("ResizeBicubic")
            .input(images)
            .input(size)
            .attr_opt("align_corners", options.align_corners)
            .build(scope)?;
        let resized_images = operation.output(0)?;
        Ok(Self {
            operation,
            resized_images,
        })
    }

    pub fn resized_images(&self) -> &Output<f32> {
        &self.resized_images
    }
}

impl_op!([] ResizeBicubic, resized_images: f32);

#[derive(Debug, Clone, Default)]
pub struct CropAndResizeOptions {
    method: Option<String>,
    extrapolation_value: Option<f32>,
}

impl CropAndResizeOptions {
    /// `"bilinear"` or `"nearest"`.
    pub fn method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn extrapolation_value(mut self, value: f32) -> Self {
        self.extrapolation_value = Some(value);
        self
    }
}

/// Crops boxes out of a batch of images and resizes them to `crop_size`.
#[derive(Debug, Clone)]
pub struct CropAndResize {
    operation: Operation,
    crops: Output<f32>,
}

impl CropAndResize {
    pub fn new<T>(
        scope: &Scope<'_>,
        image: &impl Operand<T>,
        boxes: &impl Operand<f32>,
        box_ind: &impl Operand<i32>,
        crop_size: &impl Operand<i32>,
        options: CropAndResizeOptions,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("CropAndResize")
            .input(image)
            .input(boxes)
            .input(box_ind)
            .input(crop_size)
            .attr_opt("method", options.method)
            .attr_opt("extrapolation_value", options.extrapolation_value)
            .build(scope)?;
        let crops = operation.output(0)?;
        Ok(Self { operation, crops })
    }

    pub fn crops(&self) -> &Output<f32> {
        &self.crops
    }
}

impl_op!([] CropAndResize, crops: f32);

#[derive(Debug, Clone)]
pub struct NonMaxSuppressionV2 {
    operation: Operation,
    selected_indices: Output<i32>,
}

impl NonMaxSuppressionV2 {
    pub fn new(
        scope: &Scope<'_>,
        boxes: &impl Operand<f32>,
        scores: &impl Operand<f32>,
        max_output_size: &impl Operand<i32>,
        iou_threshold: &impl Operand<f32>,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("NonMaxSuppressionV2")
            .input(boxes)
            .input(scores)
            .input(max_output_size)
            .input(iou_threshold)
            .build(scope)?;
        let selected_indices = operation.output(0)?;
        Ok(Self {
            operation,
            selected_indices,
        })
    }

    pub fn selected_indices(&self) -> &Output<i32> {
        &self.selected_indices
    }
}

impl_op!([] NonMaxSuppressionV2, selected_indices: i32);

#[derive(Debug, Clone, Default)]
pub struct SampleDistortedBoundingBoxV2Options {
    seed: Option<i64>,
    seed2: Option<i64>,
    aspect_ratio_range: Option<Vec<f32>>,
    area_range: Option<Vec<f32>>,
    max_attempts: Option<i64>,
    use_image_if_no_bounding_boxes: Option<bool>,
}

impl SampleDistortedBoundingBoxV2Options {
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seed2(mut self, seed2: i64) -> Self {
        self.seed2 = Some(seed2);
        self
    }

    pub fn aspect_ratio_range(mut self, range: &[f32]) -> Self {
        self.aspect_ratio_range = Some(range.to_vec());
        self
    }

    pub fn area_range(mut self, range: &[f32]) -> Self {
        self.area_range = Some(range.to_vec());
        self
    }

    pub fn max_attempts(mut self, max_attempts: i64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn use_image_if_no_bounding_boxes(mut self, use_image: bool) -> Self {
        self.use_image_if_no_bounding_boxes = Some(use_image);
        self
    }
}

/// Random crop window for data augmentation.
#[derive(Debug, Clone)]
pub struct SampleDistortedBoundingBoxV2<T> {
    operation: Operation,
    begin: Output<T>,
    size: Output<T>,
    bboxes: Output<f32>,
}

impl<T> SampleDistortedBoundingBoxV2<T> {
    pub fn new(
        scope: &Scope<'_>,
        image_size: &impl Operand<T>,
        bounding_boxes: &impl Operand<f32>,
        min_object_covered: &impl Operand<f32>,
        options: SampleDistortedBoundingBoxV2Options,
    ) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("SampleDistortedBoundingBoxV2")
            .input(image_size)
            .input(bounding_boxes)
            .input(min_object_covered)
            .attr_opt("seed", options.seed)
            .attr_opt("seed2", options.seed2)
            .attr_opt("aspect_ratio_range", options.aspect_ratio_range)
            .attr_opt("area_range", options.area_range)
            .attr_opt("max_attempts", options.max_attempts)
            .attr_opt(
                "use_image_if_no_bounding_boxes",
                options.use_image_if_no_bounding_boxes,
            )
            .build(scope)?;
        let begin = operation.output(0)?;
        let size = operation.output(1)?;
        let bboxes = operation.output(2)?;
        Ok(Self {
            operation,
            begin,
            size,
            bboxes,
        })
    }

    pub fn begin(&self) -> &Output<T> {
        &self.begin
    }

    pub fn size(&self) -> &Output<T> {
        &self.size
    }

    pub fn bboxes(&self) -> &Output<f32> {
        &self.bboxes
    }
}

impl_op!([T] SampleDistortedBoundingBoxV2<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Graph;
    use crate::graph::{AttrValue, DataType};
    use crate::ops::core::Constant;
    use crate::ops::test_util::placeholder;

    #[test]
    fn decode_then_encode() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let contents = placeholder::<String>(&scope);
        let image = DecodePng::<u8>::new(&scope, &contents, DecodePngOptions::default().channels(3))
            .unwrap();
        let jpeg = EncodeJpeg::new(&scope, &image, EncodeJpegOptions::default().quality(80))
            .unwrap();

        assert_eq!(image.image().data_type(), DataType::Uint8);
        assert_eq!(jpeg.contents().data_type(), DataType::String);
        let node = graph.node_def("EncodeJpeg").unwrap();
        assert_eq!(node.attr("quality"), Some(&AttrValue::Int(80)));
        assert_eq!(node.attrs.len(), 1);
    }

    #[test]
    fn decode_png_rejects_float_output() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let contents = placeholder::<String>(&scope);
        let err = DecodePng::<f32>::new(&scope, &contents, DecodePngOptions::default())
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidAttrValue { attr, .. } if attr == "dtype"));
    }

    #[test]
    fn resize_and_crop_produce_floats() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let images = placeholder::<u8>(&scope);
        let size = Constant::vector(&scope, &[64i32, 64]).unwrap();
        let resized = ResizeBicubic::new(&scope, &images, &size, Default::default()).unwrap();
        assert_eq!(resized.resized_images().data_type(), DataType::Float);

        let boxes = placeholder::<f32>(&scope);
        let box_ind = placeholder::<i32>(&scope);
        let crops = CropAndResize::new(
            &scope,
            &images,
            &boxes,
            &box_ind,
            &size,
            CropAndResizeOptions::default().method("nearest"),
        )
        .unwrap();
        assert_eq!(crops.crops().data_type(), DataType::Float);
        assert_eq!(
            graph.node_def("CropAndResize").unwrap().attr("method"),
            Some(&AttrValue::String("nearest".into()))
        );
    }

    #[test]
    fn box_selection_ops() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let boxes = placeholder::<f32>(&scope);
        let scores = placeholder::<f32>(&scope);
        let max_out = Constant::scalar(&scope, 10i32).unwrap();
        let iou = Constant::scalar(&scope, 0.5f32).unwrap();
        let nms = NonMaxSuppressionV2::new(&scope, &boxes, &scores, &max_out, &iou).unwrap();
        assert_eq!(nms.selected_indices().data_type(), DataType::Int32);

        let image_size = Constant::vector(&scope, &[480i32, 640, 3]).unwrap();
        let sample = SampleDistortedBoundingBoxV2::new(
            &scope,
            &image_size,
            &boxes,
            &iou,
            SampleDistortedBoundingBoxV2Options::default().area_range(&[0.1, 1.0]),
        )
        .unwrap();
        assert_eq!(sample.begin().data_type(), DataType::Int32);
        assert_eq!(sample.size().index(), 1);
        assert_eq!(sample.bboxes().data_type(), DataType::Float);
        let node = graph.node_def("SampleDistortedBoundingBoxV2").unwrap();
        assert_eq!(node.attr("area_range"), Some(&AttrValue::FloatList(vec![0.1, 1.0])));
        assert!(node.attr("seed").is_none());
    }
}
