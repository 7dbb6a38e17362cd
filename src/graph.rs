use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use crate::error::GraphError;
use crate::types::TensorValue;

/// Element types understood by the graph engine.
///
/// Discriminants match the engine's wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Float = 1,
    Double = 2,
    Int32 = 3,
    Uint8 = 4,
    Int16 = 5,
    Int8 = 6,
    String = 7,
    Complex64 = 8,
    Int64 = 9,
    Bool = 10,
    Qint8 = 11,
    Quint8 = 12,
    Qint32 = 13,
    Bfloat16 = 14,
    Qint16 = 15,
    Quint16 = 16,
    Uint16 = 17,
    Complex128 = 18,
    Half = 19,
    Resource = 20,
    Variant = 21,
    Uint32 = 22,
    Uint64 = 23,
}

impl DataType {
    const ALL: [DataType; 23] = [
        DataType::Float,
        DataType::Double,
        DataType::Int32,
        DataType::Uint8,
        DataType::Int16,
        DataType::Int8,
        DataType::String,
        DataType::Complex64,
        DataType::Int64,
        DataType::Bool,
        DataType::Qint8,
        DataType::Quint8,
        DataType::Qint32,
        DataType::Bfloat16,
        DataType::Qint16,
        DataType::Quint16,
        DataType::Uint16,
        DataType::Complex128,
        DataType::Half,
        DataType::Resource,
        DataType::Variant,
        DataType::Uint32,
        DataType::Uint64,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|dt| dt.code() == code)
    }

    /// Size in bytes of one element, or `None` for variable-width types.
    pub fn byte_size(self) -> Option<usize> {
        match self {
            DataType::Bool | DataType::Int8 | DataType::Uint8 => Some(1),
            DataType::Qint8 | DataType::Quint8 => Some(1),
            DataType::Int16 | DataType::Uint16 | DataType::Qint16 | DataType::Quint16 => Some(2),
            DataType::Half | DataType::Bfloat16 => Some(2),
            DataType::Float | DataType::Int32 | DataType::Uint32 | DataType::Qint32 => Some(4),
            DataType::Double | DataType::Int64 | DataType::Uint64 => Some(8),
            DataType::Complex64 => Some(8),
            DataType::Complex128 => Some(16),
            DataType::String | DataType::Resource | DataType::Variant => None,
        }
    }

    /// Name used by the text graph format, e.g. `DT_FLOAT`.
    pub fn proto_name(self) -> &'static str {
        match self {
            DataType::Float => "DT_FLOAT",
            DataType::Double => "DT_DOUBLE",
            DataType::Int32 => "DT_INT32",
            DataType::Uint8 => "DT_UINT8",
            DataType::Int16 => "DT_INT16",
            DataType::Int8 => "DT_INT8",
            DataType::String => "DT_STRING",
            DataType::Complex64 => "DT_COMPLEX64",
            DataType::Int64 => "DT_INT64",
            DataType::Bool => "DT_BOOL",
            DataType::Qint8 => "DT_QINT8",
            DataType::Quint8 => "DT_QUINT8",
            DataType::Qint32 => "DT_QINT32",
            DataType::Bfloat16 => "DT_BFLOAT16",
            DataType::Qint16 => "DT_QINT16",
            DataType::Quint16 => "DT_QUINT16",
            DataType::Uint16 => "DT_UINT16",
            DataType::Complex128 => "DT_COMPLEX128",
            DataType::Half => "DT_HALF",
            DataType::Resource => "DT_RESOURCE",
            DataType::Variant => "DT_VARIANT",
            DataType::Uint32 => "DT_UINT32",
            DataType::Uint64 => "DT_UINT64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proto_name())
    }
}

/// Static shape of a tensor. `None` means the rank itself is unknown and a
/// dimension of `-1` is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape {
    dims: Option<Vec<i64>>,
}

impl Shape {
    pub fn unknown() -> Self {
        Self { dims: None }
    }

    pub fn scalar() -> Self {
        Self {
            dims: Some(Vec::new()),
        }
    }

    pub fn make(dims: &[i64]) -> Self {
        Self {
            dims: Some(dims.to_vec()),
        }
    }

    /// Rank of the shape, `-1` when unknown.
    pub fn num_dimensions(&self) -> i32 {
        self.dims.as_ref().map_or(-1, |dims| dims.len() as i32)
    }

    pub fn size(&self, index: usize) -> Option<i64> {
        self.dims.as_ref()?.get(index).copied()
    }

    pub fn dims(&self) -> Option<&[i64]> {
        self.dims.as_deref()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dims {
            None => f.write_str("<unknown>"),
            Some(dims) => {
                let parts: Vec<String> = dims
                    .iter()
                    .map(|d| if *d < 0 { "?".to_string() } else { d.to_string() })
                    .collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Dense tensor value carried by attributes such as `Const.value`.
///
/// Numeric content is stored little-endian. String tensors store each element
/// behind a varint length prefix.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tensor {
    pub data_type: DataType,
    #[serde(default)]
    pub shape: Vec<i64>,
    #[serde_as(as = "Base64")]
    pub content: Vec<u8>,
}

impl Tensor {
    pub fn new(data_type: DataType, shape: Vec<i64>, content: Vec<u8>) -> Result<Self, GraphError> {
        let tensor = Self {
            data_type,
            shape,
            content,
        };
        tensor.check_content()?;
        Ok(tensor)
    }

    pub fn scalar<T: TensorValue>(value: T) -> Self {
        let mut content = Vec::new();
        value.write_le(&mut content);
        Self {
            data_type: T::DATA_TYPE,
            shape: Vec::new(),
            content,
        }
    }

    pub fn from_slice<T: TensorValue>(shape: &[i64], values: &[T]) -> Result<Self, GraphError> {
        let mut content = Vec::with_capacity(values.len() * T::DATA_TYPE.byte_size().unwrap_or(1));
        for value in values {
            value.write_le(&mut content);
        }
        Self::new(T::DATA_TYPE, shape.to_vec(), content)
    }

    pub fn from_strings<S: AsRef<[u8]>>(shape: &[i64], values: &[S]) -> Result<Self, GraphError> {
        let expected = element_count(shape).ok_or_else(|| GraphError::InvalidTensor {
            reason: format!("shape {:?} has no valid element count", shape),
        })?;
        if expected != values.len() {
            return Err(GraphError::InvalidTensor {
                reason: format!(
                    "shape {:?} holds {} elements but {} strings were given",
                    shape,
                    expected,
                    values.len()
                ),
            });
        }
        let mut content = Vec::new();
        for value in values {
            let bytes = value.as_ref();
            write_varint(bytes.len() as u64, &mut content);
            content.extend_from_slice(bytes);
        }
        Ok(Self {
            data_type: DataType::String,
            shape: shape.to_vec(),
            content,
        })
    }

    pub fn element_count(&self) -> Option<usize> {
        element_count(&self.shape)
    }

    /// Decode the elements of a string tensor.
    pub fn string_elements(&self) -> Result<Vec<&[u8]>, GraphError> {
        if self.data_type != DataType::String {
            return Err(GraphError::InvalidTensor {
                reason: format!("{} tensor has no string elements", self.data_type),
            });
        }
        let mut elements = Vec::new();
        let mut rest = self.content.as_slice();
        while !rest.is_empty() {
            let (len, consumed) = read_varint(rest).ok_or_else(|| GraphError::InvalidTensor {
                reason: "truncated string length prefix".to_string(),
            })?;
            rest = &rest[consumed..];
            let len = len as usize;
            if len > rest.len() {
                return Err(GraphError::InvalidTensor {
                    reason: format!("string element of {} bytes overruns content", len),
                });
            }
            elements.push(&rest[..len]);
            rest = &rest[len..];
        }
        Ok(elements)
    }

    pub(crate) fn check_content(&self) -> Result<(), GraphError> {
        let count = self.element_count().ok_or_else(|| GraphError::InvalidTensor {
            reason: format!("shape {:?} has no valid element count", self.shape),
        })?;
        match self.data_type.byte_size() {
            Some(size) => {
                let expected = count.checked_mul(size).ok_or_else(|| GraphError::InvalidTensor {
                    reason: format!("shape {:?} overflows byte length", self.shape),
                })?;
                if expected != self.content.len() {
                    return Err(GraphError::InvalidTensor {
                        reason: format!(
                            "{} tensor of shape {:?} needs {} bytes, got {}",
                            self.data_type,
                            self.shape,
                            expected,
                            self.content.len()
                        ),
                    });
                }
                Ok(())
            }
            None if self.data_type == DataType::String => {
                let actual = self.string_elements()?.len();
                if actual != count {
                    return Err(GraphError::InvalidTensor {
                        reason: format!(
                            "string tensor of shape {:?} holds {} elements, got {}",
                            self.shape, count, actual
                        ),
                    });
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

fn element_count(shape: &[i64]) -> Option<usize> {
    let mut count = 1usize;
    for &dim in shape {
        let dim = usize::try_from(dim).ok()?;
        count = count.checked_mul(dim)?;
    }
    Some(count)
}

fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn read_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (idx, byte) in bytes.iter().enumerate().take(10) {
        value |= u64::from(byte & 0x7f) << (7 * idx);
        if byte & 0x80 == 0 {
            return Some((value, idx + 1));
        }
    }
    None
}

/// Kind of an attribute value, used by operator definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    String,
    StringList,
    Int,
    IntList,
    Float,
    FloatList,
    Bool,
    BoolList,
    Type,
    TypeList,
    Tensor,
    TensorList,
    Shape,
    ShapeList,
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrType::String => "string",
            AttrType::StringList => "list(string)",
            AttrType::Int => "int",
            AttrType::IntList => "list(int)",
            AttrType::Float => "float",
            AttrType::FloatList => "list(float)",
            AttrType::Bool => "bool",
            AttrType::BoolList => "list(bool)",
            AttrType::Type => "type",
            AttrType::TypeList => "list(type)",
            AttrType::Tensor => "tensor",
            AttrType::TensorList => "list(tensor)",
            AttrType::Shape => "shape",
            AttrType::ShapeList => "list(shape)",
        };
        f.write_str(name)
    }
}

/// Typed attribute value, one variant per builder setter.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    String(String),
    Bytes(#[serde_as(as = "Base64")] Vec<u8>),
    StringList(Vec<String>),
    Int(i64),
    IntList(Vec<i64>),
    Float(f32),
    FloatList(Vec<f32>),
    Bool(bool),
    BoolList(Vec<bool>),
    Type(DataType),
    TypeList(Vec<DataType>),
    Tensor(Tensor),
    TensorList(Vec<Tensor>),
    Shape(Shape),
    ShapeList(Vec<Shape>),
}

impl AttrValue {
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrValue::String(_) | AttrValue::Bytes(_) => AttrType::String,
            AttrValue::StringList(_) => AttrType::StringList,
            AttrValue::Int(_) => AttrType::Int,
            AttrValue::IntList(_) => AttrType::IntList,
            AttrValue::Float(_) => AttrType::Float,
            AttrValue::FloatList(_) => AttrType::FloatList,
            AttrValue::Bool(_) => AttrType::Bool,
            AttrValue::BoolList(_) => AttrType::BoolList,
            AttrValue::Type(_) => AttrType::Type,
            AttrValue::TypeList(_) => AttrType::TypeList,
            AttrValue::Tensor(_) => AttrType::Tensor,
            AttrValue::TensorList(_) => AttrType::TensorList,
            AttrValue::Shape(_) => AttrType::Shape,
            AttrValue::ShapeList(_) => AttrType::ShapeList,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<DataType> {
        match self {
            AttrValue::Type(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_type_list(&self) -> Option<&[DataType]> {
        match self {
            AttrValue::TypeList(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttrValue::String(value) => Some(value.as_bytes()),
            AttrValue::Bytes(value) => Some(value),
            _ => None,
        }
    }

    /// Number of entries for list-valued attributes.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            AttrValue::StringList(values) => Some(values.len()),
            AttrValue::IntList(values) => Some(values.len()),
            AttrValue::FloatList(values) => Some(values.len()),
            AttrValue::BoolList(values) => Some(values.len()),
            AttrValue::TypeList(values) => Some(values.len()),
            AttrValue::TensorList(values) => Some(values.len()),
            AttrValue::ShapeList(values) => Some(values.len()),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<&[u8]> for AttrValue {
    fn from(value: &[u8]) -> Self {
        AttrValue::Bytes(value.to_vec())
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::StringList(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(value: Vec<i64>) -> Self {
        AttrValue::IntList(value)
    }
}

impl From<&[i64]> for AttrValue {
    fn from(value: &[i64]) -> Self {
        AttrValue::IntList(value.to_vec())
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Float(value)
    }
}

impl From<Vec<f32>> for AttrValue {
    fn from(value: Vec<f32>) -> Self {
        AttrValue::FloatList(value)
    }
}

impl From<&[f32]> for AttrValue {
    fn from(value: &[f32]) -> Self {
        AttrValue::FloatList(value.to_vec())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Vec<bool>> for AttrValue {
    fn from(value: Vec<bool>) -> Self {
        AttrValue::BoolList(value)
    }
}

impl From<DataType> for AttrValue {
    fn from(value: DataType) -> Self {
        AttrValue::Type(value)
    }
}

impl From<Vec<DataType>> for AttrValue {
    fn from(value: Vec<DataType>) -> Self {
        AttrValue::TypeList(value)
    }
}

impl From<&[DataType]> for AttrValue {
    fn from(value: &[DataType]) -> Self {
        AttrValue::TypeList(value.to_vec())
    }
}

impl From<Tensor> for AttrValue {
    fn from(value: Tensor) -> Self {
        AttrValue::Tensor(value)
    }
}

impl From<Vec<Tensor>> for AttrValue {
    fn from(value: Vec<Tensor>) -> Self {
        AttrValue::TensorList(value)
    }
}

impl From<Shape> for AttrValue {
    fn from(value: Shape) -> Self {
        AttrValue::Shape(value)
    }
}

impl From<Vec<Shape>> for AttrValue {
    fn from(value: Vec<Shape>) -> Self {
        AttrValue::ShapeList(value)
    }
}

/// One positional input of a node: either a single tensor reference or a
/// list of them. References use the `name:index` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeInput {
    Single(String),
    List(Vec<String>),
}

impl NodeInput {
    pub fn references(&self) -> &[String] {
        match self {
            NodeInput::Single(reference) => std::slice::from_ref(reference),
            NodeInput::List(references) => references,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    pub op: String,
    #[serde(default)]
    pub inputs: Vec<NodeInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub control_inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, AttrValue>,
}

impl NodeDef {
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn data_references(&self) -> impl Iterator<Item = &String> {
        self.inputs.iter().flat_map(|input| input.references().iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

impl GraphDef {
    pub fn node(&self, name: &str) -> Option<&NodeDef> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

/// Reference to a data output or to a whole operation (control edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRef<'a> {
    Data { node: &'a str, index: usize },
    Control { node: &'a str },
}

/// Parse `name`, `name:index` or `^name`.
pub fn parse_input_ref(reference: &str) -> Option<InputRef<'_>> {
    if let Some(node) = reference.strip_prefix('^') {
        if node.is_empty() {
            return None;
        }
        return Some(InputRef::Control { node });
    }
    let (node, index) = match reference.rsplit_once(':') {
        Some((node, index)) => (node, index.parse().ok()?),
        None => (reference, 0),
    };
    if node.is_empty() {
        return None;
    }
    Some(InputRef::Data { node, index })
}

/// Parse a control reference: `^name`, or a bare `name` without an output
/// index. Both name a whole operation.
pub fn parse_control_ref(reference: &str) -> Option<&str> {
    match parse_input_ref(reference)? {
        InputRef::Control { node } if !node.contains(':') => Some(node),
        InputRef::Data { node, .. } if !reference.contains(':') => Some(node),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_codes_round_trip() {
        assert_eq!(DataType::Float.code(), 1);
        assert_eq!(DataType::Int64.code(), 9);
        assert_eq!(DataType::from_code(10), Some(DataType::Bool));
        assert_eq!(DataType::from_code(99), None);
        assert_eq!(DataType::Uint64.proto_name(), "DT_UINT64");
    }

    #[test]
    fn shape_reports_unknown_rank() {
        assert_eq!(Shape::unknown().num_dimensions(), -1);
        assert_eq!(Shape::scalar().num_dimensions(), 0);
        let shape = Shape::make(&[2, -1, 3]);
        assert_eq!(shape.num_dimensions(), 3);
        assert_eq!(shape.size(1), Some(-1));
        assert_eq!(shape.to_string(), "[2, ?, 3]");
    }

    #[test]
    fn tensor_checks_content_length() {
        let tensor = Tensor::from_slice(&[2, 2], &[1.0f32, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(tensor.content.len(), 16);
        assert_eq!(tensor.data_type, DataType::Float);

        let err = Tensor::from_slice(&[3], &[1i64, 2]).unwrap_err();
        assert!(matches!(err, GraphError::InvalidTensor { .. }));
    }

    #[test]
    fn string_tensor_elements_are_length_prefixed() {
        let long = "x".repeat(200);
        let tensor = Tensor::from_strings(&[2], &["png", long.as_str()]).unwrap();
        let elements = tensor.string_elements().unwrap();
        assert_eq!(elements, vec![b"png".as_slice(), long.as_bytes()]);
        assert!(Tensor::from_strings(&[3], &["a"]).is_err());
    }

    #[test]
    fn attr_value_serializes_with_kind_tag() {
        let value = AttrValue::IntList(vec![1, 2, 2, 1]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "int_list", "value": [1, 2, 2, 1]}));

        let bytes: AttrValue =
            serde_json::from_value(serde_json::json!({"kind": "bytes", "value": "AQID"})).unwrap();
        assert_eq!(bytes, AttrValue::Bytes(vec![1, 2, 3]));
        assert_eq!(bytes.attr_type(), AttrType::String);
    }

    #[test]
    fn node_inputs_keep_list_boundaries() {
        let json = serde_json::json!({
            "name": "concat",
            "op": "Concat",
            "inputs": ["dim:0", ["a:0", "b:0"]],
        });
        let node: NodeDef = serde_json::from_value(json).unwrap();
        assert_eq!(node.inputs.len(), 2);
        assert_eq!(node.inputs[1], NodeInput::List(vec!["a:0".into(), "b:0".into()]));
        assert_eq!(node.data_references().count(), 3);
    }

    #[test]
    fn parses_input_references() {
        assert_eq!(
            parse_input_ref("scope/op:2"),
            Some(InputRef::Data {
                node: "scope/op",
                index: 2
            })
        );
        assert_eq!(
            parse_input_ref("op"),
            Some(InputRef::Data { node: "op", index: 0 })
        );
        assert_eq!(parse_input_ref("^init"), Some(InputRef::Control { node: "init" }));
        assert_eq!(parse_input_ref("op:x"), None);
        assert_eq!(parse_input_ref("^"), None);
    }
}
