use prost::Message;

use crate::converters::{ConvertedGraph, GraphConverter};
use crate::error::GraphError;
use crate::graph::{AttrValue, DataType, GraphDef, NodeDef, Shape, Tensor, parse_control_ref};
use crate::protos::tensorflow as proto;
use crate::protos::tensorflow::attr_value::{ListValue, Value};

/// Binary TensorFlow `GraphDef`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PbConverter;

impl GraphConverter for PbConverter {
    fn format(&self) -> &'static str {
        "pb"
    }

    fn convert(&self, graph: &GraphDef) -> Result<ConvertedGraph, GraphError> {
        let graph = graph_def_to_proto(graph)?;
        Ok(ConvertedGraph {
            format: "pb",
            content_type: "application/x-protobuf",
            data: graph.encode_to_vec(),
        })
    }
}

pub fn graph_def_to_proto(graph: &GraphDef) -> Result<proto::GraphDef, GraphError> {
    let node = graph
        .nodes
        .iter()
        .map(node_to_proto)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(proto::GraphDef {
        node,
        versions: Some(proto::VersionDef {
            producer: graph.version as i32,
            ..Default::default()
        }),
        ..Default::default()
    })
}

fn node_to_proto(node: &NodeDef) -> Result<proto::NodeDef, GraphError> {
    let mut input: Vec<String> = node.data_references().cloned().collect();
    for reference in &node.control_inputs {
        let name = parse_control_ref(reference).ok_or_else(|| GraphError::InvalidOperandReference {
            operation: node.name.clone(),
            operand: reference.clone(),
        })?;
        input.push(format!("^{}", name));
    }
    let attr = node
        .attrs
        .iter()
        .map(|(key, value)| Ok((key.clone(), attr_to_proto(value)?)))
        .collect::<Result<_, GraphError>>()?;
    Ok(proto::NodeDef {
        name: node.name.clone(),
        op: node.op.clone(),
        input,
        device: node.device.clone().unwrap_or_default(),
        attr,
    })
}

fn attr_to_proto(value: &AttrValue) -> Result<proto::AttrValue, GraphError> {
    let value = match value {
        AttrValue::String(s) => Value::S(s.clone().into_bytes()),
        AttrValue::Bytes(bytes) => Value::S(bytes.clone()),
        AttrValue::Int(i) => Value::I(*i),
        AttrValue::Float(f) => Value::F(*f),
        AttrValue::Bool(b) => Value::B(*b),
        AttrValue::Type(dtype) => Value::Type(dtype.code()),
        AttrValue::Shape(shape) => Value::Shape(shape_to_proto(shape)),
        AttrValue::Tensor(tensor) => Value::Tensor(tensor_to_proto(tensor)?),
        AttrValue::StringList(values) => Value::List(ListValue {
            s: values.iter().map(|s| s.clone().into_bytes()).collect(),
            ..Default::default()
        }),
        AttrValue::IntList(values) => Value::List(ListValue {
            i: values.clone(),
            ..Default::default()
        }),
        AttrValue::FloatList(values) => Value::List(ListValue {
            f: values.clone(),
            ..Default::default()
        }),
        AttrValue::BoolList(values) => Value::List(ListValue {
            b: values.clone(),
            ..Default::default()
        }),
        AttrValue::TypeList(values) => Value::List(ListValue {
            r#type: values.iter().map(|dtype| dtype.code()).collect(),
            ..Default::default()
        }),
        AttrValue::ShapeList(values) => Value::List(ListValue {
            shape: values.iter().map(shape_to_proto).collect(),
            ..Default::default()
        }),
        AttrValue::TensorList(values) => Value::List(ListValue {
            tensor: values.iter().map(tensor_to_proto).collect::<Result<_, _>>()?,
            ..Default::default()
        }),
    };
    Ok(proto::AttrValue { value: Some(value) })
}

fn shape_to_proto(shape: &Shape) -> proto::TensorShapeProto {
    match shape.dims() {
        None => proto::TensorShapeProto {
            unknown_rank: true,
            ..Default::default()
        },
        Some(dims) => proto::TensorShapeProto {
            dim: dims
                .iter()
                .map(|&size| proto::tensor_shape_proto::Dim {
                    size,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        },
    }
}

/// String tensors go to `string_val`; everything else keeps its raw bytes.
fn tensor_to_proto(tensor: &Tensor) -> Result<proto::TensorProto, GraphError> {
    let mut message = proto::TensorProto {
        dtype: tensor.data_type.code(),
        tensor_shape: Some(shape_to_proto(&Shape::make(&tensor.shape))),
        ..Default::default()
    };
    if tensor.data_type == DataType::String {
        message.string_val = tensor
            .string_elements()?
            .into_iter()
            .map(<[u8]>::to_vec)
            .collect();
    } else {
        message.tensor_content = tensor.content.clone();
    }
    Ok(message)
}
