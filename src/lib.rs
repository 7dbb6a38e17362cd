//! Typed operation builders over a computation-graph construction backend.
//!
//! A [`Scope`] wraps an [`ExecutionEnvironment`] and hands out unique
//! operation names. Each wrapper in [`ops`] describes its node with an
//! [`OpDescriptor`] and the backend checks it against the [`OpRegistry`].

pub mod backend;
pub mod converters;
pub mod descriptor;
pub mod environment;
pub mod error;
pub mod graph;
pub mod graphviz;
pub mod loader;
pub mod operation;
pub mod ops;
pub mod protos;
pub mod registry;
pub mod scope;
pub mod types;
pub mod validator;

pub use backend::Graph;
pub use converters::{ConvertedGraph, ConverterRegistry, GraphConverter};
pub use descriptor::OpDescriptor;
pub use environment::{ExecutionEnvironment, OperationBuilder};
pub use error::GraphError;
pub use graph::{AttrType, AttrValue, DataType, GraphDef, NodeDef, NodeInput, Shape, Tensor};
pub use graphviz::graph_to_dot;
pub use loader::{load_graph_from_path, load_op_defs_from_path, registry_with_op_defs};
pub use operation::{Endpoint, Operand, Operation, Output, PrimitiveOp};
pub use registry::{ArgDef, AttrDef, OpDef, OpRegistry};
pub use scope::Scope;
pub use types::{TensorType, Untyped};
pub use validator::{GraphValidator, ValidationArtifacts};
