use std::path::PathBuf;

use crate::graph::{AttrType, DataType};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("graph JSON could not be parsed: {source}")]
    Parse {
        #[from]
        source: JsonError,
    },
    #[error("graph declares no operations")]
    EmptyGraph,
    #[error("`{name}` is not a valid operation or scope name")]
    InvalidName { name: String },
    #[error("operation name `{name}` is already used in this graph")]
    DuplicateOperationName { name: String },
    #[error("operation type `{op_type}` is not registered")]
    UnknownOperation { op_type: String },
    #[error("operation type `{op_type}` is already registered")]
    DuplicateOpDef { op_type: String },
    #[error("operation `{operation}` expects {expected} inputs, got {actual}")]
    InputCountMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },
    #[error("input `{arg}` of `{operation}` has the wrong arity (list expected: {expects_list})")]
    InputKindMismatch {
        operation: String,
        arg: String,
        expects_list: bool,
    },
    #[error("input `{arg}` of `{operation}` expects {expected}, got {actual}")]
    InputTypeMismatch {
        operation: String,
        arg: String,
        expected: DataType,
        actual: DataType,
    },
    #[error("input `{arg}` of `{operation}` needs a reference, `{operand}` is a value")]
    RefInputRequired {
        operation: String,
        arg: String,
        operand: String,
    },
    #[error("operand `{operand}` used by `{operation}` belongs to another graph")]
    ForeignOperand { operation: String, operand: String },
    #[error("operation `{operation}` has no attribute `{attr}`")]
    UnknownAttribute { operation: String, attr: String },
    #[error("attribute `{attr}` of `{operation}` expects {expected}, got {actual}")]
    AttrTypeMismatch {
        operation: String,
        attr: String,
        expected: AttrType,
        actual: AttrType,
    },
    #[error("operation `{operation}` requires attribute `{attr}`")]
    MissingAttribute { operation: String, attr: String },
    #[error("attribute `{attr}` of `{operation}` is invalid: {reason}")]
    InvalidAttrValue {
        operation: String,
        attr: String,
        reason: String,
    },
    #[error("operation `{operation}` has {count} outputs, index {index} is out of range")]
    InvalidOutputIndex {
        operation: String,
        index: usize,
        count: usize,
    },
    #[error("operation `{operation}` has no argument list named `{name}`")]
    UnknownArgument { operation: String, name: String },
    #[error("reference `{operand}` used by `{operation}` is invalid")]
    InvalidOperandReference { operation: String, operand: String },
    #[error("operation `{operation}` consumes `{operand}` before it is produced")]
    OperandNotReady { operation: String, operand: String },
    #[error("tensor is invalid: {reason}")]
    InvalidTensor { reason: String },
    #[error("graph converter `{requested}` is not available. Supported: {available:?}")]
    UnknownConverter {
        requested: String,
        available: Vec<&'static str>,
    },
    #[error("graph conversion failed for {format}: {reason}")]
    ConversionFailed { format: String, reason: String },
    #[error("graph could not be exported to {path}: {source}")]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn export(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::ExportIo {
            path: path.into(),
            source,
        }
    }
}
