//! Element type tags for typed outputs.
//!
//! A tag ties a Rust type to the engine's [`DataType`]. Types without a native
//! Rust counterpart (quantized integers, half floats, resource handles) are
//! represented by zero-sized markers.

use crate::graph::DataType;

/// Rust-side tag for an engine element type.
pub trait TensorType: 'static {
    const DATA_TYPE: DataType;
}

/// Element types that can be written into a [`crate::graph::Tensor`].
pub trait TensorValue: TensorType + Copy {
    fn write_le(&self, out: &mut Vec<u8>);
}

macro_rules! numeric_tensor_type {
    ($($ty:ty => $dt:expr),* $(,)?) => {
        $(
            impl TensorType for $ty {
                const DATA_TYPE: DataType = $dt;
            }

            impl TensorValue for $ty {
                fn write_le(&self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

numeric_tensor_type! {
    f32 => DataType::Float,
    f64 => DataType::Double,
    i8 => DataType::Int8,
    i16 => DataType::Int16,
    i32 => DataType::Int32,
    i64 => DataType::Int64,
    u8 => DataType::Uint8,
    u16 => DataType::Uint16,
    u32 => DataType::Uint32,
    u64 => DataType::Uint64,
}

impl TensorType for bool {
    const DATA_TYPE: DataType = DataType::Bool;
}

impl TensorValue for bool {
    fn write_le(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

impl TensorType for String {
    const DATA_TYPE: DataType = DataType::String;
}

macro_rules! marker_tensor_type {
    ($($(#[$meta:meta])* $name:ident => $dt:expr),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $name;

            impl TensorType for $name {
                const DATA_TYPE: DataType = $dt;
            }
        )*
    };
}

marker_tensor_type! {
    /// Quantized signed 8-bit integer.
    QInt8 => DataType::Qint8,
    /// Quantized unsigned 8-bit integer.
    QUInt8 => DataType::Quint8,
    /// Quantized signed 16-bit integer.
    QInt16 => DataType::Qint16,
    /// Quantized unsigned 16-bit integer.
    QUInt16 => DataType::Quint16,
    /// Quantized signed 32-bit integer.
    QInt32 => DataType::Qint32,
    /// IEEE half precision float.
    Half => DataType::Half,
    BFloat16 => DataType::Bfloat16,
    /// Handle to a stateful engine resource such as a queue or a stack.
    Resource => DataType::Resource,
}

/// Tag for outputs whose element type is only known at graph construction
/// time (e.g. members of `IdentityN` or queue component lists).
///
/// It deliberately does not implement [`TensorType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Untyped;
