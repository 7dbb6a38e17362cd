//! Typed operator wrappers.
//!
//! Each wrapper fills an [`OpDescriptor`](crate::descriptor::OpDescriptor),
//! builds it in the given scope and keeps typed handles to the node's
//! outputs. Optional attributes live in a per-operator `...Options` value
//! whose fields start unset; unset fields are never written to the node.

/// Implements [`PrimitiveOp`](crate::operation::PrimitiveOp) for a wrapper
/// holding an `operation` field, plus [`Operand`](crate::operation::Operand)
/// for single-output wrappers or `IntoIterator` for single-list wrappers.
macro_rules! impl_op {
    ([$($g:ident),*] $ty:ty) => {
        impl<$($g),*> $crate::operation::PrimitiveOp for $ty {
            fn operation(&self) -> &$crate::operation::Operation {
                &self.operation
            }
        }
    };
    ([$($g:ident),*] $ty:ty, $field:ident: $out:ty) => {
        impl_op!([$($g),*] $ty);

        impl<$($g),*> $crate::operation::Operand<$out> for $ty {
            fn as_output(&self) -> $crate::operation::Output<$out> {
                self.$field.clone()
            }
        }
    };
    ([$($g:ident),*] $ty:ty, list $field:ident: $out:ty) => {
        impl_op!([$($g),*] $ty);

        impl<$($g),*> IntoIterator for $ty {
            type Item = $crate::operation::Output<$out>;
            type IntoIter = std::vec::IntoIter<$crate::operation::Output<$out>>;

            fn into_iter(self) -> Self::IntoIter {
                self.$field.into_iter()
            }
        }
    };
}

pub mod array;
pub mod control_flow;
pub mod core;
pub mod dataflow;
pub mod image;
pub mod math;
pub mod nn;
pub mod random;
pub mod sparse;
pub mod state;
pub mod string;
