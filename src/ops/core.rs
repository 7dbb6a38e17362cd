use crate::descriptor::OpDescriptor;
use crate::error::GraphError;
use crate::graph::{Shape, Tensor};
use crate::operation::{Operand, Operation, Output};
use crate::scope::Scope;
use crate::types::{TensorType, TensorValue};

/// Node holding a constant tensor value.
#[derive(Debug, Clone)]
pub struct Constant<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T: TensorType> Constant<T> {
    /// Constant from an already encoded tensor whose element type must be `T`.
    pub fn from_tensor(scope: &Scope<'_>, tensor: Tensor) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Const")
            .attr("value", tensor)
            .attr("dtype", T::DATA_TYPE)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl<T: TensorValue> Constant<T> {
    pub fn scalar(scope: &Scope<'_>, value: T) -> Result<Self, GraphError> {
        Self::from_tensor(scope, Tensor::scalar(value))
    }

    pub fn from_slice(scope: &Scope<'_>, shape: &[i64], values: &[T]) -> Result<Self, GraphError> {
        Self::from_tensor(scope, Tensor::from_slice(shape, values)?)
    }

    /// Rank-1 constant holding `values`.
    pub fn vector(scope: &Scope<'_>, values: &[T]) -> Result<Self, GraphError> {
        Self::from_slice(scope, &[values.len() as i64], values)
    }
}

impl Constant<String> {
    pub fn strings<S: AsRef<[u8]>>(
        scope: &Scope<'_>,
        shape: &[i64],
        values: &[S],
    ) -> Result<Self, GraphError> {
        Self::from_tensor(scope, Tensor::from_strings(shape, values)?)
    }
}

impl_op!([T] Constant<T>, output: T);

#[derive(Debug, Clone, Default)]
pub struct PlaceholderOptions {
    shape: Option<Shape>,
}

impl PlaceholderOptions {
    /// Static shape of the value that will be fed. Unset means any shape.
    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Stand-in for a value fed into the graph when it runs.
#[derive(Debug, Clone)]
pub struct Placeholder<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T: TensorType> Placeholder<T> {
    pub fn new(scope: &Scope<'_>, options: PlaceholderOptions) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("Placeholder")
            .attr("dtype", T::DATA_TYPE)
            .attr_opt("shape", options.shape)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] Placeholder<T>, output: T);

/// Placeholder that forwards `input` when nothing is fed.
#[derive(Debug, Clone)]
pub struct PlaceholderWithDefault<T> {
    operation: Operation,
    output: Output<T>,
}

impl<T> PlaceholderWithDefault<T> {
    pub fn new(scope: &Scope<'_>, input: &impl Operand<T>, shape: Shape) -> Result<Self, GraphError> {
        let operation = OpDescriptor::new("PlaceholderWithDefault")
            .input(input)
            .attr("shape", shape)
            .build(scope)?;
        let output = operation.output(0)?;
        Ok(Self { operation, output })
    }

    pub fn output(&self) -> &Output<T> {
        &self.output
    }
}

impl_op!([T] PlaceholderWithDefault<T>, output: T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Graph;
    use crate::graph::{AttrValue, DataType, NodeInput};
    use crate::operation::PrimitiveOp;

    #[test]
    fn constant_records_value_and_dtype() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let c = Constant::vector(&scope, &[1i64, 2, 3]).unwrap();
        assert_eq!(c.output().data_type(), DataType::Int64);
        assert_eq!(c.operation().name(), "Const");

        let node = graph.node_def("Const").unwrap();
        let Some(AttrValue::Tensor(tensor)) = node.attr("value") else {
            panic!("missing value attribute");
        };
        assert_eq!(tensor.shape, vec![3]);
        assert_eq!(tensor.content.len(), 24);
        assert_eq!(node.attr("dtype"), Some(&AttrValue::Type(DataType::Int64)));
    }

    #[test]
    fn string_constants_and_type_checks() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let c = Constant::<String>::strings(&scope, &[2], &["a", "bc"]).unwrap();
        assert_eq!(c.output().data_type(), DataType::String);

        let err = Constant::<f32>::from_tensor(&scope, Tensor::scalar(1i32)).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidAttrValue { ref attr, .. } if attr == "value"
        ));
        assert_eq!(graph.num_operations(), 1);
    }

    #[test]
    fn placeholder_shape_is_optional() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        Placeholder::<f32>::new(&scope, PlaceholderOptions::default()).unwrap();
        let shaped = Placeholder::<u8>::new(
            &scope,
            PlaceholderOptions::default().shape(Shape::make(&[-1, 28, 28])),
        )
        .unwrap();

        assert!(graph.node_def("Placeholder").unwrap().attr("shape").is_none());
        assert_eq!(
            graph.node_def("Placeholder_1").unwrap().attr("shape"),
            Some(&AttrValue::Shape(Shape::make(&[-1, 28, 28])))
        );
        assert_eq!(shaped.output().data_type(), DataType::Uint8);
    }

    #[test]
    fn placeholder_with_default_takes_type_from_input() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let fallback = Constant::scalar(&scope, 0.5f64).unwrap();
        let p = PlaceholderWithDefault::new(&scope, &fallback, Shape::scalar()).unwrap();

        assert_eq!(p.output().data_type(), DataType::Double);
        let node = graph.node_def("PlaceholderWithDefault").unwrap();
        assert_eq!(node.inputs, vec![NodeInput::Single("Const:0".into())]);
        assert_eq!(node.attr("dtype"), Some(&AttrValue::Type(DataType::Double)));
    }
}
