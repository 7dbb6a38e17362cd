//! Interface to the graph-construction engine.
//!
//! Operator factories never talk to a concrete engine. They ask the scope's
//! [`ExecutionEnvironment`] for an [`OperationBuilder`], feed it inputs and
//! attributes, and finalize it into an [`Operation`].

use crate::error::GraphError;
use crate::graph::AttrValue;
use crate::operation::{Endpoint, Operation};

pub trait ExecutionEnvironment {
    /// Start building a node of type `op_type` named `name`.
    fn op_builder(
        &self,
        op_type: &str,
        name: &str,
    ) -> Result<Box<dyn OperationBuilder + '_>, GraphError>;
}

/// Pending node. Calls are recorded in order and checked when the builder is
/// finalized.
pub trait OperationBuilder {
    fn add_input(&mut self, input: Endpoint);

    /// Feed one list-typed input. Order is preserved.
    fn add_input_list(&mut self, inputs: Vec<Endpoint>);

    fn add_control_input(&mut self, operation: &Operation);

    fn set_device(&mut self, device: &str);

    fn set_attr(&mut self, name: &str, value: AttrValue);

    fn build(self: Box<Self>) -> Result<Operation, GraphError>;
}
