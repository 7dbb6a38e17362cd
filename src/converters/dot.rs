use crate::converters::{ConvertedGraph, GraphConverter};
use crate::error::GraphError;
use crate::graph::GraphDef;
use crate::graphviz::graph_to_dot;

#[derive(Debug, Default, Clone, Copy)]
pub struct DotConverter;

impl GraphConverter for DotConverter {
    fn format(&self) -> &'static str {
        "dot"
    }

    fn convert(&self, graph: &GraphDef) -> Result<ConvertedGraph, GraphError> {
        Ok(ConvertedGraph {
            format: "dot",
            content_type: "text/vnd.graphviz",
            data: graph_to_dot(graph).into_bytes(),
        })
    }
}
