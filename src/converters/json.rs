use crate::converters::{ConvertedGraph, GraphConverter};
use crate::error::GraphError;
use crate::graph::GraphDef;

/// Pretty-printed JSON, readable by `load_graph_from_path`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConverter;

impl GraphConverter for JsonConverter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn convert(&self, graph: &GraphDef) -> Result<ConvertedGraph, GraphError> {
        let data = serde_json::to_vec_pretty(graph).map_err(|err| GraphError::ConversionFailed {
            format: "json".to_string(),
            reason: err.to_string(),
        })?;
        Ok(ConvertedGraph {
            format: "json",
            content_type: "application/json",
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Graph;
    use crate::ops::core::{Placeholder, PlaceholderOptions};
    use crate::ops::math::Sign;
    use crate::scope::Scope;

    #[test]
    fn output_reloads_into_the_same_graph() {
        let graph = Graph::new();
        let scope = Scope::new(&graph);
        let x = Placeholder::<f32>::new(&scope, PlaceholderOptions::default()).unwrap();
        Sign::new(&scope.with_device("/cpu:0"), &x).unwrap();
        let graph_def = graph.to_graph_def();

        let converted = JsonConverter.convert(&graph_def).unwrap();
        assert_eq!(converted.content_type, "application/json");
        let reloaded: GraphDef = serde_json::from_slice(&converted.data).unwrap();
        assert_eq!(reloaded, graph_def);

        let replayed = Graph::new();
        replayed.import_graph_def(&reloaded).unwrap();
        assert_eq!(replayed.to_graph_def(), graph_def);
    }
}
