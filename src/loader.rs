use std::fs;
use std::path::Path;

use crate::error::GraphError;
use crate::graph::GraphDef;
use crate::registry::{OpDef, OpRegistry};

fn read_json(path: &Path) -> Result<String, GraphError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => fs::read_to_string(path).map_err(|err| GraphError::io(path, err)),
        Some(other) => Err(GraphError::ConversionFailed {
            format: "unknown".to_string(),
            reason: format!("Unsupported file extension: {:?}. Use .json", other),
        }),
        None => Err(GraphError::ConversionFailed {
            format: "unknown".to_string(),
            reason: "No file extension found. Use .json".to_string(),
        }),
    }
}

/// Load a serialized graph (`GraphDef` JSON).
pub fn load_graph_from_path(path: impl AsRef<Path>) -> Result<GraphDef, GraphError> {
    let path = path.as_ref();
    let contents = read_json(path)?;
    let graph: GraphDef = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), nodes = graph.nodes.len(), "loaded graph");
    Ok(graph)
}

/// Load extra operator definitions from a JSON array of `OpDef`.
pub fn load_op_defs_from_path(path: impl AsRef<Path>) -> Result<Vec<OpDef>, GraphError> {
    let path = path.as_ref();
    let contents = read_json(path)?;
    let defs: Vec<OpDef> = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), ops = defs.len(), "loaded operator definitions");
    Ok(defs)
}

/// Built-in registry extended with the definitions stored at `path`.
pub fn registry_with_op_defs(path: impl AsRef<Path>) -> Result<OpRegistry, GraphError> {
    let mut registry = OpRegistry::with_defaults();
    for def in load_op_defs_from_path(path)? {
        registry.register(def)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DataType;
    use crate::registry::ArgDef;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_graph_json() {
        let file = write_temp(
            ".json",
            r#"{
                "version": 1,
                "nodes": [
                    {"name": "x", "op": "Placeholder",
                     "attrs": {"dtype": {"kind": "type", "value": "float"}}},
                    {"name": "s", "op": "Sign", "inputs": ["x:0"]}
                ]
            }"#,
        );
        let graph = load_graph_from_path(file.path()).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.node("s").unwrap().op, "Sign");
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = write_temp(".pb", "\n\x07");
        let err = load_graph_from_path(file.path()).unwrap_err();
        assert!(matches!(err, GraphError::ConversionFailed { .. }));
    }

    #[test]
    fn reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_graph_from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }

    #[test]
    fn extends_registry_from_file() {
        let def = OpDef::new("Frobnicate")
            .input(ArgDef::fixed("x", DataType::Float))
            .output(ArgDef::fixed("y", DataType::Float));
        let file = write_temp(".json", &serde_json::to_string(&vec![def]).unwrap());

        let registry = registry_with_op_defs(file.path()).unwrap();
        assert!(registry.lookup("Frobnicate").is_some());
        assert!(registry.lookup("MatMul").is_some());

        let clash = OpDef::new("MatMul");
        let file = write_temp(".json", &serde_json::to_string(&vec![clash]).unwrap());
        assert!(matches!(
            registry_with_op_defs(file.path()),
            Err(GraphError::DuplicateOpDef { .. })
        ));
    }
}
