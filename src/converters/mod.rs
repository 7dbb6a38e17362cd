//! Export of a [`GraphDef`] into other formats, selected by name.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::graph::GraphDef;

mod dot;
mod json;
mod pb;

pub use dot::DotConverter;
pub use json::JsonConverter;
pub use pb::{PbConverter, graph_def_to_proto};

#[derive(Debug, Clone)]
pub struct ConvertedGraph {
    pub format: &'static str,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

pub trait GraphConverter {
    /// Lowercase name used to look the converter up.
    fn format(&self) -> &'static str;
    fn convert(&self, graph: &GraphDef) -> Result<ConvertedGraph, GraphError>;
}

#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<&'static str, Box<dyn GraphConverter + Send + Sync>>,
}

impl ConverterRegistry {
    /// Registry holding the `json`, `dot` and `pb` exporters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(Box::new(JsonConverter));
        registry.register(Box::new(DotConverter));
        registry.register(Box::new(PbConverter));
        registry
    }

    /// Replaces any converter already registered under the same format.
    pub fn register(&mut self, converter: Box<dyn GraphConverter + Send + Sync>) {
        self.converters.insert(converter.format(), converter);
    }

    pub fn available_formats(&self) -> Vec<&'static str> {
        let mut formats: Vec<_> = self.converters.keys().copied().collect();
        formats.sort_unstable();
        formats
    }

    pub fn convert(&self, format: &str, graph: &GraphDef) -> Result<ConvertedGraph, GraphError> {
        let key = format.to_ascii_lowercase();
        let converter =
            self.converters
                .get(key.as_str())
                .ok_or_else(|| GraphError::UnknownConverter {
                    requested: format.to_string(),
                    available: self.available_formats(),
                })?;
        tracing::debug!(format = converter.format(), nodes = graph.nodes.len(), "converting graph");
        converter.convert(graph)
    }
}
