use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use rust_op_graph::{
    AttrValue, ConverterRegistry, GraphError, GraphValidator, OpRegistry, Shape,
    graph_to_dot, load_graph_from_path, registry_with_op_defs,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate and convert operation graphs", long_about = None)]
struct Cli {
    /// Path to a JSON file holding a serialized graph.
    #[arg(required_unless_present = "list_ops")]
    graph: Option<PathBuf>,
    /// JSON file with extra operator definitions to register.
    #[arg(long)]
    ops: Option<PathBuf>,
    /// Print the registered operator types and exit.
    #[arg(long)]
    list_ops: bool,
    /// Optional path to write a Graphviz DOT export of the graph.
    #[arg(long)]
    export_dot: Option<PathBuf>,
    /// Convert the graph to a different format (`json`, `dot` or binary `pb`).
    #[arg(long)]
    convert: Option<String>,
    /// Path to write the converted graph (stdout if omitted).
    #[arg(long)]
    convert_output: Option<PathBuf>,
}

fn run() -> Result<(), GraphError> {
    let cli = Cli::parse();
    let registry = match &cli.ops {
        Some(path) => registry_with_op_defs(path)?,
        None => OpRegistry::with_defaults(),
    };

    if cli.list_ops {
        for op_type in registry.available_ops() {
            let summary = registry
                .lookup(op_type)
                .and_then(|def| def.summary.as_deref())
                .unwrap_or("");
            println!("{:<32} {}", op_type, summary);
        }
        return Ok(());
    }
    let Some(graph_path) = cli.graph else {
        return Ok(());
    };

    let graph = load_graph_from_path(&graph_path)?;
    let artifacts = GraphValidator::new(&graph, &registry).validate()?;

    println!(
        "Validated graph from `{}` with {} operations.",
        graph_path.display(),
        graph.nodes.len()
    );
    println!("Inputs:");
    for (name, data_type) in artifacts.input_names_to_types.iter() {
        let shape = graph
            .node(name.split(':').next().unwrap_or(name))
            .and_then(|node| match node.attr("shape") {
                Some(AttrValue::Shape(shape)) => Some(shape.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| Shape::unknown().to_string());
        println!("  - {}: {} {}", name, data_type, shape);
    }
    println!("Outputs:");
    for (name, data_type) in artifacts.output_names_to_types.iter() {
        let producer = artifacts
            .endpoint_to_producing_operation
            .get(name)
            .map(String::as_str)
            .unwrap_or("?");
        println!("  - {}: {} ({})", name, data_type, producer);
    }
    println!("Dependency fan-out:");
    for (endpoint, deps) in artifacts.endpoint_to_dependent_operations.iter() {
        println!("  - {} -> {}", endpoint, deps.join(", "));
    }

    if let Some(dot_path) = cli.export_dot {
        let dot = graph_to_dot(&graph);
        std::fs::write(&dot_path, dot).map_err(|err| GraphError::export(dot_path.clone(), err))?;
        println!("Exported Graphviz DOT to `{}`.", dot_path.display());
    }

    if let Some(format) = cli.convert {
        let converted = ConverterRegistry::with_defaults().convert(&format, &graph)?;
        if let Some(path) = cli.convert_output {
            std::fs::write(&path, converted.data)
                .map_err(|err| GraphError::export(path.clone(), err))?;
            println!(
                "Converted graph to `{}` format at `{}` (type {}).",
                converted.format,
                path.display(),
                converted.content_type
            );
        } else {
            std::io::stdout()
                .write_all(&converted.data)
                .map_err(|err| GraphError::ConversionFailed {
                    format: converted.format.to_string(),
                    reason: err.to_string(),
                })?;
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
