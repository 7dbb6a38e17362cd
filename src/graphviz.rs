use std::collections::HashMap;
use std::fmt::Write;

use crate::graph::{GraphDef, InputRef, parse_control_ref, parse_input_ref};

pub fn graph_to_dot(graph: &GraphDef) -> String {
    let mut dot = String::from("digraph opgraph {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [fontname=\"Helvetica\"];\n");
    dot.push_str("  edge [fontname=\"Helvetica\"];\n\n");

    let ids: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.name.as_str(), idx))
        .collect();

    for (idx, node) in graph.nodes.iter().enumerate() {
        let (shape, fill) = match node.op.as_str() {
            "Placeholder" | "PlaceholderWithDefault" => ("oval", "#d0e6ff"),
            "Const" | "ImmutableConst" => ("diamond", "#f0f0f0"),
            _ => ("box", "#ffffff"),
        };
        let mut label_lines = vec![node.name.clone()];
        if node.op != node.name {
            label_lines.push(node.op.clone());
        }
        if let Some(dtype) = node.attr("dtype").and_then(|value| value.as_type()) {
            label_lines.push(dtype.to_string());
        }
        if let Some(device) = &node.device {
            label_lines.push(device.clone());
        }
        let label = escape_label(&label_lines.join("\n"));
        let _ = writeln!(
            dot,
            "  node_{} [shape={},style=\"rounded,filled\",fillcolor=\"{}\",label=\"{}\"];",
            idx, shape, fill, label
        );
    }

    dot.push('\n');

    for (idx, node) in graph.nodes.iter().enumerate() {
        for (input_idx, reference) in node.data_references().enumerate() {
            let Some(InputRef::Data {
                node: producer,
                index,
            }) = parse_input_ref(reference)
            else {
                continue;
            };
            if let Some(source) = ids.get(producer) {
                let _ = writeln!(
                    dot,
                    "  node_{} -> node_{} [label=\"{}:in{}\"];",
                    source, idx, index, input_idx
                );
            }
        }
        for reference in &node.control_inputs {
            if let Some(source) = parse_control_ref(reference).and_then(|name| ids.get(name)) {
                let _ = writeln!(dot, "  node_{} -> node_{} [style=dashed];", source, idx);
            }
        }
    }

    dot.push_str("}\n");
    dot
}

fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
