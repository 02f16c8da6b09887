//! CLI command implementations.

use crate::marker::Marker;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use kubegraph_graph::{build_graph_with, BuildConfig, ManifestGraph};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Reads the JSON config if one was given, otherwise uses defaults.
pub fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    match path {
        Some(path) => Ok(BuildConfig::from_file(path)?),
        None => Ok(BuildConfig::default()),
    }
}

fn build_with_spinner(path: &Path, config: &BuildConfig) -> Result<ManifestGraph> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Reading manifests under {}...", path.display()));

    let start = Instant::now();
    let result = build_graph_with(path, config);
    spinner.finish_and_clear();
    let graph = result?;

    eprintln!(
        "{} Built graph: {} entities, {} references in {}ms",
        "✓".green(),
        graph.entity_count().to_string().cyan(),
        graph.reference_count().to_string().cyan(),
        start.elapsed().as_millis()
    );

    Ok(graph)
}

/// Build the graph and print it.
pub fn build(path: &Path, config: &BuildConfig, json: bool) -> Result<()> {
    let graph = build_with_spinner(path, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&node_link_document(&graph))?);
        return Ok(());
    }

    println!("{}", "Entities".cyan().bold());
    for entity in graph.entities() {
        let marker = Marker::for_kind(&entity.kind);
        let line = format!("{} {:>3}  {} ({})", marker.glyph(), entity.id, entity.name, entity.kind);
        if entity.is_placeholder() {
            println!("  {}", line.yellow());
        } else {
            println!("  {}", line);
        }
    }

    println!();
    println!("{}", "References".cyan().bold());
    if graph.reference_count() == 0 {
        println!("  {}", "(none)".dimmed());
    }
    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.entity(edge.source), graph.entity(edge.target)) else {
            continue;
        };
        println!(
            "  {} ({}) {} {} ({})",
            from.name,
            from.kind.to_string().dimmed(),
            format!("─{}→", edge.kind).blue(),
            to.name,
            to.kind.to_string().dimmed()
        );
    }

    Ok(())
}

/// Export the graph to a JSON file.
pub fn export(path: &Path, config: &BuildConfig, output: &Path) -> Result<()> {
    let graph = build_with_spinner(path, config)?;
    fs::write(output, serde_json::to_string_pretty(&node_link_document(&graph))?)?;
    println!("{} Exported to {}", "✓".green(), output.display());
    Ok(())
}

/// Print the marker legend.
pub fn markers() -> Result<()> {
    use kubegraph_core::ResourceKind;

    println!("{}", "Markers".cyan().bold());
    for kind in [
        ResourceKind::Ingress,
        ResourceKind::Service,
        ResourceKind::Deployment,
        ResourceKind::DaemonSet,
        ResourceKind::UnknownService,
    ] {
        let marker = Marker::for_kind(&kind);
        println!("  {} {:<15} {}", marker.glyph(), kind.as_str(), marker.as_str().dimmed());
    }
    println!(
        "  {} {:<15} {}",
        Marker::TriangleDown.glyph(),
        "(other)",
        Marker::TriangleDown.as_str().dimmed()
    );
    Ok(())
}

/// Node-link document for a visualizer: one node per entity with its label
/// and marker, one link per reference.
fn node_link_document(graph: &ManifestGraph) -> Value {
    let nodes: Vec<Value> = graph
        .entities()
        .map(|entity| {
            serde_json::json!({
                "id": entity.id,
                "label": format!("{} ({})", entity.name, entity.kind),
                "kind": entity.kind,
                "shape": Marker::for_kind(&entity.kind),
            })
        })
        .collect();

    let links: Vec<Value> = graph
        .edges()
        .into_iter()
        .map(|edge| {
            serde_json::json!({
                "from": edge.source,
                "to": edge.target,
                "kind": edge.kind,
            })
        })
        .collect();

    serde_json::json!({
        "version": "1.0",
        "stats": graph.stats(),
        "nodes": nodes,
        "links": links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_node_link_document() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("ingress.yaml"),
            "kind: Ingress\nmetadata: {name: edge}\nspec:\n  backend: {serviceName: web}\n",
        )
        .unwrap();

        let graph = build_graph_with(dir.path(), &BuildConfig::default()).unwrap();
        let doc = node_link_document(&graph);

        assert_eq!(doc["nodes"][0]["label"], "edge (Ingress)");
        assert_eq!(doc["nodes"][0]["shape"], "dot");
        assert_eq!(doc["nodes"][1]["kind"], "UnknownService");
        assert_eq!(doc["nodes"][1]["shape"], "triangleDown");
        assert_eq!(doc["links"][0]["from"], 0);
        assert_eq!(doc["links"][0]["to"], 1);
        assert_eq!(doc["stats"]["placeholder_count"], 1);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("svc.yaml"), "kind: Service\nmetadata: {name: web}\n").unwrap();
        let output = dir.path().join("out.json");

        export(dir.path(), &BuildConfig::default(), &output).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["nodes"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        assert!(load_config(Some(Path::new("/no/such/config.json"))).is_err());
        assert!(load_config(None).is_ok());
    }
}
