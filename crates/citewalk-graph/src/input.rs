//! Graph input: JSON subgraph documents and whitespace edge lists.
//!
//! The edge-list reader accepts the `.cites` layout of the Cora citation
//! dataset: one `cited citing` pair per line. Direction is dropped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use citewalk_core::NodeId;

use crate::error::{GraphError, Result};
use crate::graph::InMemoryGraph;

/// A node as it appears in a subgraph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
}

/// An undirected edge as it appears in a subgraph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
}

/// A complete graph document: `{"nodes": [...], "edges": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubgraphRecord {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl SubgraphRecord {
    pub fn into_graph(self) -> InMemoryGraph {
        InMemoryGraph::from_records(self.nodes, self.edges)
    }
}

/// Load a graph file, choosing the reader by extension.
///
/// `.json` files are read as a [`SubgraphRecord`]; everything else as an
/// edge list.
pub fn load_graph(path: impl AsRef<Path>) -> Result<InMemoryGraph> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let graph = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => read_subgraph(file)?,
        _ => read_edge_list(BufReader::new(file))?,
    };

    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph loaded"
    );

    Ok(graph)
}

/// Read a JSON subgraph document.
pub fn read_subgraph<R: Read>(reader: R) -> Result<InMemoryGraph> {
    let record: SubgraphRecord = serde_json::from_reader(reader)?;
    Ok(record.into_graph())
}

/// Read a whitespace-separated edge list.
///
/// Nodes are created on first mention. Blank lines and lines starting with
/// `#` are ignored.
pub fn read_edge_list<R: BufRead>(reader: R) -> Result<InMemoryGraph> {
    let mut graph = InMemoryGraph::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [source, target] = fields.as_slice() else {
            return Err(GraphError::Parse {
                line: i + 1,
                message: format!("expected 2 fields, found {}", fields.len()),
            });
        };

        let source = NodeId::from(*source);
        let target = NodeId::from(*target);
        graph.add_node(source.clone(), None, serde_json::Value::Null);
        graph.add_node(target.clone(), None, serde_json::Value::Null);
        graph.add_edge(&source, &target)?;
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyView;

    #[test]
    fn test_read_edge_list() {
        let input = "# cited citing\n35 1033\n35 103482\n\n1033 103482\n";
        let graph = read_edge_list(input.as_bytes()).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains(&NodeId::from("103482")));
    }

    #[test]
    fn test_read_edge_list_rejects_malformed_line() {
        let input = "1 2\n3\n";
        let result = read_edge_list(input.as_bytes());
        assert!(matches!(result, Err(GraphError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_read_subgraph_document() {
        let json = serde_json::json!({
            "nodes": [
                {"id": "a", "label": "Theory"},
                {"id": "b", "properties": {"year": 1998}},
                {"id": "c"}
            ],
            "edges": [
                {"source": "a", "target": "b"},
                {"source": "b", "target": "c"}
            ]
        });

        let graph = read_subgraph(json.to_string().as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node(1).unwrap().properties["year"], 1998);
    }

    #[test]
    fn test_read_subgraph_invalid_json() {
        let result = read_subgraph("{not json".as_bytes());
        assert!(matches!(result, Err(GraphError::Serialization(_))));
    }
}
