//! Graph data model: nodes, edges, and the result of one build.

use std::collections::{BTreeMap, HashMap};

use crate::cache::ParsedFile;

/// Whether an edge targets another document or an external domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Internal,
    External,
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn internal(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Internal,
        }
    }

    pub fn external(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::External,
        }
    }
}

/// Document-node payload, derived from a [`ParsedFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    /// Forward-slash path relative to the scan root. Doubles as the node id.
    pub path: String,
    pub title: String,
    pub preview: Option<String>,
    pub size: u64,
    pub lines: usize,
    pub words: usize,
    /// Only a prefix of the file was parsed; links may be missing.
    pub large: bool,
    /// Link targets that resolve to no file at all (true 404s, not
    /// depth/cap truncation).
    pub broken_links: Vec<String>,
}

impl DocumentNode {
    pub fn from_parsed(parsed: &ParsedFile) -> Self {
        Self {
            path: parsed.rel_path.clone(),
            title: parsed.stats.title.clone(),
            preview: parsed.stats.preview.clone(),
            size: parsed.size,
            lines: parsed.stats.lines,
            words: parsed.stats.words,
            large: parsed.stats.large,
            broken_links: Vec::new(),
        }
    }
}

/// External-node payload: one node per domain, aggregating all URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalNode {
    pub domain: String,
    /// How many times any URL under this domain was linked.
    pub link_count: usize,
    /// Distinct URLs, in first-seen order.
    pub urls: Vec<String>,
}

/// Discriminated node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePayload {
    Document(DocumentNode),
    External(ExternalNode),
}

/// A node in the built graph. Owned by the builder, read-only downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Unique within one build result. Documents use their relative path,
    /// external nodes use `external:<domain>`.
    pub id: String,
    pub payload: NodePayload,
}

impl GraphNode {
    pub fn document(doc: DocumentNode) -> Self {
        Self {
            id: doc.path.clone(),
            payload: NodePayload::Document(doc),
        }
    }

    pub fn external(ext: ExternalNode) -> Self {
        Self {
            id: external_id(&ext.domain),
            payload: NodePayload::External(ext),
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self.payload, NodePayload::Document(_))
    }

    pub fn as_document(&self) -> Option<&DocumentNode> {
        match &self.payload {
            NodePayload::Document(doc) => Some(doc),
            NodePayload::External(_) => None,
        }
    }

    pub fn as_external(&self) -> Option<&ExternalNode> {
        match &self.payload {
            NodePayload::External(ext) => Some(ext),
            NodePayload::Document(_) => None,
        }
    }

    /// Label used for alphabetical ordering in the layout.
    pub fn label(&self) -> &str {
        match &self.payload {
            NodePayload::Document(doc) => &doc.title,
            NodePayload::External(ext) => &ext.domain,
        }
    }
}

pub fn external_id(domain: &str) -> String {
    format!("external:{domain}")
}

/// External links aggregated by domain across all loaded files.
///
/// Cached on the build result so the UI can toggle external nodes without
/// re-parsing anything. BTreeMap keeps domain order stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalIndex {
    pub domains: BTreeMap<String, ExternalNode>,
}

impl ExternalIndex {
    /// Record one linked URL for a domain.
    pub fn add(&mut self, domain: &str, url: &str) {
        let entry = self
            .domains
            .entry(domain.to_string())
            .or_insert_with(|| ExternalNode {
                domain: domain.to_string(),
                link_count: 0,
                urls: Vec::new(),
            });
        entry.link_count += 1;
        if !entry.urls.iter().any(|u| u == url) {
            entry.urls.push(url.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Output of one graph build.
#[derive(Debug, Clone, Default)]
pub struct GraphResult {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Documents discovered during traversal (loaded or not).
    pub total_documents: usize,
    /// Documents actually parsed into nodes.
    pub loaded_documents: usize,
    /// More documents exist beyond the node cap.
    pub has_more: bool,
    /// Side channel for instant external-link toggling.
    pub externals: ExternalIndex,
}

impl GraphResult {
    /// Ids of all loaded document nodes.
    pub fn loaded_paths(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.is_document())
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// Undirected adjacency over node ids, precomputed for the layout BFS.
pub type Adjacency = HashMap<String, Vec<String>>;

/// Build the adjacency map for a node/edge set. Endpoints missing from
/// `nodes` are skipped rather than invented.
pub fn adjacency(nodes: &[GraphNode], edges: &[GraphEdge]) -> Adjacency {
    let mut adj: Adjacency = nodes.iter().map(|n| (n.id.clone(), Vec::new())).collect();
    for edge in edges {
        if !adj.contains_key(&edge.source) || !adj.contains_key(&edge.target) {
            continue;
        }
        if let Some(v) = adj.get_mut(&edge.source) {
            v.push(edge.target.clone());
        }
        if let Some(v) = adj.get_mut(&edge.target) {
            v.push(edge.source.clone());
        }
    }
    adj
}

#[cfg(test)]
pub fn doc_node(path: &str) -> GraphNode {
    GraphNode::document(DocumentNode {
        path: path.to_string(),
        title: crate::cache::file_stem(path).to_string(),
        preview: None,
        size: 0,
        lines: 0,
        words: 0,
        large: false,
        broken_links: Vec::new(),
    })
}
