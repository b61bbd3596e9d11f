//! Bounded breadth-first graph builder.
//!
//! Builds the node/edge set outward from a focus file over outgoing internal
//! links only — no full directory scan is needed for the initial view. One
//! frontier level per depth, capped by `max_depth` and `max_nodes`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Result};
use log::debug;

use crate::cache::ParsedFile;
use crate::graph::model::{
    external_id, DocumentNode, ExternalIndex, GraphEdge, GraphNode, GraphResult,
};
use crate::scanner::tree;
use crate::session::Session;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_MAX_NODES: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Hop limit from the focus file.
    pub max_depth: usize,
    /// Cap on parsed documents per build.
    pub max_nodes: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// Which stage a progress report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial focus resolution, before any traversal.
    Scanning,
    /// Per-file parse during the BFS build.
    Parsing,
}

/// Reported once at build start and again after each parsed file. Observable
/// side effect only, not part of the build result.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub phase: Phase,
    pub current: usize,
    pub total: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub detail: Option<&'a str>,
}

/// Build the graph rooted at `focus` (a path relative to the session root).
///
/// The only fatal error is an unreadable focus file; every other failure
/// degrades to skipping the affected file. Progress is reported through
/// `progress` after each parse.
pub fn build(
    session: &mut Session,
    focus: &str,
    opts: &BuildOptions,
    mut progress: impl FnMut(Progress<'_>),
) -> Result<GraphResult> {
    let focus = normalize(focus);

    // The focus file is the one per-build fatal surface: if it cannot be
    // parsed there is nothing to show.
    if session.parse(&focus).is_none() {
        bail!("cannot read focus file '{focus}'");
    }

    progress(Progress {
        phase: Phase::Scanning,
        current: 0,
        total: 0,
        internal_links: 0,
        external_links: 0,
        detail: Some(&focus),
    });

    let mut queue: VecDeque<(String, usize)> = VecDeque::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut loaded: HashMap<String, Rc<ParsedFile>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut broken: HashMap<String, Vec<String>> = HashMap::new();
    let mut externals = ExternalIndex::default();
    let mut internal_tally = 0usize;
    let mut external_tally = 0usize;
    let mut has_more = false;

    visited.insert(focus.clone());
    queue.push_back((focus.clone(), 0));

    while let Some((path, depth)) = queue.pop_front() {
        if loaded.len() >= opts.max_nodes {
            has_more = true;
            break;
        }

        let Some(parsed) = session.parse(&path) else {
            // Unreadable mid-traversal: skip. Links pointing here stay
            // unloaded but visited, so they are not reported broken.
            debug!("skipping unparsable file {path}");
            continue;
        };

        internal_tally += parsed.links.len();
        external_tally += parsed.external.len();

        for link in &parsed.external {
            externals.add(&link.domain, &link.url);
        }

        let mut seen_targets: HashSet<&str> = HashSet::new();
        for target in &parsed.links {
            if target == &path || !seen_targets.insert(target.as_str()) {
                continue;
            }
            if visited.contains(target.as_str()) {
                continue;
            }
            // Asset references (images, archives) are neither nodes nor
            // broken links; only document files join the graph.
            if !tree::is_document(Path::new(target)) {
                continue;
            }
            let exists = session
                .fs()
                .stat(&session.abs_path(target), session.conn())
                .is_ok();
            if !exists {
                broken.entry(path.clone()).or_default().push(target.clone());
                continue;
            }
            // Existing target past the depth limit stays unvisited — it is
            // truncation, not a broken link.
            if depth < opts.max_depth {
                visited.insert(target.clone());
                queue.push_back((target.clone(), depth + 1));
            }
        }

        order.push(path.clone());
        loaded.insert(path.clone(), parsed);

        progress(Progress {
            phase: Phase::Parsing,
            current: loaded.len(),
            total: visited.len(),
            internal_links: internal_tally,
            external_links: external_tally,
            detail: Some(&path),
        });
    }

    if !queue.is_empty() {
        has_more = true;
    }

    let mut nodes: Vec<GraphNode> = Vec::with_capacity(order.len() + externals.domains.len());
    for path in &order {
        let parsed = &loaded[path];
        let mut doc = DocumentNode::from_parsed(parsed);
        if let Some(mut targets) = broken.remove(path) {
            // Final guard against false positives: a target that made it into
            // the loaded or visited set is not broken.
            targets.retain(|t| !loaded.contains_key(t) && !visited.contains(t));
            doc.broken_links = targets;
        }
        nodes.push(GraphNode::document(doc));
    }

    let mut edges: Vec<GraphEdge> = Vec::new();
    let mut edge_seen: HashSet<(String, String)> = HashSet::new();
    for path in &order {
        let parsed = &loaded[path];
        for target in &parsed.links {
            if target == path || !loaded.contains_key(target) {
                continue;
            }
            if edge_seen.insert((path.clone(), target.clone())) {
                edges.push(GraphEdge::internal(path.clone(), target.clone()));
            }
        }
        let mut domains_seen: HashSet<&str> = HashSet::new();
        for link in &parsed.external {
            if domains_seen.insert(&link.domain) {
                edges.push(GraphEdge::external(path.clone(), external_id(&link.domain)));
            }
        }
    }

    for ext in externals.domains.values() {
        nodes.push(GraphNode::external(ext.clone()));
    }

    debug!(
        "build complete: {} loaded / {} discovered, {} edges, has_more={}",
        order.len(),
        visited.len(),
        edges.len(),
        has_more
    );

    Ok(GraphResult {
        total_documents: visited.len(),
        loaded_documents: order.len(),
        has_more,
        nodes,
        edges,
        externals,
    })
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./").replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::EdgeKind;
    use std::fs;
    use std::path::Path;

    fn make_tree(root: &Path, files: &[(&str, &str)]) {
        for (name, content) in files {
            let p = root.join(name);
            if let Some(parent) = p.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&p, content).unwrap();
        }
    }

    fn build_at(
        root: &Path,
        focus: &str,
        max_depth: usize,
        max_nodes: usize,
    ) -> Result<GraphResult> {
        let mut session = Session::new(root);
        build(
            &mut session,
            focus,
            &BuildOptions {
                max_depth,
                max_nodes,
            },
            |_| {},
        )
    }

    fn doc<'a>(result: &'a GraphResult, id: &str) -> &'a DocumentNode {
        result.node(id).unwrap().as_document().unwrap()
    }

    #[test]
    fn chain_within_depth() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(
            dir.path(),
            &[("A.md", "[[B]]"), ("B.md", "[[C]]"), ("C.md", "end")],
        );
        let result = build_at(dir.path(), "A.md", 2, 100).unwrap();
        let mut ids: Vec<&str> = result
            .nodes
            .iter()
            .filter(|n| n.is_document())
            .map(|n| n.id.as_str())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["A.md", "B.md", "C.md"]);
        assert_eq!(result.edges.len(), 2);
        assert!(result
            .edges
            .contains(&GraphEdge::internal("A.md", "B.md")));
        assert!(result
            .edges
            .contains(&GraphEdge::internal("B.md", "C.md")));
        assert!(!result.has_more);
    }

    #[test]
    fn depth_cap_truncates_without_flagging_broken() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(
            dir.path(),
            &[("A.md", "[[B]]"), ("B.md", "[[C]]"), ("C.md", "end")],
        );
        let result = build_at(dir.path(), "A.md", 1, 100).unwrap();
        let ids: Vec<&str> = result
            .nodes
            .iter()
            .filter(|n| n.is_document())
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(result.contains("A.md") && result.contains("B.md"));
        assert_eq!(result.edges, vec![GraphEdge::internal("A.md", "B.md")]);
        // C exists but sits past the depth limit: truncated, not broken.
        assert!(doc(&result, "B.md").broken_links.is_empty());
    }

    #[test]
    fn missing_target_is_broken() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(dir.path(), &[("A.md", "[[B]] [[ghost]]"), ("B.md", "x")]);
        let result = build_at(dir.path(), "A.md", 3, 100).unwrap();
        assert_eq!(doc(&result, "A.md").broken_links, vec!["ghost.md"]);
        // The broken target never becomes a node or an edge endpoint.
        assert!(!result.contains("ghost.md"));
    }

    #[test]
    fn no_dangling_edges() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(
            dir.path(),
            &[
                ("A.md", "[[B]] [[C]] https://example.com/x"),
                ("B.md", "[[C]] [[missing]]"),
                ("C.md", "[[A]]"),
            ],
        );
        let result = build_at(dir.path(), "A.md", 5, 100).unwrap();
        for edge in &result.edges {
            assert!(result.contains(&edge.source), "dangling source {edge:?}");
            assert!(result.contains(&edge.target), "dangling target {edge:?}");
        }
    }

    #[test]
    fn max_nodes_cap_sets_has_more() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(
            dir.path(),
            &[
                ("A.md", "[[B]] [[C]] [[D]]"),
                ("B.md", "x"),
                ("C.md", "x"),
                ("D.md", "x"),
            ],
        );
        let result = build_at(dir.path(), "A.md", 3, 2).unwrap();
        assert_eq!(result.loaded_documents, 2);
        assert!(result.has_more);
        assert_eq!(result.total_documents, 4);
        // Capped-out targets were visited, so nothing is marked broken.
        assert!(doc(&result, "A.md").broken_links.is_empty());
    }

    #[test]
    fn external_links_aggregate_by_domain() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(
            dir.path(),
            &[(
                "A.md",
                "[x](https://example.com/x) and [y](https://example.com/y)",
            )],
        );
        let result = build_at(dir.path(), "A.md", 3, 100).unwrap();
        let ext_nodes: Vec<&GraphNode> =
            result.nodes.iter().filter(|n| !n.is_document()).collect();
        assert_eq!(ext_nodes.len(), 1);
        let ext = ext_nodes[0].as_external().unwrap();
        assert_eq!(ext.domain, "example.com");
        assert_eq!(ext.urls.len(), 2);
        // One external edge per (source, domain) pair.
        let ext_edges: Vec<&GraphEdge> = result
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::External)
            .collect();
        assert_eq!(ext_edges.len(), 1);
        assert_eq!(ext_edges[0].target, "external:example.com");
    }

    #[test]
    fn unreadable_focus_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = build_at(dir.path(), "nope.md", 3, 100);
        assert!(err.is_err());
    }

    #[test]
    fn rebuild_with_untouched_files_is_identical() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(
            dir.path(),
            &[("A.md", "# Alpha\n\nbody [[B]]"), ("B.md", "# Beta\n")],
        );
        let mut session = Session::new(dir.path());
        let opts = BuildOptions::default();
        let first = build(&mut session, "A.md", &opts, |_| {}).unwrap();
        let second = build(&mut session, "A.md", &opts, |_| {}).unwrap();
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.edges, second.edges);
    }

    #[test]
    fn progress_reports_each_parse() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(dir.path(), &[("A.md", "[[B]]"), ("B.md", "x")]);
        let mut session = Session::new(dir.path());
        let mut reports = Vec::new();
        build(&mut session, "A.md", &BuildOptions::default(), |p| {
            reports.push((p.phase, p.current));
        })
        .unwrap();
        // One scanning report up front, then one per parsed file.
        assert_eq!(reports[0].0, Phase::Scanning);
        let parses: Vec<_> = reports
            .iter()
            .filter(|(phase, _)| *phase == Phase::Parsing)
            .collect();
        assert_eq!(parses.len(), 2);
        assert_eq!(parses.last().unwrap().1, 2);
    }

    #[test]
    fn asset_references_stay_out_of_the_graph() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(
            dir.path(),
            &[
                ("A.md", "![pic](img.png) ![gone](missing.png) [[B]]"),
                ("img.png", "\u{89}PNG not really"),
                ("B.md", "x"),
            ],
        );
        let result = build_at(dir.path(), "A.md", 3, 100).unwrap();
        assert!(!result.contains("img.png"));
        assert!(!result.contains("missing.png"));
        assert!(doc(&result, "A.md").broken_links.is_empty());
        assert!(result.contains("B.md"));
    }

    #[test]
    fn self_link_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        make_tree(dir.path(), &[("A.md", "[[A]] [[B]]"), ("B.md", "x")]);
        let result = build_at(dir.path(), "A.md", 3, 100).unwrap();
        assert!(!result
            .edges
            .iter()
            .any(|e| e.source == e.target));
    }
}
