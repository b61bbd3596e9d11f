//! Deterministic diagram layout.
//!
//! Turns a built graph plus a chosen center into absolute 2D positions:
//! depth-grouped columns fanning left and right of the center, alphabetical
//! within each column, and a separate single-row cluster for external-link
//! nodes below the graph. Pure function of its inputs — re-run wholly on
//! every change, which is fine at bounded node counts.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::model::{Adjacency, GraphEdge, GraphNode};

/// Fixed node width in canvas cells; height depends on content.
pub const NODE_WIDTH: f32 = 28.0;
/// Horizontal offset between successive depth columns. Wider than a node so
/// columns never overlap.
pub const LEVEL_DX: f32 = 38.0;
/// Vertical gap between stacked nodes in a column.
pub const V_GAP: f32 = 2.0;
/// Gap between the lowest graph node and the external cluster row.
pub const EXTERNAL_GAP: f32 = 5.0;
/// Horizontal gap between external nodes in the cluster row.
pub const EXTERNAL_H_GAP: f32 = 3.0;
/// Padding added around the extreme positions when computing bounds.
pub const BOUNDS_PADDING: f32 = 4.0;

/// Which column a laid-out node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Center,
    Left,
    Right,
    External,
}

/// A graph node with its computed position and transient UI flags.
#[derive(Debug, Clone)]
pub struct LaidOutNode {
    pub node: GraphNode,
    /// Center coordinates in canvas space.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Hop distance from the center node (0 = center).
    pub depth: usize,
    pub side: Side,
    pub selected: bool,
    pub focused: bool,
}

impl LaidOutNode {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (x - self.x).abs() <= self.width / 2.0 && (y - self.y).abs() <= self.height / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nodes: Vec<LaidOutNode>,
    /// Edges surviving the inside-out filter, deduplicated per unordered pair.
    pub edges: Vec<GraphEdge>,
    pub bounds: Bounds,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LaidOutNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct LayoutParams {
    /// Requested center; resolved fuzzily, see [`resolve_center`].
    pub center: String,
    pub max_depth: usize,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub show_external: bool,
    /// Preview text is truncated to this many characters before sizing.
    pub preview_chars: usize,
}

/// Resolve the center request against the node set.
///
/// The cascade is deliberately lenient — callers disagree about relative-path
/// conventions, so each tier exists to tolerate a looser spelling:
/// 1. exact id match
/// 2. path match (suffix on a `/` boundary)
/// 3. filename-only match
/// 4. case-insensitive basename match ignoring extension
/// 5. any document node at all
///
/// `None` only when there are no document nodes.
pub fn resolve_center<'a>(nodes: &'a [GraphNode], center: &str) -> Option<&'a GraphNode> {
    let docs: Vec<&GraphNode> = nodes.iter().filter(|n| n.is_document()).collect();
    if docs.is_empty() {
        return None;
    }
    let wanted = center.trim_start_matches("./");

    if let Some(node) = docs.iter().find(|n| n.id == wanted) {
        return Some(node);
    }
    if let Some(node) = docs.iter().find(|n| path_suffix_match(&n.id, wanted)) {
        return Some(node);
    }
    let wanted_base = basename(wanted);
    if let Some(node) = docs.iter().find(|n| basename(&n.id) == wanted_base) {
        return Some(node);
    }
    let wanted_stem = stem(wanted_base);
    if let Some(node) = docs
        .iter()
        .find(|n| stem(basename(&n.id)).eq_ignore_ascii_case(wanted_stem))
    {
        return Some(node);
    }
    Some(docs[0])
}

fn path_suffix_match(path: &str, wanted: &str) -> bool {
    path == wanted
        || path
            .strip_suffix(wanted)
            .map(|rest| rest.ends_with('/'))
            .unwrap_or(false)
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn stem(base: &str) -> &str {
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}

/// Compute the layout. See the module docs for the shape it produces.
pub fn layout(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    adjacency: &Adjacency,
    params: &LayoutParams,
) -> Layout {
    let Some(center) = resolve_center(nodes, &params.center) else {
        return Layout::default();
    };

    let by_id: HashMap<&str, &GraphNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    // Bounded BFS from the resolved center assigns depths; unreached nodes
    // are excluded entirely. Depth is hop distance over document links only:
    // external nodes sit outside the column structure and must not act as
    // shortcuts between documents that merely share a domain.
    let mut depths: HashMap<&str, usize> = HashMap::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    depths.insert(&center.id, 0);
    queue.push_back((&center.id, 0));
    while let Some((id, depth)) = queue.pop_front() {
        if depth >= params.max_depth {
            continue;
        }
        let Some(neighbors) = adjacency.get(id) else {
            continue;
        };
        for next in neighbors {
            let is_doc = by_id
                .get(next.as_str())
                .map(|n| n.is_document())
                .unwrap_or(false);
            if !is_doc {
                continue;
            }
            if !depths.contains_key(next.as_str()) {
                depths.insert(next, depth + 1);
                queue.push_back((next, depth + 1));
            }
        }
    }

    let mut sizer = SizeCache::new(params.preview_chars);

    let cx = params.canvas_width / 2.0;
    let cy = params.canvas_height / 2.0;

    let mut placed: Vec<LaidOutNode> = Vec::new();
    let (cw, ch) = sizer.measure(center);
    placed.push(LaidOutNode {
        node: center.clone(),
        x: cx,
        y: cy,
        width: cw,
        height: ch,
        depth: 0,
        side: Side::Center,
        selected: false,
        focused: false,
    });

    for depth in 1..=params.max_depth {
        let mut level: Vec<&GraphNode> = depths
            .iter()
            .filter(|(_, d)| **d == depth)
            .filter_map(|(id, _)| by_id.get(id).copied())
            .filter(|n| n.is_document())
            .collect();
        if level.is_empty() {
            continue;
        }
        level.sort_by(|a, b| a.label().cmp(b.label()).then_with(|| a.id.cmp(&b.id)));

        let half = level.len().div_ceil(2);
        let (left, right) = level.split_at(half);
        place_column(&mut placed, left, depth, Side::Left, cx - LEVEL_DX * depth as f32, cy, &mut sizer);
        place_column(&mut placed, right, depth, Side::Right, cx + LEVEL_DX * depth as f32, cy, &mut sizer);
    }

    if params.show_external {
        place_external_row(&mut placed, nodes, adjacency, &mut sizer);
    }

    let placed_ids: HashSet<&str> = placed.iter().map(|n| n.node.id.as_str()).collect();
    let depth_of: HashMap<&str, usize> =
        placed.iter().map(|n| (n.node.id.as_str(), n.depth)).collect();
    let edges = filter_edges(edges, &placed_ids, &depth_of, &by_id);

    let bounds = compute_bounds(&placed);

    Layout {
        nodes: placed,
        edges,
        bounds,
    }
}

fn place_column(
    placed: &mut Vec<LaidOutNode>,
    column: &[&GraphNode],
    depth: usize,
    side: Side,
    x: f32,
    center_y: f32,
    sizer: &mut SizeCache,
) {
    if column.is_empty() {
        return;
    }
    let sizes: Vec<(f32, f32)> = column.iter().map(|n| sizer.measure(n)).collect();
    let total: f32 =
        sizes.iter().map(|(_, h)| h).sum::<f32>() + V_GAP * (column.len() - 1) as f32;

    // The whole column is vertically centered on the center node's y.
    let mut cursor = center_y - total / 2.0;
    for (node, (w, h)) in column.iter().zip(sizes) {
        placed.push(LaidOutNode {
            node: (*node).clone(),
            x,
            y: cursor + h / 2.0,
            width: w,
            height: h,
            depth,
            side,
            selected: false,
            focused: false,
        });
        cursor += h + V_GAP;
    }
}

fn place_external_row(
    placed: &mut Vec<LaidOutNode>,
    nodes: &[GraphNode],
    adjacency: &Adjacency,
    sizer: &mut SizeCache,
) {
    let placed_ids: HashSet<&str> = placed.iter().map(|n| n.node.id.as_str()).collect();

    // An external node joins the cluster when any of its sources is on screen.
    let mut externals: Vec<&GraphNode> = nodes
        .iter()
        .filter(|n| !n.is_document())
        .filter(|n| {
            adjacency
                .get(&n.id)
                .map(|neighbors| neighbors.iter().any(|id| placed_ids.contains(id.as_str())))
                .unwrap_or(false)
        })
        .collect();
    if externals.is_empty() {
        return;
    }
    externals.sort_by(|a, b| a.label().cmp(b.label()));

    let lowest = placed
        .iter()
        .map(|n| n.bottom())
        .fold(f32::NEG_INFINITY, f32::max);
    let row_y = lowest + EXTERNAL_GAP;

    let sizes: Vec<(f32, f32)> = externals.iter().map(|n| sizer.measure(n)).collect();
    let total_w: f32 =
        sizes.iter().map(|(w, _)| w).sum::<f32>() + EXTERNAL_H_GAP * (externals.len() - 1) as f32;
    let center_x = placed
        .iter()
        .find(|n| n.side == Side::Center)
        .map(|n| n.x)
        .unwrap_or(0.0);

    let mut cursor = center_x - total_w / 2.0;
    for (node, (w, h)) in externals.iter().zip(sizes) {
        placed.push(LaidOutNode {
            node: (*node).clone(),
            x: cursor + w / 2.0,
            y: row_y + h / 2.0,
            width: w,
            height: h,
            depth: usize::MAX,
            side: Side::External,
            selected: false,
            focused: false,
        });
        cursor += w + EXTERNAL_H_GAP;
    }
}

/// Inside-out edge filter: keep edges between adjacent depth levels, plus any
/// edge touching an external node. Long-range edges would cross several
/// columns and visually tangle the diagram, so they are dropped. Duplicate
/// edges between the same unordered pair collapse to one.
fn filter_edges(
    edges: &[GraphEdge],
    placed_ids: &HashSet<&str>,
    depth_of: &HashMap<&str, usize>,
    by_id: &HashMap<&str, &GraphNode>,
) -> Vec<GraphEdge> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut kept = Vec::new();

    for edge in edges {
        if !placed_ids.contains(edge.source.as_str()) || !placed_ids.contains(edge.target.as_str())
        {
            continue;
        }
        let touches_external = by_id
            .get(edge.source.as_str())
            .map(|n| !n.is_document())
            .unwrap_or(false)
            || by_id
                .get(edge.target.as_str())
                .map(|n| !n.is_document())
                .unwrap_or(false);
        if !touches_external {
            let ds = depth_of[edge.source.as_str()];
            let dt = depth_of[edge.target.as_str()];
            if ds.abs_diff(dt) != 1 {
                continue;
            }
        }
        let key = if edge.source <= edge.target {
            (edge.source.clone(), edge.target.clone())
        } else {
            (edge.target.clone(), edge.source.clone())
        };
        if seen.insert(key) {
            kept.push(edge.clone());
        }
    }
    kept
}

fn compute_bounds(placed: &[LaidOutNode]) -> Bounds {
    if placed.is_empty() {
        return Bounds::default();
    }
    let mut bounds = Bounds {
        min_x: f32::INFINITY,
        min_y: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        max_y: f32::NEG_INFINITY,
    };
    for n in placed {
        bounds.min_x = bounds.min_x.min(n.x - n.width / 2.0);
        bounds.max_x = bounds.max_x.max(n.x + n.width / 2.0);
        bounds.min_y = bounds.min_y.min(n.top());
        bounds.max_y = bounds.max_y.max(n.bottom());
    }
    bounds.min_x -= BOUNDS_PADDING;
    bounds.min_y -= BOUNDS_PADDING;
    bounds.max_x += BOUNDS_PADDING;
    bounds.max_y += BOUNDS_PADDING;
    bounds
}

/// Memoizes measured node sizes per id within one layout call, so a node
/// referenced from several passes is sized once.
struct SizeCache {
    preview_chars: usize,
    sizes: HashMap<String, (f32, f32)>,
}

impl SizeCache {
    fn new(preview_chars: usize) -> Self {
        Self {
            preview_chars,
            sizes: HashMap::new(),
        }
    }

    fn measure(&mut self, node: &GraphNode) -> (f32, f32) {
        if let Some(size) = self.sizes.get(&node.id) {
            return *size;
        }
        let size = match &node.payload {
            crate::graph::model::NodePayload::Document(doc) => {
                let inner = NODE_WIDTH as usize - 4;
                let preview_len = doc
                    .preview
                    .as_ref()
                    .map(|p| p.chars().count().min(self.preview_chars))
                    .unwrap_or(0);
                let preview_rows = preview_len.div_ceil(inner);
                // borders + title row + preview rows
                (NODE_WIDTH, (3 + preview_rows) as f32)
            }
            crate::graph::model::NodePayload::External(ext) => {
                let w = (ext.domain.chars().count() + 6).max(14) as f32;
                (w, 3.0)
            }
        };
        self.sizes.insert(node.id.clone(), size);
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{adjacency, doc_node, ExternalNode, GraphNode};

    fn params(center: &str) -> LayoutParams {
        LayoutParams {
            center: center.to_string(),
            max_depth: 3,
            canvas_width: 200.0,
            canvas_height: 100.0,
            show_external: true,
            preview_chars: 120,
        }
    }

    fn chain() -> (Vec<GraphNode>, Vec<GraphEdge>) {
        let nodes = vec![
            doc_node("notes/A.md"),
            doc_node("notes/B.md"),
            doc_node("notes/C.md"),
        ];
        let edges = vec![
            GraphEdge::internal("notes/A.md", "notes/B.md"),
            GraphEdge::internal("notes/B.md", "notes/C.md"),
        ];
        (nodes, edges)
    }

    #[test]
    fn center_resolution_cascade() {
        let (nodes, _) = chain();
        // exact id
        assert_eq!(resolve_center(&nodes, "notes/B.md").unwrap().id, "notes/B.md");
        // path suffix
        assert_eq!(resolve_center(&nodes, "B.md").unwrap().id, "notes/B.md");
        // filename only with leading ./
        assert_eq!(resolve_center(&nodes, "./notes/C.md").unwrap().id, "notes/C.md");
        // case-insensitive stem, different extension
        assert_eq!(resolve_center(&nodes, "c.markdown").unwrap().id, "notes/C.md");
        // arbitrary fallback rather than failure
        assert_eq!(resolve_center(&nodes, "zzz-missing.md").unwrap().id, "notes/A.md");
    }

    #[test]
    fn no_document_nodes_means_empty_layout() {
        let ext = GraphNode::external(ExternalNode {
            domain: "example.com".into(),
            link_count: 1,
            urls: vec!["https://example.com".into()],
        });
        let nodes = vec![ext];
        let adj = adjacency(&nodes, &[]);
        let result = layout(&nodes, &[], &adj, &params("anything"));
        assert!(result.nodes.is_empty());
        assert_eq!(result.bounds, Bounds::default());
    }

    #[test]
    fn center_is_at_depth_zero() {
        let (nodes, edges) = chain();
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("notes/B.md"));
        let center = result.node("notes/B.md").unwrap();
        assert_eq!(center.depth, 0);
        assert_eq!(center.side, Side::Center);
    }

    #[test]
    fn depth_limit_excludes_unreached_nodes() {
        let (nodes, edges) = chain();
        let adj = adjacency(&nodes, &edges);
        let mut p = params("notes/A.md");
        p.max_depth = 1;
        let result = layout(&nodes, &edges, &adj, &p);
        assert!(result.node("notes/B.md").is_some());
        assert!(result.node("notes/C.md").is_none());
    }

    #[test]
    fn sibling_columns_never_overlap_vertically() {
        let mut nodes = vec![doc_node("hub.md")];
        let mut edges = Vec::new();
        for i in 0..9 {
            let path = format!("n{i}.md");
            nodes.push(doc_node(&path));
            edges.push(GraphEdge::internal("hub.md", path));
        }
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("hub.md"));

        for a in &result.nodes {
            for b in &result.nodes {
                if a.node.id >= b.node.id || a.side != b.side || a.depth != b.depth {
                    continue;
                }
                let separated = a.bottom() <= b.top() || b.bottom() <= a.top();
                assert!(
                    separated,
                    "{} and {} overlap vertically",
                    a.node.id, b.node.id
                );
            }
        }
    }

    #[test]
    fn level_splits_alphabetically_left_then_right() {
        let nodes = vec![
            doc_node("hub.md"),
            doc_node("alpha.md"),
            doc_node("beta.md"),
            doc_node("gamma.md"),
        ];
        let edges = vec![
            GraphEdge::internal("hub.md", "alpha.md"),
            GraphEdge::internal("hub.md", "beta.md"),
            GraphEdge::internal("hub.md", "gamma.md"),
        ];
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("hub.md"));
        let cx = result.node("hub.md").unwrap().x;
        // ceil(3/2) = 2 to the left, 1 to the right.
        assert!(result.node("alpha.md").unwrap().x < cx);
        assert!(result.node("beta.md").unwrap().x < cx);
        assert!(result.node("gamma.md").unwrap().x > cx);
    }

    #[test]
    fn layout_is_idempotent() {
        let (nodes, edges) = chain();
        let adj = adjacency(&nodes, &edges);
        let p = params("notes/A.md");
        let first = layout(&nodes, &edges, &adj, &p);
        let second = layout(&nodes, &edges, &adj, &p);
        assert_eq!(first.nodes.len(), second.nodes.len());
        for (a, b) in first.nodes.iter().zip(&second.nodes) {
            assert_eq!(a.node.id, b.node.id);
            assert_eq!((a.x, a.y, a.width, a.height), (b.x, b.y, b.width, b.height));
        }
    }

    #[test]
    fn inside_out_filter_drops_same_depth_edges() {
        let nodes = vec![doc_node("hub.md"), doc_node("a.md"), doc_node("b.md")];
        let edges = vec![
            GraphEdge::internal("hub.md", "a.md"),
            GraphEdge::internal("hub.md", "b.md"),
            // a and b both land at depth 1; this edge would cross the center.
            GraphEdge::internal("a.md", "b.md"),
        ];
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("hub.md"));
        assert_eq!(result.edges.len(), 2);
        assert!(!result
            .edges
            .iter()
            .any(|e| e.source == "a.md" && e.target == "b.md"));
    }

    #[test]
    fn duplicate_unordered_pairs_collapse() {
        let nodes = vec![doc_node("a.md"), doc_node("b.md")];
        let edges = vec![
            GraphEdge::internal("a.md", "b.md"),
            GraphEdge::internal("b.md", "a.md"),
        ];
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("a.md"));
        assert_eq!(result.edges.len(), 1);
    }

    #[test]
    fn external_cluster_sits_below_and_sorts_by_domain() {
        let mut nodes = vec![doc_node("a.md")];
        nodes.push(GraphNode::external(ExternalNode {
            domain: "zeta.org".into(),
            link_count: 1,
            urls: vec!["https://zeta.org".into()],
        }));
        nodes.push(GraphNode::external(ExternalNode {
            domain: "alpha.com".into(),
            link_count: 1,
            urls: vec!["https://alpha.com".into()],
        }));
        let edges = vec![
            GraphEdge::external("a.md", "external:zeta.org"),
            GraphEdge::external("a.md", "external:alpha.com"),
        ];
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("a.md"));

        let doc_bottom = result.node("a.md").unwrap().bottom();
        let alpha = result.node("external:alpha.com").unwrap();
        let zeta = result.node("external:zeta.org").unwrap();
        assert!(alpha.top() > doc_bottom);
        assert!(zeta.top() > doc_bottom);
        assert!(alpha.x < zeta.x, "alphabetical by domain, left to right");
        assert_eq!(alpha.side, Side::External);
    }

    #[test]
    fn shared_domain_is_not_a_depth_shortcut() {
        // a -> b -> c -> z, with a and z both linking the same domain. z is
        // three document hops from a; the shared external node must not pull
        // it inside a depth limit of two.
        let mut nodes = vec![
            doc_node("a.md"),
            doc_node("b.md"),
            doc_node("c.md"),
            doc_node("z.md"),
        ];
        nodes.push(GraphNode::external(ExternalNode {
            domain: "x.com".into(),
            link_count: 2,
            urls: vec!["https://x.com/1".into(), "https://x.com/2".into()],
        }));
        let edges = vec![
            GraphEdge::internal("a.md", "b.md"),
            GraphEdge::internal("b.md", "c.md"),
            GraphEdge::internal("c.md", "z.md"),
            GraphEdge::external("a.md", "external:x.com"),
            GraphEdge::external("z.md", "external:x.com"),
        ];
        let adj = adjacency(&nodes, &edges);

        let mut p = params("a.md");
        p.max_depth = 2;
        for show_external in [false, true] {
            p.show_external = show_external;
            let result = layout(&nodes, &edges, &adj, &p);
            assert!(
                result.node("z.md").is_none(),
                "z.md leaked inside the depth limit (show_external={show_external})"
            );
            assert!(result.node("c.md").is_some());
        }
    }

    #[test]
    fn external_nodes_hidden_on_request() {
        let mut nodes = vec![doc_node("a.md")];
        nodes.push(GraphNode::external(ExternalNode {
            domain: "example.com".into(),
            link_count: 1,
            urls: vec!["https://example.com/x".into()],
        }));
        let edges = vec![GraphEdge::external("a.md", "external:example.com")];
        let adj = adjacency(&nodes, &edges);
        let mut p = params("a.md");
        p.show_external = false;
        let result = layout(&nodes, &edges, &adj, &p);
        assert!(result.node("external:example.com").is_none());
        assert!(result.edges.is_empty());
    }

    #[test]
    fn bounds_cover_every_node() {
        let (nodes, edges) = chain();
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("notes/A.md"));
        for n in &result.nodes {
            assert!(n.x - n.width / 2.0 >= result.bounds.min_x);
            assert!(n.x + n.width / 2.0 <= result.bounds.max_x);
            assert!(n.top() >= result.bounds.min_y);
            assert!(n.bottom() <= result.bounds.max_y);
        }
    }

    #[test]
    fn preview_length_changes_node_height() {
        let mut short = doc_node("a.md");
        if let crate::graph::model::NodePayload::Document(doc) = &mut short.payload {
            doc.preview = Some("word".into());
        }
        let mut long = doc_node("b.md");
        if let crate::graph::model::NodePayload::Document(doc) = &mut long.payload {
            doc.preview = Some("x".repeat(200));
        }
        let nodes = vec![short, long];
        let edges = vec![GraphEdge::internal("a.md", "b.md")];
        let adj = adjacency(&nodes, &edges);
        let result = layout(&nodes, &edges, &adj, &params("a.md"));
        let a = result.node("a.md").unwrap();
        let b = result.node("b.md").unwrap();
        assert!(b.height > a.height);
    }
}
