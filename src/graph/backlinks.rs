//! Background backlink discovery.
//!
//! After the initial graph is on screen, this scanner walks the whole
//! document tree looking for files that link *into* the already-loaded set.
//! It is a tick-driven state machine: the owner calls [`BacklinkScanner::tick`]
//! between event polls, each tick handles a bounded slice of files and then
//! yields, so large trees never starve interactive use. Cancellation is
//! cooperative — a polled flag checked at every tick.

use std::collections::HashSet;

use log::debug;

use crate::cache::ReverseIndex;
use crate::graph::model::{DocumentNode, GraphEdge, GraphNode, GraphResult};
use crate::scanner::tree;
use crate::session::Session;

/// Files examined per tick before yielding back to the event loop.
const FILES_PER_TICK: usize = 16;
/// Discovered updates are flushed once this many are pending.
const BATCH_SIZE: usize = 8;

/// One discovered backlink source: a new node plus one edge per target it
/// links to inside the loaded set.
#[derive(Debug, Clone)]
pub struct BacklinkUpdate {
    pub node: GraphNode,
    pub edges: Vec<GraphEdge>,
}

/// What one tick produced.
#[derive(Debug, Clone)]
pub enum ScanStep {
    /// A flushed batch of updates. Batches already delivered stay valid even
    /// if the scan is cancelled afterwards.
    Batch(Vec<BacklinkUpdate>),
    /// Still working; nothing to flush yet.
    Progress { scanned: usize, total: usize },
    /// The scan finished. Delivered at most once; never after `cancel`.
    Done,
}

enum ScanState {
    /// Directory walk not performed yet.
    NotStarted,
    Scanning { files: Vec<String>, cursor: usize },
    Finished,
}

pub struct BacklinkScanner {
    state: ScanState,
    loaded: HashSet<String>,
    cancelled: bool,
    done_sent: bool,
    pending: Vec<BacklinkUpdate>,
    /// Target path -> source paths, built as a side product and installed
    /// into the cache on completion.
    reverse: ReverseIndex,
}

impl BacklinkScanner {
    /// Prepare a scan for the documents already present in `result`.
    pub fn new(result: &GraphResult) -> Self {
        Self {
            state: ScanState::NotStarted,
            loaded: result.loaded_paths().into_iter().collect(),
            cancelled: false,
            done_sent: false,
            pending: Vec::new(),
            reverse: ReverseIndex::new(),
        }
    }

    /// Request cancellation. Idempotent; after this, `tick` emits nothing —
    /// not even the completion step.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Advance the scan by one cooperative slice.
    ///
    /// Returns `None` once the scan has fully completed (or was cancelled);
    /// callers drop the scanner at that point.
    pub fn tick(&mut self, session: &mut Session) -> Option<ScanStep> {
        if self.cancelled {
            // Cancellation is a normal early return: no further emission,
            // not even the completion step.
            self.state = ScanState::Finished;
            self.done_sent = true;
            self.pending.clear();
            return None;
        }

        match &mut self.state {
            ScanState::NotStarted => {
                // A valid reverse index from an earlier completed scan lets us
                // skip the walk and go straight to the candidate sources.
                if let Some(index) = session.cache.take_reverse_index() {
                    let mut files: Vec<String> = index
                        .iter()
                        .filter(|(target, _)| self.loaded.contains(*target))
                        .flat_map(|(_, sources)| sources.iter().cloned())
                        .filter(|s| !self.loaded.contains(s))
                        .collect();
                    files.sort();
                    files.dedup();
                    debug!("backlink scan fast path: {} candidates", files.len());
                    self.reverse = index;
                    self.state = ScanState::Scanning { files, cursor: 0 };
                    return Some(ScanStep::Progress {
                        scanned: 0,
                        total: self.candidate_total(),
                    });
                }

                let files = match tree::scan(session.root()) {
                    Ok(files) => files,
                    Err(err) => {
                        // Internal failure still completes exactly once.
                        debug!("backlink scan failed to walk tree: {err:#}");
                        self.state = ScanState::Finished;
                        self.done_sent = true;
                        return Some(ScanStep::Done);
                    }
                };
                let total = files.len();
                self.state = ScanState::Scanning { files, cursor: 0 };
                Some(ScanStep::Progress { scanned: 0, total })
            }

            ScanState::Scanning { files, cursor } => {
                let end = (*cursor + FILES_PER_TICK).min(files.len());
                let slice: Vec<String> = files[*cursor..end].to_vec();
                let scanned = end;
                let total = files.len();
                *cursor = end;
                let finished = end == total;

                for rel in &slice {
                    self.examine(session, rel);
                }

                if self.pending.len() >= BATCH_SIZE || (finished && !self.pending.is_empty()) {
                    let batch = std::mem::take(&mut self.pending);
                    if finished {
                        // Completion itself is delivered by the next tick so
                        // the final batch and Done stay distinct steps.
                        self.finish(session);
                    }
                    return Some(ScanStep::Batch(batch));
                }
                if finished {
                    self.finish(session);
                    self.done_sent = true;
                    return Some(ScanStep::Done);
                }
                Some(ScanStep::Progress { scanned, total })
            }

            ScanState::Finished => {
                if self.done_sent {
                    None
                } else {
                    self.done_sent = true;
                    Some(ScanStep::Done)
                }
            }
        }
    }

    fn candidate_total(&self) -> usize {
        match &self.state {
            ScanState::Scanning { files, .. } => files.len(),
            _ => 0,
        }
    }

    fn examine(&mut self, session: &mut Session, rel: &str) {
        // Cheap path first: the cached parse gives us the outgoing links
        // without re-reading an unchanged file.
        let Some(parsed) = session.parse(rel) else {
            return;
        };

        // Index every file's outgoing links, loaded ones included: the next
        // scan may run against a different loaded set, and a file that is on
        // screen now can be a backlink source then.
        for target in &parsed.link_targets {
            self.reverse
                .entry(target.clone())
                .or_default()
                .insert(rel.to_string());
        }

        if self.loaded.contains(rel) {
            return;
        }

        let matches: Vec<String> = parsed
            .link_targets
            .iter()
            .filter(|t| self.loaded.contains(*t))
            .cloned()
            .collect();
        if matches.is_empty() {
            return;
        }

        let node = GraphNode::document(DocumentNode::from_parsed(&parsed));
        let edges = matches
            .into_iter()
            .map(|target| GraphEdge::internal(rel.to_string(), target))
            .collect();
        self.loaded.insert(rel.to_string());
        self.pending.push(BacklinkUpdate { node, edges });
    }

    fn finish(&mut self, session: &mut Session) {
        self.state = ScanState::Finished;
        session
            .cache
            .set_reverse_index(std::mem::take(&mut self.reverse));
    }
}

/// Drive a scanner to completion synchronously, collecting every update.
/// Used by the non-interactive CLI path and tests.
pub fn run_to_completion(
    scanner: &mut BacklinkScanner,
    session: &mut Session,
) -> (Vec<BacklinkUpdate>, usize) {
    let mut updates = Vec::new();
    let mut completions = 0;
    loop {
        match scanner.tick(session) {
            Some(ScanStep::Batch(mut batch)) => updates.append(&mut batch),
            Some(ScanStep::Progress { .. }) => {}
            Some(ScanStep::Done) => completions += 1,
            None => break,
        }
    }
    (updates, completions)
}
