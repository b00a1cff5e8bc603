//! Depth-first traversals over the internal model.
//!
//! The visitor receives the model mutably and may invert the connecting edge; each node's
//! adjacency lists are snapshotted before descending so such edits don't disturb the walk.

use super::SwimlaneModel;
use crate::identity::CellIx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub parent: Option<CellIx>,
    pub node: CellIx,
    pub edge: Option<CellIx>,
    pub layer: usize,
    /// The node had already been visited in this traversal.
    pub seen: bool,
}

impl SwimlaneModel {
    /// Runs a depth-first traversal from each root in turn, sharing one seen-set.
    ///
    /// With `track_ancestors`, nodes are fingerprinted as they are reached (see
    /// [`super::NodeData::is_ancestor_of`]) and the walk follows outgoing edges into the same or
    /// a higher lane plus incoming edges from a higher lane. Without it, only outgoing edges are
    /// followed.
    pub fn visit<F>(&mut self, roots: &[CellIx], track_ancestors: bool, visitor: &mut F)
    where
        F: FnMut(&mut SwimlaneModel, Visit),
    {
        let mut seen = vec![false; self.cell_count()];
        for (i, &root) in roots.iter().enumerate() {
            if self.node(root).is_none() {
                continue;
            }
            if track_ancestors {
                let stamp = self.dfs_count;
                if !seen[root.index()] {
                    if let Some(node) = self.node_mut(root) {
                        node.hash_code = vec![stamp, i as i32];
                    }
                }
                self.extended_dfs(None, root, None, visitor, &mut seen, 0, 0);
            } else {
                self.dfs(None, root, None, visitor, &mut seen, 0);
            }
        }
        self.dfs_count += 1;
    }

    fn dfs<F>(
        &mut self,
        parent: Option<CellIx>,
        root: CellIx,
        edge: Option<CellIx>,
        visitor: &mut F,
        seen: &mut [bool],
        layer: usize,
    ) where
        F: FnMut(&mut SwimlaneModel, Visit),
    {
        let visit = Visit {
            parent,
            node: root,
            edge,
            layer,
            seen: seen[root.index()],
        };
        if visit.seen {
            visitor(self, visit);
            return;
        }
        seen[root.index()] = true;
        visitor(self, visit);

        let outgoing = match self.node(root) {
            Some(node) => node.connects_as_source.clone(),
            None => return,
        };
        for e in outgoing {
            let Some(target) = self.edge(e).map(|edge| edge.target) else {
                continue;
            };
            self.dfs(Some(root), target, Some(e), visitor, seen, layer + 1);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn extended_dfs<F>(
        &mut self,
        parent: Option<CellIx>,
        root: CellIx,
        edge: Option<CellIx>,
        visitor: &mut F,
        seen: &mut [bool],
        child_hash: i32,
        layer: usize,
    ) where
        F: FnMut(&mut SwimlaneModel, Visit),
    {
        if let Some(p) = parent {
            let parent_hash = self
                .node(p)
                .map(|n| n.hash_code.clone())
                .unwrap_or_default();
            if let Some(node) = self.node_mut(root) {
                // A fingerprint from an earlier traversal starts with a different stamp.
                if node.hash_code.is_empty() || node.hash_code.first() != parent_hash.first() {
                    let mut hash = parent_hash;
                    hash.push(child_hash);
                    node.hash_code = hash;
                }
            }
        }

        let visit = Visit {
            parent,
            node: root,
            edge,
            layer,
            seen: seen[root.index()],
        };
        if visit.seen {
            visitor(self, visit);
            return;
        }
        seen[root.index()] = true;
        visitor(self, visit);

        let (outgoing, incoming) = match self.node(root) {
            Some(node) => (
                node.connects_as_source.clone(),
                node.connects_as_target.clone(),
            ),
            None => return,
        };
        let lane = self.lane(root);

        for (i, &e) in outgoing.iter().enumerate() {
            let Some(target) = self.edge(e).map(|edge| edge.target) else {
                continue;
            };
            if lane <= self.lane(target) {
                self.extended_dfs(Some(root), target, Some(e), visitor, seen, i as i32, layer + 1);
            }
        }
        // Child indices continue past the outgoing ones so sibling fingerprints stay distinct.
        for (i, &e) in incoming.iter().enumerate() {
            let Some(source) = self.edge(e).map(|edge| edge.source) else {
                continue;
            };
            if lane < self.lane(source) {
                let child_hash = (outgoing.len() + i) as i32;
                self.extended_dfs(Some(root), source, Some(e), visitor, seen, child_hash, layer + 1);
            }
        }
    }
}
