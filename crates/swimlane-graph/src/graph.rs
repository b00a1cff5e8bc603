//! Arena-backed cell model.
//!
//! Cells live in a `Vec` slot arena and are addressed by [`CellId`]. Removed cells leave an empty
//! slot behind so handles held elsewhere never alias a newer cell.

use crate::error::{Error, Result};
use crate::host::{EdgeStyle, HostGraph};
use crate::{CellId, Geometry, Point, Rect};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Root,
    Layer,
    Vertex,
    Edge,
}

#[derive(Debug, Clone)]
struct CellEntry {
    kind: CellKind,
    label: Option<String>,
    parent: Option<CellId>,
    children: Vec<CellId>,
    geometry: Option<Geometry>,
    visible: bool,
    collapsed: bool,
    style: EdgeStyle,
    source: Option<CellId>,
    target: Option<CellId>,
    edges: Vec<CellId>,
}

impl CellEntry {
    fn new(kind: CellKind, parent: Option<CellId>) -> Self {
        Self {
            kind,
            label: None,
            parent,
            children: Vec::new(),
            geometry: None,
            visible: true,
            collapsed: false,
            style: EdgeStyle::default(),
            source: None,
            target: None,
            edges: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CellGraph {
    cells: Vec<Option<CellEntry>>,
    labels: HashMap<String, CellId>,
    root: CellId,
    default_parent: CellId,
    update_level: usize,
    updates_closed: usize,
}

impl Default for CellGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CellGraph {
    pub fn new() -> Self {
        let mut g = Self {
            cells: Vec::new(),
            labels: HashMap::default(),
            root: CellId(0),
            default_parent: CellId(0),
            update_level: 0,
            updates_closed: 0,
        };
        g.root = g.push(CellEntry::new(CellKind::Root, None));
        g.default_parent = g.push(CellEntry::new(CellKind::Layer, Some(g.root)));
        g
    }

    /// The layer new top-level cells are usually inserted into.
    pub fn default_parent(&self) -> CellId {
        self.default_parent
    }

    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn kind(&self, cell: CellId) -> Option<CellKind> {
        self.entry(cell).map(|e| e.kind)
    }

    pub fn label(&self, cell: CellId) -> Option<&str> {
        self.entry(cell).and_then(|e| e.label.as_deref())
    }

    /// Looks a cell up by the label it was inserted with.
    pub fn find(&self, label: &str) -> Option<CellId> {
        self.labels.get(label).copied()
    }

    pub fn style(&self, cell: CellId) -> EdgeStyle {
        self.entry(cell).map(|e| e.style).unwrap_or_default()
    }

    pub fn edge_points(&self, edge: CellId) -> Vec<Point> {
        self.entry(edge)
            .and_then(|e| e.geometry.as_ref())
            .map(|g| g.points.clone())
            .unwrap_or_default()
    }

    /// Number of `end_update` calls that closed an outermost transaction.
    pub fn completed_updates(&self) -> usize {
        self.updates_closed
    }

    pub fn add_vertex(
        &mut self,
        parent: CellId,
        label: impl Into<String>,
        bounds: Rect,
    ) -> Result<CellId> {
        self.require_container(parent)?;
        let id = self.attach(CellKind::Vertex, parent, Some(Geometry::new(bounds)));
        self.set_label(id, label.into());
        Ok(id)
    }

    /// Adds a port: a vertex child of `owner` with relative geometry.
    pub fn add_port(&mut self, owner: CellId, label: impl Into<String>) -> Result<CellId> {
        match self.kind(owner) {
            Some(CellKind::Vertex) => {}
            Some(_) => return Err(Error::NotAVertex { cell: owner }),
            None => return Err(Error::UnknownCell { cell: owner }),
        }
        let geometry = Geometry::relative(Rect::new(1.0, 0.5, 0.0, 0.0));
        let id = self.attach(CellKind::Vertex, owner, Some(geometry));
        self.set_label(id, label.into());
        Ok(id)
    }

    pub fn add_edge(
        &mut self,
        parent: CellId,
        label: impl Into<String>,
        source: CellId,
        target: CellId,
    ) -> Result<CellId> {
        self.require_container(parent)?;
        for terminal in [source, target] {
            match self.kind(terminal) {
                Some(CellKind::Vertex) => {}
                Some(_) => return Err(Error::InvalidTerminal { cell: terminal }),
                None => return Err(Error::UnknownCell { cell: terminal }),
            }
        }
        let id = self.attach(CellKind::Edge, parent, Some(Geometry::default()));
        self.set_label(id, label.into());
        if let Some(e) = self.entry_mut(id) {
            e.source = Some(source);
            e.target = Some(target);
        }
        if let Some(s) = self.entry_mut(source) {
            s.edges.push(id);
        }
        if source != target {
            if let Some(t) = self.entry_mut(target) {
                t.edges.push(id);
            }
        }
        Ok(id)
    }

    pub fn set_visible(&mut self, cell: CellId, visible: bool) -> Result<()> {
        let entry = self
            .entry_mut(cell)
            .ok_or(Error::UnknownCell { cell })?;
        entry.visible = visible;
        Ok(())
    }

    pub fn set_collapsed(&mut self, cell: CellId, collapsed: bool) -> Result<()> {
        let entry = self
            .entry_mut(cell)
            .ok_or(Error::UnknownCell { cell })?;
        if entry.kind != CellKind::Vertex {
            return Err(Error::NotAVertex { cell });
        }
        entry.collapsed = collapsed;
        Ok(())
    }

    /// Absolute bounds of a vertex: its geometry offset by every ancestor's origin.
    pub fn absolute_bounds(&self, cell: CellId) -> Option<Rect> {
        let mut rect = self.entry(cell)?.geometry.as_ref()?.bounds;
        let mut cur = self.parent(cell);
        while let Some(p) = cur {
            if let Some(geo) = self.entry(p).and_then(|e| e.geometry.as_ref()) {
                rect.x += geo.bounds.x;
                rect.y += geo.bounds.y;
            }
            cur = self.parent(p);
        }
        Some(rect)
    }

    fn require_container(&self, parent: CellId) -> Result<()> {
        match self.kind(parent) {
            Some(CellKind::Edge) => Err(Error::NotAVertex { cell: parent }),
            Some(_) => Ok(()),
            None => Err(Error::UnknownCell { cell: parent }),
        }
    }

    fn set_label(&mut self, cell: CellId, label: String) {
        if label.is_empty() {
            return;
        }
        self.labels.insert(label.clone(), cell);
        if let Some(e) = self.entry_mut(cell) {
            e.label = Some(label);
        }
    }

    fn push(&mut self, entry: CellEntry) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(Some(entry));
        id
    }

    fn attach(&mut self, kind: CellKind, parent: CellId, geometry: Option<Geometry>) -> CellId {
        let mut entry = CellEntry::new(kind, Some(parent));
        entry.geometry = geometry;
        let id = self.push(entry);
        if let Some(p) = self.entry_mut(parent) {
            p.children.push(id);
        }
        id
    }

    fn entry(&self, cell: CellId) -> Option<&CellEntry> {
        self.cells.get(cell.index()).and_then(|c| c.as_ref())
    }

    fn entry_mut(&mut self, cell: CellId) -> Option<&mut CellEntry> {
        self.cells.get_mut(cell.index()).and_then(|c| c.as_mut())
    }

    fn collect_removal(&self, cell: CellId, out: &mut Vec<CellId>) {
        let Some(entry) = self.entry(cell) else {
            return;
        };
        if out.contains(&cell) {
            return;
        }
        out.push(cell);
        for &edge in &entry.edges {
            self.collect_removal(edge, out);
        }
        for &child in &entry.children {
            self.collect_removal(child, out);
        }
    }
}

impl HostGraph for CellGraph {
    fn root(&self) -> CellId {
        self.root
    }

    fn contains(&self, cell: CellId) -> bool {
        self.entry(cell).is_some()
    }

    fn parent(&self, cell: CellId) -> Option<CellId> {
        self.entry(cell).and_then(|e| e.parent)
    }

    fn children(&self, cell: CellId) -> Vec<CellId> {
        self.entry(cell)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    fn is_vertex(&self, cell: CellId) -> bool {
        self.kind(cell) == Some(CellKind::Vertex)
    }

    fn is_edge(&self, cell: CellId) -> bool {
        self.kind(cell) == Some(CellKind::Edge)
    }

    fn is_visible(&self, cell: CellId) -> bool {
        self.entry(cell).is_some_and(|e| e.visible)
    }

    fn is_collapsed(&self, cell: CellId) -> bool {
        self.entry(cell).is_some_and(|e| e.collapsed)
    }

    fn connected_edges(&self, cell: CellId) -> Vec<CellId> {
        self.entry(cell).map(|e| e.edges.clone()).unwrap_or_default()
    }

    fn terminal(&self, edge: CellId, source: bool) -> Option<CellId> {
        let e = self.entry(edge)?;
        if source { e.source } else { e.target }
    }

    fn geometry(&self, cell: CellId) -> Option<Geometry> {
        self.entry(cell).and_then(|e| e.geometry.clone())
    }

    fn set_geometry(&mut self, cell: CellId, geometry: Geometry) {
        if let Some(e) = self.entry_mut(cell) {
            e.geometry = Some(geometry);
        }
    }

    fn insert_vertex(&mut self, parent: CellId, bounds: Rect) -> CellId {
        self.attach(CellKind::Vertex, parent, Some(Geometry::new(bounds)))
    }

    fn remove_cells(&mut self, cells: &[CellId]) {
        let mut doomed: Vec<CellId> = Vec::new();
        for &cell in cells {
            self.collect_removal(cell, &mut doomed);
        }

        for &cell in &doomed {
            let Some(entry) = self.cells.get_mut(cell.index()).and_then(Option::take) else {
                continue;
            };
            if let Some(label) = entry.label.as_deref() {
                if self.labels.get(label) == Some(&cell) {
                    self.labels.remove(label);
                }
            }
            if let Some(p) = entry.parent.and_then(|p| self.entry_mut(p)) {
                p.children.retain(|c| *c != cell);
            }
            for terminal in [entry.source, entry.target].into_iter().flatten() {
                if let Some(t) = self.entry_mut(terminal) {
                    t.edges.retain(|e| *e != cell);
                }
            }
        }
    }

    fn move_cells(&mut self, cells: &[CellId], dx: f64, dy: f64) {
        for &cell in cells {
            if let Some(geo) = self.entry_mut(cell).and_then(|e| e.geometry.as_mut()) {
                geo.translate(dx, dy);
            }
        }
    }

    fn set_edge_style(&mut self, edge: CellId, style: EdgeStyle) {
        if let Some(e) = self.entry_mut(edge) {
            if e.kind == CellKind::Edge {
                e.style = style;
            }
        }
    }

    fn begin_update(&mut self) {
        self.update_level += 1;
    }

    fn end_update(&mut self) {
        if self.update_level == 0 {
            return;
        }
        self.update_level -= 1;
        if self.update_level == 0 {
            self.updates_closed += 1;
        }
    }

    fn update_level(&self) -> usize {
        self.update_level
    }
}
