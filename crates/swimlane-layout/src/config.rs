//! Layout configuration.
//!
//! Passed explicitly to [`crate::SwimlaneLayout`]; there are no global style registries.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Where rank 0 is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Rank 0 at the top, ranks grow downwards.
    #[default]
    North,
    /// Rank 0 at the bottom.
    South,
    /// Rank 0 on the right.
    East,
    /// Rank 0 on the left.
    West,
}

impl Orientation {
    /// Whether the rank axis is horizontal in host coordinates.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::East | Orientation::West)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub orientation: Orientation,
    /// Gap between neighbouring cells of one rank.
    pub intra_cell_spacing: f64,
    /// Gap between the tallest cells of two adjacent ranks.
    pub inter_rank_cell_spacing: f64,
    /// Offset added to the returned extent when placing a following hierarchy.
    pub inter_hierarchy_spacing: f64,
    pub parallel_edge_spacing: f64,
    pub parent_border: f64,
    pub resize_parent: bool,
    pub move_parent: bool,
    pub maintain_parent_location: bool,
    pub disable_edge_style: bool,
    pub traverse_ancestors: bool,
    pub tighten_to_source: bool,
    pub fine_tuning: bool,
    /// Width of the placeholder inserted into empty lanes.
    pub dummy_vertex_width: f64,
    pub max_crossing_iterations: usize,
    pub crossing_iterations_without_improvement: usize,
    pub max_placement_iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::North,
            intra_cell_spacing: 30.0,
            inter_rank_cell_spacing: 100.0,
            inter_hierarchy_spacing: 60.0,
            parallel_edge_spacing: 10.0,
            parent_border: 0.0,
            resize_parent: false,
            move_parent: false,
            maintain_parent_location: false,
            disable_edge_style: true,
            traverse_ancestors: true,
            tighten_to_source: true,
            fine_tuning: true,
            dummy_vertex_width: 50.0,
            max_crossing_iterations: 24,
            crossing_iterations_without_improvement: 2,
            max_placement_iterations: 8,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let spacings = [
            ("intraCellSpacing", self.intra_cell_spacing),
            ("interRankCellSpacing", self.inter_rank_cell_spacing),
            ("interHierarchySpacing", self.inter_hierarchy_spacing),
            ("parallelEdgeSpacing", self.parallel_edge_spacing),
            ("parentBorder", self.parent_border),
            ("dummyVertexWidth", self.dummy_vertex_width),
        ];
        for (name, value) in spacings {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidSpacing { name, value });
            }
        }
        Ok(())
    }
}
