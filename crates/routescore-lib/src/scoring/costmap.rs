use serde::Deserialize;

use crate::costmap::{is_lethal, CostmapHandle, LineIterator, MAX_NON_OBSTACLE};
use crate::graph::DirectionalEdge;

use super::scorer::{EdgeScorer, ScorerKind};

/// Options for [`CostmapScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostmapOptions {
    /// Aggregate the visited cells by maximum (`true`) or by average.
    pub use_maximum: bool,
    /// Reject edges crossing a lethal cell.
    pub invalid_on_collision: bool,
    /// Reject edges reaching outside the raster, or scored with no raster.
    /// When unset, out-of-bounds samples are excluded and a segment that
    /// misses the raster entirely costs zero.
    pub invalid_off_map: bool,
}

impl Default for CostmapOptions {
    fn default() -> Self {
        Self {
            use_maximum: true,
            invalid_on_collision: true,
            invalid_off_map: true,
        }
    }
}

/// Scores an edge by the raster cells its straight segment crosses.
///
/// Costs are normalized by [`MAX_NON_OBSTACLE`] and clamped to `[0, 1]`.
/// Every visited cell covers the same length along the segment's major
/// axis, so the plain mean over cells is the length-weighted average.
#[derive(Debug, Clone, Default)]
pub struct CostmapScorer {
    options: CostmapOptions,
    costmap: CostmapHandle,
}

impl CostmapScorer {
    pub fn new(options: CostmapOptions) -> Self {
        Self {
            options,
            costmap: CostmapHandle::new(),
        }
    }

    /// Scorer reading rasters from an existing feed.
    pub fn with_handle(options: CostmapOptions, costmap: CostmapHandle) -> Self {
        Self { options, costmap }
    }

    /// Feed through which rasters reach this scorer.
    pub fn costmap_handle(&self) -> CostmapHandle {
        self.costmap.clone()
    }

    fn off_map(&self) -> Option<f64> {
        if self.options.invalid_off_map {
            None
        } else {
            Some(0.0)
        }
    }
}

impl EdgeScorer for CostmapScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Costmap
    }

    fn score(&self, edge: &DirectionalEdge<'_>) -> Option<f64> {
        let Some(costmap) = self.costmap.current() else {
            return self.off_map();
        };

        let (start, end) = match (
            costmap.world_to_map(&edge.start.coords),
            costmap.world_to_map(&edge.end.coords),
        ) {
            (Some(start), Some(end)) => (start, end),
            _ if self.options.invalid_off_map => return None,
            // Only the stretch inside the raster is sampled.
            _ => match costmap.clip_to_map(&edge.start.coords, &edge.end.coords) {
                Some(cells) => cells,
                None => return Some(0.0),
            },
        };

        let mut max_cost = 0u8;
        let mut total = 0u64;
        let mut cells = 0u64;
        for cell in LineIterator::new(start, end) {
            let cost = costmap.cost(cell);
            if self.options.invalid_on_collision && is_lethal(cost) {
                return None;
            }
            max_cost = max_cost.max(cost);
            total += u64::from(cost);
            cells += 1;
        }

        let raw = if self.options.use_maximum {
            f64::from(max_cost)
        } else {
            total as f64 / cells.max(1) as f64
        };

        Some((raw / f64::from(MAX_NON_OBSTACLE)).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costmap::{Costmap, MapCell, LETHAL_OBSTACLE};
    use crate::graph::{Coordinates, Node};

    fn strip_map() -> Costmap {
        let mut map =
            Costmap::new(10, 1, 1.0, Coordinates::default(), 0).expect("valid costmap");
        for x in 0..5 {
            map.set_cost(MapCell::new(x, 0), 126);
        }
        map
    }

    #[test]
    fn missing_raster_blocks_by_default() {
        let a = Node::new(1, 0.5, 0.5);
        let b = Node::new(2, 2.5, 0.5);
        let edge = DirectionalEdge::new(1, &a, &b);
        assert_eq!(CostmapScorer::default().score(&edge), None);
    }

    #[test]
    fn missing_raster_is_free_when_off_map_allowed() {
        let a = Node::new(1, 0.5, 0.5);
        let b = Node::new(2, 2.5, 0.5);
        let edge = DirectionalEdge::new(1, &a, &b);
        let scorer = CostmapScorer::new(CostmapOptions {
            invalid_off_map: false,
            ..CostmapOptions::default()
        });
        assert_eq!(scorer.score(&edge), Some(0.0));
    }

    #[test]
    fn average_covers_every_visited_cell() {
        let scorer = CostmapScorer::new(CostmapOptions {
            use_maximum: false,
            ..CostmapOptions::default()
        });
        scorer.costmap_handle().replace(strip_map());

        // Cells 0..=9: five at 126, five free.
        let a = Node::new(1, 0.5, 0.5);
        let b = Node::new(2, 9.5, 0.5);
        let edge = DirectionalEdge::new(1, &a, &b);
        assert_eq!(scorer.score(&edge), Some(63.0 / 252.0));
    }

    #[test]
    fn lethal_cell_clamps_to_one_when_collisions_allowed() {
        let mut map = strip_map();
        map.set_cost(MapCell::new(7, 0), LETHAL_OBSTACLE);
        let scorer = CostmapScorer::new(CostmapOptions {
            invalid_on_collision: false,
            ..CostmapOptions::default()
        });
        scorer.costmap_handle().replace(map);

        let a = Node::new(1, 6.5, 0.5);
        let b = Node::new(2, 8.5, 0.5);
        let edge = DirectionalEdge::new(1, &a, &b);
        assert_eq!(scorer.score(&edge), Some(1.0));
    }

    #[test]
    fn partly_off_map_segment_samples_cells_inside() {
        let mut map = strip_map();
        map.set_cost(MapCell::new(2, 0), LETHAL_OBSTACLE);
        let tolerant = CostmapOptions {
            invalid_off_map: false,
            ..CostmapOptions::default()
        };
        let scorer = CostmapScorer::new(tolerant);
        scorer.costmap_handle().replace(map);

        let outside = Node::new(1, -4.0, 0.5);
        let blocked = Node::new(2, 3.5, 0.5);
        let edge = DirectionalEdge::new(1, &outside, &blocked);
        assert_eq!(scorer.score(&edge), None);

        let averaging = CostmapScorer::with_handle(
            CostmapOptions {
                use_maximum: false,
                ..tolerant
            },
            scorer.costmap_handle(),
        );
        // Cells 5..=9 are free, cell 4 costs 126; the stretch past x = 10 is excluded.
        let inside = Node::new(1, 4.5, 0.5);
        let beyond = Node::new(2, 30.0, 0.5);
        let edge = DirectionalEdge::new(1, &inside, &beyond);
        assert_eq!(averaging.score(&edge), Some(21.0 / 252.0));
    }

    #[test]
    fn options_reject_unknown_fields() {
        let parsed: Result<CostmapOptions, _> =
            serde_json::from_str(r#"{"use_maximun": false}"#);
        assert!(parsed.is_err());
    }
}
