use geo::{BoundingRect, LineString, MultiLineString, Point, Rect};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

type IndexEntry = GeomWithData<Rectangle<(f64, f64)>, usize>;
type PointEntry = GeomWithData<(f64, f64), usize>;

/// bounding-box r-tree over a slice of line geometries. entries carry the
/// row index of the source collection; callers refine the bbox hits with
/// exact distance tests.
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
}

impl SpatialIndex {
    /// builds the index from a geometry collection. rows without a bounding
    /// box (empty geometries) are skipped.
    pub fn build<'a>(geometries: impl IntoIterator<Item = &'a MultiLineString<f64>>) -> SpatialIndex {
        let entries: Vec<IndexEntry> = geometries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, geometry)| {
                let Some(bbox) = geometry.bounding_rect() else {
                    log::warn!("row {} has no bounding box, not indexed", idx);
                    return None;
                };
                let rect = Rectangle::from_corners(bbox.min().x_y(), bbox.max().x_y());
                Some(GeomWithData::new(rect, idx))
            })
            .collect();
        SpatialIndex {
            tree: RTree::bulk_load(entries),
        }
    }

    /// row indices whose bounding box intersects `rect`, ascending for
    /// deterministic downstream iteration.
    pub fn query_rect(&self, rect: &Rect<f64>) -> Vec<usize> {
        let envelope = AABB::from_corners(rect.min().x_y(), rect.max().x_y());
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// row indices whose bounding box comes within `tolerance` of `point`.
    pub fn query_point(&self, point: &Point<f64>, tolerance: f64) -> Vec<usize> {
        let envelope = AABB::from_corners(
            (point.x() - tolerance, point.y() - tolerance),
            (point.x() + tolerance, point.y() + tolerance),
        );
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// same index over bare linestrings (probe segments etc.).
    pub fn build_linestrings<'a>(
        lines: impl IntoIterator<Item = &'a LineString<f64>>,
    ) -> SpatialIndex {
        let entries: Vec<IndexEntry> = lines
            .into_iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let bbox = line.bounding_rect()?;
                let rect = Rectangle::from_corners(bbox.min().x_y(), bbox.max().x_y());
                Some(GeomWithData::new(rect, idx))
            })
            .collect();
        SpatialIndex {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// r-tree over point geometries, used for node lookups within a tolerance.
pub struct PointIndex {
    tree: RTree<PointEntry>,
}

impl PointIndex {
    pub fn build<'a>(points: impl IntoIterator<Item = &'a Point<f64>>) -> PointIndex {
        let entries: Vec<PointEntry> = points
            .into_iter()
            .enumerate()
            .map(|(idx, p)| GeomWithData::new((p.x(), p.y()), idx))
            .collect();
        PointIndex {
            tree: RTree::bulk_load(entries),
        }
    }

    /// indices of points within `tolerance` of `point`, nearest first; ties
    /// break on the row index for determinism.
    pub fn within(&self, point: &Point<f64>, tolerance: f64) -> Vec<(usize, f64)> {
        let mut hits: Vec<(usize, f64)> = self
            .tree
            .locate_within_distance((point.x(), point.y()), tolerance * tolerance)
            .map(|entry| {
                let (x, y) = *entry.geom();
                let distance = ((x - point.x()).powi(2) + (y - point.y()).powi(2)).sqrt();
                (entry.data, distance)
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}

/// grows a rect by `distance` on every side, the query window for a
/// buffered search.
pub fn expand_rect(rect: &Rect<f64>, distance: f64) -> Rect<f64> {
    Rect::new(
        (rect.min().x - distance, rect.min().y - distance),
        (rect.max().x + distance, rect.max().y + distance),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    fn lines() -> Vec<MultiLineString<f64>> {
        vec![
            MultiLineString::new(vec![line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)]]),
            MultiLineString::new(vec![line_string![(x: 100.0, y: 100.0), (x: 110.0, y: 100.0)]]),
        ]
    }

    #[test]
    fn test_query_rect_hits_only_nearby() {
        let data = lines();
        let index = SpatialIndex::build(data.iter());
        let rect = Rect::new((-1.0, -1.0), (11.0, 1.0));
        let hits = index.query_rect(&rect);
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn test_query_point_tolerance() {
        let data = lines();
        let index = SpatialIndex::build(data.iter());
        assert_eq!(index.query_point(&Point::new(9.0, 0.5), 1.0), vec![0]);
        assert!(index.query_point(&Point::new(50.0, 50.0), 1.0).is_empty());
    }

    #[test]
    fn test_point_index_nearest_first() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(10.0, 10.0),
        ];
        let index = PointIndex::build(points.iter());
        let hits = index.within(&Point::new(0.4, 0.0), 1.0);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 1);
        assert!(index.within(&Point::new(5.0, 5.0), 1.0).is_empty());
    }
}
