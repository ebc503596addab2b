mod angle;
mod buffer;
mod coverage;
mod merge;
mod split;

pub use angle::{angle_difference, is_left, line_angle, linestring_angle, normalized_angle_difference};
pub use buffer::{buffer_line, buffer_linestring, buffer_network, circle, union_all, CapStyle};
pub use coverage::{
    coverage_fraction, covered_by, endpoints, length_of, line_distance, lines_from_geometry,
    linestring_length, midpoint, point_distance, reverse_line,
};
pub use merge::linemerge;
pub use split::{split_line, split_linestring};
