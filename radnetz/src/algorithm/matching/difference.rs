use radnetz_core::geometry::{buffer_network, coverage_fraction, CapStyle};
use radnetz_osm::model::TranslatedWay;

/// overlap avoidance between the combined data sources: drops every base
/// way that lies mostly (>= `fraction`) inside the buffer around the
/// subtrahend collection.
pub fn subtract_by_buffer(
    base: Vec<TranslatedWay>,
    subtract: &[TranslatedWay],
    buffer_meters: f64,
    fraction: f64,
) -> Vec<TranslatedWay> {
    if subtract.is_empty() {
        return base;
    }
    let buffer = buffer_network(
        subtract.iter().map(|w| &w.geometry),
        buffer_meters,
        CapStyle::Round,
    );
    let before = base.len();
    let result: Vec<TranslatedWay> = base
        .into_iter()
        .filter(|way| coverage_fraction(&way.geometry, &buffer) < fraction)
        .collect();
    log::info!(
        "difference: removed {} of {} ways inside the {}m buffer",
        before - result.len(),
        before,
        buffer_meters
    );
    result
}
