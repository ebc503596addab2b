use super::width::parse_width;
use crate::model::{Side, TildaWay};
use radnetz_core::model::Trennstreifen;

// minimum buffer width in meters for a separation strip to count
const MIN_BUFFER_METERS: f64 = 0.6;

/// safety separation strip towards parked cars. bicycle roads check both
/// sides for parking with a painted line; everything else looks at the
/// right side only and requires a buffer of at least 0.6 m.
pub fn determine_trennstreifen(way: &TildaWay) -> Trennstreifen {
    if way.category_str().starts_with("bicycleRoad") {
        return bicycle_road_rule(way);
    }

    let traffic_mode_right = way
        .traffic_mode_for(Side::Right)
        .map(|v| v.trim().to_lowercase())
        .unwrap_or_default();
    if traffic_mode_right != "parking" {
        return Trennstreifen::Entfaellt;
    }

    let buffer_right = way.buffer_for(Side::Right).and_then(parse_width);
    match buffer_right {
        Some(buffer) if buffer >= MIN_BUFFER_METERS => Trennstreifen::Ja,
        _ => Trennstreifen::Nein,
    }
}

fn bicycle_road_rule(way: &TildaWay) -> Trennstreifen {
    let mut any_parking = false;
    for side in Side::BOTH {
        let traffic_mode = way
            .traffic_mode_for(side)
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default();
        if traffic_mode != "parking" {
            continue;
        }
        any_parking = true;
        let markings = way
            .markings_for(side)
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default();
        if markings.contains("dashed_line") || markings.contains("solid_line") {
            return Trennstreifen::Ja;
        }
    }
    if any_parking {
        Trennstreifen::Nein
    } else {
        Trennstreifen::Entfaellt
    }
}
