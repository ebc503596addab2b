use crate::model::TildaWay;
use radnetz_core::model::Oberflaeche;

/// surface material from the OSM `surface` value. unknown values are
/// reported and fall back to the NICHT-GEFUNDEN diagnostic.
pub fn determine_ofm(way: &TildaWay) -> Oberflaeche {
    let surface = way
        .surface
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    match surface.as_str() {
        "" | "none" => Oberflaeche::TodoFehlt,
        "asphalt" => Oberflaeche::Asphalt,
        "concrete" | "concrete:plates" | "concrete:lanes" => Oberflaeche::Beton,
        "paving_stones" | "mosaic_sett" | "small_sett" | "large_sett" => Oberflaeche::Gepflastert,
        "sett" | "cobblestone" | "bricks" | "stone" => Oberflaeche::Kopfsteinpflaster,
        "unpaved" | "ground" | "grass" | "sand" | "compacted" | "fine_gravel" | "pebblestone"
        | "gravel" => Oberflaeche::Ungebunden,
        "grass_paver" | "wood" | "metal" | "paved" => Oberflaeche::TodoNichtZuordenbar,
        other => {
            log::warn!("way {}: unknown surface value '{}'", way.osm_id, other);
            Oberflaeche::NichtGefunden
        }
    }
}

/// whether the facility carries a continuous colour coating.
pub fn determine_farbe(way: &TildaWay) -> bool {
    matches!(
        way.surface_color
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .as_deref(),
        Some("red") | Some("green")
    )
}
