use crate::model::{Side, TildaWay};
use radnetz_core::model::Protektion;

const PROTECTED_CATEGORY: &str = "cyclewayOnHighwayProtected";

/// physical protection of a protected bike lane. any other category has no
/// protection. within the protected category both sides are walked and the
/// first match wins.
pub fn determine_protek(way: &TildaWay) -> Protektion {
    if way.category_str() != PROTECTED_CATEGORY {
        return Protektion::Ohne;
    }

    for side in Side::BOTH {
        let separation = lower(way.separation_for(side));
        let traffic_mode = lower(way.traffic_mode_for(side));
        let markings = lower(way.markings_for(side));
        let barred_area = markings.contains("barred_area");

        if traffic_mode == "parking" && barred_area {
            return Protektion::RuhenderVerkehr;
        }

        match separation.as_str() {
            "bollard" => return Protektion::Poller,
            "bump" => return Protektion::Schwellen,
            "vertical_panel" => return Protektion::Leitboys,
            "planter" | "guard_rail" => return Protektion::Sonstige,
            "no" => return Protektion::Ohne,
            _ => {}
        }

        if barred_area && separation == "no" {
            return Protektion::NurSperrflaeche;
        }
    }

    log::warn!("way {}: no protection type found", way.osm_id);
    Protektion::TodoProtektionstypFehlt
}

fn lower(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}
