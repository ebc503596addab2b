use crate::model::TildaWay;
use radnetz_core::model::{DataSource, Verkehrsrichtung};

/// direction of cycling traffic from the `oneway` / `oneway_bicycle` tags.
pub fn determine_verkehrsrichtung(way: &TildaWay, data_source: DataSource) -> Verkehrsrichtung {
    let oneway = way.oneway.as_deref().map(str::trim).unwrap_or("");

    match data_source {
        DataSource::Bikelanes => match oneway {
            "yes" => Verkehrsrichtung::Einrichtungsverkehr,
            "no" | "car_not_bike" => Verkehrsrichtung::Zweirichtungsverkehr,
            "assumed_no" => Verkehrsrichtung::TodoVermutlichNein,
            "implicit_yes" => Verkehrsrichtung::TodoVermutlichEinrichtung,
            "" => Verkehrsrichtung::TodoFehlenderWert,
            other => {
                log::warn!(
                    "way {}: unexpected oneway value '{}', treating as missing",
                    way.osm_id,
                    other
                );
                Verkehrsrichtung::TodoFehlenderWert
            }
        },
        DataSource::Streets | DataSource::Paths => {
            if oneway.is_empty() || oneway == "nil" {
                return Verkehrsrichtung::Zweirichtungsverkehr;
            }
            if way.oneway_bicycle.as_deref().map(str::trim) == Some("no") {
                return Verkehrsrichtung::Zweirichtungsverkehr;
            }
            match oneway {
                "yes" | "yes_dual_carriageway" => Verkehrsrichtung::Einrichtungsverkehr,
                "no" => Verkehrsrichtung::Zweirichtungsverkehr,
                other => {
                    log::warn!(
                        "way {}: unexpected oneway value '{}', assuming two-way",
                        way.osm_id,
                        other
                    );
                    Verkehrsrichtung::Zweirichtungsverkehr
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn way(oneway: Option<&str>, oneway_bicycle: Option<&str>) -> TildaWay {
        TildaWay {
            osm_id: 1,
            oneway: oneway.map(String::from),
            oneway_bicycle: oneway_bicycle.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_bikelanes() {
        assert_eq!(
            determine_verkehrsrichtung(&way(Some("yes"), None), DataSource::Bikelanes),
            Verkehrsrichtung::Einrichtungsverkehr
        );
        assert_eq!(
            determine_verkehrsrichtung(&way(Some("car_not_bike"), None), DataSource::Bikelanes),
            Verkehrsrichtung::Zweirichtungsverkehr
        );
        assert_eq!(
            determine_verkehrsrichtung(&way(Some("assumed_no"), None), DataSource::Bikelanes),
            Verkehrsrichtung::TodoVermutlichNein
        );
        assert_eq!(
            determine_verkehrsrichtung(&way(None, None), DataSource::Bikelanes),
            Verkehrsrichtung::TodoFehlenderWert
        );
    }

    #[test]
    fn test_streets_oneway_bicycle_override() {
        assert_eq!(
            determine_verkehrsrichtung(&way(Some("yes"), Some("no")), DataSource::Streets),
            Verkehrsrichtung::Zweirichtungsverkehr
        );
        assert_eq!(
            determine_verkehrsrichtung(&way(Some("yes"), None), DataSource::Streets),
            Verkehrsrichtung::Einrichtungsverkehr
        );
        assert_eq!(
            determine_verkehrsrichtung(
                &way(Some("yes_dual_carriageway"), None),
                DataSource::Streets
            ),
            Verkehrsrichtung::Einrichtungsverkehr
        );
        assert_eq!(
            determine_verkehrsrichtung(&way(None, None), DataSource::Paths),
            Verkehrsrichtung::Zweirichtungsverkehr
        );
    }
}
