use super::signs::{has_pflicht_sign, has_traffic_sign};
use crate::model::TildaWay;
use radnetz_core::model::{DataSource, Fuehrung};

/// type of cycling guidance from the TILDA `category` and `traffic_sign`
/// tags. streets and paths collapse onto a fixed value, bikelanes map per
/// category.
pub fn determine_fuehrung(way: &TildaWay, data_source: DataSource) -> Fuehrung {
    match data_source {
        DataSource::Streets => return Fuehrung::Mischverkehr,
        DataSource::Paths => return Fuehrung::SonstigeWegeGruenflaechen,
        DataSource::Bikelanes => {}
    }

    let category = way.category_str();
    let traffic_sign = way.traffic_sign_str();

    match category {
        "cyclewayOnHighway_exclusive" | "cyclewayOnHighwayBetweenLanes" => {
            return Fuehrung::Radfahrstreifen
        }
        "sharedBusLaneBikeWithBus" => return Fuehrung::RadfahrstreifenMitLinienverkehr,
        "cyclewayOnHighwayProtected" => return Fuehrung::GeschuetzterRadfahrstreifen,
        "cyclewayOnHighway_advisory" => return Fuehrung::Schutzstreifen,
        "sharedBusLaneBusWithBike" => return Fuehrung::Bussonderfahrstreifen,
        "crossing" => return Fuehrung::TodoKreuzungsQuerung,
        "needsClarification" => return Fuehrung::TodoKlaerungNotwendig,
        _ => {}
    }

    if category.starts_with("bicycleRoad") {
        return Fuehrung::Fahrradstrasse;
    }
    if category.starts_with("footAndCyclewayShared") {
        return if has_traffic_sign(traffic_sign, "240") {
            Fuehrung::GemeinsamerGehUndRadweg
        } else {
            Fuehrung::Radweg
        };
    }
    if category.starts_with("footAndCyclewaySegregated")
        || category.starts_with("cyclewaySeparated")
        || category.starts_with("cycleway_adjoining")
    {
        return Fuehrung::Radweg;
    }
    if category.starts_with("footwayBicycleYes") {
        if has_traffic_sign(traffic_sign, "239") && has_traffic_sign(traffic_sign, "1022-10") {
            return Fuehrung::GehwegRadverkehrFrei;
        }
        if traffic_sign.is_empty() || traffic_sign.eq_ignore_ascii_case("none") {
            return Fuehrung::SonstigeWege;
        }
        return Fuehrung::TodoGehwegOhneVerkehrszeichen;
    }
    if category == "pedestrianAreaBicycleYes"
        && has_traffic_sign(traffic_sign, "242")
        && has_traffic_sign(traffic_sign, "1022-10")
    {
        return Fuehrung::FussgaengerzoneRadverkehrFrei;
    }

    log::warn!(
        "way {}: no guidance mapping for category='{}', traffic_sign='{}'",
        way.osm_id,
        category,
        traffic_sign
    );
    Fuehrung::TodoFuehrungFehlt
}

/// obligation to use the facility: Z237, Z240 or Z241 on a bikelane.
pub fn determine_pflicht(way: &TildaWay, data_source: DataSource) -> bool {
    match data_source {
        DataSource::Bikelanes => has_pflicht_sign(way.traffic_sign_str()),
        DataSource::Streets | DataSource::Paths => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn way(category: &str, traffic_sign: &str) -> TildaWay {
        TildaWay {
            osm_id: 1,
            category: Some(String::from(category)),
            traffic_sign: if traffic_sign.is_empty() {
                None
            } else {
                Some(String::from(traffic_sign))
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_fixed_sources() {
        let w = way("cyclewayOnHighway_exclusive", "");
        assert_eq!(
            determine_fuehrung(&w, DataSource::Streets),
            Fuehrung::Mischverkehr
        );
        assert_eq!(
            determine_fuehrung(&w, DataSource::Paths),
            Fuehrung::SonstigeWegeGruenflaechen
        );
    }

    #[test]
    fn test_bikelane_categories() {
        assert_eq!(
            determine_fuehrung(&way("cyclewayOnHighway_exclusive", ""), DataSource::Bikelanes),
            Fuehrung::Radfahrstreifen
        );
        assert_eq!(
            determine_fuehrung(&way("cyclewayOnHighwayProtected", ""), DataSource::Bikelanes),
            Fuehrung::GeschuetzterRadfahrstreifen
        );
        assert_eq!(
            determine_fuehrung(
                &way("bicycleRoad_vehicleDestination", ""),
                DataSource::Bikelanes
            ),
            Fuehrung::Fahrradstrasse
        );
        assert_eq!(
            determine_fuehrung(&way("cyclewaySeparated_isolated", ""), DataSource::Bikelanes),
            Fuehrung::Radweg
        );
    }

    #[test]
    fn test_shared_foot_and_cycleway_sign() {
        assert_eq!(
            determine_fuehrung(
                &way("footAndCyclewayShared_adjoining", "DE:240"),
                DataSource::Bikelanes
            ),
            Fuehrung::GemeinsamerGehUndRadweg
        );
        assert_eq!(
            determine_fuehrung(
                &way("footAndCyclewayShared_adjoining", ""),
                DataSource::Bikelanes
            ),
            Fuehrung::Radweg
        );
    }

    #[test]
    fn test_footway_bicycle_yes() {
        assert_eq!(
            determine_fuehrung(
                &way("footwayBicycleYes_adjoining", "DE:239,1022-10"),
                DataSource::Bikelanes
            ),
            Fuehrung::GehwegRadverkehrFrei
        );
        assert_eq!(
            determine_fuehrung(&way("footwayBicycleYes_adjoining", ""), DataSource::Bikelanes),
            Fuehrung::SonstigeWege
        );
        assert_eq!(
            determine_fuehrung(
                &way("footwayBicycleYes_adjoining", "DE:239"),
                DataSource::Bikelanes
            ),
            Fuehrung::TodoGehwegOhneVerkehrszeichen
        );
    }

    #[test]
    fn test_pedestrian_area() {
        assert_eq!(
            determine_fuehrung(
                &way("pedestrianAreaBicycleYes", "DE:242.1,1022-10"),
                DataSource::Bikelanes
            ),
            Fuehrung::FussgaengerzoneRadverkehrFrei
        );
    }

    #[test]
    fn test_unknown_category() {
        assert_eq!(
            determine_fuehrung(&way("somethingNew", ""), DataSource::Bikelanes),
            Fuehrung::TodoFuehrungFehlt
        );
    }

    #[test]
    fn test_pflicht() {
        assert!(determine_pflicht(&way("x", "DE:241"), DataSource::Bikelanes));
        assert!(!determine_pflicht(&way("x", "DE:239"), DataSource::Bikelanes));
        assert!(!determine_pflicht(&way("x", "DE:241"), DataSource::Streets));
    }
}
