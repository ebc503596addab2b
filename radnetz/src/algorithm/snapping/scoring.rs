use radnetz_core::model::{Direction, Verkehrsrichtung};
use radnetz_osm::model::TranslatedWay;
use radnetz_osm::translate::signs::has_traffic_sign;
use std::cmp::Ordering;

// obligation signs rank above most categories on their own
const SIGN_PRIORITY: i32 = 3;
const PRIORITY_SIGNS: [&str; 3] = ["237", "240", "241"];

/// matching priority of a candidate way, the max of its traffic-sign and
/// category priorities.
pub fn candidate_priority(way: &TranslatedWay) -> i32 {
    let traffic_sign = way.tilda_traffic_sign();
    let sign_priority = if PRIORITY_SIGNS
        .iter()
        .any(|sign| has_traffic_sign(traffic_sign, sign))
    {
        SIGN_PRIORITY
    } else {
        0
    };
    sign_priority.max(category_priority(way.tilda_category()))
}

fn category_priority(category: &str) -> i32 {
    if category.starts_with("bicycleRoad") || category.starts_with("cycleway") {
        6
    } else if category.starts_with("footAndCycleway") {
        5
    } else if category.starts_with("footwayBicycle") {
        4
    } else if category == "sharedBusLaneBikeWithBus" {
        3
    } else if category == "sharedBusLaneBusWithBike" || category == "pedestrianAreaBicycleYes" {
        2
    } else if category == "sharedMotorVehicleLane" {
        1
    } else {
        0
    }
}

/// one distance-filtered candidate of a segment, with the scores the
/// per-direction selection ranks on.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub way: &'a TranslatedWay,
    /// euclidean distance from the segment midpoint to the way
    pub distance: f64,
    /// bearing difference between way and segment in [0, 180]
    pub angle_diff: f64,
    pub priority: i32,
}

impl<'a> ScoredCandidate<'a> {
    /// the direction of the segment this candidate is drawn in: within 90°
    /// of the segment bearing it runs along it, beyond it runs against it.
    pub fn orientation(&self) -> Direction {
        if self.angle_diff < 90.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    pub fn is_oneway(&self) -> bool {
        self.way.attributes.verkehrsri == Some(Verkehrsrichtung::Einrichtungsverkehr)
    }

    pub fn is_dual_carriageway(&self) -> bool {
        self.way.tilda_oneway() == "yes_dual_carriageway"
    }

    /// direction compatibility: a one-way candidate only serves the
    /// direction it is drawn in (10), a two-way candidate serves both (1).
    pub fn compatibility(&self, ri: Direction) -> u8 {
        if self.is_oneway() {
            if self.orientation() == ri {
                10
            } else {
                0
            }
        } else {
            1
        }
    }
}

/// total order over candidates for one direction: compatibility desc,
/// priority desc, midpoint distance asc, then osm id for stability.
pub fn compare_for_direction(
    a: &ScoredCandidate,
    b: &ScoredCandidate,
    ri: Direction,
) -> Ordering {
    b.compatibility(ri)
        .cmp(&a.compatibility(ri))
        .then(b.priority.cmp(&a.priority))
        .then(a.distance.total_cmp(&b.distance))
        .then(a.way.osm_id.cmp(&b.way.osm_id))
}

/// best usable candidate for a direction. candidates incompatible with the
/// direction (one-way the other way) are not usable at all.
pub fn best_for_direction<'a, 'b>(
    candidates: &'b [ScoredCandidate<'a>],
    ri: Direction,
) -> Option<&'b ScoredCandidate<'a>> {
    candidates
        .iter()
        .filter(|c| c.compatibility(ri) > 0)
        .min_by(|a, b| compare_for_direction(a, b, ri))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, MultiLineString};
    use radnetz_core::model::{DataSource, NormalizedAttributes};
    use std::collections::BTreeMap;

    fn way(
        osm_id: i64,
        category: &str,
        traffic_sign: &str,
        verkehrsri: Verkehrsrichtung,
    ) -> TranslatedWay {
        let mut tilda = BTreeMap::new();
        if !category.is_empty() {
            tilda.insert(String::from("tilda_category"), String::from(category));
        }
        if !traffic_sign.is_empty() {
            tilda.insert(String::from("tilda_traffic_sign"), String::from(traffic_sign));
        }
        let mut attributes = NormalizedAttributes::no_infrastructure();
        attributes.verkehrsri = Some(verkehrsri);
        TranslatedWay {
            osm_id,
            data_source: DataSource::Bikelanes,
            attributes,
            bemerkung: None,
            manual_action: None,
            tilda,
            geometry: MultiLineString::new(vec![line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]]),
        }
    }

    #[test]
    fn test_category_priorities() {
        let w = way(1, "bicycleRoad", "", Verkehrsrichtung::Zweirichtungsverkehr);
        assert_eq!(candidate_priority(&w), 6);
        let w = way(1, "cyclewayOnHighway_exclusive", "", Verkehrsrichtung::Zweirichtungsverkehr);
        assert_eq!(candidate_priority(&w), 6);
        let w = way(1, "footwayBicycleYes_adjoining", "", Verkehrsrichtung::Zweirichtungsverkehr);
        assert_eq!(candidate_priority(&w), 4);
        let w = way(1, "sharedMotorVehicleLane", "", Verkehrsrichtung::Zweirichtungsverkehr);
        assert_eq!(candidate_priority(&w), 1);
    }

    #[test]
    fn test_sign_priority_combines_by_max() {
        // a low category with an obligation sign climbs to 3
        let w = way(1, "sharedMotorVehicleLane", "DE:241", Verkehrsrichtung::Zweirichtungsverkehr);
        assert_eq!(candidate_priority(&w), 3);
        // a high category is not dragged down by the sign
        let w = way(1, "cyclewaySeparated", "DE:241", Verkehrsrichtung::Zweirichtungsverkehr);
        assert_eq!(candidate_priority(&w), 6);
    }

    #[test]
    fn test_compatibility() {
        let oneway = way(1, "", "", Verkehrsrichtung::Einrichtungsverkehr);
        let candidate = ScoredCandidate {
            way: &oneway,
            distance: 1.0,
            angle_diff: 10.0,
            priority: 0,
        };
        assert_eq!(candidate.compatibility(Direction::Forward), 10);
        assert_eq!(candidate.compatibility(Direction::Reverse), 0);

        let reversed = ScoredCandidate {
            way: &oneway,
            distance: 1.0,
            angle_diff: 170.0,
            priority: 0,
        };
        assert_eq!(reversed.orientation(), Direction::Reverse);
        assert_eq!(reversed.compatibility(Direction::Reverse), 10);

        let twoway = way(2, "", "", Verkehrsrichtung::Zweirichtungsverkehr);
        let candidate = ScoredCandidate {
            way: &twoway,
            distance: 1.0,
            angle_diff: 10.0,
            priority: 0,
        };
        assert_eq!(candidate.compatibility(Direction::Forward), 1);
        assert_eq!(candidate.compatibility(Direction::Reverse), 1);
    }

    #[test]
    fn test_selection_order() {
        let far_priority = way(1, "cyclewaySeparated", "", Verkehrsrichtung::Zweirichtungsverkehr);
        let near_plain = way(2, "", "", Verkehrsrichtung::Zweirichtungsverkehr);
        let candidates = vec![
            ScoredCandidate {
                way: &near_plain,
                distance: 1.0,
                angle_diff: 5.0,
                priority: candidate_priority(&near_plain),
            },
            ScoredCandidate {
                way: &far_priority,
                distance: 20.0,
                angle_diff: 5.0,
                priority: candidate_priority(&far_priority),
            },
        ];
        // priority beats distance
        let best = best_for_direction(&candidates, Direction::Forward).unwrap();
        assert_eq!(best.way.osm_id, 1);
    }

    #[test]
    fn test_stable_tie_break_on_osm_id() {
        let a = way(5, "", "", Verkehrsrichtung::Zweirichtungsverkehr);
        let b = way(3, "", "", Verkehrsrichtung::Zweirichtungsverkehr);
        let candidates = vec![
            ScoredCandidate { way: &a, distance: 2.0, angle_diff: 5.0, priority: 0 },
            ScoredCandidate { way: &b, distance: 2.0, angle_diff: 5.0, priority: 0 },
        ];
        let best = best_for_direction(&candidates, Direction::Forward).unwrap();
        assert_eq!(best.way.osm_id, 3);
    }
}
