use crate::io::lists::read_way_ids;
use radnetz_osm::model::{ManualAction, TranslatedWay};
use std::collections::BTreeSet;
use std::path::Path;

/// manual include/exclude lists for the matching stage.
#[derive(Debug, Default, Clone)]
pub struct ManualLists {
    pub exclude: BTreeSet<i64>,
    pub include: BTreeSet<i64>,
}

impl ManualLists {
    pub fn load(exclude_path: &Path, include_path: &Path) -> ManualLists {
        let exclude = read_way_ids(exclude_path);
        let include = read_way_ids(include_path);
        log::info!(
            "manual interventions: {} excluded, {} included way ids",
            exclude.len(),
            include.len()
        );
        ManualLists { exclude, include }
    }
}

/// applies the manual overrides to a matched set. excluded ways are
/// dropped, included ways are pulled in from the full input collection.
/// returns the adjusted set plus the audit rows (every way stamped with
/// its `manual_action`).
pub fn apply_manual_interventions(
    matched: Vec<TranslatedWay>,
    all_ways: &[TranslatedWay],
    lists: &ManualLists,
) -> (Vec<TranslatedWay>, Vec<TranslatedWay>) {
    let mut audit: Vec<TranslatedWay> = Vec::new();

    let initial_count = matched.len();
    let mut result: Vec<TranslatedWay> = Vec::with_capacity(matched.len());
    for way in matched {
        if lists.exclude.contains(&way.osm_id) {
            let mut removed = way;
            removed.manual_action = Some(ManualAction::Removed);
            audit.push(removed);
        } else {
            result.push(way);
        }
    }
    if initial_count != result.len() {
        log::info!("manually excluded {} ways", initial_count - result.len());
    }

    let present: BTreeSet<i64> = result.iter().map(|w| w.osm_id).collect();
    let mut added_count = 0;
    for way in all_ways {
        if lists.include.contains(&way.osm_id) && !present.contains(&way.osm_id) {
            let mut added = way.clone();
            added.manual_action = Some(ManualAction::Added);
            audit.push(added.clone());
            result.push(added);
            added_count += 1;
        }
    }
    if added_count > 0 {
        log::info!("manually added {} ways", added_count);
    }

    (result, audit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, MultiLineString};
    use radnetz_core::model::{DataSource, NormalizedAttributes};
    use std::collections::BTreeMap;

    fn way(osm_id: i64) -> TranslatedWay {
        TranslatedWay {
            osm_id,
            data_source: DataSource::Bikelanes,
            attributes: NormalizedAttributes::no_infrastructure(),
            bemerkung: None,
            manual_action: None,
            tilda: BTreeMap::new(),
            geometry: MultiLineString::new(vec![line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]]),
        }
    }

    #[test]
    fn test_exclude_and_include() {
        let matched = vec![way(1), way(2)];
        let all_ways = vec![way(1), way(2), way(3)];
        let lists = ManualLists {
            exclude: BTreeSet::from([2]),
            include: BTreeSet::from([3]),
        };

        let (result, audit) = apply_manual_interventions(matched, &all_ways, &lists);
        let ids: Vec<i64> = result.iter().map(|w| w.osm_id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert_eq!(audit.len(), 2);
        assert_eq!(audit[0].osm_id, 2);
        assert_eq!(audit[0].manual_action, Some(ManualAction::Removed));
        assert_eq!(audit[1].osm_id, 3);
        assert_eq!(audit[1].manual_action, Some(ManualAction::Added));
    }

    #[test]
    fn test_include_does_not_duplicate() {
        let matched = vec![way(1)];
        let all_ways = vec![way(1)];
        let lists = ManualLists {
            exclude: BTreeSet::new(),
            include: BTreeSet::from([1]),
        };

        let (result, audit) = apply_manual_interventions(matched, &all_ways, &lists);
        assert_eq!(result.len(), 1);
        assert!(audit.is_empty());
    }
}
