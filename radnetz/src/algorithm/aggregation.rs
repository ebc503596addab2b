use crate::config::PipelineConfiguration;
use geo::{BooleanOps, MultiPolygon};
use itertools::Itertools;
use kdam::tqdm;
use radnetz_core::geometry::{length_of, linemerge};
use radnetz_core::model::{AttributedEdge, Direction, FinalEdge};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// thresholds for the significant-change report
const MIN_SIGNIFICANT_LENGTH: f64 = 50.0;
const MIN_SIGNIFICANT_WIDTH_CHANGE: f64 = 0.3;

/// Berlin district polygon. `gem` is the official municipality code whose
/// last two digits form the Bezirksnummer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub gem: String,
    pub geometry: MultiPolygon<f64>,
}

/// collapses the attributed edges to one edge per `(element_nr, ri)`,
/// applying longest-wins and worst-wins rules over residual attribute
/// variation, assigning districts and per-layer sequential ids.
pub fn aggregate_network(
    edges: &[AttributedEdge],
    districts: &[District],
    config: &PipelineConfiguration,
) -> Vec<FinalEdge> {
    let mut groups: BTreeMap<(String, u8), Vec<&AttributedEdge>> = BTreeMap::new();
    for edge in edges {
        groups
            .entry((edge.element_nr.clone(), edge.ri.index()))
            .or_default()
            .push(edge);
    }
    log::info!(
        "aggregating {} attributed edges into {} directed edges",
        edges.len(),
        groups.len()
    );

    let mut afid_counters: [u64; 2] = [0, 0];
    let total_groups = groups.len();
    let mut result: Vec<FinalEdge> = Vec::with_capacity(total_groups);

    for ((element_nr, ri_index), group) in tqdm!(
        groups.into_iter(),
        total = total_groups,
        desc = "aggregation"
    ) {
        let ri = Direction::try_from(ri_index).expect("index comes from a Direction");
        let changes = detect_significant_changes(&group);
        if !changes.is_empty() {
            log::info!(
                "significant changes in edge {} (ri={}): {}",
                element_nr,
                ri,
                changes.iter().join("; ")
            );
        }

        let first = group[0];
        let geometry = linemerge(
            &group
                .iter()
                .flat_map(|e| e.geometry.0.iter().cloned())
                .collect_vec(),
        );
        let laenge = length_of(&geometry).round() as i64;

        let mut attributes = first.attributes.clone();
        attributes.fuehr = longest_value(&group, |e| Some(e.attributes.fuehr), |v| v.to_string())
            .unwrap_or(first.attributes.fuehr);
        attributes.pflicht =
            longest_value(&group, |e| e.attributes.pflicht, |v| v.to_string());
        attributes.ofm = longest_value(&group, |e| e.attributes.ofm, |v| v.to_string());
        attributes.farbe = longest_value(&group, |e| e.attributes.farbe, |v| v.to_string());
        attributes.protek = longest_value(&group, |e| e.attributes.protek, |v| v.to_string());
        let bezirk = longest_value(&group, |e| e.bezirk.clone(), |v| v.clone());

        attributes.breite = group
            .iter()
            .filter_map(|e| e.attributes.breite)
            .min_by(f64::total_cmp);
        attributes.trennstreifen = group
            .iter()
            .filter_map(|e| e.attributes.trennstreifen)
            .min_by_key(|t| t.worst_rank());
        attributes.nutz_beschr = group
            .iter()
            .filter_map(|e| e.attributes.nutz_beschr)
            .min_by_key(|n| n.worst_rank());

        let tilda = join_tilda_attributes(&group);
        let mut extras = first.extras.clone();
        for column in &config.dropped_columns {
            extras.remove(column);
        }

        let bezirksnummer = assign_district(&geometry, districts);

        afid_counters[ri_index as usize] += 1;
        result.push(FinalEdge {
            afid: afid_counters[ri_index as usize],
            element_nr,
            ri,
            edge_source: first.edge_source,
            street_name: first.street_name.clone(),
            street_class: first.street_class.clone(),
            bezirk,
            bezirksnummer,
            geometry,
            attributes,
            data_source: first.data_source,
            laenge,
            tilda,
            extras,
        });
    }
    eprintln!();

    let assigned = result.iter().filter(|e| e.bezirksnummer.is_some()).count();
    log::info!(
        "aggregation finished: {} edges, {} with a district number",
        result.len(),
        assigned
    );
    result
}

/// value whose components sum to the longest total length within the
/// group. ties resolve to the lexicographically smaller display value.
fn longest_value<T: Clone>(
    group: &[&AttributedEdge],
    extract: impl Fn(&AttributedEdge) -> Option<T>,
    display: impl Fn(&T) -> String,
) -> Option<T> {
    let mut sums: BTreeMap<String, (T, f64)> = BTreeMap::new();
    for edge in group {
        if let Some(value) = extract(edge) {
            let length = length_of(&edge.geometry);
            sums.entry(display(&value))
                .and_modify(|entry| entry.1 += length)
                .or_insert((value, length));
        }
    }
    let mut best: Option<(T, f64)> = None;
    for (value, length) in sums.into_values() {
        match &best {
            Some((_, best_length)) if *best_length >= length => {}
            _ => best = Some((value, length)),
        }
    }
    best.map(|(value, _)| value)
}

/// semicolon-joined sorted unique non-null values per tilda_* key across
/// the group members.
fn join_tilda_attributes(group: &[&AttributedEdge]) -> BTreeMap<String, String> {
    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for edge in group {
        for (key, value) in &edge.tilda {
            let trimmed = value.trim();
            if trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case("nan")
                || trimmed.eq_ignore_ascii_case("none")
            {
                continue;
            }
            values
                .entry(key.clone())
                .or_default()
                .push(String::from(trimmed));
        }
    }
    values
        .into_iter()
        .map(|(key, list)| {
            let joined = list.into_iter().sorted().unique().join(";");
            (key, joined)
        })
        .filter(|(_, joined)| !joined.is_empty())
        .collect()
}

/// district with the greatest intersection length, as its two-digit code.
fn assign_district(
    geometry: &geo::MultiLineString<f64>,
    districts: &[District],
) -> Option<String> {
    let mut best: Option<(&District, f64)> = None;
    for district in districts {
        let clipped = district.geometry.clip(geometry, false);
        let length = length_of(&clipped);
        if length <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_length)) if best_length >= length => {}
            _ => best = Some((district, length)),
        }
    }
    best.map(|(district, _)| {
        let gem = &district.gem;
        if gem.len() >= 2 {
            String::from(&gem[gem.len() - 2..])
        } else {
            gem.clone()
        }
    })
}

/// reported to logs only: attribute variation within a group that a
/// surveyor would consider significant.
fn detect_significant_changes(group: &[&AttributedEdge]) -> Vec<String> {
    let mut changes = Vec::new();
    if group.len() < 2 {
        return changes;
    }

    let pflicht_values: Vec<bool> = group
        .iter()
        .filter_map(|e| e.attributes.pflicht)
        .unique()
        .collect();
    if pflicht_values.len() > 1 {
        changes.push(String::from("obligation changes along the edge"));
    }

    let nutz_values: Vec<String> = group
        .iter()
        .filter_map(|e| e.attributes.nutz_beschr.map(|n| n.to_string()))
        .unique()
        .collect();
    if nutz_values.len() > 1 {
        changes.push(String::from("usage restriction changes along the edge"));
    }

    let long: Vec<&&AttributedEdge> = group
        .iter()
        .filter(|e| length_of(&e.geometry) >= MIN_SIGNIFICANT_LENGTH)
        .collect();
    if long.is_empty() {
        return changes;
    }

    let distinct = |values: Vec<String>| values.into_iter().unique().count();
    if distinct(long.iter().map(|e| e.attributes.fuehr.to_string()).collect()) > 1 {
        changes.push(String::from("guidance type changes over 50m sections"));
    }
    if distinct(
        long.iter()
            .filter_map(|e| e.attributes.ofm.map(|v| v.to_string()))
            .collect(),
    ) > 1
    {
        changes.push(String::from("surface material changes over 50m sections"));
    }
    if distinct(
        long.iter()
            .filter_map(|e| e.attributes.protek.map(|v| v.to_string()))
            .collect(),
    ) > 1
    {
        changes.push(String::from("protection changes over 50m sections"));
    }
    if distinct(
        long.iter()
            .filter_map(|e| e.attributes.trennstreifen.map(|v| v.to_string()))
            .collect(),
    ) > 1
    {
        changes.push(String::from("separation strip changes over 50m sections"));
    }

    let widths: Vec<f64> = long.iter().filter_map(|e| e.attributes.breite).collect();
    if widths.len() > 1 {
        let min = widths.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = widths.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if max - min > MIN_SIGNIFICANT_WIDTH_CHANGE {
            changes.push(format!(
                "width changes by {:.2}m over 50m sections",
                max - min
            ));
        }
    }
    changes
}
