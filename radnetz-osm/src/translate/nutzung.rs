use super::signs::DAMAGE_SIGN_KEYWORDS;
use crate::model::TildaWay;
use radnetz_core::model::NutzungsBeschraenkung;

/// usage restriction due to structural defects, read from damage sign
/// texts in the `traffic_sign` value.
pub fn determine_nutz_beschr(way: &TildaWay) -> NutzungsBeschraenkung {
    let traffic_sign = way.traffic_sign_str();
    if DAMAGE_SIGN_KEYWORDS
        .iter()
        .any(|keyword| traffic_sign.contains(keyword))
    {
        return NutzungsBeschraenkung::Schadensschild;
    }
    NutzungsBeschraenkung::Keine
}
