/// traffic signs that establish an obligation to use the facility
pub const PFLICHT_SIGNS: [&str; 3] = ["237", "240", "241"];

/// sign texts that mark a usage restriction due to structural damage
pub const DAMAGE_SIGN_KEYWORDS: [&str; 3] =
    ["Gehwegschäden", "Radwegschäden", "Geh- und Radwegschäden"];

/// checks whether a `traffic_sign` value names a German sign number. values
/// come as `DE:240`, `DE:237,1022-10` or `DE:240,DE:1022-10`; a number
/// after the first comma inherits the `DE:` prefix.
pub fn has_traffic_sign(traffic_sign_value: &str, target_sign: &str) -> bool {
    let value = traffic_sign_value.trim();
    if value.is_empty() {
        return false;
    }

    if value.contains(&format!("DE:{}", target_sign)) {
        return true;
    }

    let has_de_prefix = value.contains("DE:");
    for part in value.split(',') {
        let part = part.trim();
        if let Some(number) = part.strip_prefix("DE:") {
            if number == target_sign {
                return true;
            }
        } else if has_de_prefix && part == target_sign {
            return true;
        }
    }
    false
}

/// whether any of the obligation signs (Z237, Z240, Z241) is present.
pub fn has_pflicht_sign(traffic_sign_value: &str) -> bool {
    PFLICHT_SIGNS
        .iter()
        .any(|sign| has_traffic_sign(traffic_sign_value, sign))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_match() {
        assert!(has_traffic_sign("DE:240", "240"));
        assert!(!has_traffic_sign("DE:239", "240"));
        assert!(!has_traffic_sign("", "240"));
    }

    #[test]
    fn test_comma_lists() {
        assert!(has_traffic_sign("DE:240,1022-10", "1022-10"));
        assert!(has_traffic_sign("DE:239,DE:1022-10", "1022-10"));
        assert!(!has_traffic_sign("240", "240"));
    }

    #[test]
    fn test_prefix_match_covers_sub_signs() {
        // DE:242 also covers DE:242.1
        assert!(has_traffic_sign("DE:242.1", "242"));
    }

    #[test]
    fn test_pflicht_signs() {
        assert!(has_pflicht_sign("DE:237"));
        assert!(has_pflicht_sign("DE:1022-10,DE:241"));
        assert!(!has_pflicht_sign("DE:239"));
    }
}
