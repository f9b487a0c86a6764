//! Coordinate and style normalization
//!
//! Pure helpers used by the parser while filling a record:
//! - `"lon,lat[,alt]"` strings become validated [`GeoPoint`]s
//! - `#style` references are checked against the supported icon styles

use crate::geo::{valid_lat, valid_lon, GeoPoint};

/// Supported icon styles. The first entry is the default style.
pub const STYLE_WHITELIST: [&str; 4] = ["bank-lion", "bank-oromiya", "bank-somali", "bank-wegagen"];

/// Style used when a record has none or names an unsupported one
pub const DEFAULT_STYLE: &str = STYLE_WHITELIST[0];

/// Separators accepted between coordinate components
pub const COORDINATE_DELIMITERS: &[char] = &[',', ' ', '\n', '\r', '\t'];

/// Parse a `"lon,lat"` pair split on any of `delimiters`.
///
/// Longitude always comes first. Components after latitude (altitude) are
/// ignored, empty components are skipped. Returns `None` if fewer than two
/// components are present, either fails to parse as a float, or either is
/// out of range. Logging is left to the caller, which knows the record.
#[must_use]
pub fn parse_coordinate_pair(s: &str, delimiters: &[char]) -> Option<GeoPoint> {
    let mut tokens = s
        .split(|c: char| delimiters.contains(&c))
        .filter(|t| !t.is_empty());

    let lon: f64 = tokens.next()?.parse().ok()?;
    if !valid_lon(lon) {
        return None;
    }
    let lat: f64 = tokens.next()?.parse().ok()?;
    if !valid_lat(lat) {
        return None;
    }

    GeoPoint::from_lon_lat(lon, lat)
}

/// Resolve a style reference such as `#bank-somali` to a supported style.
///
/// The first character is the reference sigil and is dropped without being
/// inspected; callers pass non-empty, trimmed text. Unknown styles fall back
/// to [`DEFAULT_STYLE`] with a warning.
#[must_use]
pub fn normalize_style_token(raw: &str) -> &'static str {
    resolve_style_token(raw).0
}

/// Same as [`normalize_style_token`], also reporting whether an unsupported
/// style was replaced (and a warning logged).
pub(crate) fn resolve_style_token(raw: &str) -> (&'static str, bool) {
    debug_assert!(!raw.is_empty(), "style reference must not be empty");

    let mut chars = raw.chars();
    chars.next();
    find_matching_style(chars.as_str(), DEFAULT_STYLE)
}

fn find_matching_style(style: &str, fallback: &'static str) -> (&'static str, bool) {
    if style.is_empty() {
        return (fallback, false);
    }

    if let Some(found) = STYLE_WHITELIST.iter().copied().find(|s| *s == style) {
        return (found, false);
    }

    log::warn!("Icon style {style:?} is not supported, using {fallback:?}");
    (fallback, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pair() {
        let p = parse_coordinate_pair("38.75,9.03", COORDINATE_DELIMITERS).expect("valid pair");
        assert!((p.lon() - 38.75).abs() < 1e-12);
        assert!((p.lat() - 9.03).abs() < 1e-9);
    }

    #[test]
    fn test_parse_pair_with_altitude_and_whitespace() {
        let p = parse_coordinate_pair("\n  -122.08, 37.42, 120\t\r\n", COORDINATE_DELIMITERS)
            .expect("valid pair");
        assert!((p.lon() - (-122.08)).abs() < 1e-12);
        assert!((p.lat() - 37.42).abs() < 1e-9);
    }

    #[test]
    fn test_parse_pair_rejects_bad_input() {
        for bad in [
            "",
            "38.75",
            "abc,9.03",
            "38.75,north",
            "181,0",
            "-180.5,0",
            "0,90.1",
            "0,-91",
            "NaN,0",
            "inf,0",
        ] {
            assert!(
                parse_coordinate_pair(bad, COORDINATE_DELIMITERS).is_none(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_pair_never_swaps_order() {
        // 9.03 is a fine longitude, 95 is not a latitude
        assert!(parse_coordinate_pair("9.03,95", COORDINATE_DELIMITERS).is_none());
    }

    #[test]
    fn test_parse_pair_custom_delimiters() {
        assert!(parse_coordinate_pair("1;2", &[';']).is_some());
        assert!(parse_coordinate_pair("1 2", &[';']).is_none());
    }

    #[test]
    fn test_whitelisted_styles_pass_through() {
        for style in STYLE_WHITELIST {
            assert_eq!(normalize_style_token(&format!("#{style}")), style);
        }
    }

    #[test]
    fn test_sigil_is_not_inspected() {
        assert_eq!(normalize_style_token("xbank-somali"), "bank-somali");
    }

    #[test]
    fn test_unknown_style_falls_back() {
        assert_eq!(normalize_style_token("#bank-xyz"), DEFAULT_STYLE);
        assert_eq!(normalize_style_token("#Bank-Lion"), DEFAULT_STYLE);
        assert_eq!(normalize_style_token("bank-lion"), DEFAULT_STYLE);
        assert_eq!(normalize_style_token("#"), DEFAULT_STYLE);
    }

    #[test]
    fn test_resolve_reports_fallback() {
        assert_eq!(resolve_style_token("#bank-somali"), ("bank-somali", false));
        assert_eq!(resolve_style_token("#bank-xyz"), (DEFAULT_STYLE, true));
        // a bare sigil carries no style to complain about
        assert_eq!(resolve_style_token("#"), (DEFAULT_STYLE, false));
    }
}
