//! Text-to-value conversions shared by setters and handlers.

use crate::types::{Color, WarningSet, XmlEnum};

use super::Attributes;

/// Parse a floating point number. `NaN`, `Inf` and `-Inf` are accepted.
pub(crate) fn parse_double(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "" => None,
        "NaN" => Some(f64::NAN),
        "Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        _ => text.parse().ok(),
    }
}

/// Only `true` and `false`, in any case.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn parse_enum<E: XmlEnum>(text: &str) -> Option<E> {
    E::from_xml(text)
}

/// Read `red`, `green`, `blue` and optional `alpha` attributes.
///
/// Files written before colors had an alpha channel omit it; it defaults to
/// fully opaque.
pub(crate) fn parse_color(attrs: &Attributes, warnings: &mut WarningSet) -> Option<Color> {
    let channel = |name: &str, default: Option<u8>| -> Option<u8> {
        match attrs.get(name) {
            Some(value) => value
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(|v| u8::try_from(v).ok()),
            None => default,
        }
    };
    let color = (|| {
        Some(Color::rgba(
            channel("red", None)?,
            channel("green", None)?,
            channel("blue", None)?,
            channel("alpha", Some(255))?,
        ))
    })();
    if color.is_none() {
        warnings.add_str("Illegal color specification, ignoring.");
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles() {
        assert_eq!(parse_double(" 0.25 "), Some(0.25));
        assert_eq!(parse_double("-Inf"), Some(f64::NEG_INFINITY));
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(parse_double("1e-3"), Some(0.001));
        assert_eq!(parse_double("abc"), None);
        assert_eq!(parse_double(""), None);
    }

    #[test]
    fn booleans() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool("1"), None);
    }

    #[test]
    fn color_alpha_defaults_to_opaque() {
        let mut warnings = WarningSet::new();
        let attrs = Attributes::from([("red", "10"), ("green", "20"), ("blue", "30")]);
        let color = parse_color(&attrs, &mut warnings).unwrap();
        assert_eq!(color, Color::rgba(10, 20, 30, 255));
        assert!(warnings.is_empty());
    }

    #[test]
    fn color_out_of_range() {
        let mut warnings = WarningSet::new();
        let attrs = Attributes::from([("red", "300"), ("green", "20"), ("blue", "30")]);
        assert!(parse_color(&attrs, &mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
    }
}
