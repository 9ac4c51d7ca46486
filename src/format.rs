//! Number formatting for tick labels: abbreviation, rounding, locale grouping.

use crate::models::DataFormat;
use num_format::{Locale, ToFormattedString};

/// Render a number the way a browser's `Number#toString` does, which is what
/// digit-count heuristics were tuned against: plain digits in the usual range,
/// `e+`/`e-` exponent notation outside it.
pub fn js_number_text(v: f64) -> String {
    if v.is_nan() {
        return "NaN".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    let a = v.abs();
    if a != 0.0 && (a >= 1e21 || a < 1e-6) {
        let s = format!("{v:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    } else {
        // `-0` prints as "0" in a browser
        format!("{}", if v == 0.0 { 0.0 } else { v })
    }
}

/// Pick an abbreviation scale and suffix for a magnitude, e.g. `(1e6, "M")`.
pub fn choose_abbreviation(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "T")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "B")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "M")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "K")
    } else {
        (1.0, "")
    }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Digits after the decimal point: fixed when `round_to` is set, otherwise the
/// shortest exact form capped at four places.
fn fraction_digits(v: f64, round_to: Option<u32>) -> String {
    match round_to {
        Some(places) => format!("{:.*}", places as usize, v),
        None => {
            let s = format!("{v:.4}");
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

/// Format a tick value according to the chart's data format.
pub fn format_number(value: f64, fmt: &DataFormat) -> String {
    if !value.is_finite() {
        return js_number_text(value);
    }
    let (scale, unit) = if fmt.abbreviated {
        choose_abbreviation(value.abs())
    } else {
        (1.0, "")
    };
    let scaled = value / scale;
    let plain = fraction_digits(scaled.abs(), fmt.round_to);
    let body = if fmt.comma_separator {
        let (locale, dec_sep) = map_locale(fmt.locale.as_deref().unwrap_or("en"));
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
        let grouped = int_part
            .parse::<u64>()
            .map(|n| n.to_formatted_string(locale))
            .unwrap_or_else(|_| int_part.to_string());
        if frac_part.is_empty() {
            grouped
        } else {
            format!("{grouped}{dec_sep}{frac_part}")
        }
    } else {
        plain
    };
    let sign = if scaled < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{}{body}{unit}{}", fmt.prefix, fmt.suffix)
}

/// On log axes the first tick sits at 0.1 but reads as 0.
pub fn log_tick_display_value(v: f64) -> f64 {
    if v == 0.1 { 0.0 } else { v }
}

/// Major log ticks (1, 10, 100, ... and the 0.1 origin) get labels and long marks.
pub fn is_major_log_tick(v: f64) -> bool {
    v == 0.1 || js_number_text(v).starts_with('1')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_style_number_text() {
        assert_eq!(js_number_text(100.0), "100");
        assert_eq!(js_number_text(-5.0), "-5");
        assert_eq!(js_number_text(1.5), "1.5");
        assert_eq!(js_number_text(-0.0), "0");
        assert_eq!(js_number_text(1e21), "1e+21");
        assert_eq!(js_number_text(1.5e-7), "1.5e-7");
        assert_eq!(js_number_text(123456789.0).len(), 9);
    }

    #[test]
    fn abbreviates_and_rounds() {
        let fmt = DataFormat {
            abbreviated: true,
            round_to: Some(1),
            ..Default::default()
        };
        assert_eq!(format_number(1_260_000.0, &fmt), "1.3M");
        assert_eq!(format_number(-2_000.0, &fmt), "-2.0K");
        assert_eq!(format_number(12.0, &fmt), "12.0");
    }

    #[test]
    fn groups_by_locale_with_affixes() {
        let fmt = DataFormat {
            comma_separator: true,
            locale: Some("de".into()),
            prefix: "$".into(),
            suffix: " total".into(),
            round_to: Some(2),
            ..Default::default()
        };
        assert_eq!(format_number(30000.5, &fmt), "$30.000,50 total");
        let en = DataFormat {
            comma_separator: true,
            ..Default::default()
        };
        assert_eq!(format_number(1234567.0, &en), "1,234,567");
    }

    #[test]
    fn log_tick_helpers() {
        assert_eq!(log_tick_display_value(0.1), 0.0);
        assert_eq!(log_tick_display_value(10.0), 10.0);
        assert!(is_major_log_tick(0.1));
        assert!(is_major_log_tick(1000.0));
        assert!(!is_major_log_tick(500.0));
    }
}
