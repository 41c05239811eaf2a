//! ASCII wire codec for the four-field event records:
//! `<p>;<vx>;<vy>;<vz>\n`, formatted as fixed-width `%16.9e` fields.

use crate::event::ScatterEvent;
use thiserror::Error;

/// Fields per event record.
pub const EVENT_FIELDS: usize = 4;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("expected {EVENT_FIELDS} ';'-delimited fields, got {0}")]
    FieldCount(usize),
    #[error("field {index} ({value:?}) is not a number")]
    Numeric {
        index: usize,
        value: String,
        source: std::num::ParseFloatError,
    },
}

/// Parses one newline-terminated event record. The field count and every
/// numeric field are checked before any value is used.
pub fn parse_event_line(line: &str) -> Result<ScatterEvent, WireError> {
    let fields: Vec<&str> = line.trim().split(';').collect();
    if fields.len() != EVENT_FIELDS {
        return Err(WireError::FieldCount(fields.len()));
    }
    let mut values = [0.0f64; EVENT_FIELDS];
    for (index, field) in fields.iter().enumerate() {
        values[index] = field.trim().parse().map_err(|source| WireError::Numeric {
            index,
            value: field.trim().to_string(),
            source,
        })?;
    }
    Ok(ScatterEvent::new(values[0], values[1], values[2], values[3]))
}

/// Formats one event as a newline-terminated record of four `%16.9e` fields.
pub fn format_event_line(event: &ScatterEvent) -> String {
    format!(
        "{};{};{};{}\n",
        fixed_width(event.p),
        fixed_width(event.v.x),
        fixed_width(event.v.y),
        fixed_width(event.v.z)
    )
}

/// Scientific notation with `frac_digits` fractional digits and a signed
/// two-digit exponent, matching C's `%.<frac_digits>e`.
pub fn format_scientific(x: f64, frac_digits: usize) -> String {
    let raw = format!("{:.*e}", frac_digits, x);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        // inf and NaN carry no exponent; pass them through
        None => raw,
    }
}

fn fixed_width(x: f64) -> String {
    format!("{:>16}", format_scientific(x, 9))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_match_the_c_reference() {
        assert_eq!(format_scientific(1.0, 9), "1.000000000e+00");
        assert_eq!(format_scientific(0.0, 9), "0.000000000e+00");
        assert_eq!(format_scientific(-0.001, 9), "-1.000000000e-03");
        assert_eq!(format_scientific(659.339, 9), "6.593390000e+02");
        assert_eq!(format_scientific(1.0, 18), "1.000000000000000000e+00");
    }

    #[test]
    fn event_lines_are_fixed_width() {
        let line = format_event_line(&ScatterEvent::new(1.0, 0.01, 1.0, -0.001));
        assert_eq!(
            line,
            " 1.000000000e+00; 1.000000000e-02; 1.000000000e+00;-1.000000000e-03\n"
        );
        // 4 fields of 16 columns, 3 separators, 1 newline
        assert_eq!(line.len(), 4 * 16 + 3 + 1);
    }

    #[test]
    fn parse_round_trips_a_formatted_line() {
        let event = ScatterEvent::new(0.125, -3.5, 600.0, 1.25e-4);
        let parsed = parse_event_line(&format_event_line(&event)).unwrap();
        assert!((parsed.p - event.p).abs() < 1e-12);
        assert!((parsed.v.z - event.v.z).abs() < 1e-12);
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        assert!(matches!(
            parse_event_line("1.0;2.0;3.0\n"),
            Err(WireError::FieldCount(3))
        ));
        assert!(matches!(
            parse_event_line("1;2;3;4;5\n"),
            Err(WireError::FieldCount(5))
        ));
    }

    #[test]
    fn non_numeric_field_is_rejected_with_its_index() {
        match parse_event_line("1.0;abc;3.0;4.0\n") {
            Err(WireError::Numeric { index, value, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("expected numeric error, got {other:?}"),
        }
    }
}
