//! Whitespace-delimited event files with a `#`-prefixed header block.
//!
//! Each record carries eleven columns:
//! p, x, y, z, vx, vy, vz, t, sx, sy, sz.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use gisans_core::wire::format_scientific;
use gisans_core::NeutronEvent;
use glam::DVec3;

use crate::BatchError;

const COLUMNS: usize = 11;

/// Reads the leading header block and all event records.
pub fn read_event_file(path: &Path) -> Result<(String, Vec<NeutronEvent>), BatchError> {
    let reader = BufReader::new(File::open(path)?);
    let mut header = String::new();
    let mut events = Vec::new();
    let mut in_header = true;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if in_header && line.starts_with('#') {
            header.push_str(&line);
            header.push('\n');
            continue;
        }
        in_header = false;
        if line.trim().is_empty() {
            continue;
        }
        events.push(parse_record(&line, index + 1)?);
    }
    Ok((header, events))
}

/// Writes the header block followed by all records.
pub fn write_event_file(
    path: &Path,
    header: &str,
    events: &[NeutronEvent],
) -> Result<(), BatchError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(header.as_bytes())?;
    for event in events {
        writer.write_all(format_record(event).as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_record(line: &str, line_no: usize) -> Result<NeutronEvent, BatchError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != COLUMNS {
        return Err(BatchError::Malformed {
            line: line_no,
            reason: format!("expected {COLUMNS} columns, got {}", fields.len()),
        });
    }
    let mut values = [0.0f64; COLUMNS];
    for (i, field) in fields.iter().enumerate() {
        values[i] = field.parse().map_err(|_| BatchError::Malformed {
            line: line_no,
            reason: format!("column {} ({field:?}) is not a number", i + 1),
        })?;
    }
    Ok(NeutronEvent {
        p: values[0],
        pos: DVec3::new(values[1], values[2], values[3]),
        v: DVec3::new(values[4], values[5], values[6]),
        t: values[7],
        spin: DVec3::new(values[8], values[9], values[10]),
    })
}

fn format_record(event: &NeutronEvent) -> String {
    let columns = [
        event.p, event.pos.x, event.pos.y, event.pos.z, event.v.x, event.v.y, event.v.z,
        event.t, event.spin.x, event.spin.y, event.spin.z,
    ];
    let mut line = String::new();
    for (i, value) in columns.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&format_scientific(*value, 18));
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_event() -> NeutronEvent {
        NeutronEvent {
            p: 1.0,
            pos: DVec3::new(0.001, -0.5, 0.002),
            v: DVec3::new(1.0, 600.0, -3.0),
            t: 0.0042,
            spin: DVec3::new(0.0, 0.0, 1.0),
        }
    }

    #[test]
    fn header_and_records_survive_a_write_read_cycle() {
        let file = NamedTempFile::new().unwrap();
        let header = "# instrument: test\n# columns: p x y z vx vy vz t sx sy sz\n";
        let events = vec![sample_event(), sample_event().with_velocity(0.5, DVec3::Y)];
        write_event_file(file.path(), header, &events).unwrap();

        let (read_header, read_events) = read_event_file(file.path()).unwrap();
        assert_eq!(read_header, header);
        assert_eq!(read_events.len(), 2);
        assert!((read_events[0].v.z - (-3.0)).abs() < 1e-15);
        assert!((read_events[1].p - 0.5).abs() < 1e-15);
    }

    #[test]
    fn wrong_column_count_is_reported_with_the_line_number() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "# header\n1.0 2.0 3.0\n").unwrap();
        match read_event_file(file.path()) {
            Err(BatchError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_column_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "1.0 0 0 0 1.0 oops 0 0 0 0 1\n",
        )
        .unwrap();
        assert!(matches!(
            read_event_file(file.path()),
            Err(BatchError::Malformed { line: 1, .. })
        ));
    }
}
