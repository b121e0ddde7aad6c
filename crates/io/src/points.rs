// Whitespace point tables: `id x y [value]`

use std::path::Path;

use iwfm_calib::model::{KrigeFactorRow, SpatialPoint};
use iwfm_calib::CalibError;

use crate::text::{is_skippable, label, parse_f64, read_file_as_utf8};

pub fn read_points(path: &Path) -> Result<Vec<SpatialPoint>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_points(&content, &label(path))
}

/// Parse point rows. A fourth column, when present, is the point's value.
pub fn parse_points(content: &str, file: &str) -> Result<Vec<SpatialPoint>, CalibError> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if is_skippable(line) {
            continue;
        }
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(CalibError::parse(
                file,
                line_no,
                format!("expected 'id x y [value]', found {} fields", tokens.len()),
            ));
        }
        let x = parse_f64(tokens[1], "x coordinate", file, line_no)?;
        let y = parse_f64(tokens[2], "y coordinate", file, line_no)?;
        let point = match tokens.get(3) {
            Some(v) => SpatialPoint::with_value(tokens[0], x, y, parse_f64(v, "value", file, line_no)?),
            None => SpatialPoint::new(tokens[0], x, y),
        };
        out.push(point);
    }
    Ok(out)
}

/// `id x y value` per point; points without a value are written without one.
pub fn format_points(points: &[SpatialPoint]) -> String {
    let mut out = String::new();
    for p in points {
        out.push_str(&format!("{:<12} {:>16.4} {:>16.4}", p.id, p.x, p.y));
        if let Some(v) = p.value {
            out.push_str(&format!(" {v:>16.6}"));
        }
        out.push('\n');
    }
    out
}

/// One line per target: its id, then one weight per source in source order.
pub fn format_factor_rows(rows: &[KrigeFactorRow], sources: &[SpatialPoint]) -> String {
    let mut out = String::from("# target");
    for s in sources {
        out.push(' ');
        out.push_str(&s.id);
    }
    out.push('\n');
    for row in rows {
        out.push_str(&row.target_id);
        for w in &row.weights {
            out.push_str(&format!(" {w:.8}"));
        }
        out.push('\n');
    }
    out
}
