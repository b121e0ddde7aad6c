//! Pilot-point factor files.
//!
//! Layout: pilot-point file name, node count, pilot-point count, pilot-point
//! names (one per line), then one block per node:
//!
//! ```text
//!            1           1           3  0.0000000E+00          2 0.64
//!          1 0.2          3 0.16
//! ```
//!
//! The block header is node id, `1`, the number of (pilot point, weight)
//! pairs, and an offset; pairs continue onto following lines, two per line.

use std::collections::HashMap;
use std::path::Path;

use iwfm_calib::model::{PilotPointFactors, SpatialPoint};
use iwfm_calib::CalibError;

use crate::text::{is_skippable, label, parse_f64, read_file_as_utf8};

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

pub fn format_factor_file(
    pp_file: &str,
    pilot_points: &[SpatialPoint],
    factors: &[PilotPointFactors],
) -> String {
    let mut out = format!("{pp_file}\n{:>12}\n{:>12}\n", factors.len(), pilot_points.len());
    for pp in pilot_points {
        out.push_str(&pp.id);
        out.push('\n');
    }

    for node in factors {
        out.push_str(&format!(
            "{:>12}{:>12}{:>12}  0.0000000E+00",
            node.target_id,
            1,
            node.entries.len()
        ));
        let mut pairs = node.entries.iter();
        if let Some((pp, w)) = pairs.next() {
            out.push_str(&format!("{:>11} {:>11}", pp + 1, w));
        }
        let rest: Vec<&(usize, f64)> = pairs.collect();
        for chunk in rest.chunks(2) {
            out.push('\n');
            let line: Vec<String> = chunk.iter().map(|(pp, w)| format!("{:>11} {:>11}", pp + 1, w)).collect();
            out.push_str(&line.join(" "));
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

pub fn read_factor_file(path: &Path) -> Result<Vec<PilotPointFactors>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_factor_file(&content, &label(path))
}

/// Parse the node blocks of a factor file.
///
/// The header ends at the first two consecutive lines holding a node count
/// and a pilot-point count; whatever precedes them (file name, comments) is
/// ignored. Pairs may sit on the block line or continue onto later lines.
pub fn parse_factor_file(content: &str, file: &str) -> Result<Vec<PilotPointFactors>, CalibError> {
    let lines: Vec<&str> = content.lines().collect();
    let count = |line: &str| line.trim().parse::<usize>().ok();
    let (counts_at, node_count, pp_count) = lines
        .windows(2)
        .enumerate()
        .find_map(|(i, w)| Some((i, count(w[0])?, count(w[1])?)))
        .ok_or_else(|| CalibError::parse(file, 0, "factor file has no node and pilot-point counts"))?;

    let first_block = counts_at + 2 + pp_count;
    if first_block > lines.len() {
        return Err(CalibError::parse(file, lines.len(), "factor file ends inside the pilot-point names"));
    }

    let mut factors = Vec::with_capacity(node_count);
    let mut idx = first_block;
    while idx < lines.len() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = lines[idx].split_whitespace().collect();
        idx += 1;
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() < 4 {
            return Err(CalibError::parse(file, line_no, "malformed factor block header"));
        }
        let pairs: usize = tokens[2]
            .parse()
            .map_err(|_| CalibError::parse(file, line_no, format!("invalid pair count '{}'", tokens[2])))?;

        let mut values: Vec<&str> = tokens[4..].to_vec();
        while values.len() < pairs * 2 {
            let Some(&next) = lines.get(idx) else {
                return Err(CalibError::parse(
                    file,
                    line_no,
                    format!("node {} lists {pairs} pilot points but the file ends", tokens[0]),
                ));
            };
            values.extend(next.split_whitespace());
            idx += 1;
        }

        let mut entries = Vec::with_capacity(pairs);
        for pair in values.chunks(2).take(pairs) {
            let pp: usize = pair[0]
                .parse()
                .ok()
                .filter(|pp| *pp > 0)
                .ok_or_else(|| CalibError::parse(file, line_no, format!("invalid pilot point '{}'", pair[0])))?;
            let weight = parse_f64(pair[1], "weight", file, line_no)?;
            entries.push((pp - 1, weight));
        }
        factors.push(PilotPointFactors {
            target_id: tokens[0].to_string(),
            entries,
        });
    }

    if factors.len() != node_count {
        log::warn!("{file}: header lists {node_count} nodes but {} blocks were found", factors.len());
    }
    Ok(factors)
}

pub fn read_parameter_values(path: &Path) -> Result<Vec<f64>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_parameter_values(&content, &label(path))
}

/// Pilot-point parameter values, one per line in pilot-point order.
///
/// Rows are `id x y value` or `id x y zone value`; the value is the last field.
pub fn parse_parameter_values(content: &str, file: &str) -> Result<Vec<f64>, CalibError> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if is_skippable(line) {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [_, _, _, .., value] = tokens.as_slice() else {
            return Err(CalibError::parse(
                file,
                idx + 1,
                format!("expected 'id x y [zone] value', found {} fields", tokens.len()),
            ));
        };
        out.push(parse_f64(value, "parameter value", file, idx + 1)?);
    }
    Ok(out)
}

/// `node: <id> value: <v>` per node, values to 3 decimals.
pub fn format_node_values(values: &[(String, f64)]) -> String {
    values
        .iter()
        .map(|(node, v)| format!(" node:      {node:>6} value:  {v:.3}\n"))
        .collect()
}

// ---------------------------------------------------------------------------
// Node id translation
// ---------------------------------------------------------------------------

pub fn read_translation(path: &Path) -> Result<HashMap<String, String>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_translation(&content, &label(path))
}

/// Parse `sequential actual` rows. Lines starting with `#`, `C` or `c` are comments.
pub fn parse_translation(content: &str, file: &str) -> Result<HashMap<String, String>, CalibError> {
    let mut table = HashMap::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(['#', 'C', 'c']) {
            continue;
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(CalibError::parse(
                file,
                idx + 1,
                "expected 'sequential actual' node ids",
            ));
        }
        table.insert(tokens[0].to_string(), tokens[1].to_string());
    }
    Ok(table)
}

/// Rewrite the node id of every block in a factor file through `table`.
///
/// The new id is right-aligned in the old id's columns; every other
/// character, blank lines included, is kept. A node id missing from the
/// table is a parse error.
pub fn translate_factor_file(
    content: &str,
    file: &str,
    table: &HashMap<String, String>,
) -> Result<String, CalibError> {
    let mut out = String::with_capacity(content.len());
    let mut lines = content.lines().enumerate().peekable();

    // leading comments
    while let Some((_, line)) = lines.peek() {
        if !line.trim_start().starts_with('#') {
            break;
        }
        push_line(&mut out, line);
        lines.next();
    }

    // pp file name, node count, pp count
    let mut header = [0usize; 2];
    for slot in 0..3 {
        let (idx, line) = lines
            .next()
            .ok_or_else(|| CalibError::parse(file, 0, "factor file header is incomplete"))?;
        if slot > 0 {
            header[slot - 1] = line.trim().parse().map_err(|_| {
                CalibError::parse(file, idx + 1, format!("expected a count, found '{}'", line.trim()))
            })?;
        }
        push_line(&mut out, line);
    }
    let [node_count, pp_count] = header;

    for _ in 0..pp_count {
        let (_, line) = lines
            .next()
            .ok_or_else(|| CalibError::parse(file, 0, "factor file ends inside the pilot-point names"))?;
        push_line(&mut out, line);
    }

    let mut remaining = 0usize;
    let mut blocks = 0usize;
    for (idx, line) in lines {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            push_line(&mut out, line);
            continue;
        }

        if remaining > 0 {
            remaining = remaining.saturating_sub(tokens.len() / 2);
            push_line(&mut out, line);
            continue;
        }

        if tokens.len() < 4 {
            return Err(CalibError::parse(file, line_no, "malformed factor block header"));
        }
        let pairs: usize = tokens[2]
            .parse()
            .map_err(|_| CalibError::parse(file, line_no, format!("invalid pair count '{}'", tokens[2])))?;
        remaining = pairs.saturating_sub((tokens.len() - 4) / 2);

        let node = tokens[0];
        let actual = table
            .get(node)
            .ok_or_else(|| CalibError::parse(file, line_no, format!("node {node} has no translation")))?;
        let end = (line.len() - line.trim_start().len()) + node.len();
        out.push_str(&format!("{actual:>end$}{}\n", &line[end..]));
        blocks += 1;
    }

    if !content.ends_with('\n') && out.ends_with('\n') {
        out.pop();
    }
    if blocks != node_count {
        log::warn!("{file}: header lists {node_count} nodes but {blocks} blocks were found");
    }
    Ok(out)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pilot_points() -> Vec<SpatialPoint> {
        vec![
            SpatialPoint::new("PP001", 0.0, 0.0),
            SpatialPoint::new("PP002", 10.0, 0.0),
            SpatialPoint::new("PP003", 0.0, 10.0),
        ]
    }

    #[test]
    fn factor_file_layout() {
        let factors = vec![PilotPointFactors {
            target_id: "7".into(),
            entries: vec![(1, 0.5), (0, 0.25), (2, 0.25)],
        }];
        let text = format_factor_file("pp.dat", &pilot_points(), &factors);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "pp.dat");
        assert_eq!(lines[1], "           1");
        assert_eq!(lines[2], "           3");
        assert_eq!(&lines[3..6], &["PP001", "PP002", "PP003"]);
        assert_eq!(
            lines[6],
            "           7           1           3  0.0000000E+00          2         0.5"
        );
        assert_eq!(lines[7], "          1        0.25           3        0.25");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn translation_skips_comments() {
        let table = parse_translation("# header\nC comment\nc comment\n1  101\n\n2 102\n", "t.dat").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["1"], "101");
        assert_eq!(table["2"], "102");
    }

    #[test]
    fn translates_node_ids_in_place() {
        let content = "\
# Comment line
pp.dat
          2
          3
PP001
PP002
PP003
          1           1           3  0.0000000E+00          1 0.5
          2 0.3           3 0.2

          2           1           3  0.0000000E+00          1 0.5
          2 0.3           3 0.2
";
        let table = parse_translation("1 999\n2 12345678901234\n", "t.dat").unwrap();
        let out = translate_factor_file(content, "f.fac", &table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "# Comment line");
        assert_eq!(lines[4], "PP001");
        assert_eq!(lines[7], "        999           1           3  0.0000000E+00          1 0.5");
        assert_eq!(lines[8], "          2 0.3           3 0.2");
        assert_eq!(lines[9], "");
        assert_eq!(lines[10], "12345678901234           1           3  0.0000000E+00          1 0.5");
        assert_eq!(lines[11], "          2 0.3           3 0.2");
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn written_factors_translate() {
        let factors = vec![
            PilotPointFactors {
                target_id: "1".into(),
                entries: vec![(0, 1.0), (1, 0.0), (2, 0.0)],
            },
            PilotPointFactors {
                target_id: "2".into(),
                entries: vec![(2, 0.5), (1, 0.25), (0, 0.25)],
            },
        ];
        let text = format_factor_file("pp.dat", &pilot_points(), &factors);
        let table = parse_translation("1 1001\n2 1002\n", "t").unwrap();
        let out = translate_factor_file(&text, "f", &table).unwrap();
        assert_eq!(out.len(), text.len());
        assert!(out.contains("        1001           1           3"));
        assert!(out.contains("        1002           1           3"));
    }

    #[test]
    fn written_factors_read_back() {
        let factors = vec![
            PilotPointFactors {
                target_id: "1".into(),
                entries: vec![(0, 1.0), (1, 0.0), (2, 0.0)],
            },
            PilotPointFactors {
                target_id: "2".into(),
                entries: vec![(2, 0.5), (1, 0.25), (0, 0.25)],
            },
        ];
        let text = format_factor_file("pp.dat", &pilot_points(), &factors);
        assert_eq!(parse_factor_file(&text, "f.fac").unwrap(), factors);
    }

    #[test]
    fn pairs_on_one_line_with_a_comment_header() {
        let content = "\
# Pilot point factors file
3
2
PP_1  100.0  200.0
PP_2  200.0  400.0
1  0.0  1  0.0  1  1.0
2  0.0  2  0.0  1  0.5  2  0.5
3  0.0  1  0.0  2  1.0";
        let factors = parse_factor_file(content, "f.fac").unwrap();
        assert_eq!(factors.len(), 3);
        assert_eq!(factors[1].target_id, "2");
        assert_eq!(factors[1].entries, vec![(0, 0.5), (1, 0.5)]);

        let values = parse_parameter_values("PP_1 100 200 1 100.0\nPP_2 200 400 1 200.0\n", "p.dat").unwrap();
        let nodes = iwfm_calib::pilot::apply_factors(&factors, &values).unwrap();
        let text = format_node_values(&nodes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], " node:           1 value:  100.000");
        assert_eq!(lines[1], " node:           2 value:  150.000");
        assert_eq!(lines[2], " node:           3 value:  200.000");
    }

    #[test]
    fn truncated_block_is_an_error() {
        let content = "pp.dat\n 1\n 1\nPP001\n          5           1           3  0.0000000E+00          1 1.0\n";
        let err = parse_factor_file(content, "f.fac").unwrap_err();
        assert!(err.to_string().contains("node 5 lists 3 pilot points"));
        let err = parse_parameter_values("PP1 1 2\n", "p.dat").unwrap_err();
        assert_eq!(err.to_string(), "p.dat:1: expected 'id x y [zone] value', found 3 fields");
    }

    #[test]
    fn unknown_node_is_an_error() {
        let content = "pp.dat\n 1\n 1\nPP001\n          5           1           1  0.0000000E+00          1 1.0\n";
        let err = translate_factor_file(content, "f.fac", &HashMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "f.fac:5: node 5 has no translation");
    }
}
