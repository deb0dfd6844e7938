use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use super::model::{validate_layers, Layer, PickPoint};

// ---------------------------------------------------------------------------
// Pick files (.pck)
// ---------------------------------------------------------------------------

/// Load observed picks from a `.pck` file.
///
/// Each line holds seven whitespace-separated numbers; field 2 is the
/// frequency (Hz) and field 4 the slowness (s/m). Lines that do not parse
/// are skipped.
pub fn load_picks(path: &Path) -> Result<Vec<PickPoint>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading pick file {}", path.display()))?;
    let picks = parse_picks(&text);
    if picks.is_empty() {
        bail!("{} contains no valid pick lines", path.display());
    }
    Ok(picks)
}

pub fn parse_picks(text: &str) -> Vec<PickPoint> {
    let mut dropped = 0usize;
    let picks: Vec<PickPoint> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parsed = parse_pick_line(line);
            if parsed.is_none() {
                dropped += 1;
            }
            parsed
        })
        .collect();
    if dropped > 0 {
        log::debug!("dropped {dropped} malformed pick lines");
    }
    picks
}

fn parse_pick_line(line: &str) -> Option<PickPoint> {
    let values: Vec<f64> = line
        .split_whitespace()
        .map(|tok| tok.parse::<f64>().ok())
        .collect::<Option<_>>()?;
    let fields: [f64; 7] = values.get(..7)?.try_into().ok()?;
    Some(PickPoint { fields })
}

// ---------------------------------------------------------------------------
// Velocity model text files
// ---------------------------------------------------------------------------

/// One `depth density ignore velocity` line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DepthNode {
    depth: f64,
    density: f64,
    ignore: f64,
    velocity: f64,
}

/// Load a layered model. Two consecutive nodes form one layer (top, bottom);
/// the first layer is forced to start at the surface. The returned layers
/// already satisfy the stack invariants.
pub fn load_velocity_model(path: &Path) -> Result<Vec<Layer>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading velocity model {}", path.display()))?;
    parse_velocity_model(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_velocity_model(text: &str) -> Result<Vec<Layer>> {
    let nodes: Vec<DepthNode> = text.lines().filter_map(parse_node_line).collect();
    if nodes.len() < 2 {
        bail!("need at least two depth nodes, found {}", nodes.len());
    }
    if nodes.len() % 2 != 0 {
        log::debug!("ignoring unpaired trailing depth node");
    }

    let layers: Vec<Layer> = nodes
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| Layer {
            start_depth: if i == 0 { 0.0 } else { pair[0].depth },
            end_depth: pair[1].depth,
            velocity: pair[0].velocity,
            density: pair[0].density,
            ignore: pair[0].ignore,
        })
        .collect();

    validate_layers(&layers).context("velocity model breaks layer ordering")?;
    Ok(layers)
}

fn parse_node_line(line: &str) -> Option<DepthNode> {
    let mut it = line.split_whitespace().map(|tok| tok.parse::<f64>().ok());
    let node = DepthNode {
        depth: it.next()??,
        density: it.next()??,
        ignore: it.next()??,
        velocity: it.next()??,
    };
    [node.depth, node.density, node.ignore, node.velocity]
        .iter()
        .all(|v| v.is_finite())
        .then_some(node)
}

/// Render the stack as depth nodes, two per layer, ascending by depth.
pub fn format_velocity_model(layers: &[Layer]) -> String {
    let mut nodes: Vec<DepthNode> = layers
        .iter()
        .flat_map(|l| {
            let node = |depth| DepthNode {
                depth,
                density: l.density,
                ignore: l.ignore,
                velocity: l.velocity,
            };
            [node(l.start_depth), node(l.end_depth)]
        })
        .collect();
    nodes.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    nodes
        .iter()
        .map(|n| {
            format!(
                "{:.3} {:.3} {:.3} {:.3}",
                n.depth, n.density, n.ignore, n.velocity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn save_velocity_model(path: &Path, layers: &[Layer]) -> Result<()> {
    std::fs::write(path, format_velocity_model(layers))
        .with_context(|| format!("writing velocity model {}", path.display()))
}

// ---------------------------------------------------------------------------
// Modeled curve export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CurveRow {
    period: f64,
    velocity: f64,
}

/// Write `(period s, phase velocity m/s)` pairs as CSV.
pub fn save_curve_csv(path: &Path, curve: &[(f64, f64)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for &(period, velocity) in curve {
        writer
            .serialize(CurveRow { period, velocity })
            .context("writing curve row")?;
    }
    writer.flush().context("flushing curve CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LayerStack;
    use approx::assert_abs_diff_eq;
    use std::io::Write;

    #[test]
    fn picks_keep_all_fields() {
        let text = "1 2 3.5 4 0.004 6 7\n";
        let picks = parse_picks(text);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].fields, [1.0, 2.0, 3.5, 4.0, 0.004, 6.0, 7.0]);
        assert_eq!(picks[0].frequency(), 3.5);
        assert_eq!(picks[0].slowness(), 0.004);
    }

    #[test]
    fn malformed_pick_lines_are_dropped() {
        let text = "0 0 5.0 0 0.003 0 0\n\
                    garbage line\n\
                    0 0 6.0 0 0.002\n\
                    \n   0\t0  7.0 0   0.001 0 0  \n";
        let picks = parse_picks(text);
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[1].frequency(), 7.0);
    }

    #[test]
    fn model_text_round_trip() {
        let stack = LayerStack::new(vec![
            Layer::new(0.0, 12.345, 180.5, 1.8),
            Layer::new(12.345, 40.0, 420.25, 2.0),
            Layer::new(40.0, 100.0, 910.0, 2.2),
        ])
        .unwrap();
        let text = format_velocity_model(stack.layers());
        assert_eq!(text.lines().count(), 6);
        assert_eq!(text.lines().next(), Some("0.000 1.800 0.000 180.500"));

        let back = parse_velocity_model(&text).unwrap();
        assert_eq!(back.len(), 3);
        for (a, b) in stack.layers().iter().zip(&back) {
            assert_abs_diff_eq!(a.start_depth, b.start_depth, epsilon = 5e-4);
            assert_abs_diff_eq!(a.end_depth, b.end_depth, epsilon = 5e-4);
            assert_abs_diff_eq!(a.velocity, b.velocity, epsilon = 5e-4);
            assert_abs_diff_eq!(a.density, b.density, epsilon = 5e-4);
        }
    }

    #[test]
    fn first_layer_is_forced_to_surface() {
        let text = "2.0 2.0 0 300\n10.0 2.0 0 300\n10.0 2.0 0 500\n50.0 2.0 0 500\n";
        let layers = parse_velocity_model(text).unwrap();
        assert_eq!(layers[0].start_depth, 0.0);
        assert_eq!(layers[1].end_depth, 50.0);
    }

    #[test]
    fn broken_models_are_rejected() {
        assert!(parse_velocity_model("").is_err());
        assert!(parse_velocity_model("0 2 0 300\n").is_err());
        // gap between 10 and 12
        let gap = "0 2 0 300\n10 2 0 300\n12 2 0 500\n50 2 0 500\n";
        assert!(parse_velocity_model(gap).is_err());
        // zero velocity
        let zero = "0 2 0 0\n10 2 0 0\n";
        assert!(parse_velocity_model(zero).is_err());
    }

    #[test]
    fn model_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("velocity_model.txt");
        let stack = LayerStack::default_model();
        save_velocity_model(&path, stack.layers()).unwrap();
        let back = load_velocity_model(&path).unwrap();
        assert_eq!(back.len(), stack.len());
        assert_abs_diff_eq!(back[2].end_depth, 144.0);
    }

    #[test]
    fn pick_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0 4.0 0 0.0025 0 0").unwrap();
        writeln!(file, "0 0 8.0 0 0.0040 0 0").unwrap();
        let picks = load_picks(file.path()).unwrap();
        assert_eq!(picks.len(), 2);

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(load_picks(empty.path()).is_err());
        assert!(load_picks(Path::new("/definitely/not/here.pck")).is_err());
    }

    #[test]
    fn curve_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        save_curve_csv(&path, &[(0.1, 250.0), (0.2, 310.5)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["period,velocity", "0.1,250.0", "0.2,310.5"]);
    }
}
