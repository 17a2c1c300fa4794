use anyhow::Result;
use serde::Serialize;

use squaregrid_core::grid::{grid_lines, ItemSource, Row, TileGeometry};
use squaregrid_core::{AppConfig, GridLayoutEngine, RowMode};

#[derive(Serialize)]
struct LayoutReport<'a> {
    width: f64,
    row_mode: RowMode,
    geometry: TileGeometry,
    lines: Vec<&'a [Row]>,
}

/// Print the rows and tile sizes the grid would use at `width`
pub fn run(config: &AppConfig, width: f64, json: bool) -> Result<()> {
    let layout = config.grid.layout_config()?;
    let engine = GridLayoutEngine::new(config.grid.row_mode);
    let items = config.grid.item_source().items();
    let rows = engine.compute_rows(&items)?;
    let geometry = engine.geometry(width, &layout)?;

    let report = LayoutReport {
        width,
        row_mode: engine.row_mode(),
        geometry,
        lines: grid_lines(&rows, layout.columns())?.collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report, items.len()));
    }
    Ok(())
}

fn render_text(report: &LayoutReport, item_count: usize) -> String {
    let geometry = &report.geometry;
    let mut out = format!(
        "{} items, {} per row, {} rows, width {}\n",
        item_count,
        geometry.columns,
        report.row_mode.label(),
        report.width
    );
    out.push_str(&format!(
        "tile {:.2}, sub-tile {:.2} x {:.2}, spacing {}\n\n",
        geometry.tile, geometry.sub_tile.width, geometry.sub_tile.height, geometry.spacing
    ));

    for (index, line) in report.lines.iter().enumerate() {
        let cells: Vec<String> = line.iter().map(describe_row).collect();
        out.push_str(&format!("{:>4}  {}\n", index + 1, cells.join("  ")));
    }
    out
}

fn describe_row(row: &Row) -> String {
    match row {
        Row::Single { tile } => format!("[{}]", tile.id),
        Row::Double { .. } => {
            let groups: Vec<String> = row
                .sub_rows()
                .map(|group| {
                    group
                        .iter()
                        .map(|t| t.id.to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            format!("[{}]", groups.join(" / "))
        }
    }
}
