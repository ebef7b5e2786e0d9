//! Age × dose × level scatter, one trace per (drug, acceptance) pair.
//!
//! The 3-D traces hide their legend entries; a matching empty 2-D trace per
//! pair carries the legend instead, since the scene legend clips long labels.
//! `legendgroup` ties each pair together so legend clicks still toggle the
//! 3-D points.

use serde_json::{json, Value};
use std::collections::HashMap;

use super::{Figure, QUALITATIVE};
use crate::data::{Acceptance, Dataset, Drug, TdmRecord};

pub const FILE_NAME: &str = "interactive_3d_scatter.html";

pub fn marker_symbol(accept: Acceptance) -> &'static str {
    match accept {
        Acceptance::Yes => "diamond",
        Acceptance::No => "square",
        Acceptance::Unknown => "circle",
    }
}

fn legend_group(drug: Drug, accept: Acceptance) -> String {
    format!("group_{}_{}", drug.abbrev(), accept.label())
}

/// Drug colours assigned in order of first appearance.
pub fn color_map(drugs: &[Drug]) -> HashMap<Drug, &'static str> {
    drugs
        .iter()
        .zip(QUALITATIVE.iter())
        .map(|(d, c)| (*d, *c))
        .collect()
}

fn point_trace(drug: Drug, accept: Acceptance, color: &str, rows: &[&TdmRecord]) -> Value {
    let xs: Vec<f64> = rows.iter().map(|r| r.age).collect();
    let ys: Vec<f64> = rows.iter().map(|r| r.dose).collect();
    let zs: Vec<f64> = rows.iter().map(|r| r.level).collect();
    let custom: Vec<[&str; 1]> = rows.iter().map(|_| [accept.label()]).collect();
    json!({
        "type": "scatter3d",
        "mode": "markers",
        "x": xs,
        "y": ys,
        "z": zs,
        "showlegend": false,
        "legendgroup": legend_group(drug, accept),
        "marker": {
            "size": 5,
            "color": color,
            "symbol": marker_symbol(accept),
            "line": {"width": 0.3, "color": "white"}
        },
        "customdata": custom,
        "hovertemplate": format!(
            "<b>{}</b><br>Accept: %{{customdata[0]}}<br>Age: %{{x}} years<br>Dose: %{{y}} mg<br>Level: %{{z}} ug/mL<extra></extra>",
            drug.abbrev()
        )
    })
}

fn legend_trace(drug: Drug, accept: Acceptance, color: &str) -> Value {
    json!({
        "type": "scatter",
        "mode": "markers",
        "x": [null],
        "y": [null],
        "name": format!("{}, {}", drug.abbrev(), accept.label()),
        "showlegend": true,
        "legendgroup": legend_group(drug, accept),
        "marker": {"size": 8, "color": color, "symbol": marker_symbol(accept)}
    })
}

pub fn build(ds: &Dataset) -> Figure {
    let complete: Vec<&TdmRecord> = ds.records().iter().filter(|r| r.has_measurements()).collect();
    let mut drugs: Vec<Drug> = Vec::new();
    for r in &complete {
        if !drugs.contains(&r.drug) {
            drugs.push(r.drug);
        }
    }
    let colors = color_map(&drugs);

    let mut fig = Figure::new();
    for drug in &drugs {
        let color = colors.get(drug).copied().unwrap_or(QUALITATIVE[0]);
        for accept in Acceptance::ALL {
            let rows: Vec<&TdmRecord> = complete
                .iter()
                .copied()
                .filter(|r| r.drug == *drug && r.accept == Some(accept))
                .collect();
            fig.add_trace(point_trace(*drug, accept, color, &rows));
        }
    }
    for drug in &drugs {
        let color = colors.get(drug).copied().unwrap_or(QUALITATIVE[0]);
        for accept in Acceptance::ALL {
            fig.add_trace(legend_trace(*drug, accept, color));
        }
    }

    fig.update_layout(json!({
        "height": 850,
        "width": 1400,
        "margin": {"r": 250, "l": 20, "t": 80, "b": 20},
        "scene": {
            "domain": {"x": [0, 0.85], "y": [0, 1]},
            "xaxis": {"title": {"text": "Age (years)"}},
            "yaxis": {"title": {"text": "Dose (mg)"}},
            "zaxis": {"title": {"text": "Drug Level (ug/mL)"}},
            "camera": {"eye": {"x": 1.3, "y": 1.3, "z": 1.1}}
        },
        "xaxis": {"visible": false},
        "yaxis": {"visible": false},
        "legend": {
            "title": {"text": "<b>Drug / Acceptance</b>"},
            "orientation": "v",
            "yanchor": "top",
            "y": 0.98,
            "xanchor": "left",
            "x": 0.87,
            "xref": "paper",
            "yref": "paper",
            "bgcolor": "rgba(255, 255, 255, 0.95)",
            "bordercolor": "#2c3e50",
            "borderwidth": 2,
            "font": {"size": 12, "family": "Arial"}
        }
    }));
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::record;

    fn sample() -> Dataset {
        let mut recs = vec![
            record(1, Drug::Lithium, Some(Acceptance::Yes)),
            record(2, Drug::Digoxin, Some(Acceptance::No)),
            record(3, Drug::Lithium, Some(Acceptance::Unknown)),
            record(4, Drug::Lithium, Some(Acceptance::Yes)),
        ];
        recs[3].level = f64::NAN;
        Dataset::new(recs)
    }

    #[test]
    fn one_point_and_one_legend_trace_per_pair() {
        let fig = build(&sample());
        // 2 drugs × 3 statuses, doubled for the legend traces
        assert_eq!(fig.data.len(), 12);
        let points: Vec<_> = fig.data.iter().filter(|t| t["type"] == "scatter3d").collect();
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|t| t["showlegend"] == false));
        assert_eq!(fig.data[6]["name"], "Li, Yes");
        assert_eq!(fig.data[6]["legendgroup"], fig.data[0]["legendgroup"]);
    }

    #[test]
    fn rows_missing_measurements_are_dropped() {
        let fig = build(&sample());
        // Lithium/Yes keeps only row 1; row 4 lacks a level
        assert_eq!(fig.data[0]["x"], json!([41.0]));
        assert_eq!(fig.data[0]["marker"]["symbol"], "diamond");
        assert_eq!(fig.data[0]["marker"]["color"], QUALITATIVE[0]);
        assert_eq!(fig.data[3]["marker"]["color"], QUALITATIVE[1]);
    }
}
