//! Horizontal bar chart of per-field missing rates.

use serde_json::json;

use super::{thousands, title, Figure, LabelPosition, RefLine, BLUE, ORANGE, RED};
use crate::data::{Dataset, Field};

pub const FILE_NAME: &str = "interactive_missing_analysis.html";

/// Rates above 20% are critical, above 10% a warning.
pub const CRITICAL_PCT: f64 = 20.0;
pub const WARNING_PCT: f64 = 10.0;

pub fn bar_color(pct: f64) -> &'static str {
    if pct > 50.0 {
        RED
    } else if pct > 15.0 {
        ORANGE
    } else {
        BLUE
    }
}

/// Fields with any missing values, highest rate first.
pub fn ranked_missing(ds: &Dataset) -> Vec<(Field, f64)> {
    let mut rates: Vec<(Field, f64)> = ds
        .missing_rates()
        .into_iter()
        .filter(|(_, pct)| *pct > 0.0)
        .collect();
    rates.sort_by(|a, b| b.1.total_cmp(&a.1));
    rates
}

pub fn build(ds: &Dataset) -> Figure {
    let rates = ranked_missing(ds);
    let fields: Vec<&str> = rates.iter().map(|(f, _)| f.column()).collect();
    let values: Vec<f64> = rates.iter().map(|(_, pct)| *pct).collect();
    let colors: Vec<&str> = values.iter().map(|v| bar_color(*v)).collect();
    let labels: Vec<String> = values.iter().map(|v| format!("{:.1}%", v)).collect();

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "bar",
        "orientation": "h",
        "y": fields,
        "x": values,
        "marker": {
            "color": colors,
            "line": {"color": "rgba(0,0,0,0.5)", "width": 2}
        },
        "text": labels,
        "textposition": "outside",
        "hovertemplate": "<b>%{y}</b><br>Missing rate: %{x:.1f}%<extra></extra>"
    }));
    fig.add_vline(
        CRITICAL_PCT,
        RefLine {
            dash: "dash",
            color: "red",
            text: "Critical (>20%)",
            position: LabelPosition::Top,
        },
    );
    fig.add_vline(
        WARNING_PCT,
        RefLine {
            dash: "dash",
            color: "orange",
            text: "Warning (>10%)",
            position: LabelPosition::Top,
        },
    );

    let mut heading = title(
        "Missing Data Analysis",
        &format!("TDM Dataset (N={})", thousands(ds.len())),
    );
    heading["x"] = json!(0.5);
    heading["xanchor"] = json!("center");
    heading["font"] = json!({"size": 20});
    fig.update_layout(json!({
        "title": heading,
        "xaxis": {"title": {"text": "Missing Rate (%)"}},
        "yaxis": {"title": {"text": "Field"}},
        "height": 500,
        "hovermode": "closest",
        "showlegend": false
    }));
    fig
}
