//! Sample size vs statistical power, with current and full-dataset markers.

use serde_json::json;

use super::{linspace, thousands, title, Figure, LabelPosition, RefLine, BLUE, GREEN, RED};

pub const FILE_NAME: &str = "interactive_power_analysis.html";

pub const CURVE_START: f64 = 1000.0;
pub const CURVE_POINTS: usize = 50;

/// Power relative to the full dataset, `sqrt(n / total)`.
pub fn power_at(n: f64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (n / total as f64).sqrt()
}

pub fn build(total: usize, current: usize) -> Figure {
    let start = CURVE_START.min(total as f64);
    let sizes = linspace(start, total as f64, CURVE_POINTS);
    let power: Vec<f64> = sizes.iter().map(|n| power_at(*n, total)).collect();

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "scatter",
        "mode": "lines",
        "name": "Statistical Power",
        "x": sizes,
        "y": power,
        "line": {"color": BLUE, "width": 4},
        "fill": "tonexty",
        "fillcolor": "rgba(52, 152, 219, 0.2)",
        "hovertemplate": "Sample Size: %{x:.0f}<br>Power: %{y:.2%}<extra></extra>"
    }));
    fig.add_hline(
        1.0,
        RefLine {
            dash: "dash",
            color: "green",
            text: "Target: 100%",
            position: LabelPosition::Right,
        },
    );
    fig.add_trace(json!({
        "type": "scatter",
        "mode": "markers",
        "name": "Current State",
        "x": [current],
        "y": [power_at(current as f64, total)],
        "marker": {"size": 15, "color": RED, "symbol": "star"},
        "hovertemplate": format!("Current: {} samples<br>Power: %{{y:.2%}}<extra></extra>", thousands(current))
    }));
    fig.add_trace(json!({
        "type": "scatter",
        "mode": "markers",
        "name": "Full Dataset",
        "x": [total],
        "y": [1.0],
        "marker": {"size": 15, "color": GREEN, "symbol": "star"},
        "hovertemplate": format!("Full: {} samples<br>Power: 100%<extra></extra>", thousands(total))
    }));

    fig.update_layout(json!({
        "title": title("Interactive Statistical Power Analysis", "Sample Size vs Statistical Power"),
        "xaxis": {"title": {"text": "Sample Size (n)"}},
        "yaxis": {"title": {"text": "Statistical Power"}, "tickformat": ".0%"},
        "height": 600,
        "hovermode": "x unified",
        "margin": {"l": 50, "r": 100, "t": 50, "b": 50},
        "legend": {
            "orientation": "v",
            "yanchor": "top",
            "y": 0.99,
            "xanchor": "left",
            "x": 0.01,
            "bgcolor": "rgba(255, 255, 255, 0.7)"
        }
    }));
    fig
}
