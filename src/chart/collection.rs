//! Completeness-over-time line chart with a progressive-reveal animation.

use serde_json::{json, Value};

use super::{title, Figure, LabelPosition, RefLine, BLUE};
use crate::data::CollectionSeries;

pub const FILE_NAME: &str = "interactive_animation.html";

pub const TARGET_RATE: f64 = 80.0;

/// Upper bound on animation frames; longer series reveal several points per frame.
const MAX_FRAMES: usize = 30;
const FRAME_MS: u64 = 120;

fn play_controls() -> Value {
    json!([{
        "type": "buttons",
        "showactive": false,
        "direction": "left",
        "x": 0.0,
        "xanchor": "left",
        "y": 1.12,
        "yanchor": "bottom",
        "buttons": [
            {
                "label": "Play",
                "method": "animate",
                "args": [null, {
                    "frame": {"duration": FRAME_MS, "redraw": false},
                    "transition": {"duration": 0},
                    "fromcurrent": true,
                    "mode": "immediate"
                }]
            },
            {
                "label": "Pause",
                "method": "animate",
                "args": [[null], {
                    "frame": {"duration": 0, "redraw": false},
                    "transition": {"duration": 0},
                    "mode": "immediate"
                }]
            }
        ]
    }])
}

pub fn build(series: &CollectionSeries) -> Figure {
    let times: Vec<String> = series
        .points
        .iter()
        .map(|p| p.time.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let rates: Vec<f64> = series.points.iter().map(|p| p.rate).collect();
    let counts: Vec<usize> = series.points.iter().map(|p| p.cumulative).collect();

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "scatter",
        "mode": "lines+markers",
        "x": times,
        "y": rates,
        "customdata": counts,
        "line": {"color": BLUE, "width": 3},
        "marker": {"size": 8},
        "hovertemplate": "Collection Time=%{x}<br>Completeness Rate (%)=%{y}<br>Samples=%{customdata}<extra></extra>"
    }));

    let n = times.len();
    if n > 1 {
        let chunk = n.div_ceil(MAX_FRAMES);
        let frames: Vec<Value> = (1..=n.div_ceil(chunk))
            .map(|k| {
                let end = (k * chunk).min(n);
                json!({
                    "name": format!("frame{}", k),
                    "data": [{"x": &times[..end], "y": &rates[..end]}],
                    "traces": [0]
                })
            })
            .collect();
        fig.set_frames(frames);
        fig.update_layout(json!({"updatemenus": play_controls()}));
    }

    fig.add_hline(
        TARGET_RATE,
        RefLine {
            dash: "dash",
            color: "green",
            text: "Target: 80%",
            position: LabelPosition::Right,
        },
    );
    let final_label = format!("Final: {:.1}%", series.final_rate);
    fig.add_hline(
        series.final_rate,
        RefLine {
            dash: "dot",
            color: "blue",
            text: &final_label,
            position: LabelPosition::Left,
        },
    );

    fig.update_layout(json!({
        "title": title("Data Collection Animation", "Completeness Rate Over Time"),
        "xaxis": {"title": {"text": "Collection Time"}, "type": "date"},
        "yaxis": {"title": {"text": "Completeness Rate (%)"}, "range": [0, 100]},
        "height": 600,
        "showlegend": false,
        "hovermode": "x unified"
    }));
    fig
}
