//! Plotly figure model and standalone HTML export.
//!
//! Figures are plain plotly.js JSON (`data`, `layout`, `frames`) assembled with
//! `serde_json`. Export wraps the JSON in a self-contained page that loads
//! plotly.js from its CDN.

pub mod collection;
pub mod missing;
pub mod parallel;
pub mod power;
pub mod scatter3d;
pub mod sunburst;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Plotly's default qualitative palette.
pub const QUALITATIVE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub const RED: &str = "#e74c3c";
pub const ORANGE: &str = "#f39c12";
pub const BLUE: &str = "#3498db";
pub const GREEN: &str = "#27ae60";

/// Where a reference-line label sits relative to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPosition {
    Top,
    Left,
    Right,
}

/// Dashed/dotted reference line with a text label.
#[derive(Debug, Clone, Copy)]
pub struct RefLine<'a> {
    pub dash: &'a str,
    pub color: &'a str,
    pub text: &'a str,
    pub position: LabelPosition,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Value>,
}

impl Figure {
    pub fn new() -> Self {
        let mut fig = Self::default();
        fig.layout.insert("template".to_string(), white_template());
        fig
    }

    pub fn add_trace(&mut self, trace: Value) -> &mut Self {
        self.data.push(trace);
        self
    }

    /// Deep-merge `patch` into the layout.
    pub fn update_layout(&mut self, patch: Value) -> &mut Self {
        if let Value::Object(map) = patch {
            for (k, v) in map {
                match self.layout.get_mut(&k) {
                    Some(existing) => merge_json(existing, v),
                    None => {
                        self.layout.insert(k, v);
                    }
                }
            }
        }
        self
    }

    pub fn set_frames(&mut self, frames: Vec<Value>) -> &mut Self {
        self.frames = frames;
        self
    }

    /// Horizontal line across the full plot width at `y`.
    pub fn add_hline(&mut self, y: f64, line: RefLine<'_>) -> &mut Self {
        let shape = json!({
            "type": "line", "xref": "x domain", "x0": 0, "x1": 1,
            "yref": "y", "y0": y, "y1": y,
            "line": {"color": line.color, "dash": line.dash}
        });
        let (x, xanchor) = match line.position {
            LabelPosition::Left => (0.0, "left"),
            LabelPosition::Right | LabelPosition::Top => (1.0, "right"),
        };
        let annotation = json!({
            "text": line.text, "showarrow": false,
            "xref": "x domain", "x": x, "xanchor": xanchor,
            "yref": "y", "y": y, "yanchor": "bottom"
        });
        self.push_layout_item("shapes", shape);
        self.push_layout_item("annotations", annotation);
        self
    }

    /// Vertical line across the full plot height at `x`.
    pub fn add_vline(&mut self, x: f64, line: RefLine<'_>) -> &mut Self {
        let shape = json!({
            "type": "line", "yref": "y domain", "y0": 0, "y1": 1,
            "xref": "x", "x0": x, "x1": x,
            "line": {"color": line.color, "dash": line.dash}
        });
        let xanchor = match line.position {
            LabelPosition::Left => "right",
            LabelPosition::Right => "left",
            LabelPosition::Top => "center",
        };
        let annotation = json!({
            "text": line.text, "showarrow": false,
            "xref": "x", "x": x, "xanchor": xanchor,
            "yref": "y domain", "y": 1, "yanchor": "bottom"
        });
        self.push_layout_item("shapes", shape);
        self.push_layout_item("annotations", annotation);
        self
    }

    fn push_layout_item(&mut self, key: &str, item: Value) {
        let slot = self
            .layout
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(item),
            other => *other = Value::Array(vec![item]),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize figure")
    }

    /// Standalone HTML page for this figure.
    pub fn to_html(&self, title: &str) -> Result<String> {
        // "</" inside an inline script would close the tag early.
        let blob = self.to_json()?.replace("</", "<\\/");
        Ok(PAGE_TEMPLATE
            .replace("__PLOTLY_CDN__", PLOTLY_CDN)
            .replace("__TITLE__", &escape_html(title))
            .replace("__FIGURE_JSON__", &blob))
    }

    /// Write the standalone page, returning its size in bytes.
    pub fn write_html(&self, path: &Path, title: &str) -> Result<usize> {
        let html = self.to_html(title)?;
        fs::write(path, &html).with_context(|| format!("write {}", path.display()))?;
        Ok(html.len())
    }
}

fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(dst), Value::Object(src)) => {
            for (k, v) in src {
                match dst.get_mut(&k) {
                    Some(existing) => merge_json(existing, v),
                    None => {
                        dst.insert(k, v);
                    }
                }
            }
        }
        (slot, patch) => *slot = patch,
    }
}

/// Light theme close to plotly's "plotly_white".
fn white_template() -> Value {
    let axis = json!({
        "gridcolor": "#EBF0F8", "linecolor": "#EBF0F8", "zerolinecolor": "#EBF0F8",
        "automargin": true, "ticks": ""
    });
    let scene_axis = json!({
        "backgroundcolor": "white", "gridcolor": "#DFE8F3", "linecolor": "#EBF0F8",
        "showbackground": true, "zerolinecolor": "#EBF0F8", "gridwidth": 2
    });
    json!({
        "layout": {
            "paper_bgcolor": "white",
            "plot_bgcolor": "white",
            "font": {"color": "#2a3f5f"},
            "colorway": QUALITATIVE,
            "xaxis": axis,
            "yaxis": axis,
            "scene": {"xaxis": scene_axis, "yaxis": scene_axis, "zaxis": scene_axis}
        }
    })
}

/// `<b>Heading</b><br>Subtitle` title block at plotly's default position.
pub fn title(heading: &str, subtitle: &str) -> Value {
    json!({"text": format!("<b>{}</b><br>{}", heading, subtitle)})
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 1745 -> "1,745"
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>__TITLE__</title>
  <script src="__PLOTLY_CDN__" charset="utf-8"></script>
  <style>
    html, body { margin: 0; padding: 0; background: white; }
    #figure { width: 100%; }
  </style>
</head>
<body>
  <div id="figure"></div>
  <script>
    const fig = __FIGURE_JSON__;
    Plotly.newPlot('figure', fig.data, fig.layout, {responsive: true, displaylogo: false})
      .then(function (gd) {
        if (fig.frames && fig.frames.length) {
          return Plotly.addFrames(gd, fig.frames);
        }
      });
  </script>
</body>
</html>
"##;
