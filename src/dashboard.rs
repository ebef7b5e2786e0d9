//! Writes the six chart pages and the tabbed shell that frames them.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::{self, escape_html, thousands, Figure};
use crate::config::EdaConfig;
use crate::data::{CollectionSeries, Dataset, Drug, Synthesizer};
use crate::logging::{self, ProfileScope};

pub const DASHBOARD_FILE: &str = "interactive_dashboard.html";

/// Plotted every n-th sample on the collection timeline.
pub const COLLECTION_STRIDE: usize = 10;

/// One dashboard tab and the chart page it frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTab {
    pub file_name: &'static str,
    pub page_title: &'static str,
    pub label: &'static str,
    pub frame_height: u32,
}

pub const TABS: [ChartTab; 6] = [
    ChartTab {
        file_name: chart::missing::FILE_NAME,
        page_title: "Missing Data Analysis",
        label: "1. Missing Values",
        frame_height: 600,
    },
    ChartTab {
        file_name: chart::scatter3d::FILE_NAME,
        page_title: "3D Scatter",
        label: "2. 3D Scatter",
        frame_height: 950,
    },
    ChartTab {
        file_name: chart::collection::FILE_NAME,
        page_title: "Data Collection Animation",
        label: "3. Collection Animation",
        frame_height: 700,
    },
    ChartTab {
        file_name: chart::sunburst::FILE_NAME,
        page_title: "Hierarchical Distribution",
        label: "4. Hierarchy",
        frame_height: 800,
    },
    ChartTab {
        file_name: chart::parallel::FILE_NAME,
        page_title: "Parallel Coordinates",
        label: "5. Parallel Coordinates",
        frame_height: 700,
    },
    ChartTab {
        file_name: chart::power::FILE_NAME,
        page_title: "Statistical Power",
        label: "6. Statistical Power",
        frame_height: 700,
    },
];

/// A file written by the assembler.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub rows: usize,
    pub fingerprint: String,
    pub charts: Vec<Artifact>,
    pub dashboard: Artifact,
}

/// Figures in tab order.
pub fn build_figures(ds: &Dataset, series: &CollectionSeries, cfg: &EdaConfig) -> [Figure; 6] {
    [
        chart::missing::build(ds),
        chart::scatter3d::build(ds),
        chart::collection::build(series),
        chart::sunburst::build(ds),
        chart::parallel::build(ds),
        chart::power::build(ds.len(), cfg.current_sample_size()),
    ]
}

/// Write each figure to `out_dir` under its tab's file name.
pub fn write_charts(
    out_dir: &Path,
    figures: &[Figure; 6],
    mut on_artifact: impl FnMut(&Artifact),
) -> Result<Vec<Artifact>> {
    let mut written = Vec::with_capacity(TABS.len());
    for (tab, fig) in TABS.iter().zip(figures.iter()) {
        let _scope = ProfileScope::with_context("write_chart", &[("chart", json!(tab.file_name))]);
        let path = out_dir.join(tab.file_name);
        let bytes = fig
            .write_html(&path, tab.page_title)
            .with_context(|| format!("render {}", tab.page_title))?;
        logging::log_chart_written(tab.file_name, &path, bytes, fig.data.len());
        let artifact = Artifact {
            name: tab.file_name.to_string(),
            path,
            bytes,
        };
        on_artifact(&artifact);
        written.push(artifact);
    }
    Ok(written)
}

fn drug_legend() -> String {
    Drug::ALL
        .iter()
        .map(|d| {
            format!(
                "                    <div class=\"drug-item\"><strong>{}</strong> = {}</div>\n",
                d.abbrev(),
                escape_html(d.label())
            )
        })
        .collect()
}

/// Tabbed shell page; chart `i` lives in `#chart{i}` behind button `i`.
pub fn render_shell(records: usize) -> String {
    let mut nav = String::new();
    let mut panels = String::new();
    for (i, tab) in TABS.iter().enumerate() {
        let active = if i == 0 { " active" } else { "" };
        nav.push_str(&format!(
            "            <button class=\"nav-btn{}\" onclick=\"showChart({})\">{}</button>\n",
            active,
            i,
            escape_html(tab.label)
        ));

        panels.push_str(&format!(
            "        <div id=\"chart{}\" class=\"chart-container{}\">\n            <iframe src=\"{}\" class=\"chart-iframe\" height=\"{}\"></iframe>\n",
            i, active, tab.file_name, tab.frame_height
        ));
        if tab.file_name == chart::scatter3d::FILE_NAME {
            panels.push_str(&LEGEND_TEMPLATE.replace("__DRUG_ITEMS__", &drug_legend()));
        }
        panels.push_str("        </div>\n\n");
    }

    SHELL_TEMPLATE
        .replace("__RECORDS__", &thousands(records))
        .replace("__TAB_COUNT__", &TABS.len().to_string())
        .replace("__NAV_BUTTONS__", nav.trim_end())
        .replace("__CHART_PANELS__", panels.trim_end())
}

pub fn write_shell(out_dir: &Path, records: usize) -> Result<Artifact> {
    let path = out_dir.join(DASHBOARD_FILE);
    let html = render_shell(records);
    fs::write(&path, &html).with_context(|| format!("write {}", path.display()))?;
    logging::log_dashboard_written(&path, TABS.len(), html.len());
    Ok(Artifact {
        name: DASHBOARD_FILE.to_string(),
        path,
        bytes: html.len(),
    })
}

/// Synthesize the dataset, write every chart, then the shell.
pub fn generate(cfg: &EdaConfig, mut on_artifact: impl FnMut(&Artifact)) -> Result<DashboardReport> {
    let _scope = ProfileScope::new("generate_dashboard");
    fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("create output dir {}", cfg.out_dir.display()))?;

    let mut synth = Synthesizer::new(cfg)?;
    let ds = synth.table();
    let series = synth.collection_series(ds.len(), COLLECTION_STRIDE);
    let fingerprint = ds.fingerprint();
    let rates: Vec<(&str, f64)> = ds
        .missing_rates()
        .into_iter()
        .map(|(f, pct)| (f.column(), pct))
        .collect();
    logging::log_dataset_summary(ds.len(), cfg.seed, &fingerprint, &rates);

    let figures = build_figures(&ds, &series, cfg);
    let charts = write_charts(&cfg.out_dir, &figures, &mut on_artifact)?;
    let dashboard = write_shell(&cfg.out_dir, ds.len())?;
    on_artifact(&dashboard);

    Ok(DashboardReport {
        rows: ds.len(),
        fingerprint,
        charts,
        dashboard,
    })
}

const LEGEND_TEMPLATE: &str = r##"            <div class="drug-legend">
                <h3>Drug Abbreviations</h3>
                <p>The 3D chart uses short codes to stay readable. Full names are listed below and shown on hover.</p>
                <div class="drug-table">
__DRUG_ITEMS__                </div>
            </div>
"##;

const SHELL_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>TDM Interactive EDA Dashboard</title>
    <style>
        body {
            font-family: 'Segoe UI', Arial, sans-serif;
            margin: 0;
            padding: 20px;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        }
        .container {
            max-width: 1500px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 15px;
            box-shadow: 0 10px 40px rgba(0,0,0,0.2);
        }
        h1 { text-align: center; color: #2c3e50; font-size: 2.5em; margin-bottom: 10px; }
        .subtitle { text-align: center; color: #7f8c8d; font-size: 1.2em; margin-bottom: 30px; }
        .info-box { background: #ecf0f1; padding: 20px; border-radius: 10px; margin-bottom: 20px; }
        .features { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 20px; margin: 30px 0; }
        .feature { padding: 20px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; border-radius: 10px; text-align: center; }
        .nav { display: flex; justify-content: center; gap: 15px; margin-bottom: 30px; flex-wrap: wrap; }
        .nav-btn { padding: 12px 25px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; border: none; border-radius: 25px; cursor: pointer; font-size: 16px; transition: all 0.3s; box-shadow: 0 4px 15px rgba(0,0,0,0.2); }
        .nav-btn.active { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); }
        .chart-container { display: none; margin-top: 20px; }
        .chart-container.active { display: block; }
        .drug-legend { background: #f8f9fa; padding: 15px; border-radius: 8px; margin-top: 20px; font-size: 0.9em; }
        .drug-table { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 10px; }
        .chart-iframe { width: 100%; border: none; }
    </style>
</head>
<body>
    <div class="container">
        <h1>TDM Interactive EDA Dashboard</h1>
        <div class="subtitle">Interactive exploratory analysis of __RECORDS__ monitoring records</div>

        <div class="info-box">
            <h2>How to use</h2>
            <p>Use the buttons below to switch between charts. Every chart supports:</p>
            <ul>
                <li><strong>Hover details</strong>: move the pointer over a chart to inspect values</li>
                <li><strong>Zoom and pan</strong>: drag to zoom, double-click to reset</li>
                <li><strong>Filtering</strong>: click legend entries to hide or show series</li>
                <li><strong>Export</strong>: use the camera icon to download a PNG</li>
            </ul>
        </div>

        <div class="features">
            <div class="feature"><h3>__TAB_COUNT__ interactive charts</h3><p>Every major analysis angle</p></div>
            <div class="feature"><h3>3D view</h3><p>Rotatable scatter of age, dose and level</p></div>
            <div class="feature"><h3>Animation</h3><p>Simulated data-collection progress</p></div>
            <div class="feature"><h3>Deep interaction</h3><p>Fully explorable data</p></div>
        </div>

        <div class="nav">
__NAV_BUTTONS__
        </div>

__CHART_PANELS__
    </div>

    <script>
        function showChart(index) {
            const charts = document.querySelectorAll('.chart-container');
            charts.forEach(chart => chart.classList.remove('active'));

            const btns = document.querySelectorAll('.nav-btn');
            btns.forEach(btn => btn.classList.remove('active'));

            document.getElementById('chart' + index).classList.add('active');
            btns[index].classList.add('active');
        }
    </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_has_matching_buttons_and_panels() {
        let html = render_shell(1745);
        assert_eq!(html.matches("class=\"nav-btn").count(), 6);
        assert_eq!(html.matches("class=\"chart-container").count(), 6);
        for i in 0..6 {
            assert!(html.contains(&format!("onclick=\"showChart({})\"", i)));
            assert!(html.contains(&format!("id=\"chart{}\"", i)));
        }
        assert_eq!(html.matches(" active\"").count(), 2);
        assert!(html.contains("1,745 monitoring records"));
    }

    #[test]
    fn panels_frame_their_chart_files() {
        let html = render_shell(10);
        for tab in TABS {
            assert!(html.contains(&format!("src=\"{}\"", tab.file_name)));
        }
        assert!(!html.contains("__"));
    }

    #[test]
    fn drug_legend_is_well_formed() {
        let html = render_shell(10);
        assert_eq!(html.matches("class=\"drug-item\"").count(), Drug::ALL.len());
        assert!(!html.contains("class.container"));
        assert!(html.contains("<strong>Carba</strong> = Carbamazepine"));
    }

    #[test]
    fn tab_files_are_distinct() {
        for (i, a) in TABS.iter().enumerate() {
            for b in TABS.iter().skip(i + 1) {
                assert_ne!(a.file_name, b.file_name);
            }
            assert_ne!(a.file_name, DASHBOARD_FILE);
        }
    }
}
