//! Parallel-coordinates view over age, dose, level, drug and department.

use serde_json::{json, Value};

use super::{title, Figure, GREEN, ORANGE, RED};
use crate::data::{Dataset, TdmRecord};

pub const FILE_NAME: &str = "interactive_parallel.html";

/// Sorted category labels and each row's index into them.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCodes {
    pub labels: Vec<&'static str>,
    pub codes: Vec<usize>,
}

impl CategoryCodes {
    pub fn from_labels(values: &[&'static str]) -> Self {
        let mut labels = values.to_vec();
        labels.sort_unstable();
        labels.dedup();
        let codes = values
            .iter()
            .map(|v| labels.binary_search(v).unwrap_or_default())
            .collect();
        Self { labels, codes }
    }

    pub fn max_code(&self) -> usize {
        self.labels.len().saturating_sub(1)
    }
}

fn span(values: &[f64]) -> [f64; 2] {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() && max.is_finite() {
        [min, max]
    } else {
        [0.0, 0.0]
    }
}

fn numeric_dimension(label: &str, values: Vec<f64>) -> Value {
    json!({"label": label, "range": span(&values), "values": values})
}

fn coded_dimension(label: &str, cats: &CategoryCodes) -> Value {
    let ticks: Vec<usize> = (0..cats.labels.len()).collect();
    json!({
        "label": label,
        "range": [0, cats.max_code()],
        "values": cats.codes,
        "tickvals": ticks,
        "ticktext": cats.labels
    })
}

pub fn build(ds: &Dataset) -> Figure {
    let rows: Vec<&TdmRecord> = ds.records().iter().filter(|r| r.accept.is_some()).collect();

    let accept_codes: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.accept.map(|a| a.code()))
        .collect();
    let drugs = CategoryCodes::from_labels(&rows.iter().map(|r| r.drug.label()).collect::<Vec<_>>());
    let depts = CategoryCodes::from_labels(
        &rows.iter().map(|r| r.department.label()).collect::<Vec<_>>(),
    );

    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "parcoords",
        "line": {
            "color": accept_codes,
            "colorscale": [[0, RED], [0.5, ORANGE], [1, GREEN]],
            "showscale": true,
            "cmin": 0,
            "cmax": 1,
            "colorbar": {"title": {"text": "Accept"}, "tickvals": [0, 1], "ticktext": ["No", "Yes"]}
        },
        "dimensions": [
            numeric_dimension("Age", rows.iter().map(|r| r.age).collect()),
            numeric_dimension("Dose", rows.iter().map(|r| r.dose).collect()),
            numeric_dimension("Level", rows.iter().map(|r| r.level).collect()),
            coded_dimension("Drug", &drugs),
            coded_dimension("Department", &depts)
        ]
    }));
    fig.update_layout(json!({
        "title": title("Parallel Coordinates Plot", "Multi-dimensional Data Analysis"),
        "height": 600
    }));
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::record;
    use crate::data::{Acceptance, Drug};

    #[test]
    fn codes_follow_sorted_labels() {
        let cats = CategoryCodes::from_labels(&["Lithium", "Digoxin", "Valproic Acid", "Digoxin"]);
        assert_eq!(cats.labels, vec!["Digoxin", "Lithium", "Valproic Acid"]);
        assert_eq!(cats.codes, vec![1, 0, 2, 0]);
        assert_eq!(cats.max_code(), 2);
    }

    #[test]
    fn rows_without_acceptance_are_excluded() {
        let recs = vec![
            record(1, Drug::Lithium, Some(Acceptance::Yes)),
            record(2, Drug::Digoxin, None),
            record(3, Drug::Gentamicin, Some(Acceptance::Unknown)),
        ];
        let fig = build(&Dataset::new(recs));
        let trace = &fig.data[0];
        assert_eq!(trace["line"]["color"], json!([1.0, 0.5]));
        let dims = trace["dimensions"].as_array().unwrap();
        assert_eq!(dims.len(), 5);
        assert_eq!(dims[0]["range"], json!([41.0, 43.0]));
        assert_eq!(dims[3]["ticktext"], json!(["Gentamicin", "Lithium"]));
        assert_eq!(dims[3]["values"], json!([1, 0]));
    }

    #[test]
    fn empty_input_yields_flat_ranges() {
        let fig = build(&Dataset::new(Vec::new()));
        let dims = fig.data[0]["dimensions"].as_array().unwrap();
        assert_eq!(dims[0]["range"], json!([0.0, 0.0]));
        assert_eq!(dims[3]["range"], json!([0, 0]));
    }
}
