//! Department → drug → acceptance sunburst of record counts.

use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

use super::{title, Figure, BLUE, GREEN, RED};
use crate::data::{Acceptance, Dataset};

pub const FILE_NAME: &str = "interactive_sunburst.html";

/// Colour for inner nodes whose children disagree on acceptance.
pub const MIXED: &str = "#bdc3c7";

pub fn accept_color(accept: Acceptance) -> &'static str {
    match accept {
        Acceptance::Yes => GREEN,
        Acceptance::No => RED,
        Acceptance::Unknown => BLUE,
    }
}

/// Flattened node list in plotly's ids/labels/parents/values form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Hierarchy {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<usize>,
    pub colors: Vec<&'static str>,
}

impl Hierarchy {
    fn push(&mut self, id: String, label: &str, parent: String, value: usize, accepts: &BTreeSet<Acceptance>) {
        let color = match (accepts.len(), accepts.iter().next()) {
            (1, Some(a)) => accept_color(*a),
            _ => MIXED,
        };
        self.ids.push(id);
        self.labels.push(label.to_string());
        self.parents.push(parent);
        self.values.push(value);
        self.colors.push(color);
    }
}

/// Count rows per path, leaves first, then drugs, then departments.
pub fn hierarchy(ds: &Dataset) -> Hierarchy {
    let mut leaves: BTreeMap<(&str, &str, Acceptance), usize> = BTreeMap::new();
    for rec in ds.records() {
        // Rows without an acceptance value have no leaf to land in.
        let Some(accept) = rec.accept else { continue };
        *leaves
            .entry((rec.department.label(), rec.drug.label(), accept))
            .or_insert(0) += 1;
    }

    let mut drugs: BTreeMap<(&str, &str), (usize, BTreeSet<Acceptance>)> = BTreeMap::new();
    let mut depts: BTreeMap<&str, (usize, BTreeSet<Acceptance>)> = BTreeMap::new();
    for ((dept, drug, accept), count) in &leaves {
        let d = drugs.entry((*dept, *drug)).or_default();
        d.0 += count;
        d.1.insert(*accept);
        let p = depts.entry(*dept).or_default();
        p.0 += count;
        p.1.insert(*accept);
    }

    let mut h = Hierarchy::default();
    for ((dept, drug, accept), count) in &leaves {
        h.push(
            format!("{}/{}/{}", dept, drug, accept.label()),
            accept.label(),
            format!("{}/{}", dept, drug),
            *count,
            &BTreeSet::from([*accept]),
        );
    }
    for ((dept, drug), (count, accepts)) in &drugs {
        h.push(
            format!("{}/{}", dept, drug),
            drug,
            dept.to_string(),
            *count,
            accepts,
        );
    }
    for (dept, (count, accepts)) in &depts {
        h.push(dept.to_string(), dept, String::new(), *count, accepts);
    }
    h
}

pub fn build(ds: &Dataset) -> Figure {
    let h = hierarchy(ds);
    let mut fig = Figure::new();
    fig.add_trace(json!({
        "type": "sunburst",
        "ids": h.ids,
        "labels": h.labels,
        "parents": h.parents,
        "values": h.values,
        "branchvalues": "total",
        "marker": {"colors": h.colors},
        "textinfo": "label+percent parent",
        "hovertemplate": "<b>%{label}</b><br>Count: %{value}<br>Percentage: %{percentParent}<extra></extra>"
    }));
    fig.update_layout(json!({
        "title": title("Hierarchical Distribution", "Department -> Drug -> Acceptance"),
        "height": 700
    }));
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::record;
    use crate::data::{Department, Drug};

    #[test]
    fn counts_roll_up_through_the_path() {
        let mut recs = vec![
            record(1, Drug::Lithium, Some(Acceptance::Yes)),
            record(2, Drug::Lithium, Some(Acceptance::Yes)),
            record(3, Drug::Lithium, Some(Acceptance::No)),
            record(4, Drug::Digoxin, Some(Acceptance::Yes)),
            record(5, Drug::Digoxin, None),
        ];
        recs[3].department = Department::Surgery;
        let h = hierarchy(&Dataset::new(recs));

        let value = |id: &str| h.values[h.ids.iter().position(|i| i == id).unwrap()];
        let color = |id: &str| h.colors[h.ids.iter().position(|i| i == id).unwrap()];
        assert_eq!(value("ICU/Lithium/Yes"), 2);
        assert_eq!(value("ICU/Lithium"), 3);
        assert_eq!(value("ICU"), 3);
        assert_eq!(value("Surgery/Digoxin"), 1);
        assert_eq!(color("ICU/Lithium"), MIXED);
        assert_eq!(color("Surgery"), GREEN);
        // 3 leaves, 2 drug nodes, 2 departments; the row without acceptance is dropped
        assert_eq!(h.ids.len(), 7);
        assert!(!h.ids.iter().any(|i| i.starts_with("ICU/Digoxin")));
    }

    #[test]
    fn parents_reference_existing_nodes() {
        let recs = vec![
            record(1, Drug::ValproicAcid, Some(Acceptance::Unknown)),
            record(2, Drug::Digoxin, Some(Acceptance::No)),
        ];
        let h = hierarchy(&Dataset::new(recs));
        for p in h.parents.iter().filter(|p| !p.is_empty()) {
            assert!(h.ids.contains(p), "dangling parent {}", p);
        }
        assert!(h.labels.contains(&"Valproic Acid".to_string()));
    }
}
