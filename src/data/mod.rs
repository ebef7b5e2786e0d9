//! TDM record model and the in-memory dataset shared by every chart.

pub mod synth;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub use synth::{CollectionPoint, CollectionSeries, Synthesizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Drug {
    Vancomycin,
    Digoxin,
    Phenytoin,
    Theophylline,
    Gentamicin,
    Lithium,
    Tacrolimus,
    Cyclosporine,
    Carbamazepine,
    #[serde(rename = "Valproic Acid")]
    ValproicAcid,
}

impl Drug {
    pub const ALL: [Drug; 10] = [
        Drug::Vancomycin,
        Drug::Digoxin,
        Drug::Phenytoin,
        Drug::Theophylline,
        Drug::Gentamicin,
        Drug::Lithium,
        Drug::Tacrolimus,
        Drug::Cyclosporine,
        Drug::Carbamazepine,
        Drug::ValproicAcid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Drug::Vancomycin => "Vancomycin",
            Drug::Digoxin => "Digoxin",
            Drug::Phenytoin => "Phenytoin",
            Drug::Theophylline => "Theophylline",
            Drug::Gentamicin => "Gentamicin",
            Drug::Lithium => "Lithium",
            Drug::Tacrolimus => "Tacrolimus",
            Drug::Cyclosporine => "Cyclosporine",
            Drug::Carbamazepine => "Carbamazepine",
            Drug::ValproicAcid => "Valproic Acid",
        }
    }

    /// Short code used on the 3-D scatter legend.
    pub fn abbrev(&self) -> &'static str {
        match self {
            Drug::Vancomycin => "Vanc",
            Drug::Digoxin => "Dig",
            Drug::Phenytoin => "Phen",
            Drug::Theophylline => "Theo",
            Drug::Gentamicin => "Gent",
            Drug::Lithium => "Li",
            Drug::Tacrolimus => "Tacro",
            Drug::Cyclosporine => "Cyclo",
            Drug::Carbamazepine => "Carba",
            Drug::ValproicAcid => "VPA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SamplingTime {
    Peak,
    Trough,
}

impl SamplingTime {
    pub fn label(&self) -> &'static str {
        match self {
            SamplingTime::Peak => "Peak",
            SamplingTime::Trough => "Trough",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "ICU")]
    Icu,
    #[serde(rename = "Internal Medicine")]
    InternalMedicine,
    Surgery,
    Pediatrics,
    Emergency,
    Nephrology,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Icu,
        Department::InternalMedicine,
        Department::Surgery,
        Department::Pediatrics,
        Department::Emergency,
        Department::Nephrology,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Department::Icu => "ICU",
            Department::InternalMedicine => "Internal Medicine",
            Department::Surgery => "Surgery",
            Department::Pediatrics => "Pediatrics",
            Department::Emergency => "Emergency",
            Department::Nephrology => "Nephrology",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Acceptance {
    Yes,
    No,
    Unknown,
}

impl Acceptance {
    pub const ALL: [Acceptance; 3] = [Acceptance::Yes, Acceptance::No, Acceptance::Unknown];

    pub fn label(&self) -> &'static str {
        match self {
            Acceptance::Yes => "Yes",
            Acceptance::No => "No",
            Acceptance::Unknown => "Unknown",
        }
    }

    /// Position on the parallel-coordinates colour axis.
    pub fn code(&self) -> f64 {
        match self {
            Acceptance::Yes => 1.0,
            Acceptance::No => 0.0,
            Acceptance::Unknown => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MedicineAction {
    Adjusted,
    Maintained,
    Changed,
}

impl MedicineAction {
    pub const ALL: [MedicineAction; 3] = [
        MedicineAction::Adjusted,
        MedicineAction::Maintained,
        MedicineAction::Changed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MedicineAction::Adjusted => "Adjusted",
            MedicineAction::Maintained => "Maintained",
            MedicineAction::Changed => "Changed",
        }
    }
}

/// One monitoring sample. Numeric fields use NaN for "missing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdmRecord {
    pub patient_id: u32,
    pub drug: Drug,
    pub age: f64,
    pub gender: Gender,
    pub dose: f64,
    pub level: f64,
    pub time: SamplingTime,
    pub department: Department,
    pub accept: Option<Acceptance>,
    pub medicine: Option<MedicineAction>,
}

impl TdmRecord {
    /// Age, dose and level are all present.
    pub fn has_measurements(&self) -> bool {
        self.age.is_finite() && self.dose.is_finite() && self.level.is_finite()
    }

    fn is_missing(&self, field: Field) -> bool {
        match field {
            Field::PatientId | Field::Drug | Field::Gender | Field::Time | Field::Department => {
                false
            }
            Field::Age => !self.age.is_finite(),
            Field::Dose => !self.dose.is_finite(),
            Field::Level => !self.level.is_finite(),
            Field::Accept => self.accept.is_none(),
            Field::Medicine => self.medicine.is_none(),
        }
    }

    fn canonical_line(&self) -> String {
        format!(
            "{}|{}|{:?}|{}|{:?}|{:?}|{}|{}|{}|{}",
            self.patient_id,
            self.drug.label(),
            self.age,
            self.gender.label(),
            self.dose,
            self.level,
            self.time.label(),
            self.department.label(),
            self.accept.map(|a| a.label()).unwrap_or(""),
            self.medicine.map(|m| m.label()).unwrap_or(""),
        )
    }
}

/// Table columns, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PatientId,
    Drug,
    Age,
    Gender,
    Dose,
    Level,
    Time,
    Department,
    Accept,
    Medicine,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::PatientId,
        Field::Drug,
        Field::Age,
        Field::Gender,
        Field::Dose,
        Field::Level,
        Field::Time,
        Field::Department,
        Field::Accept,
        Field::Medicine,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Field::PatientId => "Patient_ID",
            Field::Drug => "Drug",
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::Dose => "Dose",
            Field::Level => "Level",
            Field::Time => "Time",
            Field::Department => "Department",
            Field::Accept => "Accept",
            Field::Medicine => "Medicine",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl NumericRange {
    /// Range over the finite values; `None` when there are none.
    pub fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut n = 0usize;
        for v in values.filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(Self {
            min,
            max,
            mean: sum / n as f64,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub fingerprint: String,
    pub missing_pct: BTreeMap<String, f64>,
    pub drug_counts: BTreeMap<String, usize>,
    pub department_counts: BTreeMap<String, usize>,
    pub accept_counts: BTreeMap<String, usize>,
    pub medicine_counts: BTreeMap<String, usize>,
    pub age: Option<NumericRange>,
    pub dose: Option<NumericRange>,
    pub level: Option<NumericRange>,
}

/// Read-only table built once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<TdmRecord>,
}

impl Dataset {
    pub fn new(records: Vec<TdmRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TdmRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn missing_count(&self, field: Field) -> usize {
        self.records.iter().filter(|r| r.is_missing(field)).count()
    }

    /// Percentage of missing values for `field`, 0 for an empty table.
    pub fn missing_pct(&self, field: Field) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.missing_count(field) as f64 / self.records.len() as f64 * 100.0
    }

    /// Missing percentage of every column, in column order.
    pub fn missing_rates(&self) -> Vec<(Field, f64)> {
        Field::ALL.iter().map(|f| (*f, self.missing_pct(*f))).collect()
    }

    /// SHA-256 over a canonical text rendering of every row.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for rec in &self.records {
            hasher.update(rec.canonical_line().as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }

    /// Drugs in order of first appearance.
    pub fn drugs_in_order(&self) -> Vec<Drug> {
        let mut seen = Vec::new();
        for rec in &self.records {
            if !seen.contains(&rec.drug) {
                seen.push(rec.drug);
            }
        }
        seen
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut drug_counts = BTreeMap::new();
        let mut department_counts = BTreeMap::new();
        let mut accept_counts = BTreeMap::new();
        let mut medicine_counts = BTreeMap::new();
        for rec in &self.records {
            *drug_counts.entry(rec.drug.label().to_string()).or_insert(0) += 1;
            *department_counts
                .entry(rec.department.label().to_string())
                .or_insert(0) += 1;
            if let Some(a) = rec.accept {
                *accept_counts.entry(a.label().to_string()).or_insert(0) += 1;
            }
            if let Some(m) = rec.medicine {
                *medicine_counts.entry(m.label().to_string()).or_insert(0) += 1;
            }
        }

        DatasetSummary {
            rows: self.len(),
            fingerprint: self.fingerprint(),
            missing_pct: self
                .missing_rates()
                .into_iter()
                .map(|(f, pct)| (f.column().to_string(), pct))
                .collect(),
            drug_counts,
            department_counts,
            accept_counts,
            medicine_counts,
            age: NumericRange::of(self.records.iter().map(|r| r.age)),
            dose: NumericRange::of(self.records.iter().map(|r| r.dose)),
            level: NumericRange::of(self.records.iter().map(|r| r.level)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(id: u32, drug: Drug, accept: Option<Acceptance>) -> TdmRecord {
        TdmRecord {
            patient_id: id,
            drug,
            age: 40.0 + id as f64,
            gender: Gender::F,
            dose: 250.0,
            level: 12.5,
            time: SamplingTime::Trough,
            department: Department::Icu,
            accept,
            medicine: None,
        }
    }

    #[test]
    fn missing_pct_counts_none_and_nan() {
        let mut recs = vec![
            record(1, Drug::Digoxin, Some(Acceptance::Yes)),
            record(2, Drug::Lithium, None),
            record(3, Drug::Digoxin, Some(Acceptance::No)),
            record(4, Drug::Digoxin, None),
        ];
        recs[0].age = f64::NAN;
        recs[1].medicine = Some(MedicineAction::Changed);
        let ds = Dataset::new(recs);
        assert_eq!(ds.missing_pct(Field::Accept), 50.0);
        assert_eq!(ds.missing_pct(Field::Age), 25.0);
        assert_eq!(ds.missing_pct(Field::Medicine), 75.0);
        assert_eq!(ds.missing_pct(Field::Drug), 0.0);
        assert!(!ds.records()[0].has_measurements());
    }

    #[test]
    fn empty_dataset_has_zero_rates() {
        let ds = Dataset::new(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.missing_rates().iter().all(|(_, pct)| *pct == 0.0));
        assert!(ds.summary().age.is_none());
    }

    #[test]
    fn drugs_keep_first_appearance_order() {
        let ds = Dataset::new(vec![
            record(1, Drug::Lithium, None),
            record(2, Drug::Digoxin, None),
            record(3, Drug::Lithium, None),
        ]);
        assert_eq!(ds.drugs_in_order(), vec![Drug::Lithium, Drug::Digoxin]);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Dataset::new(vec![record(1, Drug::Lithium, Some(Acceptance::Yes))]);
        let b = Dataset::new(vec![record(1, Drug::Lithium, Some(Acceptance::No))]);
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn summary_counts_categories() {
        let ds = Dataset::new(vec![
            record(1, Drug::Lithium, Some(Acceptance::Yes)),
            record(2, Drug::Lithium, Some(Acceptance::No)),
            record(3, Drug::Digoxin, Some(Acceptance::Yes)),
        ]);
        let s = ds.summary();
        assert_eq!(s.rows, 3);
        assert_eq!(s.drug_counts["Lithium"], 2);
        assert_eq!(s.accept_counts["Yes"], 2);
        assert_eq!(s.department_counts["ICU"], 3);
        let age = s.age.unwrap();
        assert_eq!(age.min, 41.0);
        assert_eq!(age.max, 43.0);
        assert_eq!(age.mean, 42.0);
    }
}
