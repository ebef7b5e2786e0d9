//! Seeded synthesis of the TDM table and the collection-progress series.
//!
//! Columns are drawn one at a time from a single `StdRng` stream, so a fixed
//! seed reproduces the same table and the same series.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use super::{
    Acceptance, Dataset, Department, Drug, Gender, MedicineAction, SamplingTime, TdmRecord,
};
use crate::config::EdaConfig;
use crate::logging::{log, obj, v_num, Domain, Level};
use serde_json::json;

const AGE_MEAN: f64 = 60.0;
const AGE_SD: f64 = 15.0;
const AGE_MIN: f64 = 18.0;
const AGE_MAX: f64 = 95.0;

const COLLECTION_START_RATE: f64 = 60.0;
const COLLECTION_STEP_HOURS: i64 = 2;

/// Categorical domain with fixed sampling weights.
struct Weighted<T: Copy> {
    items: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> Weighted<T> {
    fn new(pairs: &[(T, f64)]) -> Result<Self> {
        let index = WeightedIndex::new(pairs.iter().map(|(_, w)| *w))
            .context("invalid category weights")?;
        Ok(Self {
            items: pairs.iter().map(|(t, _)| *t).collect(),
            index,
        })
    }

    fn sample(&self, rng: &mut StdRng) -> T {
        self.items[self.index.sample(rng)]
    }
}

/// One plotted point of the completeness timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPoint {
    pub time: NaiveDateTime,
    pub cumulative: usize,
    pub rate: f64,
}

/// Simulated completeness rate over the collection period.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSeries {
    pub points: Vec<CollectionPoint>,
    /// Completeness the series converges to, in percent.
    pub final_rate: f64,
}

pub struct Synthesizer {
    rng: StdRng,
    cfg: EdaConfig,
    gender: Weighted<Gender>,
    time: Weighted<SamplingTime>,
    department: Weighted<Department>,
    accept: Weighted<Acceptance>,
}

impl Synthesizer {
    pub fn new(cfg: &EdaConfig) -> Result<Self> {
        Ok(Self {
            rng: StdRng::seed_from_u64(cfg.seed),
            cfg: cfg.clone(),
            gender: Weighted::new(&[(Gender::M, 0.55), (Gender::F, 0.45)])?,
            time: Weighted::new(&[(SamplingTime::Peak, 0.3), (SamplingTime::Trough, 0.7)])?,
            department: Weighted::new(&[
                (Department::Icu, 0.30),
                (Department::InternalMedicine, 0.25),
                (Department::Surgery, 0.15),
                (Department::Pediatrics, 0.10),
                (Department::Emergency, 0.10),
                (Department::Nephrology, 0.10),
            ])?,
            accept: Weighted::new(&[(Acceptance::Yes, 0.933), (Acceptance::No, 0.067)])?,
        })
    }

    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        // Box-Muller; 1 - u keeps the log argument in (0, 1].
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = self.rng.gen();
        mean + sd * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Build the table, then run the two missing-value passes.
    pub fn table(&mut self) -> Dataset {
        let n = self.cfg.records;

        let drugs: Vec<Drug> = (0..n)
            .map(|_| Drug::ALL[self.rng.gen_range(0..Drug::ALL.len())])
            .collect();
        let ages: Vec<f64> = (0..n)
            .map(|_| self.normal(AGE_MEAN, AGE_SD).clamp(AGE_MIN, AGE_MAX))
            .collect();
        let genders: Vec<Gender> = (0..n).map(|_| self.gender.sample(&mut self.rng)).collect();
        let doses: Vec<f64> = (0..n).map(|_| self.rng.gen_range(100.0..1000.0)).collect();
        let levels: Vec<f64> = (0..n).map(|_| self.rng.gen_range(5.0..50.0)).collect();
        let times: Vec<SamplingTime> = (0..n).map(|_| self.time.sample(&mut self.rng)).collect();
        let departments: Vec<Department> = (0..n)
            .map(|_| self.department.sample(&mut self.rng))
            .collect();

        let mut records: Vec<TdmRecord> = (0..n)
            .map(|i| TdmRecord {
                patient_id: i as u32 + 1,
                drug: drugs[i],
                age: ages[i],
                gender: genders[i],
                dose: doses[i],
                level: levels[i],
                time: times[i],
                department: departments[i],
                accept: None,
                medicine: None,
            })
            .collect();

        let accept_idx = index::sample(&mut self.rng, n, self.cfg.accept_count().min(n));
        for i in accept_idx.iter() {
            records[i].accept = Some(self.accept.sample(&mut self.rng));
        }
        forward_fill_accept(&mut records);

        let medicine_idx = index::sample(&mut self.rng, n, self.cfg.medicine_count().min(n));
        for i in medicine_idx.iter() {
            let pick = self.rng.gen_range(0..MedicineAction::ALL.len());
            records[i].medicine = Some(MedicineAction::ALL[pick]);
        }

        log(
            Level::Debug,
            Domain::Data,
            "table_synthesized",
            obj(&[
                ("rows", json!(n)),
                ("accept_seeded", json!(accept_idx.len())),
                ("medicine_seeded", json!(medicine_idx.len())),
            ]),
        );

        Dataset::new(records)
    }

    /// Completeness timeline for `n` collected samples, keeping every `stride`-th point.
    pub fn collection_series(&mut self, n: usize, stride: usize) -> CollectionSeries {
        let final_rate = self.cfg.accept_fraction * 100.0;
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        let stride = stride.max(1);

        let mut points = Vec::with_capacity(n / stride + 1);
        for i in 1..=n {
            let base = COLLECTION_START_RATE
                + (final_rate - COLLECTION_START_RATE) * (i as f64 / n as f64);
            let rate = (base + self.normal(0.0, 1.0)).clamp(0.0, 100.0);
            if (i - 1) % stride == 0 {
                points.push(CollectionPoint {
                    time: start + Duration::hours(COLLECTION_STEP_HOURS * (i as i64 - 1)),
                    cumulative: i,
                    rate,
                });
            }
        }

        log(
            Level::Debug,
            Domain::Data,
            "collection_simulated",
            obj(&[
                ("samples", json!(n)),
                ("points", json!(points.len())),
                ("final_rate", v_num(final_rate)),
            ]),
        );

        CollectionSeries { points, final_rate }
    }
}

/// Forward-fill acceptance; leading gaps become `Unknown`.
pub fn forward_fill_accept(records: &mut [TdmRecord]) {
    let mut last: Option<Acceptance> = None;
    for rec in records.iter_mut() {
        match rec.accept {
            Some(a) => last = Some(a),
            None => rec.accept = Some(last.unwrap_or(Acceptance::Unknown)),
        }
    }
}
