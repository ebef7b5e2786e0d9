use std::path::PathBuf;

/// Run parameters for dataset synthesis and chart output.
#[derive(Debug, Clone)]
pub struct EdaConfig {
    pub seed: u64,
    pub records: usize,
    /// Fraction of rows that receive an acceptance decision before forward-fill.
    pub accept_fraction: f64,
    /// Fraction of rows that receive a medicine action. The rest stay missing.
    pub medicine_fraction: f64,
    pub out_dir: PathBuf,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            records: 1745,
            accept_fraction: 0.812,
            medicine_fraction: 0.387,
            out_dir: PathBuf::from("."),
        }
    }
}

impl EdaConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            seed: std::env::var("EDA_SEED").ok().and_then(|v| v.parse().ok()).unwrap_or(d.seed),
            records: std::env::var("EDA_RECORDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(d.records),
            accept_fraction: std::env::var("EDA_ACCEPT_FRACTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|f: &f64| (0.0..=1.0).contains(f))
                .unwrap_or(d.accept_fraction),
            medicine_fraction: std::env::var("EDA_MEDICINE_FRACTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|f: &f64| (0.0..=1.0).contains(f))
                .unwrap_or(d.medicine_fraction),
            out_dir: std::env::var("EDA_OUT_DIR").map(PathBuf::from).unwrap_or(d.out_dir),
        }
    }

    /// Rows populated with an acceptance decision before the fill pass.
    pub fn accept_count(&self) -> usize {
        (self.records as f64 * self.accept_fraction) as usize
    }

    pub fn medicine_count(&self) -> usize {
        (self.records as f64 * self.medicine_fraction) as usize
    }

    /// Sample size backing the "current state" marker on the power chart.
    pub fn current_sample_size(&self) -> usize {
        (self.records as f64 * self.accept_fraction).round() as usize
    }
}
