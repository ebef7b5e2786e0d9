use serde_json::json;
use std::fs;

use tdm_eda::{EdaConfig, Synthesizer};

const MANIFEST_FILE: &str = "tdm_dataset_manifest.json";

fn main() {
    let cfg = EdaConfig::from_env();

    let mut synth = match Synthesizer::new(&cfg) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("synthesizer setup failed: {:?}", err);
            std::process::exit(1);
        }
    };
    let ds = synth.table();

    if let Err(err) = fs::create_dir_all(&cfg.out_dir) {
        eprintln!("failed to create {}: {}", cfg.out_dir.display(), err);
        std::process::exit(2);
    }

    let payload = json!({
        "seed": cfg.seed,
        "accept_fraction": cfg.accept_fraction,
        "medicine_fraction": cfg.medicine_fraction,
        "summary": ds.summary(),
    });
    let body = match serde_json::to_string_pretty(&payload) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to encode manifest: {}", err);
            std::process::exit(3);
        }
    };

    let out_path = cfg.out_dir.join(MANIFEST_FILE);
    if let Err(err) = fs::write(&out_path, body) {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!("wrote manifest {}", out_path.display());
}
