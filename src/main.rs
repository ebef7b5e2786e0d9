use tdm_eda::logging::{log, log_generation_failed, obj, params_hash, v_str, Domain, Level};
use tdm_eda::{generate, EdaConfig};

fn rule() {
    println!("{}", "=".repeat(60));
}

fn main() {
    let cfg = EdaConfig::from_env();

    rule();
    println!("TDM Interactive EDA Generator");
    rule();
    println!();
    println!("  seed: {}", cfg.seed);
    println!("  records: {}", cfg.records);
    println!("  output: {}", cfg.out_dir.display());
    println!();
    println!("Generating interactive charts...");

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("out_dir", v_str(&cfg.out_dir.display().to_string())),
            ("config_hash", v_str(&params_hash(&format!("{:?}", cfg)))),
        ]),
    );

    match generate(&cfg, |artifact| {
        println!("    [OK] {} ({:.1} KB)", artifact.name, artifact.bytes as f64 / 1024.0);
    }) {
        Ok(report) => {
            println!();
            let short = report.fingerprint.get(..12).unwrap_or(&report.fingerprint);
            println!("  dataset: {} rows, fingerprint {}", report.rows, short);
            rule();
            println!("[SUCCESS] All interactive charts generated.");
            println!("Open {} in a browser to explore.", report.dashboard.path.display());
            rule();
        }
        Err(err) => {
            println!();
            println!("[ERROR] Generation failed:");
            println!("{}", err);
            eprintln!("{:?}", err);
            log_generation_failed(&err);
        }
    }
}
