use tdm_eda::data::{Acceptance, Department, Drug, Field, Synthesizer};
use tdm_eda::EdaConfig;

fn reference_table() -> tdm_eda::Dataset {
    Synthesizer::new(&EdaConfig::default())
        .expect("default weights are valid")
        .table()
}

#[test]
fn row_count_matches_configuration() {
    let ds = reference_table();
    assert_eq!(ds.len(), 1745);

    let cfg = EdaConfig {
        records: 321,
        ..EdaConfig::default()
    };
    let small = Synthesizer::new(&cfg).unwrap().table();
    assert_eq!(small.len(), 321);
}

#[test]
fn acceptance_has_no_gaps_after_fill() {
    let ds = reference_table();
    assert_eq!(ds.missing_pct(Field::Accept), 0.0);
    assert!(ds.records().iter().all(|r| r.accept.is_some()));
}

#[test]
fn medicine_keeps_its_injected_missing_rate() {
    let cfg = EdaConfig::default();
    let ds = reference_table();
    let populated = cfg.medicine_count();
    assert_eq!(populated, 675);
    assert_eq!(ds.missing_count(Field::Medicine), 1745 - populated);
    let expected = (1.0 - cfg.medicine_fraction) * 100.0;
    assert!((ds.missing_pct(Field::Medicine) - expected).abs() < 0.1);
}

#[test]
fn only_medicine_is_reported_missing() {
    let ds = reference_table();
    let missing: Vec<_> = ds
        .missing_rates()
        .into_iter()
        .filter(|(_, pct)| *pct > 0.0)
        .map(|(f, _)| f)
        .collect();
    assert_eq!(missing, vec![Field::Medicine]);
}

#[test]
fn same_seed_reproduces_dataset() {
    let a = reference_table();
    let b = reference_table();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());

    let other = Synthesizer::new(&EdaConfig {
        seed: 43,
        ..EdaConfig::default()
    })
    .unwrap()
    .table();
    assert_ne!(a.fingerprint(), other.fingerprint());
}

#[test]
fn categorical_proportions_are_plausible() {
    let ds = reference_table();
    let s = ds.summary();

    assert_eq!(s.drug_counts.len(), Drug::ALL.len());
    assert_eq!(s.department_counts.len(), Department::ALL.len());
    let icu = s.department_counts[Department::Icu.label()] as f64 / ds.len() as f64;
    assert!((0.25..0.35).contains(&icu), "ICU share {}", icu);

    let yes = s.accept_counts[Acceptance::Yes.label()] as f64 / ds.len() as f64;
    assert!(yes > 0.85, "Yes share {}", yes);

    let age = s.age.unwrap();
    assert!(age.min >= 18.0 && age.max <= 95.0);
    assert!((age.mean - 60.0).abs() < 2.0);
    let dose = s.dose.unwrap();
    assert!(dose.min >= 100.0 && dose.max < 1000.0);
}
