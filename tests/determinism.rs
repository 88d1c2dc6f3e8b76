mod common;

use std::collections::HashSet;

use blake3::hash;
use backtrans::{render_records, run_jobs, run_jobs_ordered, BacktranslationConfig, GeneJob};

use common::{job, orchestrator};

fn panel() -> Vec<GeneJob> {
    vec![
        job("ins", "MALWMRLLPLLALLALWGPDPAAAFVNQHLCGSHLVEALYLVCGERGFFYTPKT"),
        job("gcg", "MKSIYFVAGLFVMLVQGSWQRSLQDTEEKSRSFSASQADPLSDPDQMNEDKRHSQ"),
        job("ubq", "MQIFVKTLTGKTITLEVEPSDTIENVKAKIQDKEGIPPDQQRLIFAGKQLEDGRTLSDYNIQKESTLHLVLRLRGG"),
        job("short", "MW"),
    ]
}

fn render(config: BacktranslationConfig) -> String {
    let orch = orchestrator(config);
    let reports = run_jobs_ordered(&orch, &panel()).expect("backtranslation succeeds");
    render_records(reports.iter().map(|report| report.record())).expect("rendering succeeds")
}

#[test]
fn seeded_runs_are_identical() {
    let mut fingerprints = HashSet::new();
    for _ in 0..3 {
        let text = render(BacktranslationConfig::default().with_seed(2024));
        fingerprints.insert(hash(text.as_bytes()));
    }
    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn thread_count_does_not_change_output() {
    let mut fingerprints = HashSet::new();
    for threads in [1, 2, 4] {
        let text = render(
            BacktranslationConfig::default()
                .with_seed(77)
                .with_threads(threads),
        );
        fingerprints.insert(hash(text.as_bytes()));
    }
    assert_eq!(fingerprints.len(), 1, "outputs depend on scheduling");
}

#[test]
fn completion_order_carries_the_same_sequences() {
    let config = BacktranslationConfig::default().with_seed(5).with_threads(3);
    let orch = orchestrator(config);
    let jobs = panel();

    let ordered = run_jobs_ordered(&orch, &jobs).expect("ordered run succeeds");
    let mut unordered = run_jobs(&orch, &jobs).expect("unordered run succeeds");
    unordered.sort_by_key(|report| {
        jobs.iter()
            .position(|job| job.name == report.name)
            .expect("report names a submitted job")
    });

    let lhs: Vec<_> = ordered.iter().map(|r| r.record()).collect();
    let rhs: Vec<_> = unordered.iter().map(|r| r.record()).collect();
    assert_eq!(lhs, rhs);
}

#[test]
fn different_seeds_diverge() {
    let a = render(BacktranslationConfig::default().with_seed(1));
    let b = render(BacktranslationConfig::default().with_seed(2));
    assert_ne!(common::fingerprint(&a), common::fingerprint(&b));
}
