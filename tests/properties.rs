mod common;

use backtrans::motif::{find_homopolymer, Motif};
use backtrans::{
    BacktranslationConfig, CandidateScorer, ExpressionProfile, LogisticParameters, MotifGuard,
    Profile,
};
use proptest::prelude::*;

use common::{decodes_to, job, orchestrator};

const RESIDUES: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

fn protein() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(RESIDUES), 1..40).prop_map(|body| {
        let mut protein = String::from("M");
        protein.extend(body.into_iter().map(char::from));
        protein
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn backtranslation_honours_sequence_rules(protein in protein(), seed in any::<u64>()) {
        let orch = orchestrator(
            BacktranslationConfig::default()
                .with_candidates(2)
                .with_seed(seed),
        );
        let report = orch.backtranslate(&job("prop", &protein)).expect("backtranslation succeeds");
        let profile = Profile::builtin(ExpressionProfile::HomoSapiens).expect("profile");
        let nts = report.nucleotides.as_bytes();
        let guard = MotifGuard::default();

        prop_assert_eq!(nts.len(), protein.len() * 3);
        prop_assert!(decodes_to(&profile, protein.as_bytes(), &report.nucleotides));
        prop_assert_eq!(guard.find_restriction_site(nts), None);
        prop_assert_eq!(find_homopolymer(nts), None);
        if report.counters.at_runs <= 100 {
            prop_assert_eq!(guard.find(Motif::AtRun, nts), None);
        }
        if report.counters.pyrimidine_runs <= 100 {
            prop_assert_eq!(guard.find(Motif::PyrimidineRun, nts), None);
        }
        prop_assert!(
            report.thresholds.contains(report.score.gc),
            "gc {} outside [{}, {}]",
            report.score.gc,
            report.thresholds.min,
            report.thresholds.max
        );
    }

    #[test]
    fn logistic_curve_vanishes_at_target(target in 1.0f64..99.0) {
        let params = LogisticParameters::fit(target).expect("fit converges");
        let scale = 1.0 + params.a.abs() + params.d.abs();
        prop_assert!(params.evaluate(target).abs() < 1e-9 * scale);
        prop_assert_eq!(params.target(), target);
    }

    #[test]
    fn logistic_curve_changes_sign_at_target(target in 1.0f64..99.0) {
        let params = LogisticParameters::fit(target).expect("fit converges");
        let below = (target - 10.0).max(0.0);
        let above = (target + 10.0).min(100.0);
        prop_assert!(params.evaluate(below) < 0.0, "f({}) = {}", below, params.evaluate(below));
        prop_assert!(params.evaluate(above) > 0.0, "f({}) = {}", above, params.evaluate(above));

        let mut previous = -1.0;
        for gc in 0..=100 {
            let y = params.evaluate(gc as f64);
            prop_assert!(y.abs() <= 1.0);
            prop_assert!(y >= previous, "curve falls at {}% GC", gc);
            previous = y;
        }
    }

    #[test]
    fn cai_ignores_codon_order(protein in protein(), rotation in 0usize..40) {
        let profile = Profile::builtin(ExpressionProfile::HomoSapiens).expect("profile");
        let scorer = CandidateScorer::new(&profile.codons, 55.0);
        let residues = protein.as_bytes();
        let codons: Vec<[u8; 3]> = residues
            .iter()
            .map(|&r| {
                let choices = profile.codons.choices(r).expect("residue");
                choices.codon(choices.len() - 1).expect("codon")
            })
            .collect();

        let k = rotation % residues.len();
        let mut rotated_residues = residues.to_vec();
        let mut rotated_codons = codons.clone();
        rotated_residues.rotate_left(k);
        rotated_codons.rotate_left(k);

        let straight: Vec<u8> = codons.concat();
        let shifted: Vec<u8> = rotated_codons.concat();
        let a = scorer.codon_adaptation_index(residues, &straight).expect("cai");
        let b = scorer.codon_adaptation_index(&rotated_residues, &shifted).expect("cai");
        prop_assert!((a - b).abs() < 1e-9);
        prop_assert!(a > 0.0 && a <= 100.0 + 1e-9);
    }
}
