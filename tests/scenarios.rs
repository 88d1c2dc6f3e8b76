mod common;

use backtrans::motif::{find_homopolymer, Motif};
use backtrans::{
    BacktranslationConfig, ExpressionProfile, MostFrequentBacktranslator, MotifGuard, Profile,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_case::test_case;

use common::{decodes_to, gc3, has_restriction_site, job, orchestrator};

#[test]
fn alanine_run_keeps_start_and_end() {
    let orch = orchestrator(BacktranslationConfig::default().with_seed(1));
    let gene = job("ala", "MAAAAAAAAAAW");
    let report = orch.backtranslate(&gene).expect("backtranslation succeeds");

    assert_eq!(report.nucleotides.len(), 36);
    assert!(report.nucleotides.starts_with("ATG"));
    assert!(report.nucleotides.ends_with("TGG"));
    for codon in report.nucleotides.as_bytes()[3..33].chunks_exact(3) {
        assert!(
            [b"GCT", b"GCC", b"GCA", b"GCG"].iter().any(|ala| codon == &ala[..]),
            "unexpected alanine codon {:?}",
            std::str::from_utf8(codon)
        );
    }
}

/// GC3 a sampler drawing straight from the table weights would reach on average.
fn table_gc3(profile: &Profile, protein: &str) -> f64 {
    let shares: Vec<f64> = protein
        .bytes()
        .map(|r| {
            let choices = profile.codons.choices(r).expect("residue");
            let total: f64 = choices.iter().map(|c| c.weight).sum();
            let strong: f64 = choices
                .iter()
                .filter(|c| matches!(c.codon[2], b'G' | b'C'))
                .map(|c| c.weight)
                .sum();
            strong / total
        })
        .collect();
    shares.iter().sum::<f64>() / shares.len() as f64
}

#[test]
fn high_gc_target_prefers_gc_wobble() {
    let protein = "MLSSLLSRLSLLSSLSLLRSSLLSLSLLSSLW";
    let profile = Profile::builtin(ExpressionProfile::HomoSapiens).expect("profile");
    let expected = table_gc3(&profile, protein);

    let seeds = [3, 5, 8, 13, 21];
    let mut low = 0.0;
    let mut high = 0.0;
    for seed in seeds {
        let low_orch = orchestrator(BacktranslationConfig::default().with_target_gc(45.0).with_seed(seed));
        let high_orch = orchestrator(BacktranslationConfig::default().with_target_gc(70.0).with_seed(seed));
        low += gc3(&low_orch.backtranslate(&job("ls", protein)).expect("low run").nucleotides);
        high += gc3(&high_orch.backtranslate(&job("ls", protein)).expect("high run").nucleotides);
    }
    let low = low / seeds.len() as f64;
    let high = high / seeds.len() as f64;
    assert!(high > expected, "GC3 at 70% target ({high}) should exceed the table's {expected}");
    assert!(high > low, "GC3 at 70% target ({high}) should exceed GC3 at 45% ({low})");
}

#[test]
fn restriction_site_on_preferred_path_is_avoided() {
    // Most frequent human codons spell ATG TGG ATC CAG, which contains GGATCC.
    let protein = "MWIQ";
    let profile = Profile::builtin(ExpressionProfile::HomoSapiens).expect("profile");
    let preferred: String = protein
        .bytes()
        .map(|r| {
            let choices = profile.codons.choices(r).expect("residue");
            let codon = choices.codon(choices.most_frequent().expect("codon")).expect("codon");
            String::from_utf8_lossy(&codon).into_owned()
        })
        .collect();
    assert!(has_restriction_site(&preferred));

    for seed in 0..5 {
        let orch = orchestrator(BacktranslationConfig::default().with_seed(seed));
        let report = orch.backtranslate(&job("site", protein)).expect("backtranslation succeeds");
        assert!(!has_restriction_site(&report.nucleotides), "{}", report.nucleotides);
        assert!(decodes_to(&profile, protein.as_bytes(), &report.nucleotides));
    }

    let guard = MotifGuard::default();
    let baseline = MostFrequentBacktranslator::new(&profile.codons, &guard);
    let out = baseline
        .backtranslate(protein.as_bytes(), &mut StdRng::seed_from_u64(0))
        .expect("baseline succeeds");
    assert!(!has_restriction_site(&String::from_utf8_lossy(out.as_bytes())));
}

#[test_case(ExpressionProfile::HomoSapiens ; "human")]
#[test_case(ExpressionProfile::HomoSapiensTrnaCorrected ; "human trna")]
#[test_case(ExpressionProfile::BCell ; "b cell")]
#[test_case(ExpressionProfile::Hek293T ; "hek293t")]
fn every_profile_produces_valid_dna(kind: ExpressionProfile) {
    let protein = "MVSKGEELFTGVVPILVELDGDVNGHKFSVSGEGEGDATYGKLTLKFICTTGKLPVPWPTLVTTL*";
    let orch = orchestrator(BacktranslationConfig::default().with_profile(kind).with_seed(17));
    let report = orch.backtranslate(&job("gfp", protein)).expect("backtranslation succeeds");
    let profile = Profile::builtin(kind).expect("profile");

    assert!(decodes_to(&profile, protein.as_bytes(), &report.nucleotides));
    assert!(report.nucleotides.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')));
    assert!(!has_restriction_site(&report.nucleotides));
    assert_eq!(find_homopolymer(report.nucleotides.as_bytes()), None);
    assert!(report.thresholds.contains(report.score.gc));
}

#[test_case(45.0 ; "below default floor")]
#[test_case(55.0 ; "default")]
#[test_case(65.0 ; "raised ceiling")]
fn gc_lands_in_band(target: f64) {
    let orch = orchestrator(BacktranslationConfig::default().with_target_gc(target).with_seed(29));
    let report = orch
        .backtranslate(&job("p53", "MEEPQSDPSVEPPLSQETFSDLWKLLPENNVLSPLPSQAMDDLMLSPDDIEQWFTEDPGP"))
        .expect("backtranslation succeeds");
    let band = report.thresholds;
    assert!(band.min <= report.score.gc && report.score.gc <= band.max);
    if target >= 60.0 {
        assert!(band.max >= target + 2.0);
    }
}

#[test]
fn motif_counters_explain_remaining_runs() {
    let orch = orchestrator(BacktranslationConfig::default().with_seed(31));
    let report = orch
        .backtranslate(&job("atrich", "MKNIFYEGRLDAKNIFYSGAPKNW"))
        .expect("backtranslation succeeds");
    let guard = MotifGuard::default();
    if report.counters.at_runs <= 100 {
        assert_eq!(guard.find(Motif::AtRun, report.nucleotides.as_bytes()), None);
    }
    if report.counters.pyrimidine_runs <= 100 {
        assert_eq!(guard.find(Motif::PyrimidineRun, report.nucleotides.as_bytes()), None);
    }
    assert_eq!(report.residual_motifs, guard.violations(report.nucleotides.as_bytes()));
}
