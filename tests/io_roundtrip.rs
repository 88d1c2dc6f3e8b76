mod common;

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};

use backtrans::{
    read_genes_from_path, run_jobs_ordered, write_records, BacktranslationConfig, ExpressionProfile,
    IoError, Profile,
};
use tempfile::tempdir;

use common::{decodes_to, orchestrator};

#[test]
fn fasta_file_to_tab_separated_output() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("genes.fasta");
    fs::write(
        &input,
        ">ins human insulin\nMALWMRLLPLLALLALWGPDPAAA\nFVNQHLCGSHLVEALYLVCGERGFFYTPKT\n>tag\nMDYKDDDDK*\n",
    )
    .expect("write input");

    let jobs = read_genes_from_path(&input).expect("input parses");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].name, "ins human insulin");

    let orch = orchestrator(BacktranslationConfig::default().with_seed(11));
    let reports = run_jobs_ordered(&orch, &jobs).expect("backtranslation succeeds");

    let output = dir.path().join("genes.tsv");
    {
        let mut writer = BufWriter::new(File::create(&output).expect("create output"));
        write_records(&mut writer, reports.iter().map(|r| r.record())).expect("write output");
    }

    let profile = Profile::builtin(ExpressionProfile::HomoSapiens).expect("profile");
    let lines: Vec<String> = BufReader::new(File::open(&output).expect("open output"))
        .lines()
        .collect::<Result<_, _>>()
        .expect("read output");
    assert_eq!(lines.len(), jobs.len());
    for (line, job) in lines.iter().zip(&jobs) {
        let (name, nucleotides) = line.split_once('\t').expect("tab separated");
        assert_eq!(name, job.name);
        assert!(decodes_to(&profile, job.protein.residues(), nucleotides));
    }
}

#[test]
fn tabbed_input_is_accepted_and_invalid_residues_are_named() {
    let dir = tempdir().expect("tempdir");
    let good = dir.path().join("good.tsv");
    fs::write(&good, "a\tMKV\nb\tMW*\n").expect("write input");
    let jobs = read_genes_from_path(&good).expect("input parses");
    assert_eq!(
        jobs.iter().map(|job| job.name.as_str()).collect::<Vec<_>>(),
        ["a", "b"]
    );

    let bad = dir.path().join("bad.tsv");
    fs::write(&bad, "a\tMKV\nbroken\tMK1\n").expect("write input");
    match read_genes_from_path(&bad) {
        Err(IoError::Sequence { name, .. }) => assert_eq!(name, "broken"),
        other => panic!("expected a sequence error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let result = read_genes_from_path(dir.path().join("absent.fasta"));
    assert!(matches!(result, Err(IoError::Io(_))));
}
