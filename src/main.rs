use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use backtrans::tables::{BicodonTable, CodonTable, ContextRules};
use backtrans::{
    read_genes_from_path, run_jobs_ordered, write_records, BacktranslationConfig,
    BacktranslationOrchestrator, CommandOracle, EngineContext, ExpressionProfile, MostFrequentBacktranslator,
    MotifGuard, Profile,
};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "backtrans",
    version,
    about = "Backtranslate proteins into expression-optimized coding DNA"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Multi-objective backtranslation (10 candidates per gene).
    Optimize {
        #[command(flatten)]
        files: FileArgs,
        /// Built-in expression system: human, human-trna, b-cell, hek293t.
        #[arg(long, default_value = "human")]
        profile: ExpressionProfile,
        /// Target GC%.
        #[arg(long, default_value_t = backtrans::config::DEFAULT_TARGET_GC)]
        gc: f64,
        /// Folding command used to score translation starts.
        #[arg(long, default_value = "seqfold")]
        fold_command: String,
        /// Skip the translation-start search.
        #[arg(long)]
        no_fold: bool,
        /// Base seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
        /// Worker threads (default: all cores).
        #[arg(long)]
        threads: Option<usize>,
        /// Custom single-codon table (`residue codon weight`).
        #[arg(long, requires = "bicodon_table")]
        codon_table: Option<PathBuf>,
        /// Custom bicodon table (`pair previous codon weight`).
        #[arg(long, requires = "codon_table")]
        bicodon_table: Option<PathBuf>,
        /// Flag list restricting when bicodon weights apply (`pair previous`).
        #[arg(long, requires = "bicodon_table")]
        context_table: Option<PathBuf>,
        /// Extra restriction site to avoid besides BamHI and SpeI (repeatable).
        #[arg(long = "avoid-site", value_name = "SITE")]
        avoid_sites: Vec<String>,
    },
    /// Deterministic most-frequent-codon baseline.
    MostFrequent {
        #[command(flatten)]
        files: FileArgs,
        /// Built-in expression system: human, human-trna, b-cell, hek293t.
        #[arg(long, default_value = "human")]
        profile: ExpressionProfile,
        /// Seed for the occasional escape draw.
        #[arg(long)]
        seed: Option<u64>,
        /// Custom single-codon table (`residue codon weight`).
        #[arg(long)]
        codon_table: Option<PathBuf>,
        /// Extra restriction site to avoid besides BamHI and SpeI (repeatable).
        #[arg(long = "avoid-site", value_name = "SITE")]
        avoid_sites: Vec<String>,
    },
    /// List the built-in expression systems.
    Profiles,
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Input proteins: FASTA or `name<TAB>sequence` lines.
    input: PathBuf,
    /// Output file of `name<TAB>nucleotides` lines.
    #[arg(short, long)]
    output: PathBuf,
    /// Overwrite an existing output file.
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Optimize {
            files,
            profile,
            gc,
            fold_command,
            no_fold,
            seed,
            threads,
            codon_table,
            bicodon_table,
            context_table,
            avoid_sites,
        } => {
            let mut config = BacktranslationConfig::default()
                .with_profile(profile)
                .with_target_gc(gc)
                .with_prefix_optimization(!no_fold);
            config.seed = seed;
            config.threads = threads;
            let tables = match (codon_table, bicodon_table) {
                (Some(codons), Some(bicodons)) => {
                    Some(load_custom_profile(&codons, &bicodons, context_table.as_deref())?)
                }
                _ => None,
            };
            let oracle = if no_fold { None } else { probe_oracle(&fold_command)? };
            let guard = build_guard(&avoid_sites)?;
            run_optimize(&files, config, tables, oracle, guard)?
        }
        Commands::MostFrequent {
            files,
            profile,
            seed,
            codon_table,
            avoid_sites,
        } => {
            let guard = build_guard(&avoid_sites)?;
            run_most_frequent(&files, profile, seed, codon_table.as_deref(), &guard)?
        }
        Commands::Profiles => {
            for profile in ExpressionProfile::ALL {
                println!("{:<12}{}", profile.as_str(), profile.description());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_optimize(
    files: &FileArgs,
    config: BacktranslationConfig,
    custom: Option<Profile>,
    oracle: Option<CommandOracle>,
    guard: MotifGuard,
) -> Result<()> {
    check_output(files)?;
    let jobs = read_genes_from_path(&files.input)
        .with_context(|| format!("failed to read genes from {}", files.input.display()))?;

    let mut context = match custom {
        Some(profile) => EngineContext::new(profile, config),
        None => EngineContext::builtin(config),
    }
    .context("invalid configuration")?
    .with_guard(guard);
    if let Some(oracle) = oracle {
        context = context.with_oracle(Arc::new(oracle));
    }
    if context.config().optimize_prefix && !context.prefix_search_enabled() {
        warn!("no folding command available; translation-start search disabled");
    }

    info!(
        genes = jobs.len(),
        profile = %context.profile().name,
        target_gc = context.config().target_gc,
        "starting backtranslation"
    );
    let orchestrator = BacktranslationOrchestrator::new(Arc::new(context));
    let reports = run_jobs_ordered(&orchestrator, &jobs).context("backtranslation failed")?;

    let mut writer = create_output(&files.output)?;
    write_records(&mut writer, reports.iter().map(|report| report.record()))
        .with_context(|| format!("failed to write {}", files.output.display()))?;
    info!(genes = reports.len(), output = %files.output.display(), "all genes backtranslated");
    Ok(())
}

fn run_most_frequent(
    files: &FileArgs,
    profile: ExpressionProfile,
    seed: Option<u64>,
    codon_table: Option<&Path>,
    guard: &MotifGuard,
) -> Result<()> {
    check_output(files)?;
    let jobs = read_genes_from_path(&files.input)
        .with_context(|| format!("failed to read genes from {}", files.input.display()))?;
    let codons = match codon_table {
        Some(path) => load_codon_table(path)?,
        None => Profile::builtin(profile)?.codons,
    };
    let baseline = MostFrequentBacktranslator::new(&codons, guard);

    let mut records = Vec::with_capacity(jobs.len());
    for job in &jobs {
        codons
            .check_coverage(&job.protein)
            .with_context(|| format!("gene '{}'", job.name))?;
        let mut rng = match seed {
            Some(base) => StdRng::seed_from_u64(backtrans::derive_seed(base, &job.name)),
            None => StdRng::from_entropy(),
        };
        let sequence = baseline.backtranslate(job.protein.residues(), &mut rng)?;
        info!(gene = %job.name, gc = sequence.gc_percent(), "backtranslated");
        records.push((job.name.as_str(), sequence.into_string()));
    }

    let mut writer = create_output(&files.output)?;
    write_records(&mut writer, records.iter().map(|(name, seq)| (*name, seq.as_str())))
        .with_context(|| format!("failed to write {}", files.output.display()))?;
    Ok(())
}

fn build_guard(extra: &[String]) -> Result<MotifGuard> {
    let defaults = MotifGuard::default();
    let mut sites: Vec<Vec<u8>> = defaults.sites().map(<[u8]>::to_vec).collect();
    for site in extra {
        let site = site.trim().to_ascii_uppercase();
        if site.is_empty() || !site.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')) {
            bail!("restriction site '{site}' must be a non-empty A/C/G/T string");
        }
        sites.push(site.into_bytes());
    }
    let guard = MotifGuard::with_sites(sites);
    if !extra.is_empty() {
        let listed: Vec<String> = guard.sites().map(|s| String::from_utf8_lossy(s).into_owned()).collect();
        info!(sites = %listed.join(","), "avoiding restriction sites");
    }
    Ok(guard)
}

fn probe_oracle(command: &str) -> Result<Option<CommandOracle>> {
    let oracle = CommandOracle::parse(command).context("invalid --fold-command")?;
    Ok(oracle.probe())
}

fn load_codon_table(path: &Path) -> Result<CodonTable> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    CodonTable::from_tsv(BufReader::new(file))
        .with_context(|| format!("failed to parse codon table {}", path.display()))
}

fn load_custom_profile(codons: &Path, bicodons: &Path, context: Option<&Path>) -> Result<Profile> {
    let codon_table = load_codon_table(codons)?;
    let file = File::open(bicodons).with_context(|| format!("failed to open {}", bicodons.display()))?;
    let bicodon_table = BicodonTable::from_tsv(BufReader::new(file))
        .with_context(|| format!("failed to parse bicodon table {}", bicodons.display()))?;
    let rules = match context {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            ContextRules::from_tsv(BufReader::new(file))
                .with_context(|| format!("failed to parse context table {}", path.display()))?
        }
        None => ContextRules::Always,
    };
    let correlations = Profile::builtin(ExpressionProfile::HomoSapiens)?.correlations;
    let name = codons
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "custom".to_string());
    Ok(Profile::custom(name, codon_table, bicodon_table, rules, correlations))
}

fn check_output(files: &FileArgs) -> Result<()> {
    if files.output.exists() && !files.force {
        bail!(
            "output file {} already exists (use --force to overwrite)",
            files.output.display()
        );
    }
    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
