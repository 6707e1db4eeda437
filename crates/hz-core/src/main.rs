//! hz-core: fit a career hazard model by ensemble MCMC.
//!
//! Commands:
//! - `run`: sample the posterior for a career and write the trace
//! - `check`: validate configuration and, optionally, a career file
//! - `config`: print resolved or default settings

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hz_config::{Settings, CONFIG_SCHEMA_VERSION};
use hz_core::career::Career;
use hz_core::config::{load_config, ConfigError, ConfigOptions, ResolvedConfig, SettingsOverrides};
use hz_core::error::CoreError;
use hz_core::exit_codes::ExitCode;
use hz_core::likelihood::LikelihoodEvaluator;
use hz_core::log_event;
use hz_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use hz_core::model::HazardModel;
use hz_core::proposal::ProposalKernel;
use hz_core::report::{CheckReport, RunReport};
use hz_core::sampler::Sampler;
use hz_core::trace::{TraceHeader, TraceWriter};

/// Career hazard model sampler
#[derive(Parser)]
#[command(name = "hz-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (takes precedence over HZ_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample the posterior for a career and write the trace
    Run(RunArgs),

    /// Validate configuration and, optionally, a career file
    Check(CheckArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Career file: one score per line, trailing '*' for a not-out
    #[arg(long, required_unless_present = "prior_only")]
    career: Option<PathBuf>,

    /// Trace output file
    #[arg(long, short = 'o', default_value = "sample.txt")]
    output: PathBuf,

    /// Append to the trace instead of truncating it
    #[arg(long)]
    append: bool,

    /// Total MCMC steps
    #[arg(long)]
    steps: Option<u64>,

    /// Number of particles
    #[arg(long)]
    ensemble_size: Option<usize>,

    /// Record one trace row every N steps
    #[arg(long)]
    interval: Option<u64>,

    /// RNG seed (drawn and reported when absent)
    #[arg(long)]
    seed: Option<u64>,

    /// Probability of a stretch move over a single-parameter move
    #[arg(long)]
    stretch_probability: Option<f64>,

    /// Score horizon; every score must be below it
    #[arg(long)]
    horizon: Option<usize>,

    /// Ignore the career and sample the prior
    #[arg(long, conflicts_with = "career")]
    prior_only: bool,
}

impl RunArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            steps: self.steps,
            ensemble_size: self.ensemble_size,
            sampling_interval: self.interval,
            seed: self.seed,
            stretch_probability: self.stretch_probability,
            horizon: self.horizon,
        }
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Career file to check against the horizon
    #[arg(long)]
    career: Option<PathBuf>,

    /// Score horizon override
    #[arg(long)]
    horizon: Option<usize>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved settings
    Show,

    /// Print the built-in default settings
    Default,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let ctx = LogContext::new(generate_run_id());
    let span = ctx.span();
    let _entered = span.enter();

    let result = match &cli.command {
        Commands::Run(args) => run_sampler(&cli.global, args, &ctx),
        Commands::Check(args) => run_check(&cli.global, args),
        Commands::Config(args) => run_config(&cli.global, args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    };

    let code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => report_error(&err),
    };
    code.into()
}

fn report_error(err: &CoreError) -> ExitCode {
    let code = err.exit_code();
    let event = match err {
        CoreError::Config(_) => event_names::CONFIG_ERROR,
        _ if code.is_internal_error() => event_names::INTERNAL_ERROR,
        _ => event_names::RUN_FAILED,
    };
    log_event!(
        DEBUG,
        event,
        Stage::Finish,
        "command failed",
        exit_code = code.as_i32(),
        code_name = code.code_name()
    );
    eprintln!("hz-core: {err}");
    code
}

// ============================================================================
// Commands
// ============================================================================

fn run_sampler(global: &GlobalOpts, args: &RunArgs, ctx: &LogContext) -> Result<(), CoreError> {
    log_event!(INFO, event_names::RUN_STARTED, Stage::Init, "starting run");
    let resolved = resolve_settings(global, &args.overrides())?;

    let career = if args.prior_only {
        Career::default()
    } else {
        let path = args.career.as_deref().ok_or_else(|| {
            CoreError::Args("--career is required unless --prior-only is given".to_string())
        })?;
        let career = Career::load(path)?;
        let stats = career.stats();
        log_event!(
            INFO,
            event_names::CAREER_LOADED,
            Stage::Load,
            "career loaded",
            path = tracing::field::display(path.display()),
            innings = stats.innings,
            not_outs = stats.not_outs,
            total_runs = stats.total_runs,
            highest_score = stats.highest_score,
            batting_average = stats.batting_average
        );
        career
    };

    let model = HazardModel::new(&resolved.settings.model)?;
    let evaluator = LikelihoodEvaluator::new(&career, model.horizon())?;
    let snapshot = resolved.snapshot();
    let mut sampler = Sampler::new(
        ProposalKernel::new(model),
        evaluator,
        resolved.settings.sampler.clone(),
    )?;

    let mut writer = TraceWriter::create(&args.output, args.append)?
        .with_flush_every(resolved.settings.sampler.flush_every);
    if writer.starts_empty() {
        writer.write_header(&TraceHeader {
            run_id: ctx.run_id.clone(),
            seed: sampler.seed(),
            config_id: snapshot.short_id().to_string(),
        })?;
    }
    log_event!(
        INFO,
        event_names::TRACE_OPENED,
        Stage::Sample,
        "writing trace",
        path = tracing::field::display(args.output.display()),
        append = args.append,
        expected_records = resolved.settings.sampler.expected_records()
    );

    let summary = sampler.run(&mut writer)?;
    log_event!(
        INFO,
        event_names::RUN_FINISHED,
        Stage::Finish,
        "run complete",
        seed = summary.seed,
        records = summary.records_written,
        acceptance_fraction = summary.acceptance_fraction
    );

    let report = RunReport {
        run_id: ctx.run_id.clone(),
        trace_path: args.output.display().to_string(),
        prior_only: args.prior_only,
        career: career.stats(),
        config: snapshot,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> Result<(), CoreError> {
    let overrides = SettingsOverrides {
        horizon: args.horizon,
        ..SettingsOverrides::default()
    };
    let resolved = resolve_settings(global, &overrides)?;
    let model = HazardModel::new(&resolved.settings.model)?;

    let career = match &args.career {
        Some(path) => {
            let career = Career::load(path)?;
            LikelihoodEvaluator::new(&career, model.horizon())?;
            Some(career.stats())
        }
        None => None,
    };

    let report = CheckReport {
        ok: true,
        horizon: model.horizon(),
        config: resolved.snapshot(),
        career,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> Result<(), CoreError> {
    let settings = match args.command {
        ConfigCommands::Show => resolve_settings(global, &SettingsOverrides::default())?.settings,
        ConfigCommands::Default => Settings::default(),
    };
    let json = settings.to_json_pretty().map_err(ConfigError::from)?;
    println!("{json}");
    Ok(())
}

fn print_version() {
    println!("hz-core {}", env!("CARGO_PKG_VERSION"));
    println!("config schema {}", CONFIG_SCHEMA_VERSION);
}

fn resolve_settings(
    global: &GlobalOpts,
    overrides: &SettingsOverrides,
) -> Result<ResolvedConfig, CoreError> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
    };
    let resolved = load_config(&options, overrides)?;

    if resolved.used_defaults() {
        log_event!(
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Init,
            "no settings file found, using defaults"
        );
    } else {
        log_event!(
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "settings loaded",
            source = tracing::field::display(&resolved.path.source),
            path = tracing::field::display(
                resolved
                    .path
                    .path
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            )
        );
    }
    Ok(resolved)
}
