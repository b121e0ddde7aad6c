// calib - groundwater model calibration from the command line

mod exit_codes;
mod pest;
mod run;
mod spatial;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use iwfm_calib::CalibError;

use exit_codes::{calib_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "calib")]
#[command(about = "Calibration tools for IWFM groundwater models (PEST pre/post-processing)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log progress at info level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match observations to simulated heads and compute fit statistics
    #[command(after_help = "\
Examples:
  calib run calib.toml
  calib run calib.toml --json
  calib run calib.toml --output result.json")]
    Run {
        /// Path to the calibration TOML config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a calibration config without running
    #[command(after_help = "\
Examples:
  calib validate calib.toml")]
    Validate {
        /// Path to the calibration TOML config file
        config: PathBuf,
    },

    /// Inverse-distance factors from every target point to every source point
    #[command(after_help = "\
Examples:
  calib krige --targets nodes.dat --sources wells.dat
  calib krige --targets nodes.dat --sources wells.dat -o factors.txt")]
    Krige {
        /// Target points (`id x y`)
        #[arg(long)]
        targets: PathBuf,

        /// Source points (`id x y`)
        #[arg(long)]
        sources: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Transfer source point values onto target points
    #[command(after_help = "\
Examples:
  calib transfer --targets nodes.dat --sources pp_values.dat -o node_values.dat")]
    Transfer {
        /// Target points (`id x y`)
        #[arg(long)]
        targets: PathBuf,

        /// Source points with values (`id x y value`)
        #[arg(long)]
        sources: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write a pilot-point factor file for model nodes
    #[command(after_help = "\
Examples:
  calib ppk2fac --pilot-points pp.dat --nodes nodes.dat -o factors.fac
  calib ppk2fac --pilot-points pp.dat --nodes nodes.dat -o factors.fac --points 5")]
    Ppk2fac {
        /// Pilot points (`id x y`)
        #[arg(long)]
        pilot_points: PathBuf,

        /// Model nodes (`id x y`)
        #[arg(long)]
        nodes: PathBuf,

        /// Factor file to write
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Pilot points per node
        #[arg(long, default_value_t = 3)]
        points: usize,
    },

    /// Replace sequential node ids in a factor file with model node ids
    #[command(after_help = "\
Examples:
  calib fac-trans factors.fac node_trans.dat factors_model.fac")]
    FacTrans {
        /// Factor file written by ppk2fac
        factors: PathBuf,

        /// Translation table (`sequential actual` per line)
        translation: PathBuf,

        /// Translated factor file to write
        output: PathBuf,
    },

    /// Vertical head differences between paired wells
    #[command(after_help = "\
Examples:
  calib headdiff well_pairs.csv observations.csv
  calib headdiff well_pairs.csv observations.csv --days 30 -o head_diffs.csv")]
    Headdiff {
        /// Well pairs CSV (`PairNo,WellName1,WellName2`)
        pairs: PathBuf,

        /// Observations CSV (`WELL_NAME,MSMT_DATE,WSE`)
        observations: PathBuf,

        /// Pair measurements at most this many days apart
        #[arg(long, default_value_t = 15)]
        days: u32,

        /// Output CSV (default: head_diffs.csv next to the observations)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Apply a pilot-point factor file to pilot-point parameter values
    #[command(after_help = "\
Examples:
  calib fac2iwfm factors.fac pp_values.dat
  calib fac2iwfm factors.fac pp_values.dat -o node_values.dat")]
    Fac2iwfm {
        /// Factor file written by ppk2fac
        factors: PathBuf,

        /// Pilot-point values (`id x y [zone] value`), in pilot-point order
        values: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Rewrite an observation sample file with fixed columns plus its PEST instruction file
    #[command(after_help = "\
Examples:
  calib smp-ins obs.smp --hydrographs GW_Hyd.out --smp obs_fixed.smp --ins obs.ins")]
    SmpIns {
        /// Observation sample file
        observations: PathBuf,

        /// Simulated hydrograph output; its dates give the timestep numbers
        #[arg(long)]
        hydrographs: PathBuf,

        /// Lines before the first data row of the hydrograph file
        #[arg(long, default_value_t = 9)]
        header_lines: usize,

        /// Fixed-column sample file to write
        #[arg(long)]
        smp: PathBuf,

        /// Instruction file to write
        #[arg(long)]
        ins: PathBuf,
    },

    /// Normalize a sample file: padded names, zero-padded dates, values as written
    #[command(after_help = "\
Examples:
  calib smp-fmt obs.smp
  calib smp-fmt obs.smp --width 25 -o obs_clean.smp")]
    SmpFmt {
        /// Sample file to normalize
        input: PathBuf,

        /// Width of the site name column
        #[arg(long, default_value_t = 20)]
        width: usize,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Extract the total run time from an IWFM simulation messages file
    #[command(after_help = "\
Examples:
  calib exe-time SimulationMessages.out exe_time.smp")]
    ExeTime {
        /// Simulation messages file
        #[arg(default_value = "SimulationMessages.out")]
        messages: PathBuf,

        /// Sample file to write
        #[arg(default_value = "exe_time.smp")]
        output: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  iwfm-calib ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Run { config, json, output } => run::cmd_run(config, json, output),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Krige { targets, sources, output } => spatial::cmd_krige(targets, sources, output),
        Commands::Transfer { targets, sources, output } => spatial::cmd_transfer(targets, sources, output),
        Commands::Ppk2fac { pilot_points, nodes, output, points } => {
            spatial::cmd_ppk2fac(pilot_points, nodes, output, points)
        }
        Commands::FacTrans { factors, translation, output } => {
            spatial::cmd_fac_trans(factors, translation, output)
        }
        Commands::Headdiff { pairs, observations, days, output } => {
            pest::cmd_headdiff(pairs, observations, days, output)
        }
        Commands::Fac2iwfm { factors, values, output } => spatial::cmd_fac2iwfm(factors, values, output),
        Commands::SmpIns { observations, hydrographs, header_lines, smp, ins } => {
            pest::cmd_smp_ins(observations, hydrographs, header_lines, smp, ins)
        }
        Commands::SmpFmt { input, width, output } => pest::cmd_smp_fmt(input, width, output),
        Commands::ExeTime { messages, output } => pest::cmd_exe_time(messages, output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::new(EXIT_IO, format!("cannot access {}: {err}", path.display()))
    }

    pub fn json(err: serde_json::Error) -> Self {
        Self::new(EXIT_ERROR, format!("JSON serialization error: {err}"))
    }
}

impl From<CalibError> for CliError {
    fn from(err: CalibError) -> Self {
        let hint = match &err {
            CalibError::UnknownColumn { .. } => {
                Some("check the column numbers in the well metadata file".to_string())
            }
            CalibError::NoSourcePoints => Some("the source point file has no points".to_string()),
            CalibError::MissingPointValue { .. } => {
                Some("source points need a fourth column with the value to transfer".to_string())
            }
            CalibError::UnknownPilotPoint { .. } => {
                Some("list one value per pilot point, in the order of the factor file".to_string())
            }
            _ => None,
        };
        Self {
            code: calib_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }
}

/// Write `content` to `output`, or stdout when no file is given.
pub(crate) fn emit(output: Option<&Path>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => {
            iwfm_calib_io::text::write_file(path, content)?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
