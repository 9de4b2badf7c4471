//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to the command handlers.

use crate::commands;
use crate::config::Overrides;
use crate::logging;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Live terminal waveform and spectrum visualizer for raw PCM streams
#[derive(Parser)]
#[command(name = "pcmviz")]
#[command(version)]
#[command(long_about = concat!(
    "Live terminal waveform and spectrum visualizer for raw PCM streams.\n\n",
    "The input must be headerless mono signed 16-bit little-endian PCM, for example\n",
    "the fifo output of MPD:\n\n",
    "    audio_output {\n",
    "        type   \"fifo\"\n",
    "        name   \"pcmviz\"\n",
    "        path   \"/tmp/mpd.fifo\"\n",
    "        format \"44100:16:1\"\n",
    "    }\n\n",
    "Press Ctrl+C, Escape or 'q' to quit."
))]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/pcmviz/pcmviz.toml\n    Logs:               ~/.local/state/pcmviz/pcmviz.log.*"
)]
struct Cli {
    #[command(flatten)]
    viz: VizArgs,

    /// Use this config file instead of ~/.config/pcmviz/pcmviz.toml
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct VizArgs {
    /// Color to use (default, black, red, green, yellow, blue, magenta, cyan, white)
    #[arg(short, long)]
    color: Option<String>,

    /// Turn off bright colors where possible
    #[arg(short, long)]
    dim: bool,

    /// Samples to average in each column (wave)
    #[arg(long)]
    step: Option<usize>,

    /// Scale divisor (spectrum)
    #[arg(long)]
    scale: Option<f64>,

    /// Color bars according to intensity (spectrum)
    #[arg(short, long)]
    icolor: bool,

    /// Mode for intensity colorisation (dumb, 256 or grayscale)
    #[arg(long)]
    imode: Option<String>,

    /// Where to read PCM data from
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Visualisation (spectrum or wave)
    #[arg(short, long)]
    viz: Option<String>,
}

impl From<VizArgs> for Overrides {
    fn from(args: VizArgs) -> Self {
        Self {
            color: args.color,
            dim: args.dim,
            step: args.step,
            scale: args.scale,
            icolor: args.icolor,
            imode: args.imode,
            file: args.file,
            viz: args.viz,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show recent log entries from the application
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   pcmviz completions bash > pcmviz.bash
    ///   pcmviz completions zsh > _pcmviz
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the selected command fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate(shell, &mut Cli::command(), "pcmviz", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None => commands::handle_visualize(cli.viz.into(), cli.config).await?,
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "pcmviz", "-v", "spectrum", "--scale", "3.5", "-i", "--imode", "256", "-f",
            "/run/mpd.fifo", "-d",
        ])
        .unwrap();
        assert!(cli.command.is_none());

        let overrides: Overrides = cli.viz.into();
        assert_eq!(overrides.viz.as_deref(), Some("spectrum"));
        assert_eq!(overrides.scale, Some(3.5));
        assert!(overrides.icolor);
        assert!(overrides.dim);
        assert_eq!(overrides.imode.as_deref(), Some("256"));
        assert_eq!(overrides.file, Some(PathBuf::from("/run/mpd.fifo")));
        assert_eq!(overrides.step, None);
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["pcmviz", "logs"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Logs)));

        let cli = Cli::try_parse_from(["pcmviz", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Zsh })
        ));

        let cli = Cli::try_parse_from(["pcmviz", "--config", "/tmp/p.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));

        assert!(Cli::try_parse_from(["pcmviz", "config"]).is_err());
    }

    #[test]
    fn test_invalid_step_is_a_usage_error() {
        assert!(Cli::try_parse_from(["pcmviz", "--step", "two"]).is_err());
    }
}
