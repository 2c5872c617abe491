use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use routescore_cli::commands::check::handle_check;
use routescore_cli::commands::densify::{handle_densify, DensifyRequest};
use routescore_cli::commands::score::{handle_score, ScoreRequest};
use routescore_cli::input::{load_config, parse_adjustment, parse_metadata_entry, parse_point};
use routescore_cli::logging::{init_logging, LoggingConfig};
use routescore_cli::output::OutputFormat;
use routescore_lib::{Coordinates, EdgeAdjustment, EdgeId, MetadataValue};

#[derive(Parser, Debug)]
#[command(author, version, about = "Route edge scoring and path densification tools")]
struct Cli {
    /// JSON configuration file. Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and list the configured edge scorers.
    Check,
    /// Score a single edge between two points.
    Score {
        /// Start point as X,Y.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Coordinates,
        /// End point as X,Y.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Coordinates,
        /// Edge identifier, used by closures and cost overrides.
        #[arg(long, default_value_t = 0)]
        edge_id: EdgeId,
        /// Edge metadata entry as KEY=VALUE. Repeatable.
        #[arg(long = "meta", value_parser = parse_metadata_entry)]
        meta: Vec<(String, MetadataValue)>,
        /// End node metadata entry as KEY=VALUE. Repeatable.
        #[arg(long = "end-meta", value_parser = parse_metadata_entry)]
        end_meta: Vec<(String, MetadataValue)>,
        /// Close an edge before scoring. Repeatable.
        #[arg(long = "close")]
        close: Vec<EdgeId>,
        /// Override an edge cost as EDGE_ID=COST. Repeatable.
        #[arg(long = "adjust", value_parser = parse_adjustment)]
        adjust: Vec<EdgeAdjustment>,
        /// JSON raster file published to costmap scorers.
        #[arg(long)]
        costmap: Option<PathBuf>,
    },
    /// Densify a route given as a sequence of points.
    Densify {
        /// Route node as X,Y, in travel order. Repeatable.
        #[arg(long = "point", value_parser = parse_point, required = true, allow_hyphen_values = true)]
        points: Vec<Coordinates>,
        /// Resume along the first leg from this point, given as X,Y.
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        resume_from: Option<Coordinates>,
        /// Point spacing in metres, overriding the configuration.
        #[arg(long)]
        density: Option<f64>,
        /// Frame tag, overriding the configuration.
        #[arg(long)]
        frame: Option<String>,
    },
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Check => handle_check(&config, cli.format),
        Command::Score {
            from,
            to,
            edge_id,
            meta,
            end_meta,
            close,
            adjust,
            costmap,
        } => {
            let request = ScoreRequest {
                edge_id,
                from,
                to,
                edge_metadata: meta,
                end_metadata: end_meta,
                closed_edges: close,
                adjustments: adjust,
                costmap,
            };
            handle_score(&config, &request, cli.format)
        }
        Command::Densify {
            points,
            resume_from,
            density,
            frame,
        } => {
            let request = DensifyRequest {
                points,
                resume_from,
                density,
                frame,
            };
            handle_densify(&config, &request, cli.format)
        }
    }
}
