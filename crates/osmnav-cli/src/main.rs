mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use osmnav_lib::loader::DEFAULT_SPEED_KMH;
use osmnav_lib::{Coordinates, CostKind, LoaderConfig, VertexId};

use commands::route::RouteCommandArgs;
use osmnav_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest routes over OpenStreetMap road networks")]
struct Cli {
    /// Map file to load (.osm/.xml extract or .dot/.gv export).
    #[arg(long)]
    map: PathBuf,

    /// Keep only the largest connected component of the road network.
    #[arg(long)]
    largest_component: bool,

    /// Speed assumed for roads without a usable maxspeed tag, in km/h.
    #[arg(long, default_value_t = DEFAULT_SPEED_KMH)]
    default_speed: f64,

    /// Highway tag values to import (repeatable). Defaults to the common road classes.
    #[arg(long = "highway")]
    highways: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the loaded road graph as a Graphviz DOT file.
    Export {
        /// Destination DOT file.
        #[arg(long)]
        output: PathBuf,
    },
    /// List vertex coordinates, either all of them or the two given.
    ShowNodes {
        #[arg(long, requires = "to", allow_negative_numbers = true)]
        from: Option<VertexId>,
        #[arg(long, requires = "from", allow_negative_numbers = true)]
        to: Option<VertexId>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Compute a route between two vertex ids.
    Route {
        /// Starting vertex id.
        #[arg(long, allow_negative_numbers = true)]
        from: VertexId,
        /// Destination vertex id.
        #[arg(long, allow_negative_numbers = true)]
        to: VertexId,
        #[command(flatten)]
        options: RouteOptions,
    },
    /// Compute a route between the vertices nearest to two coordinates.
    RouteCoords {
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lon: f64,
        #[command(flatten)]
        options: RouteOptions,
    },
}

#[derive(Args, Debug, Clone)]
struct RouteOptions {
    /// Edge attribute to minimise.
    #[arg(long, value_enum, default_value_t = CostArg::Length)]
    cost: CostArg,
    /// Output format for the route.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Also write the map with the route highlighted to this DOT file.
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CostArg {
    /// Shortest physical distance.
    Length,
    /// Shortest travel time.
    Time,
}

impl From<CostArg> for CostKind {
    fn from(value: CostArg) -> Self {
        match value {
            CostArg::Length => CostKind::Length,
            CostArg::Time => CostKind::Time,
        }
    }
}

impl From<RouteOptions> for RouteCommandArgs {
    fn from(options: RouteOptions) -> Self {
        Self {
            cost: options.cost.into(),
            format: options.format,
            export: options.export,
        }
    }
}

impl Cli {
    fn loader_config(&self) -> LoaderConfig {
        let mut config = LoaderConfig {
            default_speed_kmh: self.default_speed,
            ..LoaderConfig::default()
        };
        if !self.highways.is_empty() {
            config.highway_types = self.highways.clone();
        }
        config
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if !(cli.default_speed.is_finite() && cli.default_speed > 0.0) {
        anyhow::bail!("--default-speed must be a positive number of km/h");
    }

    let map = commands::load(&cli.map, &cli.loader_config(), cli.largest_component)?;

    match cli.command {
        Command::Export { output } => commands::export::handle_export_command(&map, &output),
        Command::ShowNodes { from, to, format } => {
            let pair = from.zip(to);
            commands::nodes::handle_show_nodes_command(&map, pair, format)
        }
        Command::Route { from, to, options } => {
            commands::route::handle_route_command(&map, from, to, &options.into())
        }
        Command::RouteCoords {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            options,
        } => commands::route::handle_route_coords_command(
            &map,
            Coordinates::new(from_lat, from_lon),
            Coordinates::new(to_lat, to_lon),
            &options.into(),
        ),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
