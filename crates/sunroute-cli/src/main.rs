use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sunroute_lib::{
    compute_tables, load_street_graph, parse_local_date_time, plan_for_position,
    resolve_dataset_dir, solar_position, CsvTableSink, GeoCoordinate, ModelConfig,
    RouteOutcome, SpatialIndex, StreetGraph, TableSink, WarmRouteRequest,
    BELOW_HORIZON_ADVISORY,
};

use sunroute_cli::output::{
    route_geojson, route_text, sun_json, sun_text, table_rows, tables_text, OutputFormat,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Warmest walking routes from street sun exposure")]
struct Cli {
    /// Override the street-graph dataset directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file with model parameters; defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

/// Local date and clock time of the walk.
#[derive(Args, Debug)]
struct WhenArgs {
    /// Date as YYYY-MM-DD.
    #[arg(long)]
    date: String,
    /// Local time as HH:MM.
    #[arg(long)]
    time: String,
}

/// A single observation point.
#[derive(Args, Debug)]
struct PlaceArgs {
    /// Latitude in degrees (north positive).
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude in degrees (east positive).
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the warmest walking route between two points.
    Route {
        #[command(flatten)]
        when: WhenArgs,
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lon: f64,
        /// Write the per-bearing insolation and exposure tables to this CSV file.
        #[arg(long)]
        dump_tables: Option<PathBuf>,
        /// Abort the route search after this many milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Reject endpoints farther than this from any intersection, in meters.
        #[arg(long)]
        max_snap_m: Option<f64>,
    },
    /// Print the sun's altitude and azimuth.
    Sun {
        #[command(flatten)]
        when: WhenArgs,
        #[command(flatten)]
        place: PlaceArgs,
    },
    /// Print the per-bearing insolation and exposure tables.
    Tables {
        #[command(flatten)]
        when: WhenArgs,
        #[command(flatten)]
        place: PlaceArgs,
        /// Write the tables as CSV to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

struct RouteArgs {
    when: WhenArgs,
    origin: (f64, f64),
    destination: (f64, f64),
    dump_tables: Option<PathBuf>,
    timeout_ms: Option<u64>,
    max_snap_m: Option<f64>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Route {
            when,
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            dump_tables,
            timeout_ms,
            max_snap_m,
        } => handle_route(
            cli.data_dir.as_deref(),
            config,
            cli.format,
            RouteArgs {
                when,
                origin: (from_lat, from_lon),
                destination: (to_lat, to_lon),
                dump_tables,
                timeout_ms,
                max_snap_m,
            },
        ),
        Command::Sun { when, place } => handle_sun(cli.format, &when, &place),
        Command::Tables {
            when,
            place,
            output,
        } => handle_tables(config, cli.format, &when, &place, output.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ModelConfig> {
    match path {
        Some(path) => ModelConfig::from_path(path)
            .with_context(|| format!("failed to load model config from {}", path.display())),
        None => Ok(ModelConfig::default()),
    }
}

fn handle_route(
    data_dir: Option<&Path>,
    mut config: ModelConfig,
    format: OutputFormat,
    args: RouteArgs,
) -> Result<()> {
    if args.timeout_ms.is_some() {
        config.search.timeout_ms = args.timeout_ms;
    }

    let request = WarmRouteRequest::parse(
        &args.when.date,
        &args.when.time,
        args.origin,
        args.destination,
    )
    .context("invalid route request")?;

    // Night requests are answered without touching the dataset.
    let sun = solar_position(request.date, request.time, &request.origin)?;
    let (graph, outcome) = if sun.daylight().is_none() {
        let outcome = RouteOutcome::BelowHorizon {
            sun,
            advisory: BELOW_HORIZON_ADVISORY.to_string(),
        };
        (StreetGraph::default(), outcome)
    } else {
        let graph = load_route_graph(data_dir)?;
        let mut index = SpatialIndex::build(&graph);
        if let Some(limit) = args.max_snap_m {
            index = index.with_max_snap_distance(limit);
        }

        let started = Instant::now();
        let outcome = match args.dump_tables.as_deref() {
            Some(path) => {
                let mut sink = CsvTableSink::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                plan_for_position(&graph, &index, &request, sun, &config, Some(&mut sink))?
            }
            None => plan_for_position(&graph, &index, &request, sun, &config, None)?,
        };
        info!(
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "route request finished"
        );
        (graph, outcome)
    };

    match format {
        OutputFormat::Text => print!("{}", route_text(&graph, &outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Geojson => {
            let value = route_geojson(&graph, &outcome, &request)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn load_route_graph(data_dir: Option<&Path>) -> Result<StreetGraph> {
    let dataset_dir = resolve_dataset_dir(data_dir)?;
    load_street_graph(&dataset_dir)
        .with_context(|| format!("failed to load street graph from {}", dataset_dir.display()))
}

fn handle_sun(format: OutputFormat, when: &WhenArgs, place: &PlaceArgs) -> Result<()> {
    let (date, time) = parse_local_date_time(&when.date, &when.time)?;
    let coordinate = GeoCoordinate::new(place.lat, place.lon)?;
    let sun = solar_position(date, time, &coordinate)?;

    match format {
        OutputFormat::Text => println!("{}", sun_text(date, time, &coordinate, &sun)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&sun_json(date, time, &coordinate, &sun))?
        ),
        OutputFormat::Geojson => bail!("geojson output is only available for the route command"),
    }
    Ok(())
}

fn handle_tables(
    config: ModelConfig,
    format: OutputFormat,
    when: &WhenArgs,
    place: &PlaceArgs,
    output: Option<&Path>,
) -> Result<()> {
    if format == OutputFormat::Geojson {
        bail!("geojson output is only available for the route command");
    }
    config.validate()?;

    let (date, time) = parse_local_date_time(&when.date, &when.time)?;
    let coordinate = GeoCoordinate::new(place.lat, place.lon)?;
    let Some(sun) = solar_position(date, time, &coordinate)?.daylight() else {
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "above_horizon": false,
                    "advisory": BELOW_HORIZON_ADVISORY,
                }))?
            ),
            _ => println!("{BELOW_HORIZON_ADVISORY}"),
        }
        return Ok(());
    };

    let (exposure, insolation) = compute_tables(date, &sun, &config);

    if let Some(path) = output {
        let mut sink = CsvTableSink::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        sink.record(&insolation, &exposure)?;
        info!(path = %path.display(), "wrote bearing tables");
        return Ok(());
    }

    let rows = table_rows(&insolation, &exposure);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        _ => print!("{}", tables_text(&rows)),
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
