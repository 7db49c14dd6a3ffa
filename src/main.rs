use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use orbit_o_mat::compare::{hcl_differences, topocentric_differences};
use orbit_o_mat::config::Config;
use orbit_o_mat::propagate::PropagatorKind;
use orbit_o_mat::search::{AllLand, GridSearch};
use orbit_o_mat::simulation::{Simulator, SpacecraftState, Trajectory};
use orbit_o_mat::station::GroundStation;

#[derive(Parser)]
#[command(name = "orbit-o-mat")]
#[command(about = "Orbit propagation and ground station siting")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Neither read nor write cached results
    #[arg(long, global = true)]
    no_cache: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SeriesArgs {
    /// Initial state JSON file
    #[arg(long)]
    state: PathBuf,
    #[arg(long, default_value = "kepler")]
    propagator: PropagatorKind,
    #[arg(long, default_value_t = 8640)]
    steps: usize,
    /// Time step, e.g. "10s"
    #[arg(long, default_value = "10s", value_parser = parse_step)]
    step: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the propagated ECI states as CSV
    Propagate {
        #[command(flatten)]
        series: SeriesArgs,
    },
    /// List visibility passes over a station
    Passes {
        #[command(flatten)]
        series: SeriesArgs,
        /// Station coordinates "lat,lon" in degrees
        #[arg(long)]
        station: String,
        #[arg(long, default_value = "station")]
        name: String,
    },
    /// Select up to four ground station sites
    GridSearch {
        #[command(flatten)]
        series: SeriesArgs,
        /// Lattice spacing in degrees (overrides the config file)
        #[arg(long)]
        increment_deg: Option<f64>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print per-sample differences between two propagators
    Compare {
        #[arg(long)]
        state: PathBuf,
        #[arg(long, default_value = "kepler")]
        reference: PropagatorKind,
        #[arg(long, default_value = "rk4-j2")]
        other: PropagatorKind,
        #[arg(long, default_value_t = 8640)]
        steps: usize,
        #[arg(long, default_value = "10s", value_parser = parse_step)]
        step: f64,
        /// Also difference in the ENU frame of a station at "lat,lon"
        #[arg(long)]
        station: Option<String>,
    },
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step = humantime::parse_duration(s.trim()).map_err(|e| e.to_string())?;
    if step.is_zero() {
        return Err("time step must be positive".to_string());
    }
    Ok(step.as_secs_f64())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    if cli.no_cache {
        config.cache.enabled = false;
    }
    let simulator = Simulator::new(Arc::new(config.open_cache()));

    match cli.command {
        Commands::Propagate { series } => propagate(&config, &simulator, &series),
        Commands::Passes {
            series,
            station,
            name,
        } => passes(&config, &simulator, &series, &station, &name),
        Commands::GridSearch {
            series,
            increment_deg,
            json,
        } => grid_search(&config, &simulator, &series, increment_deg, json),
        Commands::Compare {
            state,
            reference,
            other,
            steps,
            step,
            station,
        } => {
            let reference = SeriesArgs {
                state: state.clone(),
                propagator: reference,
                steps,
                step,
            };
            let other = SeriesArgs {
                state,
                propagator: other,
                steps,
                step,
            };
            compare(&config, &simulator, &reference, &other, station.as_deref())
        }
    }
}

fn run_series(config: &Config, simulator: &Simulator, args: &SeriesArgs) -> Option<Trajectory> {
    let initial = match SpacecraftState::from_file(&args.state) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading {}: {}", args.state.display(), e);
            return None;
        }
    };
    let propagator = args.propagator.build(&config.earth, &config.j2);
    match simulator.propagate_series(
        &initial.state,
        initial.epoch,
        propagator.as_ref(),
        args.steps,
        args.step,
    ) {
        Ok(t) => Some(t),
        Err(e) => {
            eprintln!("Propagation of {} failed: {}", initial.name, e);
            None
        }
    }
}

fn parse_station(config: &Config, name: &str, coordinates: &str) -> Option<GroundStation> {
    let station = GroundStation::from_coordinates(name, coordinates, &config.earth);
    if station.is_none() {
        eprintln!("Invalid station coordinates {:?}, expected \"lat,lon\"", coordinates);
    }
    station
}

fn propagate(config: &Config, simulator: &Simulator, args: &SeriesArgs) -> ExitCode {
    let Some(trajectory) = run_series(config, simulator, args) else {
        return ExitCode::FAILURE;
    };

    println!("timestamp,x_km,y_km,z_km,vx_km_s,vy_km_s,vz_km_s");
    for (i, state) in trajectory.states().iter().enumerate() {
        let r = state.position();
        let v = state.velocity();
        println!(
            "{},{},{},{},{},{},{}",
            trajectory.timestamp(i).to_rfc3339(),
            r.x,
            r.y,
            r.z,
            v.x,
            v.y,
            v.z
        );
    }
    ExitCode::SUCCESS
}

fn passes(
    config: &Config,
    simulator: &Simulator,
    args: &SeriesArgs,
    coordinates: &str,
    name: &str,
) -> ExitCode {
    let Some(station) = parse_station(config, name, coordinates) else {
        return ExitCode::FAILURE;
    };
    let Some(trajectory) = run_series(config, simulator, args) else {
        return ExitCode::FAILURE;
    };

    let passes = station.pass_intervals(&trajectory.to_ecef());
    println!("{} passes over {}", passes.len(), station.name());
    for (i, pass) in passes.iter().enumerate() {
        println!(
            "  {}: {} (el {:.2}°, az {:.2}°) -> {} (el {:.2}°, az {:.2}°), {} s",
            i + 1,
            pass.start.timestamp.to_rfc3339(),
            pass.start.elevation.to_degrees(),
            pass.start.azimuth.to_degrees(),
            pass.end.timestamp.to_rfc3339(),
            pass.end.elevation.to_degrees(),
            pass.end.azimuth.to_degrees(),
            pass.duration().num_seconds()
        );
    }
    ExitCode::SUCCESS
}

fn grid_search(
    config: &Config,
    simulator: &Simulator,
    args: &SeriesArgs,
    increment_deg: Option<f64>,
    json: bool,
) -> ExitCode {
    let increment = increment_deg.unwrap_or(config.search.increment_deg).to_radians();
    let search = match GridSearch::new(simulator.cache().clone(), config.earth, increment) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid grid search: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(trajectory) = run_series(config, simulator, args) else {
        return ExitCode::FAILURE;
    };

    let result = search.run(&trajectory, &mut config.land_lookup(AllLand));

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("{} candidate sites", result.sites.len());
    for site in result.selected() {
        println!(
            "  site {} at {:.2}, {:.2} sees {} samples",
            site.station.name(),
            site.station.latitude().to_degrees(),
            site.station.longitude().to_degrees(),
            site.visible_count
        );
    }
    for failure in &result.lookup_failures {
        println!("  lookup failed for site {}: {}", failure.station, failure.reason);
    }
    ExitCode::SUCCESS
}

fn compare(
    config: &Config,
    simulator: &Simulator,
    reference: &SeriesArgs,
    other: &SeriesArgs,
    station: Option<&str>,
) -> ExitCode {
    let station = match station {
        Some(coordinates) => match parse_station(config, "station", coordinates) {
            Some(s) => Some(s),
            None => return ExitCode::FAILURE,
        },
        None => None,
    };
    let (Some(a), Some(b)) = (
        run_series(config, simulator, reference),
        run_series(config, simulator, other),
    ) else {
        return ExitCode::FAILURE;
    };

    let hcl = match hcl_differences(&a, &b) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Comparison failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let enu = station
        .map(|s| topocentric_differences(&a.to_ecef(), &b.to_ecef(), &s))
        .unwrap_or_default();

    if enu.is_empty() {
        println!("timestamp,dh_km,dc_km,dl_km");
    } else {
        println!("timestamp,dh_km,dc_km,dl_km,de_km,dn_km,du_km");
    }
    for (i, d) in hcl.iter().enumerate() {
        let mut line = format!("{},{},{},{}", a.timestamp(i).to_rfc3339(), d.x, d.y, d.z);
        if let Some(t) = enu.get(i) {
            line.push_str(&format!(",{},{},{}", t.x, t.y, t.z));
        }
        println!("{}", line);
    }
    ExitCode::SUCCESS
}
