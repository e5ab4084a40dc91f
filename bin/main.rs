use clap::{value_t, App, Arg, SubCommand};
use colored::Colorize;
use tracing::{info, warn};

use snowstorm_sim::avalanche;
use snowstorm_sim::config::{self, AvalancheConfig, SnowballConfig};
use snowstorm_sim::event_log::EventLog;
use snowstorm_sim::snowball;
use snowstorm_sim::Result;

fn main() {
    tracing_subscriber::fmt()
        .with_level(false)
        .with_target(false)
        .without_time()
        .compact()
        .with_max_level(tracing::Level::INFO)
        .init();

    let matches = App::new("snowstorm-sim")
        .version("0.1")
        .author("zero.fx <contact@zerofxlabs.com>")
        .about("Discrete-event simulator for Snowball and Avalanche consensus")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("PATH")
                .help("Settings file; falls back to built-in defaults when absent")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("protocol")
                .long("protocol")
                .value_name("snowball|avalanche")
                .default_value("snowball")
                .takes_value(true),
        )
        .arg(Arg::with_name("seed").long("seed").value_name("SEED").takes_value(true))
        .arg(
            Arg::with_name("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .default_value("logs")
                .takes_value(true),
        )
        .subcommand(
            SubCommand::with_name("experiment")
                .about(
                    "Runs a simulation to termination (Snowball) or for a fixed tick count (Avalanche)",
                )
                .arg(Arg::with_name("ticks").long("ticks").value_name("N").takes_value(true).help(
                    "Avalanche only: number of scheduler ticks to run (the protocol has no \
                     termination predicate of its own)",
                )),
        )
        .subcommand(SubCommand::with_name("learning").about(
            "Dataset creation / supervised training for the RL adversary policy (out of scope \
             for this crate's core)",
        ))
        .subcommand(SubCommand::with_name("rl").about(
            "Actor-critic training for the RL adversary policy (out of scope for this crate's core)",
        ))
        .get_matches();

    let config_path = matches.value_of("config");
    let protocol = matches.value_of("protocol").unwrap_or("snowball");
    let log_dir = matches.value_of("log-dir").unwrap_or("logs");

    let exit_code = match matches.subcommand() {
        ("experiment", Some(sub)) => match protocol {
            "snowball" => run_snowball_experiment(config_path, &matches),
            "avalanche" => run_avalanche_experiment(config_path, &matches, sub, log_dir),
            other => {
                eprintln!("unknown protocol {:?}, expected \"snowball\" or \"avalanche\"", other);
                2
            }
        },
        ("learning", Some(_)) | ("rl", Some(_)) => {
            warn!(
                "the RL/supervised training pipeline is an external collaborator of this crate \
                 (dataset generation and model training are out of scope); nothing to run"
            );
            1
        }
        _ => {
            eprintln!("{}", matches.usage());
            2
        }
    };

    std::process::exit(exit_code);
}

fn load_snowball_config(path: Option<&str>, matches: &clap::ArgMatches) -> Result<SnowballConfig> {
    let mut cfg: SnowballConfig = config::load(path)?;
    if matches.is_present("seed") {
        cfg.seed = value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit());
    }
    Ok(cfg)
}

fn load_avalanche_config(path: Option<&str>, matches: &clap::ArgMatches) -> Result<AvalancheConfig> {
    let mut cfg: AvalancheConfig = config::load(path)?;
    if matches.is_present("seed") {
        cfg.seed = value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit());
    }
    Ok(cfg)
}

fn run_snowball_experiment(config_path: Option<&str>, matches: &clap::ArgMatches) -> i32 {
    let config = match load_snowball_config(config_path, matches) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return 2;
        }
    };

    info!(
        "[{}] running: num_participants={} adversary_percent={} strategy={:?} k={} alpha={} beta={}",
        "snowball".blue(),
        config.num_participants,
        config.adversary_percent,
        config.adversary_strategy,
        config.k,
        config.alpha,
        config.beta
    );

    let mut proto = match snowball::Protocol::new(config) {
        Ok(proto) => proto,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return 2;
        }
    };

    proto.run();

    let (false_count, true_count) = proto.snowball_map();
    let consensus = proto.consensus();
    info!(
        "[{}] finished after {} iterations: consensus={} map=({}, {})",
        "snowball".blue(),
        proto.iteration(),
        if consensus { consensus.to_string().green() } else { consensus.to_string().red() },
        false_count,
        true_count
    );

    0
}

fn run_avalanche_experiment(
    config_path: Option<&str>,
    matches: &clap::ArgMatches,
    sub: &clap::ArgMatches,
    log_dir: &str,
) -> i32 {
    let config = match load_avalanche_config(config_path, matches) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return 2;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("configuration error: {}", e);
        return 2;
    }

    let ticks = match sub.value_of("ticks") {
        Some(v) => match v.parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("configuration error: --ticks must be a non-negative integer");
                return 2;
            }
        },
        None => 10_000,
    };

    info!(
        "[{}] running: node_count={} byzantine_percent={} k={} alpha={} beta1={} beta2={} ticks={}",
        "avalanche".cyan(),
        config.node_count,
        config.byzantine_percent,
        config.k,
        config.alpha,
        config.beta1,
        config.beta2,
        ticks
    );

    let mut log = EventLog::open(log_dir, "avalanche");
    let mut master = avalanche::Master::new(config);

    for _ in 0..ticks {
        master.tick(&mut log);
    }

    let accepted: Vec<usize> = master.honest().iter().map(|p| p.accepted_blocks_count()).collect();
    info!(
        "[{}] finished after {} ticks; per-participant accepted-block counts: {:?}",
        "avalanche".cyan(),
        master.ticks(),
        accepted
    );

    0
}
