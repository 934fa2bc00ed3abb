// Copyright 2020 by Michael Thies <mail@mhthies.de>
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except in compliance with
// the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the
// specific language governing permissions and limitations under the License.

use log::{debug, error, info, warn};
use std::fs::File;
use typecourse::{
    allocate, io, run_collector, CarrierError, CollectorConfig, SimulationParams, Strategy,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!(
        "This is the course/room allocator, version {}",
        option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")
    );

    let args = parse_cli_args();
    match args.subcommand() {
        Some(("allocate", sub_args)) => run_allocate(sub_args),
        Some(("bench", sub_args)) => run_bench(sub_args),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn open_input(path: &str) -> File {
    debug!("Opening input file {} ...", path);
    File::open(path).unwrap_or_else(|e| {
        error!("Could not open input file {}: {}", path, e);
        std::process::exit(exitcode::NOINPUT)
    })
}

fn exit_on_carrier_error(err: CarrierError) -> ! {
    error!("Could not read input: {}", err);
    std::process::exit(exitcode::DATAERR)
}

fn run_allocate(args: &clap::ArgMatches) {
    let rooms_path: &String = args.get_one("ROOMS").unwrap();
    let courses_path: &String = args.get_one("COURSES").unwrap();

    let rooms = io::rooms::read(open_input(rooms_path)).unwrap_or_else(|e| exit_on_carrier_error(e));
    let courses =
        io::courses::read(open_input(courses_path)).unwrap_or_else(|e| exit_on_carrier_error(e));

    info!(
        "Loaded {} room(s) and {} course(s).",
        rooms.len(),
        courses.len()
    );

    let result = allocate(&rooms, &courses).unwrap_or_else(|e| {
        error!("Input validation failed: {}", e);
        std::process::exit(exitcode::DATAERR)
    });

    info!(
        "Allocation finished: {} placed, {} unplaceable, {} step(s).",
        result.placed_count(),
        result.unplaceable.len(),
        result.trace.len()
    );

    if args.get_flag("print") {
        print!("{}", io::format_allocation(&result, &rooms, &courses));
    }

    if let Some(output_path) = args.get_one::<String>("OUTPUT") {
        debug!("Opening output file {} ...", output_path);
        match File::create(output_path) {
            Err(e) => error!("Could not open output file {}: {}.", output_path, e),
            Ok(file) => match io::write_allocation(file, &result, &rooms, &courses) {
                Ok(()) => debug!("Allocation export written to {}.", output_path),
                Err(e) => error!("Could not write allocation export to {}: {}.", output_path, e),
            },
        }
    }

    if !result.unplaceable.is_empty() {
        warn!("{} course(s) could not be placed.", result.unplaceable.len());
        if args.get_flag("require_full") {
            std::process::exit(exitcode::DATAERR);
        }
    }
}

fn run_bench(args: &clap::ArgMatches) {
    let rooms_path: &String = args.get_one("ROOMS").unwrap();
    let rooms = io::rooms::read(open_input(rooms_path)).unwrap_or_else(|e| exit_on_carrier_error(e));

    let num_simulations: u32 = *args.get_one("num_simulations").unwrap();
    let num_courses: u32 = *args.get_one("num_courses").unwrap();
    let min_size: u32 = *args.get_one("min_size").unwrap();
    let max_size: u32 = *args.get_one("max_size").unwrap();
    let change_size: u32 = *args.get_one("change_size").unwrap();
    let k: usize = *args.get_one("k").unwrap();
    let seed: Option<u64> = args.get_one("seed").copied();

    let config = CollectorConfig {
        num_simulations,
        simulation: SimulationParams {
            num_courses,
            min_size,
            max_size,
            change_size,
        },
        seed,
    };
    let strategies = vec![
        Strategy::UniformRandom { k },
        Strategy::SizeBased {
            k,
            slack: typecourse::DEFAULT_SLACK,
        },
        Strategy::SmartRandom { k },
        Strategy::SatisfactionWeighted {
            k,
            temperature: typecourse::DEFAULT_TEMPERATURE,
        },
    ];

    let (records, averages) = run_collector(&rooms, &strategies, &config).unwrap_or_else(|e| {
        error!("Benchmark failed: {}", e);
        std::process::exit(exitcode::DATAERR)
    });

    info!("Finished {} trial(s) across {} strategy/strategies.", records.len(), strategies.len());
    println!(
        "{:<24} {:>13} {:>13} {:>11} {:>13} {:>11} {:>7}",
        "strategy", "satisfaction", "first-choice", "high-rank", "unallocated", "avg-choice", "steps"
    );
    for average in &averages {
        println!(
            "{:<24} {:>12.2}% {:>12.2}% {:>10.2}% {:>12.2}% {:>11.2} {:>7.1}",
            average.strategy_name,
            average.mean_satisfaction_rate * 100.0,
            average.mean_first_choice_rate * 100.0,
            average.mean_high_rank_rate * 100.0,
            average.mean_unallocated_rate * 100.0,
            average.mean_average_choice,
            average.mean_num_allocation_steps,
        );
    }

    if let Some(output_path) = args.get_one::<String>("OUTPUT") {
        debug!("Opening output file {} ...", output_path);
        match File::create(output_path) {
            Err(e) => error!("Could not open output file {}: {}.", output_path, e),
            Ok(file) => match io::write_statistics(file, &records) {
                Ok(()) => debug!("Statistics records written to {}.", output_path),
                Err(e) => error!("Could not write statistics records to {}: {}.", output_path, e),
            },
        }
    }
}

fn parse_cli_args() -> clap::ArgMatches {
    clap::command!()
        .subcommand_required(true)
        .subcommand(
            clap::Command::new("allocate")
                .about("Load a rooms table and a course list, and compute one allocation")
                .arg(
                    clap::Arg::new("ROOMS")
                        .help("Semicolon-separated rooms table (name;capacity;type)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    clap::Arg::new("COURSES")
                        .help("JSON course list")
                        .required(true)
                        .index(2),
                )
                .arg(
                    clap::Arg::new("print")
                        .short('p')
                        .long("print")
                        .help("Print the allocation to stdout in a human-readable format")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    clap::Arg::new("require_full")
                        .long("require-full")
                        .help("Exit with a DATAERR status if any course remains unplaceable")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    clap::Arg::new("OUTPUT")
                        .long("output")
                        .short('o')
                        .help("Write the JSON allocation export to this path")
                        .value_name("FILE"),
                ),
        )
        .subcommand(
            clap::Command::new("bench")
                .about("Run the statistics collector over the default strategy set")
                .arg(
                    clap::Arg::new("ROOMS")
                        .help("Semicolon-separated rooms table (name;capacity;type)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    clap::Arg::new("num_simulations")
                        .long("num-simulations")
                        .value_name("N")
                        .default_value("10")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    clap::Arg::new("num_courses")
                        .long("num-courses")
                        .value_name("N")
                        .default_value("50")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    clap::Arg::new("min_size")
                        .long("min-size")
                        .value_name("N")
                        .default_value("5")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    clap::Arg::new("max_size")
                        .long("max-size")
                        .value_name("N")
                        .default_value("100")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    clap::Arg::new("change_size")
                        .long("change-size")
                        .value_name("N")
                        .default_value("40")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    clap::Arg::new("k")
                        .long("k")
                        .help("Preference list length cap for every strategy")
                        .value_name("N")
                        .default_value("5")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    clap::Arg::new("seed")
                        .long("seed")
                        .help("Base seed for reproducible trials. Random if omitted.")
                        .value_name("SEED")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    clap::Arg::new("OUTPUT")
                        .long("output")
                        .short('o')
                        .help("Write the raw per-trial statistics records as JSON to this path")
                        .value_name("FILE"),
                ),
        )
        .get_matches()
}
