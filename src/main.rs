//! referral-breakdown CLI
//!
//! Credit closed deals to their initial referrer, per month.
//!
//! # Usage
//!
//! ```bash
//! # Monthly breakdown from a JSON deal file
//! referral-breakdown report --input deals.json
//!
//! # Output as JSON
//! referral-breakdown report --input deals.json --format json
//!
//! # Check an untrusted file for referral cycles
//! referral-breakdown cycles --input deals.json
//!
//! # Generate a random deal file for testing
//! referral-breakdown generate --deals 200 --output deals.json
//! ```
//!
//! Set `RUST_LOG=debug` for resolver and aggregation logging on stderr.

use referral_breakdown::core::month::Month;
use referral_breakdown::format::decoder::{decode_file, encode_pretty};
use referral_breakdown::format::emitter::OutputFormat;
use referral_breakdown::graph::cycle_detection::find_cycles;
use referral_breakdown::graph::referral_map::ReferralMap;
use referral_breakdown::pipeline::run;
use referral_breakdown::simulation::network::{generate_random_network, NetworkConfig};
use std::fs;
use std::io;
use std::process;
use std::str::FromStr;

fn print_usage() {
    eprintln!(
        r#"referral-breakdown — monthly closed deals per initial referrer

USAGE:
    referral-breakdown <COMMAND> [OPTIONS]

COMMANDS:
    report      Print the month x initial-referrer breakdown
    cycles      Detect referral cycles in a deal file
    generate    Generate a random acyclic deal file (for testing)
    help        Show this message

OPTIONS (report):
    --input <FILE>      Path to JSON deal file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (cycles):
    --input <FILE>      Path to JSON deal file

OPTIONS (generate):
    --deals <N>         Number of deals (default: 100)
    --referrers <N>     Outside referrers who close no deals (default: 3)
    --months <N>        Months to spread close dates over, at least 1 (default: 12)
    --start <YYYY-MM>   First close month (default: 2024-01)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    referral-breakdown report --input deals.json
    referral-breakdown report --input deals.json --format json
    referral-breakdown cycles --input deals.json
    referral-breakdown generate --deals 500 --months 6 --output deals.json"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn required_value<'a>(
    args: &'a [String],
    i: usize,
    flag: &str,
    what: &str,
) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires {}", flag, what))
}

fn parse_number<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = required_value(args, i, flag, "a number")?;
    raw.parse()
        .map_err(|_| format!("{}: '{}' is not a number in range", flag, raw))
}

/// Parse `--input` (and `--format` when the command prints a report).
fn parse_input_options(
    args: &[String],
    accepts_format: bool,
) -> Result<(String, OutputFormat), String> {
    let mut input_path = None;
    let mut format = OutputFormat::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(required_value(args, i, "--input", "a file path")?);
            }
            "--format" if accepts_format => {
                i += 1;
                format = required_value(args, i, "--format", "'text' or 'json'")?.parse()?;
            }
            "--format" => return Err("--format is only accepted by report".to_string()),
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let path = input_path.ok_or("--input <FILE> is required")?;
    Ok((path.to_string(), format))
}

fn cmd_report(args: &[String]) {
    let (path, format) = parse_input_options(args, true).unwrap_or_else(|e| fail(e));

    let stdout = io::stdout();
    if let Err(e) = run(&path, format, stdout.lock()) {
        eprintln!("Unable to produce report from '{}': {}", path, e);
        process::exit(1);
    }
}

fn cmd_cycles(args: &[String]) {
    let (path, _) = parse_input_options(args, false).unwrap_or_else(|e| fail(e));

    let deals = decode_file(&path).unwrap_or_else(|e| fail(e));
    let cycles = find_cycles(&ReferralMap::from_deals(&deals));

    if cycles.is_empty() {
        println!("No referral cycles detected.");
        return;
    }
    for (i, cycle) in cycles.iter().enumerate() {
        let names: Vec<String> = cycle.names.iter().map(|n| n.to_string()).collect();
        if cycle.is_self_referral() {
            println!("  Cycle {}: {} refers to itself", i, cycle.names[0]);
        } else {
            println!("  Cycle {}: {} → (back to start)", i, names.join(" → "));
        }
    }
    println!("\nTotal cycles: {}", cycles.len());
    process::exit(2);
}

fn parse_generate_options(args: &[String]) -> Result<(NetworkConfig, Option<String>), String> {
    let mut config = NetworkConfig::default();
    let mut output_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--deals" => {
                i += 1;
                config.deal_count = parse_number(args, i, "--deals")?;
            }
            "--referrers" => {
                i += 1;
                config.outside_referrers = parse_number(args, i, "--referrers")?;
            }
            "--months" => {
                i += 1;
                config.month_span = parse_number(args, i, "--months")?;
            }
            "--start" => {
                i += 1;
                config.first_month = required_value(args, i, "--start", "a YYYY-MM month")?
                    .parse::<Month>()
                    .map_err(|e| format!("--start: {}", e))?;
            }
            "--output" => {
                i += 1;
                let path = required_value(args, i, "--output", "a file path")?;
                output_path = Some(path.to_string());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }
    Ok((config, output_path))
}

fn cmd_generate(args: &[String]) {
    let (config, output_path) = parse_generate_options(args).unwrap_or_else(|e| fail(e));

    let set = generate_random_network(&config).unwrap_or_else(|e| fail(e));
    let json = encode_pretty(&set).unwrap_or_else(|e| {
        eprintln!("Error encoding deals: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} deals ({} referred) → {}",
            set.len(),
            set.referred_count(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "report" => cmd_report(rest),
        "cycles" => cmd_cycles(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
