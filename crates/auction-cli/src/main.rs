use std::env;
use std::fs;

use auction_core::run_feasibility;
use contracts::{Difficulty, EngineInput, PropertySnapshot};

fn print_usage() {
    println!("auction-cli <command>");
    println!("commands:");
    println!("  report <snapshot.json> <bid_price> [options]");
    println!("    --competitors <n>      attach a simulated competing field");
    println!("    --difficulty <level>   easy | normal | hard");
    println!("    --exit <price>         exit price for the margin computation");
    println!("    --verbose              append per-layer summary notes");
    println!("  sample");
    println!("    print an example snapshot to adapt");
}

fn parse_price(value: Option<&String>, label: &str) -> Result<i64, String> {
    let raw = value.ok_or_else(|| format!("missing {label}"))?;
    raw.parse::<i64>()
        .map_err(|_| format!("invalid {label}: {raw}"))
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    match raw {
        "easy" => Ok(Difficulty::Easy),
        "normal" => Ok(Difficulty::Normal),
        "hard" => Ok(Difficulty::Hard),
        other => Err(format!("invalid difficulty: {other}")),
    }
}

fn run_report(args: &[String]) -> Result<(), String> {
    let path = args
        .get(2)
        .cloned()
        .ok_or_else(|| "missing snapshot path".to_string())?;
    let bid_price = parse_price(args.get(3), "bid_price")?;

    let raw = fs::read_to_string(&path).map_err(|err| format!("failed to read {path}: {err}"))?;
    let snapshot: PropertySnapshot =
        serde_json::from_str(&raw).map_err(|err| format!("invalid snapshot json: {err}"))?;

    let mut input = EngineInput::new(snapshot, bid_price);
    let mut index = 4;
    while index < args.len() {
        match args[index].as_str() {
            "--competitors" => {
                let count = parse_price(args.get(index + 1), "competitor count")?;
                if count < 0 {
                    return Err(format!("invalid competitor count: {count}"));
                }
                input.options.competitor_count = Some(count as usize);
                input.options.include_competition = true;
                index += 2;
            }
            "--difficulty" => {
                let raw = args
                    .get(index + 1)
                    .ok_or_else(|| "missing difficulty".to_string())?;
                input.options.difficulty = parse_difficulty(raw)?;
                index += 2;
            }
            "--exit" => {
                input.options.exit_price = Some(parse_price(args.get(index + 1), "exit price")?);
                index += 2;
            }
            "--verbose" => {
                input.options.verbose = true;
                index += 1;
            }
            other => return Err(format!("unknown option: {other}")),
        }
    }

    let output = run_feasibility(&input).map_err(|err| format!("engine rejected input: {err}"))?;
    let rendered =
        serde_json::to_string_pretty(&output).map_err(|err| format!("render failed: {err}"))?;
    println!("{rendered}");
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("report") => {
            if let Err(err) = run_report(&args) {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        }
        Some("sample") => {
            let snapshot = PropertySnapshot::sample();
            match serde_json::to_string_pretty(&snapshot) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            print_usage();
        }
    }
}
