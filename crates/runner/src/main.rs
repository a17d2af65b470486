use meridian_runner::{PaperSession, RunnerConfig, SessionInput};

fn print_help() {
    eprintln!(
        r#"Meridian Paper Session - targets to fills to reconciliation on a paper broker

USAGE:
    meridian-paper-session [OPTIONS] --session <PATH>

OPTIONS:
    --config <PATH>     Load runner configuration from JSON file
    --session <PATH>    Session input (targets or weights, prices, marks)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run with default guardrails and tolerances
    meridian-paper-session --session session.json

    # Run with config file
    meridian-paper-session --config runner.json --session session.json
"#
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut session_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--session" | "-s" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --session requires a path argument");
                    std::process::exit(1);
                }
                session_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(session_path) = session_path else {
        eprintln!("Error: --session is required");
        print_help();
        std::process::exit(1);
    };

    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            RunnerConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            RunnerConfig::default()
        }
    };

    log::info!("Loading session from: {}", session_path);
    let input = SessionInput::from_file(&session_path)?;
    log::info!(
        "Session: {} targets, {} weights, {} marks",
        input.targets.len(),
        input.weights.len(),
        input.marks.len()
    );

    let mut session = PaperSession::new(config);
    let report = session.run(&input)?;

    for row in &report.position_breaks {
        log::info!(
            "  {:<10} internal={:<12} broker={:<12} break={}",
            row.instrument_id,
            row.internal_qty,
            row.broker_qty,
            row.is_break
        );
    }
    if report.summary.has_breaks() {
        log::warn!("Session finished with {} breaks", report.summary.break_count());
    } else {
        log::info!("Session reconciled cleanly");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
