mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use log::LevelFilter;
use yaml_key_audit::{audit, checks, config, output};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Audit {
            path,
            format,
            output: output_path,
            strict,
            config: config_path,
        } => {
            if !path.exists() {
                eprintln!("Error: path does not exist: {}", path.display());
                std::process::exit(2);
            }

            let mut config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            if strict {
                config.strict.enabled = true;
            }

            let rules = config.compile().unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            let report = audit::run_audit(&path, &rules, &config);
            if let Err(e) = output::write_report(&report, format, output_path.as_deref()) {
                eprintln!("Error writing output: {e}");
                std::process::exit(2);
            }
            if let Some(out_path) = &output_path {
                eprintln!("Output written to {}", out_path.display());
            }

            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::ListRules => {
            let rules = checks::all_rules();
            println!("{}", "Check Templates".bold().underline());
            println!();

            for rule in &rules {
                println!(
                    "  {id:<22} {message}",
                    id = rule.id.bold(),
                    message = rule.message,
                );
            }
            println!(
                "  {id:<22} {message}",
                id = audit::PARSING_ERROR_RULE.bold(),
                message = "Parse error: <cause> (built in, [parsing-error] section)",
            );

            println!();
            println!("  Total: {} templates", rules.len());
            println!("  Use 'yaml-key-audit explain <CHECK>' to see the parameters of a template.");
        }

        Commands::Explain { check } => {
            let rules = checks::all_rules();
            match rules.iter().find(|r| r.id == check) {
                Some(rule) => {
                    println!("{}", rule.id.bold());
                    println!();
                    println!("  Severity:     {} (default)", rule.severity);
                    println!("  Message:      {}", rule.message);
                    println!("  Description:  {}", rule.description);
                    println!();
                    println!("  Parameters:");
                    for (name, meaning) in rule.parameters {
                        println!("    {name:<30} {meaning}");
                    }
                }
                None => {
                    eprintln!("Unknown check: {check}");
                    eprintln!("Use 'yaml-key-audit list-rules' to see all available checks.");
                    std::process::exit(2);
                }
            }
        }
    }
}

/// Warnings by default; each `-v` raises the level. `RUST_LOG` still applies.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
