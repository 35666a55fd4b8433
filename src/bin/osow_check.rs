//! osow-check
//!
//! Reads matched policies as JSON and prints the conflict analysis.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use osow_conflict::{ConflictEngine, EngineConfig, MatchedPolicy};

/// Exit code for validation and configuration errors.
const EXIT_INVALID: u8 = 1;
/// Exit code for I/O and parse errors.
const EXIT_IO: u8 = 2;

/// Command line options
#[derive(Default)]
struct Options {
    /// Policy file; stdin when absent
    input: Option<PathBuf>,
    /// Engine configuration file
    config: Option<PathBuf>,
    /// Emit single-line JSON
    compact: bool,
}

#[derive(Debug)]
enum Failure {
    Invalid(String),
    Io(String),
}

fn print_help() {
    println!("osow-check - OSOW policy conflict analysis");
    println!();
    println!("USAGE:");
    println!("    osow-check [OPTIONS] [POLICIES.json]");
    println!();
    println!("Reads a JSON array of matched policies from POLICIES.json or stdin.");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>       Engine configuration (JSON)");
    println!("        --compact             Print single-line JSON");
    println!("    -h, --help                Print help information");
    println!();
    println!("Set RUST_LOG=debug for diagnostics on stderr.");
}

fn parse_args(args: &[String]) -> Result<Option<Options>, Failure> {
    let mut options = Options::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let Some(path) = args.get(i + 1) else {
                    return Err(Failure::Io("--config requires a value".to_string()));
                };
                options.config = Some(PathBuf::from(path));
                i += 2;
            }
            "--compact" => {
                options.compact = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            arg if arg.starts_with('-') && arg != "-" => {
                return Err(Failure::Io(format!("unknown argument: {arg}")));
            }
            arg => {
                if options.input.is_some() {
                    return Err(Failure::Io(format!("unexpected extra input: {arg}")));
                }
                if arg != "-" {
                    options.input = Some(PathBuf::from(arg));
                }
                i += 1;
            }
        }
    }

    Ok(Some(options))
}

fn read_input(path: Option<&PathBuf>) -> Result<String, Failure> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| Failure::Io(format!("cannot read {}: {e}", path.display()))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| Failure::Io(format!("cannot read stdin: {e}")))?;
            Ok(buf)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, Failure> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Failure::Io(format!("cannot read {}: {e}", path.display())))?;
    parse_config(&raw, &path.display().to_string())
}

fn parse_config(raw: &str, origin: &str) -> Result<EngineConfig, Failure> {
    EngineConfig::from_json_str(raw).map_err(|e| Failure::Invalid(format!("{origin}: {e}")))
}

/// Validates and analyses a JSON policy array, returning the rendered analysis.
fn analyze_json(config: EngineConfig, raw: &str, compact: bool) -> Result<String, Failure> {
    let engine = ConflictEngine::new(config).map_err(|e| Failure::Invalid(e.to_string()))?;

    let policies: Vec<MatchedPolicy> =
        serde_json::from_str(raw).map_err(|e| Failure::Io(format!("invalid policy JSON: {e}")))?;
    info!(policies = policies.len(), "loaded matched policies");

    let analysis = engine
        .analyze(&policies)
        .map_err(|e| Failure::Invalid(e.to_string()))?;
    info!(
        groups = analysis.groups.len(),
        conflicting = analysis.total_conflicting_policies,
        "analysis complete"
    );

    let rendered = if compact {
        serde_json::to_string(&analysis)
    } else {
        serde_json::to_string_pretty(&analysis)
    };
    rendered.map_err(|e| Failure::Io(format!("cannot serialize analysis: {e}")))
}

fn run(options: &Options) -> Result<String, Failure> {
    let config = load_config(options.config.as_ref())?;
    let raw = read_input(options.input.as_ref())?;
    analyze_json(config, &raw, options.compact)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_args(&args).and_then(|options| match options {
        Some(options) => run(&options).map(Some),
        None => Ok(None),
    });

    match result {
        Ok(Some(json)) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(Failure::Invalid(message)) => {
            error!("{message}");
            eprintln!("error: {message}");
            ExitCode::from(EXIT_INVALID)
        }
        Err(Failure::Io(message)) => {
            error!("{message}");
            eprintln!("error: {message}");
            ExitCode::from(EXIT_IO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    const TWO_PERMITS: &str = r#"[
        {"id": "a", "name": "Permit A", "kind": "permit",
         "output": {"kind": "permit", "permit_type_key": "single_trip", "permit_type_label": "Single trip"}},
        {"id": "b", "name": "Permit B", "kind": "permit",
         "output": {"kind": "permit", "permit_type_key": "superload", "permit_type_label": "Superload"}}
    ]"#;

    #[test]
    fn unknown_flag_is_usage_error() {
        assert!(matches!(parse_args(&args(&["--verbose"])), Err(Failure::Io(_))));
    }

    #[test]
    fn config_flag_requires_value() {
        assert!(matches!(parse_args(&args(&["--config"])), Err(Failure::Io(_))));
        assert!(matches!(parse_args(&args(&["-c"])), Err(Failure::Io(_))));
    }

    #[test]
    fn parses_options() {
        let options = parse_args(&args(&["--compact", "-c", "cfg.json", "policies.json"]))
            .unwrap()
            .unwrap();
        assert!(options.compact);
        assert_eq!(options.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(options.input, Some(PathBuf::from("policies.json")));

        let stdin = parse_args(&args(&["-"])).unwrap().unwrap();
        assert!(stdin.input.is_none());
        assert!(matches!(parse_args(&args(&["a.json", "b.json"])), Err(Failure::Io(_))));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(parse_config("{not json", "cfg.json"), Err(Failure::Invalid(_))));
        let config = parse_config(r#"{"max_policies": 0}"#, "cfg.json").unwrap();
        assert!(matches!(analyze_json(config, "[]", true), Err(Failure::Invalid(_))));
    }

    #[test]
    fn duplicate_ids_are_invalid() {
        let raw = r#"[
            {"id": "a", "name": "Escort A", "kind": "escort"},
            {"id": "a", "name": "Escort A again", "kind": "escort"}
        ]"#;
        let err = analyze_json(EngineConfig::default(), raw, true).unwrap_err();
        assert!(matches!(err, Failure::Invalid(message) if message.contains("Duplicate policy id")));
    }

    #[test]
    fn malformed_policies_are_io_errors() {
        assert!(matches!(
            analyze_json(EngineConfig::default(), "{\"id\": 1", true),
            Err(Failure::Io(_))
        ));
    }

    #[test]
    fn renders_analysis() {
        let json = analyze_json(EngineConfig::default(), TWO_PERMITS, true).unwrap();
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["hasConflicts"], true);
        assert_eq!(value["counts"]["typeOverlap"], 1);

        let pretty = analyze_json(EngineConfig::default(), TWO_PERMITS, false).unwrap();
        assert!(pretty.contains('\n'));
    }
}
