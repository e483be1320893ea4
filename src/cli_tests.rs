use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn run_defaults() {
    let cli = Cli::parse_from(["snapcheck", "run"]);
    assert_eq!(cli.verbose, 0);
    assert!(!cli.quiet);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Run(args) => {
            assert!(args.only.is_empty());
            assert_eq!(args.format, OutputFormat::Text);
            assert!(args.output.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn run_with_options() {
    let cli = Cli::parse_from([
        "snapcheck",
        "-vv",
        "--config",
        "ci.toml",
        "run",
        "--only",
        "a",
        "--only",
        "b",
        "--format",
        "json",
        "-o",
        "report.json",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.only, vec!["a", "b"]);
            assert_eq!(args.format, OutputFormat::Json);
            assert_eq!(args.output, Some(PathBuf::from("report.json")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::parse_from(["snapcheck", "list", "-q", "-v"]);
    assert!(cli.quiet);
    assert_eq!(cli.verbose, 1);
    assert!(matches!(cli.command, Commands::List));
}

#[test]
fn accept_requires_names() {
    assert!(Cli::try_parse_from(["snapcheck", "accept"]).is_err());
    let cli = Cli::parse_from(["snapcheck", "accept", "x", "y"]);
    match cli.command {
        Commands::Accept(args) => assert_eq!(args.names, vec!["x", "y"]),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn init_defaults() {
    let cli = Cli::parse_from(["snapcheck", "init"]);
    match cli.command {
        Commands::Init(args) => {
            assert_eq!(args.output, PathBuf::from(".snapcheck.toml"));
            assert!(!args.force);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn unknown_format_rejected() {
    assert!(Cli::try_parse_from(["snapcheck", "run", "--format", "xml"]).is_err());
}
