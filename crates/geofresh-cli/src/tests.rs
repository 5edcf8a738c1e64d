use super::*;

#[test]
fn parses_run_with_coordinates() {
    let cli = Cli::try_parse_from([
        "geofresh",
        "run",
        "--process",
        "get-upstream-bbox",
        "--lon",
        "9.109",
        "--lat",
        "52.781",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.process, "get-upstream-bbox");
            assert_eq!(args.lon, Some(9.109));
            assert_eq!(args.lat, Some(52.781));
            assert!(args.subc_id.is_none());
            assert!(!args.no_hint);
            assert!(!args.compact);
        }
        Commands::Processes => panic!("expected run"),
    }
}

#[test]
fn parses_run_with_two_subcatchments_and_flags() {
    let cli = Cli::try_parse_from([
        "geofresh",
        "run",
        "--process",
        "get-shortest-path-between-points",
        "--subc-id",
        "506251713",
        "--subc-id2",
        "506251714",
        "--no-hint",
        "--compact",
        "--max-wait-secs",
        "120",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run(RunArgs {
            subc_id: Some(506_251_713),
            subc_id2: Some(506_251_714),
            no_hint: true,
            compact: true,
            max_wait_secs: Some(120),
            ..
        })
    ));
}

#[test]
fn parses_processes_command() {
    let cli = Cli::try_parse_from(["geofresh", "processes"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Processes));
}

#[test]
fn run_requires_a_process() {
    assert!(Cli::try_parse_from(["geofresh", "run", "--lon", "9.1", "--lat", "52.8"]).is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["geofresh"]).is_err());
}

#[test]
fn rejects_non_numeric_subcatchment() {
    assert!(Cli::try_parse_from([
        "geofresh",
        "run",
        "--process",
        "get-local-streamsegments",
        "--subc-id",
        "abc",
    ])
    .is_err());
}
