use super::*;

#[test]
fn defaults_when_no_flags_given() {
    let cli = Cli::try_parse_from(["gridscrape-cli"]).expect("expected valid cli args");
    assert_eq!(cli.config, PathBuf::from("config.yaml"));
    assert!(cli.category.is_none());
    assert!(cli.output.is_none());
    assert!(cli.format.is_none());
    assert!(!cli.headed);
}

#[test]
fn parses_every_flag() {
    let cli = Cli::try_parse_from([
        "gridscrape-cli",
        "--config",
        "sites/webscraper.yaml",
        "--category",
        "tablets",
        "--output",
        "out",
        "--format",
        "csv",
        "--headed",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.config, PathBuf::from("sites/webscraper.yaml"));
    assert_eq!(cli.category.as_deref(), Some("tablets"));
    assert_eq!(cli.output, Some(PathBuf::from("out")));
    assert_eq!(cli.format, Some(FormatArg::Csv));
    assert!(cli.headed);
}

#[test]
fn rejects_unknown_format() {
    let result = Cli::try_parse_from(["gridscrape-cli", "--format", "xml"]);
    assert!(result.is_err());
}

#[test]
fn format_arg_maps_to_output_format() {
    assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
    assert_eq!(OutputFormat::from(FormatArg::Csv), OutputFormat::Csv);
}
