use super::*;

#[test]
fn parses_crawl_with_link_and_father() {
    let cli = Cli::try_parse_from([
        "catpub",
        "crawl",
        "--link",
        "https://www.lily-bearing.com/slewing-ring-bearings/",
        "--father",
        "42",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Crawl {
            link: Some(ref l),
            father: Some(42)
        }) if l == "https://www.lily-bearing.com/slewing-ring-bearings/"
    ));
}

#[test]
fn crawl_without_link_parses_as_none() {
    let cli = Cli::try_parse_from(["catpub", "crawl"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Crawl {
            link: None,
            father: None
        })
    ));
}

#[test]
fn crawl_rejects_non_numeric_father() {
    let result = Cli::try_parse_from(["catpub", "crawl", "--link", "x", "--father", "abc"]);
    assert!(result.is_err());
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["catpub"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn crawl_args_trims_link_and_keeps_father() {
    let cli = Cli::try_parse_from(["catpub", "crawl", "--link", "  https://a.com/x/ ", "--father", "7"])
        .expect("expected valid cli args");
    assert_eq!(
        crawl_args(cli.command),
        Ok(("https://a.com/x/".to_owned(), Some(7)))
    );
}

#[test]
fn crawl_args_rejects_missing_or_blank_link() {
    let missing = Cli::try_parse_from(["catpub", "crawl"]).expect("expected valid cli args");
    assert_eq!(crawl_args(missing.command), Err("category link is empty"));

    let blank = Cli::try_parse_from(["catpub", "crawl", "--link", "   "])
        .expect("expected valid cli args");
    assert_eq!(crawl_args(blank.command), Err("category link is empty"));
}

#[test]
fn crawl_args_without_command() {
    assert_eq!(crawl_args(None), Err("no command given"));
}
