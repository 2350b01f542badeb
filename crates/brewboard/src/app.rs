use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("brewboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch coffee orders, receipts and voice pipeline stages from the terminal")
        .long_about("brewboard polls the coffee ordering endpoint (or the order files the voice agent writes) and renders the same panels the barista web app shows: the current order card, the receipts list, the live transcription bubble and the processing indicator.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("orders")
                .about("Fetch the newest orders once and print them")
                .arg(json_arg())
                .arg(orders_dir_arg())
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Print every order instead of the display cap")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("receipts")
                .about("Fetch every order once and print it with its total")
                .arg(json_arg())
                .arg(orders_dir_arg())
        )
        .subcommand(
            Command::new("watch")
                .about("Keep the order card and processing indicator running, printing each change")
                .arg(orders_dir_arg())
                .arg(
                    Arg::new("duration-secs")
                        .long("duration-secs")
                        .help("Stop after this many seconds (default: run until Ctrl-C)")
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("no-stages")
                        .long("no-stages")
                        .help("Do not show the processing indicator")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("transcript")
                .about("Replay chat feed records from stdin (one JSON object per line) through the live transcription bubble")
        )
        .subcommand(
            Command::new("price")
                .about("Price a single drink")
                .arg(
                    Arg::new("drink")
                        .help("Drink type, e.g. latte")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("size")
                        .help("Cup size: small, medium or large")
                        .required(true)
                        .index(2)
                )
                .arg(
                    Arg::new("extra")
                        .long("extra")
                        .short('e')
                        .help("Add an extra (repeatable)")
                        .action(ArgAction::Append)
                )
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration as TOML")
        )
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

fn orders_dir_arg() -> Arg {
    Arg::new("orders-dir")
        .long("orders-dir")
        .help("Read order files from this directory instead of the HTTP endpoint (overrides config)")
        .value_parser(value_parser!(std::path::PathBuf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "brewboard");
    }

    #[test]
    fn test_cli_verify() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_price_collects_extras() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "brewboard", "price", "latte", "large", "-e", "whipped cream", "--extra", "caramel",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("price").unwrap();
        let extras: Vec<&String> = sub.get_many::<String>("extra").unwrap().collect();
        assert_eq!(extras, vec!["whipped cream", "caramel"]);
        assert_eq!(sub.get_one::<String>("drink").unwrap(), "latte");
    }

    #[test]
    fn test_verbose_is_global() {
        let matches = build_cli()
            .try_get_matches_from(vec!["brewboard", "orders", "-v", "--json"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        assert!(matches.subcommand_matches("orders").unwrap().get_flag("json"));
    }

    #[test]
    fn test_watch_duration_must_be_number() {
        let result =
            build_cli().try_get_matches_from(vec!["brewboard", "watch", "--duration-secs", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_price_requires_size() {
        let result = build_cli().try_get_matches_from(vec!["brewboard", "price", "latte"]);
        assert!(result.is_err());
    }
}
