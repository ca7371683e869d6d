use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("windock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Deduplicated, display-attributed window inventory")
        .long_about(
            "windock reconciles the window server's on-screen list with each application's \
             accessibility tree into one list of real windows, each attributed to exactly one \
             display. Minimized and off-screen windows keep their last known display through a \
             persistent affinity cache.",
        )
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
        // Snapshot subcommand
        .subcommand(
            Command::new("snapshot")
                .about("Take one snapshot and print it grouped by display")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-cache")
                        .long("no-cache")
                        .help("Neither read nor update the affinity cache")
                        .action(ArgAction::SetTrue),
                ),
        )
        // Displays subcommand
        .subcommand(
            Command::new("displays").about("List connected displays").arg(
                Arg::new("json")
                    .long("json")
                    .help("Output in JSON format")
                    .action(ArgAction::SetTrue),
            ),
        )
        // Watch subcommand
        .subcommand(
            Command::new("watch")
                .about("Take snapshots on a timer and print whenever the inventory changes")
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Milliseconds between snapshots")
                        .value_parser(clap::value_parser!(u64).range(10..))
                        .default_value("1000"),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('n')
                        .help("Stop after this many snapshots (default: run until interrupted)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print one JSON line per change")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-cache")
                        .long("no-cache")
                        .help("Neither read nor update the affinity cache")
                        .action(ArgAction::SetTrue),
                ),
        )
        // Cache subcommand
        .subcommand(
            Command::new("cache")
                .about("Inspect or reset the window-to-display affinity cache")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("show").about("Print cached affinities").arg(
                        Arg::new("json")
                            .long("json")
                            .help("Output in JSON format")
                            .action(ArgAction::SetTrue),
                    ),
                )
                .subcommand(Command::new("clear").about("Delete the affinity cache file")),
        )
}
