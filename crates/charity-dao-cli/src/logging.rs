use tracing_subscriber::EnvFilter;

const CRATES: [&str; 5] = [
    "charity_dao_cli",
    "charity_dao_core",
    "charity_dao_eth_client",
    "charity_dao_hooks",
    "charity_dao_store",
];

/// Install the global subscriber. Logs go to stderr so stdout stays parseable.
pub fn init(json: bool, verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let default = CRATES.iter().map(|c| format!("{c}={level}")).collect::<Vec<_>>().join(",");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("warn,{default}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1);

    // A subscriber may already be installed when embedded in tests.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
