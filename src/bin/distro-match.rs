mod commands;

use anyhow::Result;
use distro_match::config::resolve_config;
use distro_match::logging::init_logging;

fn usage() -> &'static str {
    "Usage:\n  distro-match [--config <path>] recommend <work|browsing|gaming> <skill> [--hardware <file.json>] [--json]\n  distro-match [--config <path>] scores <work|browsing|gaming> <skill> [--hardware <file.json>]\n  distro-match [--config <path>] scan [--output <file.json>]\n  distro-match [--config <path>] info <distro-id>"
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = commands::parse_invocation(&args)?;

    let config = resolve_config(invocation.config.as_deref())?;
    init_logging(&config.log_level);

    commands::run(invocation.command, &config)
}
