mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nanokvm_core::MacAddress;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch a device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "nanokvm", &mut std::io::stdout());
            Ok(())
        }

        // Wake-on-LAN is a local broadcast; no device session needed
        Command::WakeOnLan(args) => {
            let mac: MacAddress = args.mac.parse().map_err(CliError::from)?;
            nanokvm_core::wol::send(&mac).await?;
            if !cli.global.quiet {
                eprintln!("Magic packet sent to {mac}");
            }
            Ok(())
        }

        // Device commands need an authenticated session
        Command::Device(cmd) => {
            let device_config = config::build_device_config(&cli.global)?;

            tracing::debug!(command = ?cmd, host = %device_config.host, "dispatching command");
            commands::dispatch(cmd, device_config, &cli.global).await
        }
    }
}
