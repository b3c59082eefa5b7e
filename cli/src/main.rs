mod commands;
mod credentials;
mod loader;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, check, tools};
use sshprobe_common::warn;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    match commands.command {
        Commands::Tools(args) => {
            print::header("external tools", false);
            tools::tools(args).await?;
            print::end_of_program();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check(args) => {
            let plan = check::prepare(args)?;
            tokio::select! {
                result = check::check(plan) => result,
                _ = tokio::signal::ctrl_c() => {
                    mprint!();
                    warn!("Operation cancelled by user");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
