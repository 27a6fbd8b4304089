mod copy;
mod trace;
mod utils;

use crate::cli::{Cli, Commands, GlobalOptions};
use vecna::VecnaResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> VecnaResult<()> {
    let Cli { global, command } = cli;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(&global, command))
}

/// Dispatch the command to the appropriate handler.
async fn dispatch(global: &GlobalOptions, command: Commands) -> VecnaResult<()> {
    match command {
        Commands::Trace(cmd) => trace::run(global, cmd).await,
        Commands::Copy(cmd) => copy::run(global, cmd).await,
    }
}
