use super::args::{Cli, Command};

pub mod candidates;
pub mod mock;
pub mod run;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args, &cli.client).await,
        Command::Candidates => candidates::run(&cli.client),
        Command::Mock(args) => mock::run(args),
    }
}
