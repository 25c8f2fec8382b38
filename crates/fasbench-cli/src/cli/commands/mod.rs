use super::args::*;

pub mod baseline;
pub(crate) mod run;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        None => run::run(cli.run),
        Some(Command::Run(args)) => run::run(args),
        Some(Command::Baseline(args)) => match args.cmd {
            BaselineSub::Show(show_args) => baseline::cmd_baseline_show(show_args),
        },
    }
}
