mod app;

use clap::Parser;

use crate::app::cli::Cli;

fn main() {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = app::run(args) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
