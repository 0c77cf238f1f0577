mod app;
mod assets;
mod cli;
mod config;
mod consts;
mod error;
mod gemini;
mod input;
mod logging;
mod naming;
mod output;
mod pipeline;
mod render;
mod utils;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Err(e) = app::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
