use clap::Parser;
use permfs::cli::Cli;
use permfs::{logging, SUPERVISOR_EXIT_CODE};

fn main() {
    // Every path ends in the same exit status: this is a one-off service.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(SUPERVISOR_EXIT_CODE);
        }
    };

    logging::init();
    if let Err(err) = permfs::run(&cli) {
        eprintln!("{err:#}");
    }
    std::process::exit(SUPERVISOR_EXIT_CODE);
}
