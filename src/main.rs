use clap::Parser;
use std::process;
use xcsv::cli::{self, Args};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    cli::setup_logging(args.verbose);

    match cli::run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
