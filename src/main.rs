use clap::Parser;
use schedule_reader::cli::{Args, run, setup_logging};
use std::process;

fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args) {
        eprintln!("Warning: {:#}", error);
    }

    match run(&args) {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
