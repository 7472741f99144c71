//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    stopover_cli::init_logging();
    if let Err(err) = stopover_cli::run() {
        eprintln!("stopover: {err}");
        std::process::exit(1);
    }
}
