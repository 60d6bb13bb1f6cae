mod cli;
mod init;
mod pack;

use clap::Parser;
use cli::{Cli, Commands};
use promptpack::Error;

const FAREWELL: &str = "Cancelled, nothing written. Bye!";

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    install_interrupt_handler();

    let result = match cli.command {
        Some(Commands::Init(args)) => init::run(args),
        None => pack::run(cli.pack, promptpack::load_config()),
    };

    if let Err(e) = result {
        if matches!(e.downcast_ref::<Error>(), Some(Error::Cancelled)) {
            eprintln!("{}", FAREWELL);
            return;
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// SIGINT ends the process at once with a zero status. Prompts that hold the
/// terminal in raw mode see Ctrl-C as input instead and return `Cancelled`.
#[cfg(unix)]
fn install_interrupt_handler() {
    use signal_hook::consts::signal::SIGINT;
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            log::warn!("failed to register interrupt handler: {}", e);
            return;
        }
    };

    let spawned = std::thread::Builder::new()
        .name("promptpack-signal".to_owned())
        .spawn(move || {
            if signals.forever().next().is_some() {
                eprintln!();
                eprintln!("{}", FAREWELL);
                std::process::exit(0);
            }
        });
    if let Err(e) = spawned {
        log::warn!("failed to start interrupt listener: {}", e);
    }
}

#[cfg(not(unix))]
fn install_interrupt_handler() {}
