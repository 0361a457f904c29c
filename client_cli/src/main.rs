// Application.
pub mod app;

use anyhow::Result;
use app::{App, AppArgs};
use std::io;

const HELP: &str = "\
client_cli

USAGE:
  client_cli [--seed NUMBER]

FLAGS:
  -h, --help            Prints help information

OPTIONS:
  --seed NUMBER         Dice seed, for a reproducible game
";

fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }
    Ok(AppArgs {
        seed: pargs.opt_value_from_str("--seed")?,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {}.", err);
            std::process::exit(1);
        }
    };

    // Create an application.
    let mut app = App::new(args);
    println!("{}", app.display());

    // Start the main loop.
    while !app.should_quit {
        println!("move?>");
        let mut input = String::new();
        let _bytecount = io::stdin().read_line(&mut input)?;
        app.input(input.trim());
    }

    Ok(())
}
