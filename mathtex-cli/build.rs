use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input HTML file")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("mathtex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Transforms math regions in rich-text HTML content")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mathtex.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("internalize")
                .about("Bring every math region to its in-editor shape")
                .arg(input_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("externalize")
                .about("Strip editor scaffolding from math regions")
                .arg(input_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("regions")
                .about("List math regions with their state and source")
                .arg(input_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the listing as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("scripts").about("Print the engine script URLs"))
        .subcommand(
            Command::new("dialog")
                .about("Print the editing modal description as JSON")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .help("Value to pre-fill the input field with")
                        .value_hint(ValueHint::Other),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mathtex", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mathtex", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mathtex", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
