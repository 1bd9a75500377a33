// Command-line interface for mathtex
//
// This binary runs the content transforms the editor plugin applies, on HTML files. It is meant
// for migrating stored content, checking what a document's math regions look like, and seeing
// which engine scripts a configuration resolves to.
//
// Usage:
//  mathtex internalize <input> [-o <file>]   - Bring every region to its in-editor shape
//  mathtex externalize <input> [-o <file>]   - Strip editor scaffolding for storage
//  mathtex regions <input> [--json]          - List regions with their state and source
//  mathtex scripts                           - Print the engine script URLs
//  mathtex dialog [--input <value>]          - Print the editing modal description as JSON
//
// Configuration:
//
// Defaults come from mathtex-config. A mathtex.toml in the working directory is layered on top
// when present, then the file given by --config.
//
// Extra Parameters:
//
// Plugin settings can be overridden with --extra-<key> <value>, keys being class-name,
// symbol-start, symbol-end, lib, config-url and plugin-url.
// Example:
//  mathtex internalize page.html --extra-class-name formula --extra-symbol-start '$$'

mod regions;

use clap::{Arg, ArgAction, Command, ValueHint};
use mathtex::{
    externalize, internalize, DialogOptions, DialogSpec, EngineScripts, MathtexError,
    PluginSettings,
};
use mathtex_config::{Loader, MathtexConfig};
use std::collections::HashMap;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Extra parameter name to configuration key
const OVERRIDE_KEYS: &[(&str, &str)] = &[
    ("class-name", "plugin.class_name"),
    ("symbol-start", "plugin.symbols.start"),
    ("symbol-end", "plugin.symbols.end"),
    ("lib", "plugin.lib"),
    ("config-url", "plugin.config_url"),
    ("plugin-url", "plugin.plugin_url"),
];

/// Preview frame id used for the printed dialog
const DIALOG_FRAME_ID: &str = "mathtex_1";

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // Delimiters often start with a symbol, only a leading dash marks the next flag
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

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

fn build_cli() -> Command {
    Command::new("mathtex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Transforms math regions in rich-text HTML content")
        .long_about(
            "mathtex converts math regions between the shape they are stored in and the shape\n\
            the editor plugin works with.\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> <value> to override plugin settings:\n  \
            class-name, symbol-start, symbol-end, lib, config-url, plugin-url.\n\n\
            Examples:\n  \
            mathtex internalize page.html                  # Editor shape to stdout\n  \
            mathtex externalize page.html -o stored.html   # Storage shape to a file\n  \
            mathtex regions page.html --json               # Region listing as JSON",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
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
        )
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);
    let matches = build_cli().get_matches_from(&cleaned_args);

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        extra_params,
    );
    let settings = PluginSettings::from(&config.plugin);

    match matches.subcommand() {
        Some(("internalize", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_transform_command(input, output, &settings, internalize);
        }
        Some(("externalize", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_transform_command(input, output, &settings, externalize);
        }
        Some(("regions", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_regions_command(input, sub_matches.get_flag("json"), &settings);
        }
        Some(("scripts", _)) => handle_scripts_command(&settings),
        Some(("dialog", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .map(|s| s.as_str())
                .unwrap_or_default();
            handle_dialog_command(input, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn handle_transform_command(
    input: &str,
    output: Option<&str>,
    settings: &PluginSettings,
    transform: fn(&str, &mathtex::MarkerProtocol) -> Result<String, MathtexError>,
) {
    let source = read_input(input);
    tracing::debug!(target: "mathtex", input, bytes = source.len(), "transforming");

    let result = transform(&source, &settings.protocol()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, result) {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            }
        }
        None => print!("{result}"),
    }
}

fn handle_regions_command(input: &str, json: bool, settings: &PluginSettings) {
    let source = read_input(input);
    let reports = regions::collect(&source, &settings.protocol()).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    if json {
        match regions::to_json(&reports) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Serialization error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", regions::to_text(&reports));
    }
}

fn handle_scripts_command(settings: &PluginSettings) {
    let scripts = EngineScripts::from_settings(settings).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    for url in scripts.urls() {
        println!("{url}");
    }
}

fn handle_dialog_command(input: &str, config: &MathtexConfig) {
    let options = DialogOptions::from(&config.dialog);
    let spec = DialogSpec::new(&options, DIALOG_FRAME_ID, input);
    match serde_json::to_string_pretty(&spec) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        }
    }
}

fn load_cli_config(
    explicit_path: Option<&str>,
    extra_params: HashMap<String, String>,
) -> MathtexConfig {
    let loader = Loader::new().with_optional_file("mathtex.toml");
    let mut loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    for (key, value) in override_keys(extra_params) {
        loader = loader.set_override(key, value).unwrap_or_else(|err| {
            eprintln!("Invalid override for {key}: {err}");
            std::process::exit(1);
        });
    }

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Map extra parameters onto configuration keys. Unknown parameters are fatal.
fn override_keys(mut extra_params: HashMap<String, String>) -> Vec<(&'static str, String)> {
    let mut overrides = Vec::new();
    for (name, key) in OVERRIDE_KEYS {
        if let Some(value) = extra_params.remove(*name) {
            overrides.push((*key, value));
        }
    }

    if let Some(name) = extra_params.keys().next() {
        eprintln!("Unknown parameter --extra-{name}");
        std::process::exit(1);
    }
    overrides
}
