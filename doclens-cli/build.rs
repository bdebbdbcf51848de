use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const INSPECT_VIEWS: &[&str] = &["treeviz", "json"];

fn path_arg(name: &'static str, index: usize) -> Arg {
    Arg::new(name)
        .required(true)
        .index(index)
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_hint(ValueHint::FilePath)
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .value_hint(ValueHint::Other)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("doclens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Edit structured documents through an HTML view")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(Arg::new("id-prefix").long("id-prefix").global(true))
        .subcommand(
            Command::new("get")
                .arg(path_arg("input", 1))
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("put")
                .arg(path_arg("concrete", 1))
                .arg(path_arg("abstract", 2))
                .arg(format_arg())
                .arg(output_arg())
                .arg(Arg::new("no-normalize").long("no-normalize").action(ArgAction::SetTrue))
                .arg(Arg::new("stats").long("stats").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("create")
                .arg(path_arg("abstract", 1))
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("normalize")
                .arg(path_arg("abstract", 1))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .arg(path_arg("path", 1))
                .arg(
                    Arg::new("view")
                        .index(2)
                        .value_parser(clap::builder::PossibleValuesParser::new(INSPECT_VIEWS)),
                )
                .arg(Arg::new("attributes").long("attributes").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("bdt")
                .subcommand(
                    Command::new("move")
                        .arg(Arg::new("count").required(true).index(1))
                        .arg(Arg::new("from").required(true).index(2))
                        .arg(Arg::new("to").required(true).index(3)),
                )
                .subcommand(
                    Command::new("remove").arg(Arg::new("indices").required(true).num_args(1..)),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "doclens", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "doclens", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "doclens", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
