use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    build::{self, BuildArgs},
    evaluate::{self, EvaluateArgs},
    generate::{self, GenerateArgs},
    mix::{self, MixArgs},
    recover::{self, RecoverArgs},
    run::{self, RunArgs},
};

mod commands;
mod timing;

#[derive(Parser, Debug)]
#[command(
    name = "rsb",
    version,
    about = "Measures quality and speed of struct recovery by restruc"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a random C++ test program and its manifest.
    Generate(GenerateArgs),
    /// Compile the generated program.
    Build(BuildArgs),
    /// Run restruc on the compiled program.
    Recover(RecoverArgs),
    /// Score restruc output against a generated manifest.
    Evaluate(EvaluateArgs),
    /// Generate, build, recover and evaluate in one go.
    Run(RunArgs),
    /// Apply the `use` bit transform to a single value.
    Mix(MixArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate::run(&args).map(|_| ()),
        Command::Build(args) => build::run(&args).map(|_| ()),
        Command::Recover(args) => recover::run(&args).map(|_| ()),
        Command::Evaluate(args) => {
            let report = evaluate::run(&args)?;
            println!("{report}");
            Ok(())
        }
        Command::Run(args) => {
            let report = run::run(&args)?;
            println!("{report}");
            Ok(())
        }
        Command::Mix(args) => mix::run(&args),
    }
}
