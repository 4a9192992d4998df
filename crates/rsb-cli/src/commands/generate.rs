use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rsb_gen::{generate, load_preamble, GenOptions, Program};

use crate::timing::measure;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of structs to generate.
    #[arg(short = 's', long = "strucs", default_value_t = 10)]
    pub struc_count: usize,
    /// Number of functions to generate.
    #[arg(short = 'f', long = "funcs", default_value_t = 100)]
    pub func_count: usize,
    /// Generated C++ file; the JSON manifest is written next to it.
    #[arg(short = 'o', long, default_value = "test.cxx")]
    pub output: PathBuf,
    /// Generator options as `key=value` (seed, min-fields, max-fields,
    /// min-args, max-args, pointers, embedded).
    #[arg(long = "gen-opt", value_name = "KEY=VALUE", num_args = 1..)]
    pub gen_opt: Vec<String>,
    /// YAML file with generator options, applied before `--gen-opt`.
    #[arg(long)]
    pub gen_config: Option<PathBuf>,
    /// Replacement for the built-in C++ preamble.
    #[arg(long)]
    pub preamble: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn options(&self) -> Result<GenOptions, Box<dyn Error>> {
        let base = match &self.gen_config {
            Some(path) => GenOptions::load(path)?,
            None => GenOptions::default(),
        };
        Ok(base.apply_pairs(self.gen_opt.as_slice())?)
    }
}

pub fn run(args: &GenerateArgs) -> Result<Program, Box<dyn Error>> {
    let options = args.options()?;
    let preamble = load_preamble(args.preamble.as_deref())?;
    measure("Generating test data", || -> Result<Program, Box<dyn Error>> {
        let program = generate(args.struc_count, args.func_count, &options)?;
        program.write(&args.output, &preamble)?;
        Ok(program)
    })
}
