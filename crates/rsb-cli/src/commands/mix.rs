use std::error::Error;

use clap::Args;
use rsb_core::scalar::{ScalarType, ScalarValue};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct MixArgs {
    /// Scalar type: i8..i64, u8..u64, f32, f64 or a C name such as `uint16_t`.
    #[arg(short = 't', long = "type")]
    pub ty: ScalarType,
    /// Value to transform; integers accept a `0x` prefix.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct MixOutput {
    input: ScalarValue,
    output: ScalarValue,
    bits: String,
}

/// Applies the transform and describes the result in one line.
pub fn describe(args: &MixArgs) -> Result<String, Box<dyn Error>> {
    let input = ScalarValue::parse(args.ty, &args.value)?;
    let output = input.mix();
    let width = args.ty.size() * 2;
    let bits = format!("0x{:0width$x}", output.bits(), width = width);
    if args.json {
        return Ok(serde_json::to_string(&MixOutput { input, output, bits })?);
    }
    Ok(format!("{} {input} -> {output} ({bits})", args.ty))
}

pub fn run(args: &MixArgs) -> Result<(), Box<dyn Error>> {
    println!("{}", describe(args)?);
    Ok(())
}
