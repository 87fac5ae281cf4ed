//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use chasm_config::RenderConfig;
use chasm_effects::{PARAMS, ParamId, ParamScale, ParamSpec, ParamUnit};
use clap::Args;

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for one parameter (by key, e.g. "low_cut")
    #[arg(value_name = "PARAM")]
    param: Option<String>,

    /// Print a default render file instead of the table
    #[arg(long, conflicts_with = "param")]
    toml: bool,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if args.toml {
        print!("{}", RenderConfig::default().to_toml()?);
        return Ok(());
    }

    if let Some(key) = &args.param {
        let id = ParamId::from_key(key).ok_or_else(|| {
            anyhow::anyhow!("Unknown parameter: {} (see 'chasm params')", key)
        })?;
        print_details(id.spec());
        return Ok(());
    }

    println!("Parameters");
    println!("==========");
    println!();
    println!(
        "  {:12}  {:12}  {:18}  {:10}  {}",
        "Key", "Name", "Range", "Default", "Smoothing"
    );
    println!(
        "  {:12}  {:12}  {:18}  {:10}  {}",
        "---", "----", "-----", "-------", "---------"
    );
    for spec in &PARAMS {
        println!(
            "  {:12}  {:12}  {:18}  {:10}  {}",
            spec.key,
            spec.name,
            range_text(spec),
            value_text(spec, spec.default),
            ramp_text(spec)
        );
    }

    println!();
    println!("Use 'chasm params <key>' for the control curve of one parameter.");
    println!("Override on the command line with --param <key>=<value>.");

    Ok(())
}

fn print_details(spec: &ParamSpec) {
    println!("{} ({})", spec.name, spec.key);
    println!("{}", "=".repeat(spec.name.len() + spec.key.len() + 3));
    println!();
    println!("  Range:     {}", range_text(spec));
    println!("  Default:   {}", value_text(spec, spec.default));
    println!("  Smoothing: {}", ramp_text(spec));
    let curve = match spec.scale {
        ParamScale::Linear => "linear".to_string(),
        ParamScale::Power(exponent) => format!("power ({exponent})"),
        ParamScale::Logarithmic => "logarithmic".to_string(),
    };
    println!("  Curve:     {curve}");
    println!();
    println!("  Control  Value");
    for step in 0..=4 {
        let normalized = f64::from(step) / 4.0;
        println!(
            "  {:>6.0}%  {}",
            normalized * 100.0,
            value_text(spec, spec.from_normalized(normalized))
        );
    }
}

fn value_text(spec: &ParamSpec, value: f64) -> String {
    match spec.unit {
        ParamUnit::Toggle => if value >= 0.5 { "on" } else { "off" }.to_string(),
        unit => format!("{value:.2} {}", unit.suffix()).trim_end().to_string(),
    }
}

fn range_text(spec: &ParamSpec) -> String {
    match spec.unit {
        ParamUnit::Toggle => "off/on".to_string(),
        _ => format!(
            "{} to {}",
            value_text(spec, spec.min),
            value_text(spec, spec.max)
        ),
    }
}

fn ramp_text(spec: &ParamSpec) -> String {
    if spec.ramp_ms > 0.0 {
        format!("{} ms", spec.ramp_ms)
    } else {
        "instant".to_string()
    }
}
