use chisq::significance;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process;
use std::str::FromStr;

/// Reports the significance level of a chi-squared value.
///
/// Prompts for the value and the degrees of freedom if they aren't given.
#[derive(Parser, Debug)]
#[command(name = "chisig", version, about)]
struct Args {
    /// Chi-squared value
    chi_squared: Option<f64>,

    /// Degrees of freedom
    #[arg(requires = "chi_squared")]
    dof: Option<usize>,
}

fn prompt<T: FromStr>(question: &str) -> chisq::Result<T> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    answer
        .trim()
        .parse()
        .map_err(|_| chisq::Error::InvalidArgument(format!("`{}` is not a number", answer.trim())))
}

fn run(args: &Args) -> chisq::Result<()> {
    let (chi_squared, dof) = match (args.chi_squared, args.dof) {
        (Some(chi_squared), Some(dof)) => (chi_squared, dof),
        _ => (
            prompt("Enter Chi-squared value           :  ")?,
            prompt("Enter number of degrees of freedom: ")?,
        ),
    };
    let cumulative = significance::cumulative(chi_squared, dof)?;
    println!(
        "Significant at the {} level (1-{})",
        1.0 - cumulative,
        cumulative
    );
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run(&Args::parse()) {
        eprintln!("chisig: {}", e);
        process::exit(1);
    }
}
