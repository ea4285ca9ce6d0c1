use chisq::significance;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process;
use std::str::FromStr;

/// Calculates the critical chi-squared value for a significance level and a number of degrees
/// of freedom.
///
/// The significance is a value below 1.0, with smaller values indicating higher significance.
/// Given both values on the command line, prints just the critical value. Otherwise prompts for
/// them and prints a labelled answer.
#[derive(Parser, Debug)]
#[command(name = "chitab", version, about)]
struct Args {
    /// Significance level, such as 0.05
    #[arg(requires = "dof")]
    significance: Option<f64>,

    /// Degrees of freedom
    #[arg(requires = "significance")]
    dof: Option<usize>,

    /// Print only the number, even after prompting
    #[arg(short, long)]
    quiet: bool,
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
    let (significance, dof, prompted) = match (args.significance, args.dof) {
        (Some(significance), Some(dof)) => (significance, dof, false),
        _ => (
            prompt("Enter the significance value      :  ")?,
            prompt("Enter number of degrees of freedom: ")?,
            true,
        ),
    };
    let critical = significance::critical_value(significance, dof)?;
    if args.quiet || !prompted {
        println!("{:.6}", critical);
    } else {
        println!("Critical Chi-squared:  {:.6}", critical);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run(&Args::parse()) {
        eprintln!("chitab: {}", e);
        process::exit(1);
    }
}
