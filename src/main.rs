mod cli;

use chisq::{load_table, significance, Analysis, Cell, Error, Table};
use clap::Parser;
use cli::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;

fn open_input(path: Option<&Path>) -> chisq::Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|source| {
            Error::StreamUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn open_output(path: Option<&Path>) -> chisq::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|source| {
            Error::StreamUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Prints the observed counts with a total at the end of each row. Three-way tables are printed
/// one plane at a time.
fn print_matrix<W: Write>(out: &mut W, table: &Table) -> io::Result<()> {
    let shape = table.shape();
    let print_rows = |out: &mut W, plane: Option<usize>| -> io::Result<()> {
        for row in 0..shape.dim(0) {
            let mut total = 0;
            for col in 0..shape.dim(1) {
                let mut indices = vec![row, col];
                indices.extend(plane);
                let count = table.count(&Cell::new(&indices));
                total += count;
                write!(out, "{:5} ", count)?;
            }
            writeln!(out, " : {}", total)?;
        }
        Ok(())
    };

    if table.axes() == 3 {
        for (plane, label) in table.labels(2).iter().enumerate() {
            writeln!(out, "Plane {}:", label)?;
            print_rows(&mut *out, Some(plane))?;
        }
        Ok(())
    } else {
        print_rows(out, None)
    }
}

fn print_cells<W: Write>(out: &mut W, table: &Table, analysis: &Analysis) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Total observations: {}", analysis.marginals.grand_total())?;
    writeln!(out)?;
    for cell in analysis.statistic.cells() {
        let labels = table.cell_labels(&cell.cell).join(", ");
        match cell.expected {
            Some(expected) => writeln!(
                out,
                "{}: Obs {:5.1} Exp {:5.1}",
                labels, cell.observed as f64, expected
            )?,
            None => writeln!(
                out,
                "{}: Obs {:5.1} Exp   n/a",
                labels, cell.observed as f64
            )?,
        }
    }
    Ok(())
}

fn run(args: &Args) -> chisq::Result<()> {
    let config = args.config();
    config.validate()?;

    let input = open_input(args.input.as_deref())?;
    let mut out = open_output(args.output.as_deref())?;

    let table = load_table(input, &config)?;
    // Fails on counts whose grand total overflows, so no row sum printed below can.
    let analysis = Analysis::run(&table, &config)?;
    if args.display {
        print_matrix(&mut out, &table)?;
        print_cells(&mut out, &table, &analysis)?;
    }

    let statistic = &analysis.statistic;
    writeln!(
        out,
        "ChiSq = {:.6} with {} degrees of freedom",
        statistic.chi_squared, statistic.degrees_of_freedom
    )?;
    if args.significance {
        match significance::p_value(statistic.chi_squared, statistic.degrees_of_freedom) {
            Ok(p) => writeln!(out, "Significant at the {} level", p)?,
            Err(e) => eprintln!("Warning: no significance level: {}", e),
        }
    }
    out.flush()?;

    for warning in statistic.warnings() {
        eprintln!("Warning: {}", warning);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("chisq: {}", e);
        process::exit(1);
    }
}
