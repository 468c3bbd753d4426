//! CLI tool for checking that two PDF documents render identically.
//!
//! Rasterizes both documents with PDFium, compares them page by page and
//! writes the expected/actual/diff images of every differing page to an
//! evidence directory.

use pdfpixeldiff::{DirectorySink, PdfComparator, PdfiumRasterizer, Result};
use std::{env, fs, process};
use tracing_subscriber::EnvFilter;

const DEFAULT_EVIDENCE_DIR: &str = "pixel_diff_evidence";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pdfpixeldiff");

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        process::exit(0);
    }
    if args.len() < 3 {
        print_usage(program);
        process::exit(2);
    }

    let evidence_dir = args.get(3).map(String::as_str).unwrap_or(DEFAULT_EVIDENCE_DIR);

    match run(&args[1], &args[2], evidence_dir) {
        Ok(true) => println!("✅ Documents render identically"),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {e}");
            process::exit(2);
        }
    }
}

fn print_usage(program: &str) {
    println!("pdfpixeldiff - page-by-page visual comparison of PDF documents");
    println!();
    println!("USAGE:");
    println!("    {program} <actual.pdf> <expected.pdf> [evidence_dir]");
    println!();
    println!("ARGUMENTS:");
    println!("    <actual.pdf>     Document under test");
    println!("    <expected.pdf>   Reference document");
    println!("    [evidence_dir]   Where differing pages are written (default: '{DEFAULT_EVIDENCE_DIR}')");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show this help message");
    println!();
    println!("EXIT STATUS:");
    println!("    0  every page matches");
    println!("    1  the documents differ or are not valid PDFs");
    println!("    2  usage or I/O error");
    println!();
    println!("Set RUST_LOG=debug for per-page details.");
}

fn run(actual_path: &str, expected_path: &str, evidence_dir: &str) -> Result<bool> {
    let actual = fs::read(actual_path)?;
    let expected = fs::read(expected_path)?;

    let comparator = PdfComparator::new(PdfiumRasterizer::new());
    let sink = DirectorySink::new(evidence_dir);
    let verdict = comparator.compare(&actual, &expected, &sink)?;

    if !verdict.pass {
        println!("❌ {}", verdict.message);
        if !verdict.failing_pages.is_empty() {
            println!("   Evidence written to: {evidence_dir}");
        }
    }

    Ok(verdict.pass)
}
