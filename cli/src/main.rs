//! retoc CLI - PDF outline inference tool

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use retoc::outline::{distinct_sizes, SizeThresholds};
use retoc::{
    extract_sections, outline_file_with_options, parse_file_with_options, DocumentOutline, NoOcr,
    OutlineExtractor, OutlineOptions, ParseOptions, PdfParser, SectionOptions,
};

#[derive(Parser)]
#[command(name = "retoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer titles and tables of contents from PDF layout", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the document outline
    #[command(alias = "toc")]
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Print a readable tree instead of JSON
        #[arg(long)]
        tree: bool,

        /// Font size tolerance for heading thresholds (0.0-1.0)
        #[arg(long)]
        tolerance: Option<f32>,
    },

    /// Extract per-page text sections as JSON
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Process a directory of PDFs into per-file JSON reports
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for the JSON reports
        #[arg(short, long, value_name = "DIR", env = "RETOC_OUTPUT_DIR")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            tree,
            tolerance,
        }) => cmd_outline(&input, output.as_deref(), compact, tree, tolerance),
        Some(Commands::Sections {
            input,
            output,
            compact,
        }) => cmd_sections(&input, output.as_deref(), compact),
        Some(Commands::Batch { input, output }) => cmd_batch(&input, output.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        None => {
            // Default behavior: show the outline tree if input is provided
            if let Some(input) = cli.input {
                cmd_outline(&input, None, false, true, None)
            } else {
                println!("{}", "Usage: retoc <FILE>".yellow());
                println!("       retoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    tree: bool,
    tolerance: Option<f32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = OutlineOptions::default();
    if let Some(t) = tolerance {
        options = options.with_size_tolerance(t);
    }

    let outline = outline_file_with_options(input, options)?;

    if tree {
        print_outline_tree(&outline);
        return Ok(());
    }

    let json = if compact {
        outline.to_json()?
    } else {
        outline.to_json_pretty()?
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn print_outline_tree(outline: &DocumentOutline) {
    println!("{}", outline.title.cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if outline.outline.is_empty() {
        println!("{}", "(no headings found)".dimmed());
        return;
    }

    for heading in &outline.outline {
        let indent = "  ".repeat((heading.level.rank() - 1) as usize);
        let page = format!("p{:>3}", heading.page);
        println!("{} {}{}", page.dimmed(), indent, heading.text);
    }
}

fn cmd_sections(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, ParseOptions::new().lenient())?;
    let name = file_name(input);
    let sections = extract_sections(&doc, &name, &NoOcr, &SectionOptions::default());

    let json = if compact {
        serde_json::to_string(&sections)?
    } else {
        serde_json::to_string_pretty(&sections)?
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("outputs"));
    fs::create_dir_all(&output_dir)?;

    let mut pdf_files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdf_files.sort();

    if pdf_files.is_empty() {
        println!("{}", "No PDF files found".yellow());
        return Ok(());
    }

    // One timestamp for the whole run so its reports can be grouped later.
    let timestamp = Utc::now().to_rfc3339();

    let pb = ProgressBar::new(pdf_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut failures = 0usize;
    for path in &pdf_files {
        let name = file_name(path);
        pb.set_message(name.clone());

        match write_report(path, &name, &output_dir, &timestamp) {
            Ok(report_path) => {
                pb.println(format!("{} {}", "Wrote".green(), report_path.display()));
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "Failed".red().bold(), name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let processed = pdf_files.len() - failures;
    println!(
        "\n{} {} of {} files processed",
        "Done!".green().bold(),
        processed,
        pdf_files.len()
    );

    Ok(())
}

/// Build and write one combined report: outline plus page sections.
fn write_report(
    path: &Path,
    name: &str,
    output_dir: &Path,
    timestamp: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(path, ParseOptions::new().lenient())?;
    let stem = file_stem(path);

    let outline = OutlineExtractor::new().extract(&doc, &stem);
    let sections = extract_sections(&doc, name, &NoOcr, &SectionOptions::default());

    let report = serde_json::json!({
        "metadata": {
            "input_document": name,
            "timestamp": timestamp,
        },
        "document": outline,
        "pages": sections,
    });

    let report_path = output_dir.join(format!("final_output_{stem}.json"));
    fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    Ok(report_path)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let metadata = parser.metadata();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    if metadata.encrypted {
        return Ok(());
    }

    let doc = parser.parse()?;

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());

    let tables: usize = doc.pages.iter().map(|p| p.tables.len()).sum();
    println!("{}: {}", "Tables".bold(), tables);

    let sizes = distinct_sizes(&doc);
    if !sizes.is_empty() {
        let listed: Vec<String> = sizes.iter().map(|s| format!("{s}")).collect();
        println!("{}: {}", "Font sizes".bold(), listed.join(", "));
    }

    let options = OutlineOptions::default();
    if let Some(thresholds) = SizeThresholds::from_document(&doc, options.min_size_floor) {
        println!(
            "{}: H1 {} / H2 {} / H3 {} (min {})",
            "Size thresholds".bold(),
            thresholds.h1,
            thresholds.h2,
            thresholds.h3,
            thresholds.min_size
        );
    }

    let outline = OutlineExtractor::new().extract(&doc, &file_stem(input));
    println!("{}: {}", "Headings".bold(), outline.outline.len());

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
