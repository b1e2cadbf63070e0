//! letterpad CLI - split letter PDFs into duplex-ready files

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use letterpad::render::{self, RenderedBatch};
use letterpad::split::{segment, FooterReading};
use letterpad::{
    Batch, JsonFormat, LetterSegment, LetterSplitter, LopdfBackend, MetadataPatterns, SplitOptions,
};

/// Directory, under the output directory, holding one PDF per letter.
const LETTERS_DIR: &str = "individual-letters";

/// Manifest file name, under the output directory.
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Parser)]
#[command(name = "letterpad")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Split a PDF of letters by their page footers and pad each for duplex printing", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    split: SplitArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a PDF into letters and write them with a combined document
    Split {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Write the manifest as compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Show page footers and detected letters without writing anything
    Scan {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print footer readings as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct SplitArgs {
    /// Read pages whose text cannot be extracted as empty
    #[arg(long)]
    lenient: bool,

    /// Extract page text on a single thread
    #[arg(long)]
    sequential: bool,

    /// Regex locating the envelope number (capture group 1)
    #[arg(long, value_name = "REGEX", env = "LETTERPAD_ENVELOPE_PATTERN")]
    envelope_pattern: Option<String>,

    /// Regex locating the family name (capture group 1)
    #[arg(long, value_name = "REGEX", env = "LETTERPAD_NAME_PATTERN")]
    name_pattern: Option<String>,

    /// File stem of the combined document
    #[arg(long, value_name = "NAME")]
    combined_name: Option<String>,
}

impl SplitArgs {
    fn to_options(&self) -> letterpad::Result<SplitOptions> {
        let mut options = SplitOptions::new();
        if self.lenient {
            options = options.lenient();
        }
        if self.sequential {
            options = options.sequential();
        }

        let mut patterns = MetadataPatterns::default();
        if let Some(ref pattern) = self.envelope_pattern {
            patterns = patterns.with_envelope(pattern)?;
        }
        if let Some(ref pattern) = self.name_pattern {
            patterns = patterns.with_family_name(pattern)?;
        }
        options = options.with_patterns(patterns);

        if let Some(ref name) = self.combined_name {
            options = options.with_combined_name(name.clone());
            // Fail before any input is opened.
            options.combined_stem()?;
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Split {
            input,
            output,
            compact,
            split,
        }) => cmd_split(&input, output.as_deref(), compact, &split),
        Some(Commands::Scan { input, json, split }) => cmd_scan(&input, json, &split),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: split if input is provided
            if let Some(input) = cli.input {
                cmd_split(&input, cli.output.as_deref(), false, &cli.split)
            } else {
                println!("{}", "Usage: letterpad <FILE> [OUTPUT]".yellow());
                println!("       letterpad --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}_letters", stem))
}

fn cmd_split(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &SplitArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options()?;
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output_dir(input));

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Opening PDF...");
    let backend = LopdfBackend::open(input)?;
    pb.inc(1);

    pb.set_message("Finding letters...");
    let batch = LetterSplitter::new(options).split(&backend)?;
    pb.inc(1);

    // One step per letter plus the combined document
    pb.set_length(2 + batch.letter_count() as u64 + 1);
    let mut letters = Vec::with_capacity(batch.letter_count());
    for letter in batch.letters() {
        pb.set_message(format!("Rendering {}", letter.file_name()));
        letters.push(render::render_letter(letter, &backend)?);
        pb.inc(1);
    }
    pb.set_message("Rendering combined document...");
    let combined = render::render_combined(&batch, &backend)?;
    let rendered = RenderedBatch { letters, combined };

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    write_outputs(&output_dir, &batch, &rendered, format)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    for warning in batch.warnings() {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning.to_string().yellow());
    }

    println!("\n{}", "Output files:".green().bold());
    println!(
        "  {} {}/ ({} letters)",
        "├─".dimmed(),
        LETTERS_DIR,
        batch.letter_count()
    );
    println!(
        "  {} {} ({} pages)",
        "├─".dimmed(),
        rendered.combined.name,
        batch.combined().page_count()
    );
    println!("  {} {}", "└─".dimmed(), MANIFEST_FILE);
    println!("\n{}", batch.stats());

    Ok(())
}

/// Write every rendered file and the manifest under `dir`.
fn write_outputs(
    dir: &Path,
    batch: &Batch,
    rendered: &RenderedBatch,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let letters_dir = dir.join(LETTERS_DIR);
    fs::create_dir_all(&letters_dir)?;

    for file in &rendered.letters {
        fs::write(letters_dir.join(&file.name), &file.bytes)?;
    }
    fs::write(dir.join(&rendered.combined.name), &rendered.combined.bytes)?;

    let manifest = render::to_json(&batch.manifest(), format)?;
    fs::write(dir.join(MANIFEST_FILE), manifest)?;
    Ok(())
}

fn cmd_scan(input: &Path, json: bool, args: &SplitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.to_options()?;
    let backend = LopdfBackend::open(input)?;
    let readings = LetterSplitter::new(options).read_footers(&backend)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&readings)?);
        return Ok(());
    }

    println!("{}", "Page Footers (pages counted from 0)".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (index, reading) in readings.iter().enumerate() {
        let line = footer_line(index, reading);
        match reading {
            FooterReading::Found { .. } => println!("{}", line),
            FooterReading::NotFound => println!("{}", line.dimmed()),
        }
    }

    println!();
    println!("{}", "Letters".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    match segment(&readings) {
        Ok(segments) => {
            for (i, seg) in segments.iter().enumerate() {
                println!("{}", letter_line(i + 1, seg));
            }
        }
        Err(e) => {
            println!("{}: {}", "Cannot split".red().bold(), e);
        }
    }

    Ok(())
}

/// One footer listing line. Page indices match those in boundary errors.
fn footer_line(index: usize, reading: &FooterReading) -> String {
    match reading {
        FooterReading::Found { .. } => format!("page {:>4}: {}", index, reading),
        FooterReading::NotFound => format!("page {:>4}: no footer", index),
    }
}

/// One detected letter, by 1-based ordinal and 0-based page range.
fn letter_line(ordinal: usize, seg: &LetterSegment) -> String {
    let pages = seg.len();
    let note = if pages % 2 == 1 { " (needs padding)" } else { "" };
    format!(
        "letter {:>3}: pages {}-{}, {} pages{}",
        ordinal, seg.start, seg.end, pages, note
    )
}

fn cmd_version() {
    println!("{} {}", "letterpad".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Letter PDF splitting and duplex padding tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use letterpad::{AssembledLetter, BoundaryError, OutputDocument, PageSize, RenderedFile};
    use tempfile::TempDir;

    fn batch() -> Batch {
        let mut letter = AssembledLetter::new(1, LetterSegment::new(0, 0));
        letter.file_stem = "3_The_Ito_Family".to_string();
        letter.document.append_page(0, Some(PageSize::LETTER));
        letter.document.append_blank_page(PageSize::LETTER);

        let mut combined = OutputDocument::new();
        combined.append_document(&letter.document);

        Batch {
            letters: vec![letter],
            combined,
            combined_name: "even_page_letters".to_string(),
            warnings: Vec::new(),
            source_page_count: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_write_outputs_layout() {
        let dir = TempDir::new().unwrap();
        let batch = batch();
        let rendered = RenderedBatch {
            letters: vec![RenderedFile {
                name: "3_The_Ito_Family.pdf".to_string(),
                bytes: b"%PDF-1.5 letter".to_vec(),
            }],
            combined: RenderedFile {
                name: "even_page_letters.pdf".to_string(),
                bytes: b"%PDF-1.5 combined".to_vec(),
            },
        };

        write_outputs(dir.path(), &batch, &rendered, JsonFormat::Compact).unwrap();

        let letter = dir.path().join(LETTERS_DIR).join("3_The_Ito_Family.pdf");
        assert_eq!(fs::read(letter).unwrap(), b"%PDF-1.5 letter");
        assert!(dir.path().join("even_page_letters.pdf").exists());

        let manifest = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(value["letters"][0]["file_name"], "3_The_Ito_Family.pdf");
        assert_eq!(value["combined_page_count"], 2);
    }

    #[test]
    fn test_split_args_build_options() {
        let args = SplitArgs {
            lenient: true,
            sequential: true,
            envelope_pattern: Some(r"Env (\d+)".to_string()),
            name_pattern: None,
            combined_name: Some("run".to_string()),
        };
        let options = args.to_options().unwrap();
        assert_eq!(options.error_mode, letterpad::ErrorMode::Lenient);
        assert!(!options.parallel);
        assert_eq!(options.patterns.envelope_pattern(), r"Env (\d+)");
        assert_eq!(options.combined_name, "run");
    }

    #[test]
    fn test_split_args_reject_pattern_without_group() {
        let args = SplitArgs {
            name_pattern: Some(r"Family: \w+".to_string()),
            ..SplitArgs::default()
        };
        assert!(args.to_options().is_err());
    }

    #[test]
    fn test_split_args_reject_unusable_combined_name() {
        let args = SplitArgs {
            combined_name: Some("../".to_string()),
            ..SplitArgs::default()
        };
        assert!(matches!(
            args.to_options(),
            Err(letterpad::Error::InvalidName(_))
        ));

        let args = SplitArgs {
            combined_name: Some("../run".to_string()),
            ..SplitArgs::default()
        };
        assert_eq!(args.to_options().unwrap().combined_stem().unwrap(), "run");
    }

    #[test]
    fn test_scan_lines_use_error_page_numbers() {
        let readings = [
            FooterReading::Found { current: 1, total: 2 },
            FooterReading::Found { current: 1, total: 2 },
        ];
        let err = segment(&readings).unwrap_err();
        assert!(matches!(err, BoundaryError::SequenceBreak { page: 1, .. }));
        assert!(err.to_string().starts_with("page 1:"));
        assert_eq!(footer_line(1, &readings[1]), "page    1: 1 of 2");
        assert_eq!(footer_line(0, &FooterReading::NotFound), "page    0: no footer");
    }

    #[test]
    fn test_letter_line() {
        let seg = LetterSegment::new(3, 5);
        assert_eq!(letter_line(2, &seg), "letter   2: pages 3-5, 3 pages (needs padding)");
        let seg = LetterSegment::new(0, 1);
        assert_eq!(letter_line(1, &seg), "letter   1: pages 0-1, 2 pages");
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("/tmp/march.pdf")),
            PathBuf::from("march_letters")
        );
    }
}
