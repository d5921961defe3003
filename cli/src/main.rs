//! pdfstruct CLI - document structure reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfstruct::{
    build_document_with_options, load_primitives, render, BuildOptions, ClassifierConfig, Document,
    JsonFormat, NormalizeOptions, PageSelection, RenderOptions, StructureStats,
};

#[derive(Parser)]
#[command(name = "pdfstruct")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild section trees from recorded PDF extractor output", long_about = None)]
struct Cli {
    /// Input primitive dump (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write JSON, Markdown and text outputs into a directory
    Convert {
        /// Input primitive dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        build: BuildArgs,
    },

    /// Build the section tree and print it as JSON
    Json {
        /// Input primitive dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        build: BuildArgs,
    },

    /// Build the section tree and render it as Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input primitive dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Emit a marker comment before every page
        #[arg(long)]
        page_markers: bool,

        /// Shift every heading down by this many levels
        #[arg(long, default_value = "0")]
        heading_offset: u8,

        #[command(flatten)]
        build: BuildArgs,
    },

    /// Render the text in reading order
    Text {
        /// Input primitive dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show document information and structure statistics
    Info {
        /// Input primitive dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Options shared by the commands that build a tree.
#[derive(Args, Clone)]
struct BuildArgs {
    /// Abort on the first malformed page instead of marking it failed
    #[arg(long)]
    strict: bool,

    /// Build pages one at a time
    #[arg(long)]
    sequential: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Relative tolerance for grouping font sizes
    #[arg(long, default_value = "0.05")]
    tolerance: f32,

    /// Longest run (in characters) that may still be a heading
    #[arg(long, default_value = "80")]
    max_heading_chars: usize,

    /// Only bold or all-caps runs may become headings
    #[arg(long)]
    require_emphasis: bool,

    /// Append numeric-only runs to the preceding paragraph
    #[arg(long)]
    merge_numbers: bool,

    /// Drop short all-caps runs such as running headers
    #[arg(long)]
    skip_running_headers: bool,
}

impl BuildArgs {
    fn page_selection(&self) -> pdfstruct::Result<PageSelection> {
        match self.pages.as_deref() {
            Some(p) => PageSelection::parse(p),
            None => Ok(PageSelection::All),
        }
    }

    fn to_options(&self) -> pdfstruct::Result<BuildOptions> {
        let mut options = BuildOptions::new()
            .with_parallel(!self.sequential)
            .with_pages(self.page_selection()?)
            .with_numeric_merge(self.merge_numbers)
            .with_normalize(
                NormalizeOptions::new().with_running_header_skip(self.skip_running_headers),
            )
            .with_classifier(
                ClassifierConfig::new()
                    .with_tolerance(self.tolerance)
                    .with_max_heading_chars(self.max_heading_chars)
                    .with_required_emphasis(self.require_emphasis),
            );
        if self.strict {
            options = options.strict();
        }
        Ok(options)
    }
}

impl Default for BuildArgs {
    fn default() -> Self {
        let classifier = ClassifierConfig::default();
        Self {
            strict: false,
            sequential: false,
            pages: None,
            tolerance: classifier.cluster_tolerance,
            max_heading_chars: classifier.max_heading_chars,
            require_emphasis: classifier.require_emphasis,
            merge_numbers: false,
            skip_running_headers: false,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            build,
        }) => cmd_convert(&input, output.as_deref(), &build),
        Some(Commands::Json {
            input,
            output,
            compact,
            build,
        }) => cmd_json(&input, output.as_deref(), compact, &build),
        Some(Commands::Markdown {
            input,
            output,
            page_markers,
            heading_offset,
            build,
        }) => cmd_markdown(&input, output.as_deref(), page_markers, heading_offset, &build),
        Some(Commands::Text {
            input,
            output,
            pages,
        }) => cmd_text(&input, output.as_deref(), pages),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &BuildArgs::default())
            } else {
                println!("{}", "Usage: pdfstruct <FILE> [OUTPUT]".yellow());
                println!("       pdfstruct --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build(input: &Path, args: &BuildArgs) -> Result<Document, Box<dyn std::error::Error>> {
    let set = load_primitives(input)?;
    log::debug!("Loaded {} pages from {}", set.pages.len(), input.display());
    let doc = build_document_with_options(&set.source, &set.pages, args.to_options()?)?;

    if doc.metadata.degraded {
        eprintln!(
            "{} no heading levels could be inferred; every run is body text",
            "Warning:".yellow().bold()
        );
    }
    for page in doc.failed_pages() {
        eprintln!(
            "{} page {} skipped: {}",
            "Warning:".yellow().bold(),
            page.page_number,
            page.failure_reason().unwrap_or_default()
        );
    }

    Ok(doc)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    args: &BuildArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Building section tree...");
    let doc = build(input, args)?;
    pb.inc(1);

    let render_options = RenderOptions::new().with_pages(args.page_selection()?);

    pb.set_message("Generating JSON...");
    let json = render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("structure.json"), &json)?;
    pb.inc(1);

    pb.set_message("Generating Markdown...");
    let markdown = render::to_markdown(&doc, &render_options)?;
    fs::write(output_dir.join("structure.md"), &markdown)?;
    pb.inc(1);

    pb.set_message("Generating text...");
    let text = render::to_text(&doc, &render_options)?;
    fs::write(output_dir.join("structure.txt"), &text)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} structure.json", "├─".dimmed());
    println!("  {} structure.md", "├─".dimmed());
    println!("  {} structure.txt", "└─".dimmed());

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &BuildArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = build(input, args)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    page_markers: bool,
    heading_offset: u8,
    args: &BuildArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = build(input, args)?;

    let render_options = RenderOptions::new()
        .with_page_markers(page_markers)
        .with_heading_offset(heading_offset)
        .with_pages(args.page_selection()?);

    let markdown = render::to_markdown(&doc, &render_options)?;
    write_output(output, &markdown)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let args = BuildArgs {
        pages,
        ..BuildArgs::default()
    };
    let doc = build(input, &args)?;

    let text = render::to_text(&doc, &RenderOptions::new())?;
    write_output(output, &text)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = build(input, &BuildArgs::default())?;
    let stats = StructureStats::collect(&doc);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Source".bold(), doc.metadata.source);
    println!("{}: {}", "Pages".bold(), doc.metadata.page_count);
    println!(
        "{}: {}",
        "Failed pages".bold(),
        if doc.metadata.failed_pages.is_empty() {
            "None".to_string()
        } else {
            doc.metadata
                .failed_pages
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    );
    println!(
        "{}: {}",
        "Headings inferred".bold(),
        if doc.metadata.degraded { "No" } else { "Yes" }
    );

    println!();
    println!("{}", "Structure Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Titles".bold(), stats.title_count);
    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Sub-sections".bold(), stats.subsection_count);
    println!("{}: {}", "Body groups".bold(), stats.body_group_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Charts".bold(), stats.chart_count);
    println!("{}: {}", "Words".bold(), stats.word_count);

    log::debug!("{}", serde_json::to_string(&stats)?);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document structure reconstruction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdfstruct".dimmed());
    println!("License: MIT");
}
