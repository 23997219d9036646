use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use odai_cards::layout::{DEFAULT_COLUMNS, DEFAULT_GROUPS, DEFAULT_ROWS};
use odai_cards::{
    CardOptions, DEFAULT_FONT, DEFAULT_OUTPUT, Error, GenerationReport, LayoutConfig,
    MarkerListExtractor, PagePolicy, extract::DEFAULT_MARKER, extract_topics_from_file,
    generate_cards,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Packing {
    /// Each topic starts on a new page
    Fresh,
    /// Repeat the whole list and fill every page
    Packed,
}

impl From<Packing> for PagePolicy {
    fn from(p: Packing) -> Self {
        match p {
            Packing::Fresh => PagePolicy::FreshPagePerTopic,
            Packing::Packed => PagePolicy::Packed,
        }
    }
}

/// Generate printable topic cards (A4 PDF) from a markdown planning file
#[derive(Parser, Debug)]
#[command(name = "odai-cards")]
#[command(version, about, long_about = None)]
struct Args {
    /// Markdown file containing the `ODAI_LIST = [ ... ]` block
    markdown_file: PathBuf,

    /// Number of cards printed for each topic
    #[arg(short, long, default_value_t = i64::from(DEFAULT_GROUPS), allow_negative_numbers = true)]
    groups: i64,

    /// Cards per row
    #[arg(short, long, default_value_t = i64::from(DEFAULT_COLUMNS), allow_negative_numbers = true)]
    cols: i64,

    /// Rows per page
    #[arg(short, long, default_value_t = i64::from(DEFAULT_ROWS), allow_negative_numbers = true)]
    rows: i64,

    /// Output PDF path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TrueType/OpenType font (bare names are also looked up in ODAI_FONTS and system font dirs)
    #[arg(short, long, default_value = DEFAULT_FONT)]
    font: PathBuf,

    /// Name of the list assignment to read topics from
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Whether topics may share pages
    #[arg(long, value_enum, default_value_t = Packing::Fresh)]
    packing: Packing,
}

fn run(args: &Args) -> Result<GenerationReport, Error> {
    if !args.markdown_file.exists() {
        return Err(Error::InputNotFound(args.markdown_file.clone()));
    }
    let layout =
        LayoutConfig::from_raw(args.groups, args.cols, args.rows)?.with_policy(args.packing.into());

    let topics = extract_topics_from_file(&args.markdown_file, &MarkerListExtractor::new(&args.marker));
    if topics.is_empty() {
        return Err(Error::NoTopics);
    }

    let options = CardOptions {
        layout,
        output: args.output.clone(),
        font: args.font.clone(),
    };
    generate_cards(&topics, &options)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            println!("{}", "-".repeat(40));
            println!("Done: wrote '{}'", report.output.display());
            println!("Total pages: {}", report.pages);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
