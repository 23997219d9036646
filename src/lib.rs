mod error;
pub mod extract;
mod fonts;
pub mod layout;
mod pdf;
pub mod text;

pub use error::Error;
pub use extract::{MarkerListExtractor, TopicSource, extract_topics_from_file, read_topics};
pub use layout::{LayoutConfig, PageGeometry, PagePolicy, PaginationSummary};

use std::path::{Path, PathBuf};
use std::time::Instant;

pub const DEFAULT_OUTPUT: &str = "odai_cards.pdf";
pub const DEFAULT_FONT: &str = "ipaexg.ttf";

#[derive(Clone, Debug)]
pub struct CardOptions {
    pub layout: LayoutConfig,
    pub output: PathBuf,
    pub font: PathBuf,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            font: PathBuf::from(DEFAULT_FONT),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    pub topics: usize,
    pub groups: u32,
    pub total_cards: usize,
    pub pages: usize,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Lay `topics` out as cards and write the PDF to `options.output`.
pub fn generate_cards(topics: &[String], options: &CardOptions) -> Result<GenerationReport, Error> {
    let t0 = Instant::now();
    if topics.is_empty() {
        return Err(Error::NoTopics);
    }
    let layout = &options.layout;
    layout.validate()?;

    let font = fonts::load_font(&options.font)?;
    let t_font = t0.elapsed();

    log::info!("Topics: {}", topics.len());
    log::info!("Groups: {}", layout.groups);
    log::info!("Total cards: {}", layout.total_cards(topics.len()));
    log::info!("Layout: {}x{} ({:?})", layout.columns, layout.rows, layout.policy);

    let rendered = pdf::render(topics, layout, &font)?;
    let t_render = t0.elapsed();

    std::fs::write(&options.output, &rendered.bytes).map_err(|source| Error::Write {
        path: options.output.clone(),
        source,
    })?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: font={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_font.as_secs_f64() * 1000.0,
        (t_render - t_font).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        rendered.bytes.len(),
    );

    Ok(GenerationReport {
        topics: topics.len(),
        groups: layout.groups,
        total_cards: rendered.summary.cards,
        pages: rendered.summary.pages,
        output: options.output.clone(),
        bytes: rendered.bytes.len(),
    })
}

/// Read topics from `source` and generate cards from them. Unlike the soft
/// [`extract_topics_from_file`], every extraction problem is returned.
pub fn generate_cards_from_file(
    source: &Path,
    extractor: &impl TopicSource,
    options: &CardOptions,
) -> Result<GenerationReport, Error> {
    if !source.exists() {
        return Err(Error::InputNotFound(source.to_path_buf()));
    }
    options.layout.validate()?;
    let topics = read_topics(source, extractor)?;
    generate_cards(&topics, options)
}
