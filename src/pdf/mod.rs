mod canvas;

use std::collections::HashSet;

use pdf_writer::{Filter, Name, Pdf, Rect, Ref};

use crate::error::Error;
use crate::fonts::{FontSource, register_font};
use crate::layout::{LayoutConfig, PaginationSummary, paginate};
use crate::text;

use canvas::PdfCanvas;

const CARD_FONT: &str = "F1";

pub(crate) struct RenderedCards {
    pub(crate) bytes: Vec<u8>,
    pub(crate) summary: PaginationSummary,
}

pub(crate) fn render(
    topics: &[String],
    config: &LayoutConfig,
    font: &FontSource,
) -> Result<RenderedCards, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: embed the font, subsetted to what the cards actually show
    let used_chars: HashSet<char> = topics
        .iter()
        .flat_map(|t| text::normalize(t).chars().collect::<Vec<_>>())
        .filter(|ch| !ch.is_control())
        .collect();
    let font_entry = register_font(&mut pdf, font, CARD_FONT.to_string(), &mut alloc, &used_chars)?;
    let t_fonts = t0.elapsed();

    // Phase 2: lay the cards out
    let mut canvas = PdfCanvas::new(&font_entry, config.geometry.height);
    let summary = paginate(topics, config, &mut canvas)?;
    let all_contents = canvas.into_pages();
    let t_layout = t0.elapsed();

    // Phase 3: allocate page and content IDs now that page count is known
    let n = all_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let g = &config.geometry;
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, g.width, g.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        page.resources()
            .fonts()
            .pair(Name(font_entry.pdf_name.as_bytes()), font_entry.font_ref);
    }

    let t_assembly = t0.elapsed();
    log::info!(
        "Render phases: font_embed={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        n,
    );

    Ok(RenderedCards {
        bytes: pdf.finish(),
        summary,
    })
}
