//! DOCX (WordprocessingML) assembly.
//!
//! Chapters titled "TITLE PAGE" go into a first section with its own margins
//! and no header or footer. Every other chapter goes into the body section,
//! which carries the header, the footer with page numbers and a page number
//! restart. Consecutive body chapters are separated by page breaks.
//!
//! # Example
//!
//! ```rust
//! use reviewdoc::fetch::NoImages;
//! use reviewdoc::model::Chapter;
//! use reviewdoc::render::{docx, DocxOptions};
//!
//! # tokio_test_block_on(async {
//! let chapters = vec![Chapter::new("Intro", "<p>Hello <strong>World</strong></p>")];
//! let result = docx::export_chapters("Review", &chapters, &DocxOptions::new(), &NoImages)
//!     .await
//!     .unwrap();
//! assert_eq!(result.filename, "Review.docx");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod parts;
mod writer;

use crate::error::Result;
use crate::export::{output_file_name, ExportFormat};
use crate::fetch::{ImageFetcher, MemoizedFetcher};
use crate::model::{
    Alignment, AuthoredPaper, Block, Chapter, Heading, Paragraph, SynopsisDataset, TextRun,
};
use crate::parser::{BlockConverter, ListScopes, ParseOptions};
use crate::render::{DocxOptions, ExportResult};

use writer::DocxWriter;

const REVIEW_ANALYSIS: &str = "REVIEW ANALYSIS";
const REVIEW_OF_LITERATURE: &str = "REVIEW OF LITERATURE";
const REFERENCES: &str = "REFERENCES";

/// Export chapters, with an optional title page, as one document.
pub async fn export_chapters<F: ImageFetcher + ?Sized>(
    title: &str,
    chapters: &[Chapter],
    options: &DocxOptions,
    fetcher: &F,
) -> Result<ExportResult> {
    let fetcher = MemoizedFetcher::new(fetcher);
    let converter = BlockConverter::new(lenient(options));
    let mut writer = DocxWriter::new(options, title);

    write_chapters(&mut writer, chapters, &converter, &fetcher).await;
    finish(writer, title)
}

/// Export an authored paper.
///
/// The title and author line open the document and every section follows
/// under a level-2 heading without page breaks. Tags without a dedicated
/// conversion are dropped.
pub async fn export_paper<F: ImageFetcher + ?Sized>(
    paper: &AuthoredPaper,
    options: &DocxOptions,
    fetcher: &F,
) -> Result<ExportResult> {
    let fetcher = MemoizedFetcher::new(fetcher);
    let converter = BlockConverter::new(
        ParseOptions::new()
            .skip_unknown_tags()
            .with_unknown_inline(options.inline_mode),
    );
    let mut writer = DocxWriter::new(options, &paper.title);

    if !paper.title.trim().is_empty() {
        writer.heading(&Heading::centered(paper.title.trim(), 1));
    }
    let authors: Vec<&str> = paper
        .authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if !authors.is_empty() {
        writer.paragraph(
            &Paragraph::from_runs(vec![TextRun::italic(authors.join(", "))])
                .align(Alignment::Center)
                .without_indent(),
        );
    }

    for section in &paper.sections {
        let blocks = converter.convert_html(&section.body_html);
        if blocks.is_empty() && section.title.trim().is_empty() {
            continue;
        }
        if !section.title.trim().is_empty() {
            writer.heading(&Heading::new(section.title.trim(), 2));
        }
        writer.push_blocks(&blocks, &fetcher).await;
    }
    finish(writer, &paper.title)
}

/// Export a synopsis: chapters followed by the review analysis, the review
/// of literature and the references, each region only when it has content.
pub async fn export_synopsis<F: ImageFetcher + ?Sized>(
    synopsis: &SynopsisDataset,
    options: &DocxOptions,
    fetcher: &F,
) -> Result<ExportResult> {
    let fetcher = MemoizedFetcher::new(fetcher);
    let converter = BlockConverter::new(lenient(options));
    let mut writer = DocxWriter::new(options, &synopsis.title);

    write_chapters(&mut writer, &synopsis.chapters, &converter, &fetcher).await;

    if synopsis.has_review_analysis() {
        start_region(&mut writer, REVIEW_ANALYSIS);
        let mut scopes = ListScopes::new();
        for section in &synopsis.review_analysis {
            if section.body_html.trim().is_empty() {
                continue;
            }
            let scope = section.title.trim();
            if !scope.is_empty() {
                writer.heading(&Heading::new(scope, 2));
            }
            let blocks = converter.convert_list(&section.body_html, scope, &mut scopes);
            writer.push_blocks(&blocks, &fetcher).await;
        }
        log::debug!("review analysis: {} numbering scopes", scopes.len());
    }

    if synopsis.has_literature() {
        start_region(&mut writer, REVIEW_OF_LITERATURE);
        for item in &synopsis.literature {
            if item.body_html.trim().is_empty() {
                continue;
            }
            if let Some(title) = item.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                writer.paragraph(
                    &Paragraph::from_runs(vec![TextRun::bold(title)])
                        .align(Alignment::Justify)
                        .without_indent(),
                );
            }
            let blocks: Vec<Block> = converter
                .convert_html(&item.body_html)
                .into_iter()
                .map(flush_justified)
                .collect();
            writer.push_blocks(&blocks, &fetcher).await;
        }
    }

    if synopsis.has_citations() {
        start_region(&mut writer, REFERENCES);
        for (number, citation) in synopsis.numbered_citations() {
            writer.paragraph(
                &Paragraph::with_text(format!("[{}] {}", number, citation.text.trim()))
                    .align(Alignment::Justify)
                    .without_indent(),
            );
        }
    }

    finish(writer, &synopsis.title)
}

fn lenient(options: &DocxOptions) -> ParseOptions {
    ParseOptions::new().with_unknown_inline(options.inline_mode)
}

async fn write_chapters<F: ImageFetcher + ?Sized>(
    writer: &mut DocxWriter<'_>,
    chapters: &[Chapter],
    converter: &BlockConverter,
    fetcher: &F,
) {
    let (title_pages, body): (Vec<&Chapter>, Vec<&Chapter>) =
        chapters.iter().partition(|c| c.is_title_page());

    if !title_pages.is_empty() {
        for chapter in &title_pages {
            let blocks = converter.convert_html(&chapter.body_html);
            writer.push_blocks(&blocks, fetcher).await;
        }
        writer.end_title_section();
    }

    for (i, chapter) in body.iter().enumerate() {
        if i > 0 {
            writer.page_break();
        }
        if !chapter.title.trim().is_empty() {
            writer.heading(&Heading::centered(chapter.title.trim(), 1));
        }
        let blocks = converter.convert_html(&chapter.body_html);
        writer.push_blocks(&blocks, fetcher).await;
    }
    log::debug!(
        "wrote {} chapters ({} title page)",
        body.len(),
        title_pages.len()
    );
}

fn start_region(writer: &mut DocxWriter<'_>, heading: &str) {
    if writer.section_has_content() {
        writer.page_break();
    }
    writer.heading(&Heading::centered(heading, 1));
}

fn flush_justified(block: Block) -> Block {
    match block {
        Block::Paragraph(p) => Block::Paragraph(p.align(Alignment::Justify).without_indent()),
        other => other,
    }
}

fn finish(writer: DocxWriter<'_>, title: &str) -> Result<ExportResult> {
    let (bytes, stats) = writer.finish()?;
    let format = ExportFormat::Docx;
    Ok(ExportResult::new(
        bytes,
        format.mime_type(),
        output_file_name(title, format),
        stats,
    ))
}
