//! reviewdoc CLI - export review content to DOCX, XLSX and PPTX

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use reviewdoc::fetch::{ImageFetcher, NoImages, ProxyImageFetcher};
use reviewdoc::model::{Chapter, ExportableEntity};
use reviewdoc::parser::UnknownInlineMode;
use reviewdoc::render::{docx, pptx, xlsx};
use reviewdoc::{
    load_entity, load_entity_str, save_to_dir, DocxOptions, ExportResult, SlideOptions,
    TabularOptions,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "reviewdoc")]
#[command(version)]
#[command(about = "Export review chapters, papers and datasets to DOCX, XLSX and PPTX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export chapters (with an optional title page) to DOCX
    Docx {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        layout: DocxArgs,

        #[command(flatten)]
        images: ImageArgs,
    },

    /// Export an authored paper to DOCX
    Paper {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        layout: DocxArgs,

        #[command(flatten)]
        images: ImageArgs,
    },

    /// Export a synopsis (chapters, review analysis, literature, references) to DOCX
    Synopsis {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        layout: DocxArgs,

        #[command(flatten)]
        images: ImageArgs,
    },

    /// Export a dataset to XLSX
    Xlsx {
        #[command(flatten)]
        io: IoArgs,

        /// Sheet name (defaults to the dataset name)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Export chapters to PPTX
    Pptx {
        #[command(flatten)]
        io: IoArgs,

        /// Subtitle on the title slide
        #[arg(long)]
        subtitle: Option<String>,

        #[command(flatten)]
        images: ImageArgs,
    },

    /// Show what an entity file contains
    Info {
        /// Entity JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct IoArgs {
    /// Entity JSON file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (defaults to the sanitized title in the current directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Document title (defaults to the entity title or the file name)
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args)]
struct DocxArgs {
    /// Use the journal-safe paper formatting
    #[arg(long)]
    paper_format: bool,

    /// Header text (defaults to the document title)
    #[arg(long)]
    header: Option<String>,

    /// Footer text shown above the page number
    #[arg(long)]
    footer: Option<String>,

    /// Leave page numbers out of the footer
    #[arg(long)]
    no_page_numbers: bool,

    /// Keep the text of unknown inline tags instead of dropping it
    #[arg(long)]
    flatten_inline: bool,
}

#[derive(Args)]
struct ImageArgs {
    /// Image proxy base URL; images are skipped without one
    #[arg(long, env = "REVIEWDOC_PROXY_URL")]
    proxy: Option<String>,

    /// Bearer token for the image proxy
    #[arg(long, env = "REVIEWDOC_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl DocxArgs {
    fn options(&self, title: &str, paper: bool) -> DocxOptions {
        let mut options = if paper || self.paper_format {
            DocxOptions::paper()
        } else {
            DocxOptions::new()
        };
        options = options.with_title(title).with_page_numbers(!self.no_page_numbers);
        if let Some(ref header) = self.header {
            options = options.with_header(header);
        }
        if let Some(ref footer) = self.footer {
            options = options.with_footer(footer);
        }
        if self.flatten_inline {
            options = options.with_inline_mode(UnknownInlineMode::Flatten);
        }
        options
    }
}

impl ImageArgs {
    fn fetcher(&self) -> Box<dyn ImageFetcher> {
        match self.proxy {
            Some(ref url) => {
                let mut fetcher = ProxyImageFetcher::new(url);
                if let Some(ref token) = self.token {
                    fetcher = fetcher.with_token(token);
                }
                log::debug!("fetching images through {}", fetcher.endpoint());
                Box::new(fetcher)
            }
            None => Box::new(NoImages),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Docx { io, layout, images } => cmd_docx(&io, &layout, &images),
        Commands::Paper { io, layout, images } => cmd_paper(&io, &layout, &images),
        Commands::Synopsis { io, layout, images } => cmd_synopsis(&io, &layout, &images),
        Commands::Xlsx { io, sheet } => cmd_xlsx(&io, sheet),
        Commands::Pptx {
            io,
            subtitle,
            images,
        } => cmd_pptx(&io, subtitle, &images),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress() -> ProgressBar {
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Chapters and a title from a chapters file.
///
/// Accepts a bare array of chapters, a single chapter entity or a synopsis
/// entity (its chapters are used).
fn read_chapters(path: &Path) -> CliResult<(String, Vec<Chapter>)> {
    let json = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if value.is_array() {
        let chapters: Vec<Chapter> = serde_json::from_value(value)?;
        return Ok((stem, chapters));
    }
    match load_entity_str(&json)? {
        ExportableEntity::Chapter(chapter) => Ok((chapter.title.clone(), vec![chapter])),
        ExportableEntity::Synopsis(synopsis) => Ok((synopsis.title, synopsis.chapters)),
        ExportableEntity::Paper(paper) => Ok((
            paper.title,
            paper
                .sections
                .into_iter()
                .map(|s| Chapter::new(s.title, s.body_html))
                .collect(),
        )),
        ExportableEntity::Dataset(_) => Err("a dataset has no chapters; use `xlsx`".into()),
    }
}

fn cmd_docx(io: &IoArgs, layout: &DocxArgs, images: &ImageArgs) -> CliResult<()> {
    let pb = progress();
    pb.set_message("Reading chapters...");
    let (title, chapters) = read_chapters(&io.input)?;
    let title = io.title.clone().unwrap_or(title);
    pb.inc(1);

    pb.set_message(format!("Exporting {} chapters...", chapters.len()));
    let options = layout.options(&title, false);
    let fetcher = images.fetcher();
    let result = runtime()?.block_on(docx::export_chapters(
        &title,
        &chapters,
        &options,
        fetcher.as_ref(),
    ))?;
    pb.inc(1);

    finish(pb, &result, io.output.as_deref())
}

fn cmd_paper(io: &IoArgs, layout: &DocxArgs, images: &ImageArgs) -> CliResult<()> {
    let pb = progress();
    pb.set_message("Reading paper...");
    let mut paper = match load_entity(&io.input)? {
        ExportableEntity::Paper(paper) => paper,
        other => return Err(format!("expected a paper, found {:?}", other.title()).into()),
    };
    if let Some(ref title) = io.title {
        paper.title = title.clone();
    }
    pb.inc(1);

    pb.set_message(format!("Exporting {} sections...", paper.sections.len()));
    let options = layout.options(&paper.title, true);
    let fetcher = images.fetcher();
    let result = runtime()?.block_on(docx::export_paper(&paper, &options, fetcher.as_ref()))?;
    pb.inc(1);

    finish(pb, &result, io.output.as_deref())
}

fn cmd_synopsis(io: &IoArgs, layout: &DocxArgs, images: &ImageArgs) -> CliResult<()> {
    let pb = progress();
    pb.set_message("Reading synopsis...");
    let mut synopsis = match load_entity(&io.input)? {
        ExportableEntity::Synopsis(synopsis) => synopsis,
        other => return Err(format!("expected a synopsis, found {:?}", other.title()).into()),
    };
    if let Some(ref title) = io.title {
        synopsis.title = title.clone();
    }
    pb.inc(1);

    pb.set_message("Exporting synopsis...");
    let options = layout.options(&synopsis.title, false);
    let fetcher = images.fetcher();
    let result =
        runtime()?.block_on(docx::export_synopsis(&synopsis, &options, fetcher.as_ref()))?;
    pb.inc(1);

    finish(pb, &result, io.output.as_deref())
}

fn cmd_xlsx(io: &IoArgs, sheet: Option<String>) -> CliResult<()> {
    let pb = progress();
    pb.set_message("Reading dataset...");
    let mut dataset = match load_entity(&io.input)? {
        ExportableEntity::Dataset(dataset) => dataset,
        other => return Err(format!("expected a dataset, found {:?}", other.title()).into()),
    };
    if let Some(ref title) = io.title {
        dataset.name = title.clone();
    }
    pb.inc(1);

    pb.set_message(format!("Exporting {} rows...", dataset.rows.len()));
    let mut options = TabularOptions::new();
    if let Some(sheet) = sheet {
        options = options.with_sheet_name(sheet);
    }
    let result = xlsx::export_tabular(&dataset, &options)?;
    pb.inc(1);

    finish(pb, &result, io.output.as_deref())
}

fn cmd_pptx(io: &IoArgs, subtitle: Option<String>, images: &ImageArgs) -> CliResult<()> {
    let pb = progress();
    pb.set_message("Reading chapters...");
    let (title, chapters) = read_chapters(&io.input)?;
    let title = io.title.clone().unwrap_or(title);
    pb.inc(1);

    pb.set_message(format!("Exporting {} slides...", chapters.len() + 1));
    let mut options = SlideOptions::new();
    if let Some(subtitle) = subtitle {
        options = options.with_subtitle(subtitle);
    }
    let fetcher = images.fetcher();
    let result = runtime()?.block_on(pptx::export_slides(
        &title,
        &chapters,
        &options,
        fetcher.as_ref(),
    ))?;
    pb.inc(1);

    finish(pb, &result, io.output.as_deref())
}

fn finish(pb: ProgressBar, result: &ExportResult, output: Option<&Path>) -> CliResult<()> {
    pb.set_message("Writing file...");
    let path = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &result.bytes)?;
            path.to_path_buf()
        }
        None => save_to_dir(result, ".")?,
    };
    pb.inc(1);
    pb.finish_with_message("Done!");

    println!("{} {}", "Saved to".green(), path.display());
    print_stats(result);
    Ok(())
}

fn print_stats(result: &ExportResult) {
    let stats = &result.stats;
    println!("{}: {} bytes", "Size".bold(), result.len());
    if stats.slide_count > 0 {
        println!("{}: {}", "Slides".bold(), stats.slide_count);
    }
    if stats.row_count > 0 {
        println!("{}: {}", "Rows".bold(), stats.row_count);
    }
    if stats.heading_count + stats.paragraph_count > 0 {
        println!("{}: {}", "Headings".bold(), stats.heading_count);
        println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
        println!("{}: {}", "List items".bold(), stats.list_item_count);
        println!("{}: {}", "Tables".bold(), stats.table_count);
    }
    println!("{}: {}", "Images".bold(), stats.image_count);
    if stats.skipped_image_count > 0 {
        println!(
            "{} {} images skipped",
            "Warning:".yellow().bold(),
            stats.skipped_image_count
        );
    }
}

fn cmd_info(input: &Path) -> CliResult<()> {
    let json = fs::read_to_string(input)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    println!("{}", "Entity Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());

    if value.is_array() {
        let chapters: Vec<Chapter> = serde_json::from_value(value)?;
        println!("{}: chapters", "Kind".bold());
        print_chapters(&chapters);
        return Ok(());
    }

    let entity = load_entity_str(&json)?;
    println!("{}: {}", "Title".bold(), entity.title());
    match entity {
        ExportableEntity::Chapter(chapter) => {
            println!("{}: chapter", "Kind".bold());
            print_chapters(std::slice::from_ref(&chapter));
        }
        ExportableEntity::Paper(paper) => {
            println!("{}: paper", "Kind".bold());
            println!("{}: {}", "Authors".bold(), paper.authors.join(", "));
            println!("{}: {}", "Sections".bold(), paper.sections.len());
        }
        ExportableEntity::Synopsis(synopsis) => {
            println!("{}: synopsis", "Kind".bold());
            print_chapters(&synopsis.chapters);
            println!(
                "{}: {}",
                "Analysis sections".bold(),
                synopsis.review_analysis.len()
            );
            println!("{}: {}", "Literature".bold(), synopsis.literature.len());
            println!("{}: {}", "Citations".bold(), synopsis.citations.len());
        }
        ExportableEntity::Dataset(dataset) => {
            println!("{}: dataset", "Kind".bold());
            println!("{}: {}", "Columns".bold(), dataset.columns.len());
            println!("{}: {}", "Rows".bold(), dataset.rows.len());
        }
    }

    Ok(())
}

fn print_chapters(chapters: &[Chapter]) {
    let title_page = chapters.iter().any(Chapter::is_title_page);
    println!("{}: {}", "Chapters".bold(), chapters.len());
    println!("{}: {}", "Title page".bold(), yes_no(title_page));
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn cmd_version() {
    println!("{} {}", "reviewdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Review content export tool (DOCX, XLSX, PPTX)");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, json: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_read_chapters_array_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "review.json",
            r#"[{"title":"TITLE PAGE","body_html":"<h1>R</h1>"},{"title":"One"}]"#,
        );
        let (title, chapters) = read_chapters(&path).unwrap();
        assert_eq!(title, "review");
        assert_eq!(chapters.len(), 2);
        assert!(chapters[0].is_title_page());
    }

    #[test]
    fn test_read_chapters_from_entities() {
        let dir = tempfile::tempdir().unwrap();
        let synopsis = write(
            &dir,
            "s.json",
            r#"{"kind":"synopsis","title":"Syn","chapters":[{"title":"A","body_html":"<p>a</p>"}]}"#,
        );
        let (title, chapters) = read_chapters(&synopsis).unwrap();
        assert_eq!(title, "Syn");
        assert_eq!(chapters[0].title, "A");

        let dataset = write(
            &dir,
            "d.json",
            r#"{"kind":"dataset","name":"D","columns":[],"rows":[]}"#,
        );
        assert!(read_chapters(&dataset).is_err());
    }
}
