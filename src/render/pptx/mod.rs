//! PPTX (PresentationML) export: a title slide plus one slide per chapter.
//!
//! Slide text and slide images come from two independent passes over the
//! chapter HTML. The text pass drops `img` elements entirely; the image pass
//! collects every `img` source and stacks the resolved images in a column on
//! the right at a fixed vertical step. Images that do not fit the slide
//! height are still placed.

mod parts;

pub use parts::{SLIDE_HEIGHT, SLIDE_WIDTH};

use crate::error::Result;
use crate::export::{output_file_name, ExportFormat};
use crate::fetch::{resolve_image, ImageFetcher, MemoizedFetcher};
use crate::model::{Chapter, ImageAsset};
use crate::render::options::{emu, EMU_PER_INCH};
use crate::render::package::{Package, Relationships, REL_IMAGE};
use crate::render::plain::{html_to_slide_text, image_sources};
use crate::render::{ExportResult, ExportStats, SlideOptions};

use parts::{
    presentation_xml, slide_layout_xml, slide_master_xml, theme_xml, Frame, SlideXml,
    CT_LAYOUT, CT_MASTER, CT_PRESENTATION, CT_SLIDE, CT_THEME, REL_LAYOUT, REL_MASTER,
    REL_SLIDE, REL_THEME,
};

const MARGIN: f64 = 0.5;
const CONTENT_WIDTH: f64 = SLIDE_WIDTH as f64 / EMU_PER_INCH as f64 - 2.0 * MARGIN;
const TITLE_SIZE: u32 = 3200;
const COVER_TITLE_SIZE: u32 = 4000;
const SUBTITLE_SIZE: u32 = 2000;
const BODY_SIZE: u32 = 1600;

struct Slide {
    xml: String,
    rels: Relationships,
}

/// Export chapters as a slide deck.
pub async fn export_slides<F: ImageFetcher + ?Sized>(
    title: &str,
    chapters: &[Chapter],
    options: &SlideOptions,
    fetcher: &F,
) -> Result<ExportResult> {
    let fetcher = MemoizedFetcher::new(fetcher);
    let mut stats = ExportStats::new();
    let mut slides = Vec::new();
    let mut media: Vec<(String, ImageAsset)> = Vec::new();

    let deck_title = options.title.as_deref().unwrap_or(title).trim();
    slides.push(title_slide(deck_title, options.subtitle.as_deref()));
    stats.add_slide();

    for chapter in chapters {
        let text = html_to_slide_text(&chapter.body_html);
        let sources = image_sources(&chapter.body_html);
        if chapter.title.trim().is_empty() && text.is_empty() && sources.is_empty() {
            continue;
        }

        let mut images = Vec::new();
        for src in &sources {
            match resolve_image(&fetcher, src).await {
                Some(asset) => images.push(asset),
                None => stats.skip_image(),
            }
        }

        let mut rels = Relationships::new();
        rels.add(REL_LAYOUT, "../slideLayouts/slideLayout1.xml");
        let mut slide = SlideXml::new();

        slide.text_box(
            Frame {
                x: emu(MARGIN),
                y: emu(0.3),
                cx: emu(CONTENT_WIDTH),
                cy: emu(0.9),
            },
            &[chapter.title.trim()],
            TITLE_SIZE,
            true,
            false,
        );

        let body_width = if images.is_empty() {
            CONTENT_WIDTH
        } else {
            options.image_x - MARGIN - 0.2
        };
        let lines: Vec<&str> = text.lines().collect();
        slide.text_box(
            Frame {
                x: emu(MARGIN),
                y: emu(1.4),
                cx: emu(body_width),
                cy: emu(5.6),
            },
            &lines,
            BODY_SIZE,
            false,
            false,
        );

        for (i, asset) in images.into_iter().enumerate() {
            let name = asset.media_name(media.len() + 1);
            let rel_id = rels.add(REL_IMAGE, format!("../media/{}", name));
            slide.picture(
                Frame {
                    x: emu(options.image_x),
                    y: emu(options.image_y + i as f64 * options.image_step),
                    cx: emu(options.image_width),
                    cy: emu(options.image_height),
                },
                &rel_id,
                &name,
            );
            media.push((name, asset));
            stats.add_image();
        }

        slides.push(Slide {
            xml: slide.to_xml(),
            rels,
        });
        stats.add_slide();
    }

    let bytes = write_package(deck_title, &slides, &media)?;
    log::debug!(
        "pptx assembled: {} slides, {} images ({} skipped)",
        stats.slide_count,
        stats.image_count,
        stats.skipped_image_count
    );

    let format = ExportFormat::Pptx;
    Ok(ExportResult::new(
        bytes,
        format.mime_type(),
        output_file_name(title, format),
        stats,
    ))
}

fn title_slide(title: &str, subtitle: Option<&str>) -> Slide {
    let mut rels = Relationships::new();
    rels.add(REL_LAYOUT, "../slideLayouts/slideLayout1.xml");
    let mut slide = SlideXml::new();
    let width = emu(CONTENT_WIDTH);

    slide.text_box(
        Frame {
            x: emu(MARGIN),
            y: emu(2.4),
            cx: width,
            cy: emu(1.5),
        },
        &[title],
        COVER_TITLE_SIZE,
        true,
        true,
    );
    if let Some(subtitle) = subtitle.map(str::trim).filter(|s| !s.is_empty()) {
        slide.text_box(
            Frame {
                x: emu(MARGIN),
                y: emu(4.0),
                cx: width,
                cy: emu(0.8),
            },
            &[subtitle],
            SUBTITLE_SIZE,
            false,
            true,
        );
    }
    Slide {
        xml: slide.to_xml(),
        rels,
    }
}

fn write_package(title: &str, slides: &[Slide], media: &[(String, ImageAsset)]) -> Result<Vec<u8>> {
    let mut package = Package::new();

    let mut pres_rels = Relationships::new();
    let master_rel = pres_rels.add(REL_MASTER, "slideMasters/slideMaster1.xml");
    let slide_rels: Vec<String> = (1..=slides.len())
        .map(|i| pres_rels.add(REL_SLIDE, format!("slides/slide{}.xml", i)))
        .collect();
    pres_rels.add(REL_THEME, "theme/theme1.xml");

    package.add_part(
        "ppt/presentation.xml",
        CT_PRESENTATION,
        &presentation_xml(&slide_rels, &master_rel),
    )?;
    package.add_file("ppt/_rels/presentation.xml.rels", pres_rels.to_xml().as_bytes())?;

    package.add_part("ppt/slideMasters/slideMaster1.xml", CT_MASTER, &slide_master_xml())?;
    let mut master_rels = Relationships::new();
    master_rels.add(REL_LAYOUT, "../slideLayouts/slideLayout1.xml");
    master_rels.add(REL_THEME, "../theme/theme1.xml");
    package.add_file(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        master_rels.to_xml().as_bytes(),
    )?;

    package.add_part("ppt/slideLayouts/slideLayout1.xml", CT_LAYOUT, &slide_layout_xml())?;
    let mut layout_rels = Relationships::new();
    layout_rels.add(REL_MASTER, "../slideMasters/slideMaster1.xml");
    package.add_file(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        layout_rels.to_xml().as_bytes(),
    )?;

    package.add_part("ppt/theme/theme1.xml", CT_THEME, &theme_xml())?;

    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        package.add_part(&format!("ppt/slides/slide{}.xml", n), CT_SLIDE, &slide.xml)?;
        package.add_file(
            &format!("ppt/slides/_rels/slide{}.xml.rels", n),
            slide.rels.to_xml().as_bytes(),
        )?;
    }
    for (name, asset) in media {
        package.add_default(asset.format.extension(), asset.format.mime_type());
        package.add_file(&format!("ppt/media/{}", name), &asset.data)?;
    }

    package.add_core_properties(title)?;
    package.add_root_rels("ppt/presentation.xml")?;
    package.finish()
}
