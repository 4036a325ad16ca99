//! Integration tests for PPTX export.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use reviewdoc::fetch::{ImageFetcher, NoImages};
use reviewdoc::model::Chapter;
use reviewdoc::render::pptx::export_slides;
use reviewdoc::{ExportResult, SlideOptions};

/// Returns the same PNG for every URL except those containing "broken".
struct OnePng;

#[async_trait]
impl ImageFetcher for OnePng {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if url.contains("broken") {
            return None;
        }
        let mut data = Vec::new();
        image::RgbaImage::new(64, 32)
            .write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
            .ok()?;
        Some(data)
    }
}

fn media(result: &ExportResult, name: &str) -> Option<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(result.bytes.as_slice())).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    Some(data)
}

fn part(result: &ExportResult, name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(result.bytes.as_slice())).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    Some(xml)
}

#[tokio::test]
async fn test_title_slide_and_chapter_slides() {
    let chapters = vec![
        Chapter::new("Background", "<p>First line</p><p>Second<br>line</p>"),
        Chapter::new("", "   "),
        Chapter::new("Findings", "<ul><li>one</li><li>two</li></ul>"),
    ];
    let options = SlideOptions::new().with_subtitle("Literature review");
    let result = export_slides("Deck", &chapters, &options, &NoImages)
        .await
        .unwrap();

    assert_eq!(result.stats.slide_count, 3);
    assert_eq!(result.filename, "Deck.pptx");

    let cover = part(&result, "ppt/slides/slide1.xml").unwrap();
    assert!(cover.contains("<a:t>Deck</a:t>"));
    assert!(cover.contains("<a:t>Literature review</a:t>"));
    assert!(cover.contains(r#"<a:pPr algn="ctr"/>"#));

    let background = part(&result, "ppt/slides/slide2.xml").unwrap();
    assert!(background.contains("<a:t>Background</a:t>"));
    assert!(background.contains("<a:t>First line</a:t>"));
    assert!(background.contains("<a:t>Second</a:t>"));
    assert!(background.contains("<a:t>line</a:t>"));

    assert!(part(&result, "ppt/slides/slide3.xml").unwrap().contains("<a:t>Findings</a:t>"));
    assert!(part(&result, "ppt/slides/slide4.xml").is_none());

    let presentation = part(&result, "ppt/presentation.xml").unwrap();
    assert_eq!(presentation.matches("<p:sldId ").count(), 3);
    assert!(presentation.contains(r#"cx="12192000" cy="6858000""#));
}

#[tokio::test]
async fn test_images_stacked_on_the_right() {
    let chapters = vec![Chapter::new(
        "Figures",
        r#"<p>Caption</p><img src="https://cdn.example/a.png"><img src="https://cdn.example/broken.png"><img src="https://cdn.example/b.png">"#,
    )];
    let result = export_slides("Deck", &chapters, &SlideOptions::default(), &OnePng)
        .await
        .unwrap();

    assert_eq!(result.stats.image_count, 2);
    assert_eq!(result.stats.skipped_image_count, 1);

    let slide = part(&result, "ppt/slides/slide2.xml").unwrap();
    assert_eq!(slide.matches("<p:pic>").count(), 2);
    // x 8.9 in, first at 1.4 in, second one step of 1.6 in lower
    assert!(slide.contains(r#"<a:off x="8138160" y="1280160"/>"#));
    assert!(slide.contains(r#"<a:off x="8138160" y="2743200"/>"#));
    assert!(!slide.contains("img"));

    let rels = part(&result, "ppt/slides/_rels/slide2.xml.rels").unwrap();
    assert!(rels.contains("../media/image1.png"));
    assert!(rels.contains("../media/image2.png"));
    let image = media(&result, "ppt/media/image2.png").unwrap();
    assert!(image.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_empty_deck_has_title_slide() {
    let result = export_slides("", &[], &SlideOptions::default(), &NoImages)
        .await
        .unwrap();

    assert_eq!(result.stats.slide_count, 1);
    assert_eq!(result.filename, "export.pptx");
    assert!(part(&result, "ppt/slideMasters/slideMaster1.xml").is_some());
    assert!(part(&result, "ppt/slideLayouts/slideLayout1.xml").is_some());
    assert!(part(&result, "ppt/theme/theme1.xml").is_some());
    assert!(part(&result, "[Content_Types].xml")
        .unwrap()
        .contains("presentationml.slide+xml"));
}
