mod common;

use common::fixtures::*;
use common::pdf_assertions::{count_images_on_page, extract_font_names};
use common::{TestResult, only_saved_pdf};
use docket::{
    BitmapHost, CaptureError, ExportError, LayoutError, MemorySink, RegionExportOptions, RegionRef,
    export_region_to_file,
};
use image::RgbaImage;

fn unsupported(tag: &str) -> CaptureError {
    CaptureError::UnsupportedColorFunction {
        function: "oklch".to_string(),
        message: tag.to_string(),
    }
}

#[tokio::test]
async fn test_tall_region_is_sliced_onto_three_pages() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut host = BitmapHost::new();
    host.insert("report", gradient(100, 3000));
    let mut options = RegionExportOptions::default();
    // One printable page height equals 1000 source pixels.
    options.px_to_mm = options.geometry().printable_height() / 1000.0;
    let sink = MemorySink::new();

    let report = RegionRef::from("report");
    let saved = export_region_to_file(&mut host, &report, None, &options, &sink).await?;
    assert_eq!(saved, "document.pdf");

    let (_, pdf) = only_saved_pdf(&sink).await?;
    assert_pdf_page_count!(pdf, 3);
    for page in 1..=3 {
        assert_eq!(count_images_on_page(&pdf.doc, page), 1);
    }
    assert_eq!(host.attached_clones(), 0);
    Ok(())
}

#[tokio::test]
async fn test_exports_on_one_host_await_their_saves_together() -> TestResult {
    let mut host = BitmapHost::new();
    host.insert("summary", gradient(200, 150));
    host.insert("details", gradient(200, 400));
    let options = RegionExportOptions::default();
    let sink = MemorySink::new();

    let (first, second) = (RegionRef::from("summary"), RegionRef::from("details"));
    let summary = export_region_to_file(&mut host, &first, Some("summary.pdf"), &options, &sink);
    let details = export_region_to_file(&mut host, &second, Some("details.pdf"), &options, &sink);
    let (summary, details) = tokio::join!(summary, details);

    assert_eq!(summary?, "summary.pdf");
    assert_eq!(details?, "details.pdf");
    assert_eq!(sink.files().await.len(), 2);
    assert_eq!(host.attached_clones(), 0);
    Ok(())
}

#[tokio::test]
async fn test_short_region_fits_on_one_page() -> TestResult {
    let mut host = BitmapHost::new();
    host.insert("chart", gradient(400, 300));
    let sink = MemorySink::new();

    export_region_to_file(
        &mut host,
        &RegionRef::from("chart"),
        Some("chart.pdf"),
        &RegionExportOptions::default(),
        &sink,
    )
    .await?;

    let (name, pdf) = only_saved_pdf(&sink).await?;
    assert_eq!(name, "chart.pdf");
    assert_pdf_page_count!(pdf, 1);
    assert_eq!(count_images_on_page(&pdf.doc, 1), 1);
    assert!(extract_font_names(&pdf.doc).contains("Helvetica"));
    Ok(())
}

#[tokio::test]
async fn test_missing_region_is_reported() -> TestResult {
    let mut host = BitmapHost::new();
    let sink = MemorySink::new();

    let err = export_region_to_file(
        &mut host,
        &RegionRef::from("nowhere"),
        None,
        &RegionExportOptions::default(),
        &sink,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ExportError::ElementNotFound(ref id) if id == "#nowhere"));
    assert!(sink.files().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_color_failure_is_recovered_once() -> TestResult {
    let mut host = ScriptedHost::new("card", gradient(50, 50), vec![unsupported("first")]);
    let sink = MemorySink::new();

    let options = RegionExportOptions::default();
    export_region_to_file(&mut host, &RegionRef::from("card"), None, &options, &sink).await?;

    assert_eq!(host.rasterize_calls, 2);
    assert_eq!(host.inner.attached_clones(), 0);
    assert_eq!(sink.files().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_retry_reports_first_error_and_saves_nothing() -> TestResult {
    let mut host = ScriptedHost::new(
        "card",
        gradient(50, 50),
        vec![unsupported("first"), unsupported("second")],
    );
    let sink = MemorySink::new();

    let options = RegionExportOptions::default();
    let err = export_region_to_file(&mut host, &RegionRef::from("card"), None, &options, &sink)
        .await
        .unwrap_err();

    match err {
        ExportError::Capture(capture) => assert_eq!(capture, unsupported("first")),
        other => panic!("expected a capture error, got {:?}", other),
    }
    assert_eq!(host.rasterize_calls, 2);
    assert_eq!(host.inner.attached_clones(), 0);
    assert!(sink.files().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_other_capture_errors_are_not_retried() -> TestResult {
    let mut host = ScriptedHost::new(
        "card",
        gradient(50, 50),
        vec![CaptureError::Rasterize("canvas exceeds maximum size".to_string())],
    );
    let sink = MemorySink::new();

    let options = RegionExportOptions::default();
    let err = export_region_to_file(&mut host, &RegionRef::from("card"), None, &options, &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Capture(CaptureError::Rasterize(_))));
    assert_eq!(host.rasterize_calls, 1);
    assert_eq!(host.inner.attached_clones(), 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_capture_fails_without_saving() -> TestResult {
    let mut host = BitmapHost::new();
    host.insert("blank", RgbaImage::new(10, 0));
    let sink = MemorySink::new();

    let options = RegionExportOptions::default();
    let err = export_region_to_file(&mut host, &RegionRef::from("blank"), None, &options, &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Layout(LayoutError::EmptyBitmap)));
    assert!(sink.files().await.is_empty());
    Ok(())
}
