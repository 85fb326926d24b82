use std::{sync::Arc, time::Duration};

use mathviz::{
    Canvas, CaptureConfig, CatalogLookup, Container, FfmpegCapture, FontBook, Fps, PacingMode,
    Rgba8, Studio, StudioConfig, is_ffmpeg_on_path,
};

fn config(container: Container) -> StudioConfig {
    StudioConfig {
        canvas: Canvas {
            width: 160,
            height: 120,
        },
        fps: Fps::new(30, 1).unwrap(),
        container,
        pacing: PacingMode::Unpaced,
        ..StudioConfig::default()
    }
}

fn has_encoder(name: &str) -> bool {
    std::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(name))
        .unwrap_or(false)
}

async fn record(container: Container) -> Option<mathviz::Artifact> {
    if !is_ffmpeg_on_path().await {
        eprintln!("skipping: ffmpeg not found on PATH");
        return None;
    }
    let encoder = match container {
        Container::Webm => "libvpx-vp9",
        Container::Mp4 => "libx264",
    };
    if !has_encoder(encoder) {
        eprintln!("skipping: ffmpeg lacks {encoder}");
        return None;
    }
    let cfg = config(container);
    let capture = FfmpegCapture::new(cfg.capture_config()).unwrap();
    let lookup = CatalogLookup::builtin().with_latency(Duration::ZERO);
    let mut studio =
        Studio::new(&cfg, Arc::new(lookup), Arc::new(capture), &FontBook::empty()).unwrap();

    studio.create("reflection").await.unwrap();
    Some(studio.run_to_completion().await.unwrap().unwrap())
}

#[tokio::test]
async fn webm_recording_has_ebml_header() {
    let Some(artifact) = record(Container::Webm).await else {
        return;
    };
    assert_eq!(artifact.filename, "reflection-animation.webm");
    assert!(!artifact.is_degenerate());
    assert_eq!(&artifact.data[..4], &[0x1a, 0x45, 0xdf, 0xa3]);
}

#[tokio::test]
async fn mp4_recording_starts_with_ftyp() {
    let Some(artifact) = record(Container::Mp4).await else {
        return;
    };
    assert_eq!(artifact.filename, "reflection-animation.mp4");
    assert_eq!(&artifact.data[4..8], b"ftyp");
}

#[test]
fn odd_canvas_is_rejected_before_spawning() {
    let cfg = CaptureConfig {
        canvas: Canvas {
            width: 161,
            height: 120,
        },
        fps: Fps::default(),
        container: Container::Webm,
        background: Rgba8::WHITE,
    };
    assert!(FfmpegCapture::new(cfg).is_err());
}
