use std::path::PathBuf;

use anyhow::{Context, bail};
use image::RgbaImage;

use snapnote::capture::ScreenCapturer;
use snapnote::capture::region::RegionSelector;
use snapnote::config::SnapNoteConfig;
use snapnote::domain::Point;
use snapnote::export;
use snapnote::session::EditorSession;

/// Serves an image file in place of a screen grab
struct FileCapturer(Option<RgbaImage>);

impl ScreenCapturer for FileCapturer {
    fn capture_screen(&mut self) -> Option<RgbaImage> {
        self.0.take()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: snapnote <image> [output]");
    };
    let output = args.next().map(PathBuf::from);

    let config = SnapNoteConfig::load();
    let screen = image::open(&input)
        .with_context(|| format!("opening {}", input.display()))?
        .to_rgba8();
    let (width, height) = (screen.width() as f32, screen.height() as f32);

    let mut selector = RegionSelector::capture(&mut FileCapturer(Some(screen)), width, height)?;
    selector.press(Point::new(0.0, 0.0));
    selector.drag_to(Point::new(width, height));
    let handoff = selector.release()?;

    let mut session = EditorSession::from_handoff(handoff, config.tool_defaults());
    let path = match output {
        Some(path) => path,
        None => export::default_save_path(config.save_location, &chrono::Local::now())
            .context("no directory to save into")?,
    };
    session.save_to(&path)?;
    println!("{}", path.display());
    Ok(())
}
