//! Bounding-box rendering for human inspection of a match

use super::types::MatchResult;
use crate::error::{ProbeError, ProbeResult};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::io::BufRead;
use std::path::Path;

pub const MATCH_BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const MATCH_BOX_THICKNESS: u32 = 2;

/// Draw a hollow rectangle on a copy of `image`
///
/// The border grows inward from `origin`/`size`; parts outside the image are
/// clipped. The input image is left untouched.
pub fn draw_rectangle(
    image: &RgbImage,
    origin: (i32, i32),
    size: (u32, u32),
    color: Rgb<u8>,
    thickness: u32,
) -> RgbImage {
    let mut canvas = image.clone();
    let (x, y) = origin;
    let (width, height) = size;

    for inset in 0..thickness {
        let w = width.saturating_sub(2 * inset);
        let h = height.saturating_sub(2 * inset);
        if w == 0 || h == 0 {
            break;
        }
        let rect = Rect::at(x + inset as i32, y + inset as i32).of_size(w, h);
        draw_hollow_rect_mut(&mut canvas, rect, color);
    }
    canvas
}

/// Scene with the default box drawn around `result`
pub fn annotate(scene: &DynamicImage, result: &MatchResult) -> RgbImage {
    draw_rectangle(
        &scene.to_rgb8(),
        (result.location.0 as i32, result.location.1 as i32),
        result.template_size,
        MATCH_BOX_COLOR,
        MATCH_BOX_THICKNESS,
    )
}

pub fn save_annotated(image: &RgbImage, path: &Path) -> ProbeResult<()> {
    image.save(path).map_err(|e| match e {
        image::ImageError::IoError(source) => ProbeError::io(path, source),
        other => ProbeError::io(path, std::io::Error::other(other)),
    })?;
    log::info!("Annotated match written to {}", path.display());
    Ok(())
}

/// Point the user at the annotated image and block until Enter is pressed
///
/// Debugging aid only; never called on the automated path.
pub async fn display(path: &Path) -> ProbeResult<()> {
    println!("🖼️  Annotated screenshot: {}", path.display());
    println!("   Press Enter to continue...");
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)
    })
    .await?
    .map_err(|e| ProbeError::io("<stdin>", e))?;
    Ok(())
}
