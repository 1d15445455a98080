/// Image loading and template matching
///
/// Thin layer over `image` and `imageproc::template_matching`: the score surface
/// comes from imageproc (or the correlation coefficient in `ccoeff`), this
/// module only validates inputs and picks the extreme that matters for the
/// chosen method.
use super::ccoeff::match_template_ccoeff_normed;
use super::types::{MatchMethod, MatchResult};
use crate::error::{ProbeError, ProbeResult};
use image::{DynamicImage, GrayImage};
use imageproc::template_matching::{find_extremes, match_template_parallel};
use std::path::Path;
use std::time::Instant;

/// Decode an image file
pub fn load_image(path: &Path) -> ProbeResult<DynamicImage> {
    let img = image::open(path).map_err(|source| ProbeError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

/// Decode scene and template concurrently on the blocking pool
///
/// Both loads are joined before returning; the first decode error wins.
pub async fn load_scene_and_template(
    scene_path: &Path,
    template_path: &Path,
) -> ProbeResult<(DynamicImage, DynamicImage)> {
    let scene_path = scene_path.to_path_buf();
    let template_path = template_path.to_path_buf();

    let scene_task = tokio::task::spawn_blocking(move || load_image(&scene_path));
    let template_task = tokio::task::spawn_blocking(move || load_image(&template_path));

    let (scene, template) = tokio::try_join!(scene_task, template_task)?;
    Ok((scene?, template?))
}

/// Locate `template` inside `scene`
///
/// Returns the top-left corner of the best-aligned position and its score.
/// For higher-is-better methods this is the surface maximum, otherwise the
/// minimum.
pub fn match_template(
    scene: &GrayImage,
    template: &GrayImage,
    method: MatchMethod,
) -> ProbeResult<MatchResult> {
    if template.width() == 0 || template.height() == 0 {
        return Err(ProbeError::invalid_input("template image is empty"));
    }
    if template.width() > scene.width() || template.height() > scene.height() {
        return Err(ProbeError::invalid_input(format!(
            "template {}x{} is larger than scene {}x{}",
            template.width(),
            template.height(),
            scene.width(),
            scene.height()
        )));
    }

    let start = Instant::now();
    let surface = match method.to_imageproc() {
        Some(imageproc_method) => match_template_parallel(scene, template, imageproc_method),
        None => match_template_ccoeff_normed(scene, template),
    };
    let extremes = find_extremes(&surface);

    let (location, score) = if method.higher_is_better() {
        (extremes.max_value_location, extremes.max_value)
    } else {
        (extremes.min_value_location, extremes.min_value)
    };

    if score.is_nan() {
        log::warn!("{method} produced a NaN score, the scene may contain all-black regions");
    }

    let result = MatchResult {
        location,
        score,
        method,
        template_size: (template.width(), template.height()),
    };
    log::debug!(
        "Matched {}x{} in {}x{} in {}ms: {}",
        template.width(),
        template.height(),
        scene.width(),
        scene.height(),
        start.elapsed().as_millis(),
        result
    );
    Ok(result)
}

/// Grayscale both images and match
pub fn match_images(
    scene: &DynamicImage,
    template: &DynamicImage,
    method: MatchMethod,
) -> ProbeResult<MatchResult> {
    match_template(&scene.to_luma8(), &template.to_luma8(), method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_template_equal_to_scene() {
        let scene = GrayImage::from_fn(8, 8, |x, y| Luma([(x * 30 + y * 7) as u8]));
        for method in [
            MatchMethod::CorrelationCoefficientNormalized,
            MatchMethod::CrossCorrelationNormalized,
        ] {
            let result = match_template(&scene, &scene.clone(), method).unwrap();
            assert_eq!(result.location, (0, 0));
            assert!((result.score - 1.0).abs() < 1e-4, "{result}");
        }
    }

    #[test]
    fn test_glyph_absent_from_blank_screen() {
        let scene = GrayImage::from_pixel(100, 100, Luma([255]));
        let mut template = GrayImage::from_pixel(10, 10, Luma([255]));
        for (x, y) in (3..6).flat_map(|x| (3..6).map(move |y| (x, y))) {
            template.put_pixel(x, y, Luma([0]));
        }

        let result = match_template(&scene, &template, MatchMethod::default()).unwrap();
        assert_eq!(result.score, 0.0);

        // without mean removal the white background alone scores above 0.95
        let ccorr =
            match_template(&scene, &template, MatchMethod::CrossCorrelationNormalized).unwrap();
        assert!(ccorr.score > 0.95);
    }

    #[test]
    fn test_empty_template_rejected() {
        let scene = GrayImage::new(10, 10);
        let template = GrayImage::new(0, 5);
        let err = match_template(&scene, &template, MatchMethod::default()).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidInput { .. }));
    }

    #[test]
    fn test_template_wider_but_not_taller_rejected() {
        let scene = GrayImage::new(10, 40);
        let template = GrayImage::new(11, 5);
        let err = match_template(&scene, &template, MatchMethod::default()).unwrap_err();
        assert!(err.to_string().contains("11x5"));
    }
}
