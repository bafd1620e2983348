//! Cross-module behavior checked through the public API.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rasterlab::filters::blur::convolve;
use rasterlab::filters::noise::add_noise;
use rasterlab::filters::rank::median;
use rasterlab::filters::regional::regional_mean;
use rasterlab::filters::threshold::{adaptive_threshold, otsu_threshold, threshold};
use rasterlab::{BorderPolicy, Command, ConvolutionKind, Error, RasterImage, Session, ThresholdKind};

fn constant(width: usize, height: usize, value: &[u8]) -> RasterImage {
    RasterImage::filled(width, height, value).unwrap()
}

fn count_differing(a: &RasterImage, b: &RasterImage) -> usize {
    a.to_vec().iter().zip(b.to_vec().iter()).filter(|(x, y)| x != y).count()
}

// ============================================================================
// Smoothing
// ============================================================================

#[test]
fn test_normalized_kernels_keep_constant_image() {
    let img = constant(13, 9, &[37, 128, 250]);
    for kind in [ConvolutionKind::Triangle, ConvolutionKind::Gaussian, ConvolutionKind::Tent] {
        for border in [BorderPolicy::Replicate, BorderPolicy::Reflect] {
            let kernel = kind.kernel(5, 1.5).unwrap();
            let result = convolve(&img, &kernel, border);
            for (&got, &want) in result.to_vec().iter().zip(img.to_vec().iter()) {
                assert!(got.abs_diff(want) <= 1, "{kind:?} {border:?}: {got} vs {want}");
            }
        }
    }
}

#[test]
fn test_median_keeps_constant_image() {
    let img = constant(10, 6, &[90]);
    for window in [1, 3, 5, 7] {
        assert_eq!(median(&img, window, BorderPolicy::Reflect).unwrap(), img);
    }
}

#[test]
fn test_median_removes_most_noise() {
    let clean = constant(64, 64, &[128]);
    let mut noisy = clean.clone();
    add_noise(&mut noisy, 0.1, &mut ChaCha8Rng::seed_from_u64(2024)).unwrap();

    let before = count_differing(&noisy, &clean);
    let filtered = median(&noisy, 3, BorderPolicy::Reflect).unwrap();
    let after = count_differing(&filtered, &clean);

    assert!(before > 200, "only {before} corrupted pixels");
    assert!(after * 4 < before, "{after} corrupted after median, {before} before");
}

#[test]
fn test_regional_mean_smooths_interior_only() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let noisy = RasterImage::from_fn(20, 16, 1, |_, _, _| {
        let delta: i16 = rng.random_range(-40..=40);
        (128 + delta) as u8
    })
    .unwrap();

    let result = regional_mean(&noisy);

    let mut before = 0u32;
    let mut after = 0u32;
    for y in 0..16 {
        for x in 0..20 {
            let interior = (2..14).contains(&y) && (2..18).contains(&x);
            if interior {
                before += noisy.get(x, y, 0).abs_diff(128) as u32;
                after += result.get(x, y, 0).abs_diff(128) as u32;
            } else {
                assert_eq!(result.get(x, y, 0), noisy.get(x, y, 0));
            }
        }
    }
    assert!(after * 2 < before, "deviation {after} vs {before}");
}

// ============================================================================
// Noise
// ============================================================================

#[test]
fn test_noise_probability_extremes() {
    let original = RasterImage::from_fn(8, 8, 3, |x, y, c| (x * 30 + y + c) as u8).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut untouched = original.clone();
    assert_eq!(add_noise(&mut untouched, 0.0, &mut rng).unwrap(), 0);
    assert_eq!(untouched, original);

    let mut redrawn = original.clone();
    assert_eq!(add_noise(&mut redrawn, 1.0, &mut rng).unwrap(), 64);
}

#[test]
fn test_full_probability_noise_replaces_color_pixels() {
    let original = constant(48, 48, &[10, 200, 90]);
    let mut noisy = original.clone();
    add_noise(&mut noisy, 1.0, &mut ChaCha8Rng::seed_from_u64(404)).unwrap();

    // Each redrawn byte matches its old value with chance 1/256, so a
    // pixel survives whole only with chance 1/256^3; count whole pixels.
    let old = original.to_vec();
    let new = noisy.to_vec();
    let kept = old.chunks(3).zip(new.chunks(3)).filter(|(a, b)| a == b).count();
    assert!(kept <= 1, "{kept} of {} pixels kept all channels", original.pixel_count());
    assert!(count_differing(&noisy, &original) > 48 * 48 * 3 * 9 / 10);
}

#[test]
fn test_noise_same_seed_same_output() {
    let original = constant(32, 32, &[10, 20, 30]);
    let mut a = original.clone();
    let mut b = original.clone();

    add_noise(&mut a, 0.25, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();
    add_noise(&mut b, 0.25, &mut ChaCha8Rng::seed_from_u64(77)).unwrap();

    assert_eq!(a, b);
}

// ============================================================================
// Threshold
// ============================================================================

#[test]
fn test_otsu_deterministic_and_reproduces_binary() {
    let binary = RasterImage::from_fn(16, 12, 1, |x, y, _| if (x + 2 * y) % 5 < 2 { 255 } else { 0 }).unwrap();

    let first = otsu_threshold(&binary);
    let second = otsu_threshold(&binary);

    assert_eq!(first, second);
    assert_eq!(first.image, binary);
}

#[test]
fn test_manual_threshold_bounds() {
    let img = RasterImage::from_fn(16, 16, 1, |x, y, _| (y * 16 + x) as u8).unwrap();

    let all_white = threshold(&img, 0).unwrap();
    assert!(all_white.to_vec().iter().all(|&v| v == 255));

    assert!(matches!(threshold(&img, 256), Err(Error::Config(_))));
}

#[test]
fn test_manual_threshold_idempotent() {
    let img = RasterImage::from_fn(9, 9, 3, |x, y, c| (x * 25 + y * 3 + c * 7) as u8).unwrap();
    let once = threshold(&img, 120).unwrap();
    assert_eq!(threshold(&once, 120).unwrap(), once);
}

#[test]
fn test_adaptive_constant_image_is_white() {
    let img = constant(15, 15, &[73]);
    for border in [BorderPolicy::Replicate, BorderPolicy::Reflect, BorderPolicy::Zero] {
        let result = adaptive_threshold(&img, 5, 0.0, border).unwrap();
        assert!(result.to_vec().iter().all(|&v| v == 255), "{border:?}");
    }
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_session_pipeline() {
    let mut session = Session::new(ChaCha8Rng::seed_from_u64(8));
    assert!(matches!(
        session.execute(Command::ApplyRegionalSmoothing),
        Err(Error::NoImage)
    ));

    session.set_image(constant(24, 24, &[200, 40, 90]));
    session.execute(Command::AddNoise { probability: Some(0.05) }).unwrap();
    session.execute(Command::ApplyMedian { window_size: Some(3) }).unwrap();
    session.execute(Command::ApplyConvolution(ConvolutionKind::Tent)).unwrap();
    session.execute(Command::ApplyThreshold(ThresholdKind::Otsu)).unwrap();

    let image = session.image().unwrap();
    assert_eq!(image.channels(), 1);
    assert!(image.to_vec().iter().all(|&v| v == 0 || v == 255));
}
