//! Quality tier table and the capture/bitrate policy derived from it.
//!
//! All lookups are pure. Constraints are always *ideal* hints: the capture
//! device may deliver a different geometry or frame rate.

use serde::Serialize;

use crate::models::media_models::VideoConstraints;
use crate::traits::capture_provider::CaptureProvider;

/// Id of the tier used when an unknown id is requested.
pub const DEFAULT_TIER_ID: &str = "720p";

/// Bitrate used in turbo mode, whatever the tier (800 kbps).
pub const TURBO_BITRATE: u32 = 800_000;

/// Geometry scale factor applied to turbo-mode tracks.
pub const TURBO_SCALE: f64 = 0.5;

/// Frame rate cap applied to turbo-mode tracks.
pub const TURBO_MAX_FRAME_RATE: f64 = 15.0;

/// A named combination of capture geometry, frame rate and bitrate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityTier {
    pub id: &'static str,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    /// Target video bitrate in bits per second.
    pub bitrate: u32,
}

static TIERS: [QualityTier; 4] = [
    QualityTier {
        id: "480p",
        label: "480p (854x480) 35fps",
        width: 854,
        height: 480,
        frame_rate: 35.0,
        bitrate: 1_000_000,
    },
    QualityTier {
        id: "720p",
        label: "720p (1280x720) 30fps",
        width: 1280,
        height: 720,
        frame_rate: 30.0,
        bitrate: 2_500_000,
    },
    QualityTier {
        id: "1080p",
        label: "1080p (1920x1080) 30fps",
        width: 1920,
        height: 1080,
        frame_rate: 30.0,
        bitrate: 5_000_000,
    },
    QualityTier {
        id: "1080p60",
        label: "1080p (1920x1080) 60fps",
        width: 1920,
        height: 1080,
        frame_rate: 60.0,
        bitrate: 8_000_000,
    },
];

/// All tiers, lowest first.
pub fn available_tiers() -> &'static [QualityTier] {
    &TIERS
}

/// The fallback tier.
pub fn default_tier() -> &'static QualityTier {
    &TIERS[1]
}

/// Look up a tier by id. Unknown ids resolve to the default tier.
pub fn resolve(tier_id: &str) -> &'static QualityTier {
    TIERS
        .iter()
        .find(|t| t.id == tier_id)
        .unwrap_or_else(default_tier)
}

/// Encoder bitrate for `tier`. Turbo mode ignores the tier entirely.
pub fn bitrate_for(tier: &QualityTier, turbo: bool) -> u32 {
    if turbo {
        TURBO_BITRATE
    } else {
        tier.bitrate
    }
}

/// Ideal capture constraints for `tier`.
pub fn constraints_for(tier: &QualityTier) -> VideoConstraints {
    VideoConstraints {
        ideal_width: tier.width,
        ideal_height: tier.height,
        ideal_frame_rate: tier.frame_rate,
    }
}

/// Reduced constraints applied to live video tracks in turbo mode.
pub fn turbo_constraints(tier: &QualityTier) -> VideoConstraints {
    VideoConstraints {
        ideal_width: scale_dimension(tier.width),
        ideal_height: scale_dimension(tier.height),
        ideal_frame_rate: tier.frame_rate.min(TURBO_MAX_FRAME_RATE),
    }
}

// Keep dimensions even; most video encoders reject odd geometry.
fn scale_dimension(value: u32) -> u32 {
    let scaled = (value as f64 * TURBO_SCALE).round() as u32;
    (scaled & !1).max(2)
}

/// Probe the provider from the highest tier down and return the first tier
/// it accepts. Each probe stream is released immediately.
pub fn detect_max_supported<P: CaptureProvider + ?Sized>(provider: &mut P) -> &'static QualityTier {
    for tier in TIERS.iter().rev() {
        match provider.acquire_display(&constraints_for(tier), false) {
            Ok(mut stream) => {
                stream.stop_all();
                log::info!("Maximum supported tier: {}", tier.label);
                return tier;
            }
            Err(e) => {
                log::debug!("Tier {} not supported: {}", tier.label, e);
            }
        }
    }
    log::warn!("No tier accepted by capture provider, using default");
    default_tier()
}
