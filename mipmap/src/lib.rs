use anyhow::Result;
use std::path::Path;
use xcommon::{Scaler, ScalerOpts, ScalerOptsBuilder};

/// Launcher icon size of each density bucket.
pub const DENSITIES: [(&str, u32); 5] = [
    ("mipmap-mdpi", 48),
    ("mipmap-hdpi", 72),
    ("mipmap-xhdpi", 96),
    ("mipmap-xxhdpi", 144),
    ("mipmap-xxxhdpi", 192),
];

pub const IC_LAUNCHER: &str = "ic_launcher.png";
pub const IC_LAUNCHER_FOREGROUND: &str = "ic_launcher_foreground.png";

/// Adaptive icons are drawn on a 108dp canvas relative to a 48dp launcher icon.
pub fn adaptive_size(size: u32) -> u32 {
    size * 108 / 48
}

/// Only the inner 72dp of an adaptive icon are guaranteed to be visible.
pub fn safe_zone_size(size: u32) -> u32 {
    size * 72 / 48
}

pub fn foreground_opts(size: u32) -> ScalerOpts {
    ScalerOptsBuilder::new(safe_zone_size(size))
        .padding(adaptive_size(size))
        .build()
}

/// Writes `ic_launcher.png` and `ic_launcher_foreground.png` into the
/// `mipmap-*` directory of every density bucket below `res`.
pub fn generate(scaler: &Scaler, res: &Path) -> Result<()> {
    for (bucket, size) in DENSITIES {
        let dir = res.join(bucket);
        tracing::debug!("creating {}", dir.display());
        std::fs::create_dir_all(&dir)?;
        scaler.save(dir.join(IC_LAUNCHER), ScalerOpts::new(size))?;
        scaler.save(dir.join(IC_LAUNCHER_FOREGROUND), foreground_opts(size))?;
    }
    Ok(())
}
