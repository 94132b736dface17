use anyhow::Result;
use std::path::Path;
use xcommon::{Scaler, ScalerOpts, ScalerOptsBuilder};

pub const ICONS: [(&str, u32); 15] = [
    ("Icon-App-20x20@1x.png", 20),
    ("Icon-App-20x20@2x.png", 40),
    ("Icon-App-20x20@3x.png", 60),
    ("Icon-App-29x29@1x.png", 29),
    ("Icon-App-29x29@2x.png", 58),
    ("Icon-App-29x29@3x.png", 87),
    ("Icon-App-40x40@1x.png", 40),
    ("Icon-App-40x40@2x.png", 80),
    ("Icon-App-40x40@3x.png", 120),
    ("Icon-App-60x60@2x.png", 120),
    ("Icon-App-60x60@3x.png", 180),
    ("Icon-App-76x76@1x.png", 76),
    ("Icon-App-76x76@2x.png", 152),
    ("Icon-App-83.5x83.5@2x.png", 167),
    ("Icon-App-1024x1024@1x.png", 1024),
];

/// The app store icon must not contain an alpha channel.
pub const MARKETING_SIZE: u32 = 1024;

pub fn icon_opts(size: u32) -> ScalerOpts {
    if size == MARKETING_SIZE {
        ScalerOptsBuilder::new(size).background([0, 0, 0]).build()
    } else {
        ScalerOpts::new(size)
    }
}

pub fn generate(scaler: &Scaler, appiconset: &Path) -> Result<()> {
    tracing::debug!("creating {}", appiconset.display());
    std::fs::create_dir_all(appiconset)?;
    for (filename, size) in ICONS {
        scaler.save(appiconset.join(filename), icon_opts(size))?;
    }
    Ok(())
}
