use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

/// Resampling filter used for every resize.
pub const FILTER: FilterType = FilterType::Lanczos3;

/// Returns true if the `image` crate was built with png decoding and encoding.
pub fn png_supported() -> bool {
    ImageFormat::Png.reading_enabled() && ImageFormat::Png.writing_enabled()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScalerOpts {
    size: u32,
    canvas: Option<u32>,
    background: Option<Rgb<u8>>,
}

impl ScalerOpts {
    pub fn new(size: u32) -> Self {
        ScalerOptsBuilder::new(size).build()
    }

    /// Size of the resized icon.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Size of the rendered image, which is the canvas size when padded.
    pub fn dimensions(&self) -> u32 {
        self.canvas.unwrap_or(self.size)
    }

    /// Offset of the icon from each edge of the canvas.
    pub fn offset(&self) -> u32 {
        self.dimensions().saturating_sub(self.size) / 2
    }
}

pub struct ScalerOptsBuilder {
    opts: ScalerOpts,
}

impl ScalerOptsBuilder {
    pub fn new(size: u32) -> Self {
        Self {
            opts: ScalerOpts {
                size,
                canvas: None,
                background: None,
            },
        }
    }

    /// Centers the icon on a transparent canvas of `canvas` x `canvas` px.
    pub fn padding(mut self, canvas: u32) -> Self {
        self.opts.canvas = Some(canvas);
        self
    }

    /// Flattens the icon onto an opaque background, dropping the alpha channel.
    pub fn background(mut self, color: [u8; 3]) -> Self {
        self.opts.background = Some(Rgb(color));
        self
    }

    pub fn build(self) -> ScalerOpts {
        self.opts
    }
}

pub struct Scaler {
    img: RgbaImage,
}

impl Scaler {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .with_context(|| format!("failed to open `{}`", path.display()))?
            .with_guessed_format()?
            .decode()
            .with_context(|| format!("failed to decode `{}`", path.display()))?;
        Ok(Self::new(img))
    }

    pub fn new(img: DynamicImage) -> Self {
        let img = img.to_rgba8();
        tracing::debug!("source image {}x{}", img.width(), img.height());
        Self { img }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn resize(&self, size: u32) -> RgbaImage {
        image::imageops::resize(&self.img, size, size, FILTER)
    }

    pub fn render(&self, opts: ScalerOpts) -> Result<DynamicImage> {
        anyhow::ensure!(opts.size > 0, "expected icon size > 0");
        anyhow::ensure!(
            opts.dimensions() >= opts.size,
            "canvas of {} px can't hold an icon of {} px",
            opts.dimensions(),
            opts.size
        );
        let icon = self.resize(opts.size);
        let icon = if opts.canvas.is_some() {
            let size = opts.dimensions();
            let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
            paste(&mut canvas, &icon, opts.offset());
            canvas
        } else {
            icon
        };
        Ok(match opts.background {
            Some(color) => DynamicImage::ImageRgb8(flatten(&icon, color)),
            None => DynamicImage::ImageRgba8(icon),
        })
    }

    pub fn write<W: Write + Seek>(&self, w: &mut W, opts: ScalerOpts) -> Result<()> {
        self.render(opts)?.write_to(w, ImageFormat::Png)?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, opts: ScalerOpts) -> Result<()> {
        let path = path.as_ref();
        let mut file = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?,
        );
        self.write(&mut file, opts)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        file.flush()?;
        tracing::info!("wrote {}", path.display());
        Ok(())
    }
}

/// Interpolates between `bg` and `fg` by the mask value `a`.
fn blend(fg: u8, bg: u8, a: u8) -> u8 {
    let a = a as u32;
    ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

/// Pastes `icon` at (`offset`, `offset`) using its alpha as mask.
///
/// All four channels are blended by the mask, including alpha, so a
/// half transparent pixel pasted onto a transparent canvas ends up with
/// premultiplied color and squared alpha.
fn paste(canvas: &mut RgbaImage, icon: &RgbaImage, offset: u32) {
    for (x, y, src) in icon.enumerate_pixels() {
        let a = src[3];
        let dst = canvas.get_pixel_mut(x + offset, y + offset);
        for c in 0..4 {
            dst[c] = blend(src[c], dst[c], a);
        }
    }
}

/// Composites `icon` over an opaque `color` using the icon's alpha as mask.
fn flatten(icon: &RgbaImage, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(icon.width(), icon.height(), |x, y| {
        let Rgba([r, g, b, a]) = *icon.get_pixel(x, y);
        Rgb([blend(r, color[0], a), blend(g, color[1], a), blend(b, color[2], a)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, GenericImageView};
    use std::io::Cursor;

    fn disc(size: u32) -> Scaler {
        let r = size as f32 / 2.0;
        Scaler::new(DynamicImage::ImageRgba8(RgbaImage::from_fn(size, size, |x, y| {
            let (dx, dy) = (x as f32 + 0.5 - r, y as f32 + 0.5 - r);
            if dx * dx + dy * dy <= r * r {
                Rgba([200, 40, 90, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })))
    }

    #[test]
    fn png_is_supported() {
        assert!(png_supported());
    }

    #[test]
    fn rgb_source_gains_opaque_alpha() {
        let scaler = Scaler::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            4,
            4,
            Rgb([1, 2, 3]),
        )));
        assert!(scaler.image().pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn resize_is_square() {
        let scaler = disc(64);
        for size in [20, 29, 48, 167, 1024] {
            assert_eq!(scaler.resize(size).dimensions(), (size, size));
        }
    }

    #[test]
    fn padded_icon_is_centered_on_transparent_canvas() -> Result<()> {
        let scaler = disc(64);
        let opts = ScalerOptsBuilder::new(72).padding(108).build();
        assert_eq!(opts.offset(), 18);
        let img = scaler.render(opts)?;
        assert_eq!(img.dimensions(), (108, 108));
        assert_eq!(img.color(), ColorType::Rgba8);
        for (x, y, p) in img.pixels() {
            let inside = (18..90).contains(&x) && (18..90).contains(&y);
            if !inside {
                assert_eq!(p[3], 0, "padding at {},{} not transparent", x, y);
            }
        }
        assert_eq!(img.get_pixel(54, 54)[3], 255);
        Ok(())
    }

    #[test]
    fn padding_masks_every_channel() -> Result<()> {
        let scaler = Scaler::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            8,
            Rgba([200, 40, 90, 128]),
        )));
        let img = scaler.render(ScalerOptsBuilder::new(8).padding(12).build())?;
        assert_eq!(img.get_pixel(6, 6), Rgba([100, 20, 45, 64]));
        assert_eq!(img.get_pixel(1, 6), Rgba([0, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn background_drops_alpha() -> Result<()> {
        let scaler = disc(64);
        let opts = ScalerOptsBuilder::new(32).background([0, 0, 0]).build();
        let img = scaler.render(opts)?;
        assert_eq!(img.color(), ColorType::Rgb8);
        assert_eq!(img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        Ok(())
    }

    #[test]
    fn flatten_blends_by_alpha() {
        let icon = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        assert_eq!(*flatten(&icon, Rgb([0, 0, 0])).get_pixel(0, 0), Rgb([128, 128, 128]));
    }

    #[test]
    fn canvas_smaller_than_icon_is_rejected() {
        let opts = ScalerOptsBuilder::new(64).padding(32).build();
        assert!(disc(16).render(opts).is_err());
    }

    #[test]
    fn save_overwrites() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("icon.png");
        std::fs::write(&path, b"stale")?;
        disc(64).save(&path, ScalerOpts::new(20))?;
        assert_eq!(image::open(&path)?.dimensions(), (20, 20));
        Ok(())
    }

    #[test]
    fn write_png() -> Result<()> {
        let mut buf = Cursor::new(vec![]);
        disc(64).write(&mut buf, ScalerOpts::new(48))?;
        let img = image::load_from_memory_with_format(buf.get_ref(), ImageFormat::Png)?;
        assert_eq!(img.dimensions(), (48, 48));
        Ok(())
    }
}
