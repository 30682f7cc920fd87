use std::fmt::Write as _;

use image::{GrayImage, ImageEncoder as _, Luma, codecs::png::PngEncoder, imageops::overlay};
use qrencode::{Color, EcLevel, QrCode};
use spdlog::debug;

use crate::error::Result;

/// Edge length of the exported image, in pixels (or points for vectors).
pub const DEFAULT_SIZE: u32 = 400;

/// Quiet zone of the preview path, in modules.
pub const DEFAULT_MARGIN: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
    Pdf,
    Eps,
}

impl ImageFormat {
    /// `png`, `svg`, ... without the dot
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "png" => Some(ImageFormat::Png),
            "svg" => Some(ImageFormat::Svg),
            "pdf" => Some(ImageFormat::Pdf),
            "eps" => Some(ImageFormat::Eps),
            _ => None,
        }
    }

    /// `.png`, `.svg`, ... with the dot
    pub fn from_extension(extension: &str) -> Option<Self> {
        extension.strip_prefix('.').and_then(Self::from_name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
            ImageFormat::Eps => "eps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConfig {
    pub format: ImageFormat,
    pub size: u32,
    /// quiet zone around the code, in modules
    pub margin: u32,
    pub ec_level: EcLevel,
}

impl ImageConfig {
    /// Settings used when only a format is asked for.
    pub fn with_format(format: ImageFormat) -> Self {
        ImageConfig {
            format,
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            ec_level: EcLevel::M,
        }
    }
}

/// Turns a URL into the bytes of an image file.
pub trait QrEncoder {
    fn encode(&self, url: &str, config: &ImageConfig) -> Result<Vec<u8>>;

    fn encode_with_format(&self, url: &str, format: ImageFormat) -> Result<Vec<u8>> {
        self.encode(url, &ImageConfig::with_format(format))
    }
}

/// Renders PNG through `image`, and SVG/PDF/EPS as plain vector documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrExporter;

impl QrEncoder for QrExporter {
    fn encode(&self, url: &str, config: &ImageConfig) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(url, config.ec_level)?;
        let grid = Grid::new(&code, config.margin);
        debug!(
            "encoded {} bytes into {} modules, writing {}",
            url.len(),
            code.width(),
            config.format.name()
        );

        match config.format {
            ImageFormat::Png => render_png(&code, &grid, config),
            ImageFormat::Svg => Ok(render_svg(&grid, config).into_bytes()),
            ImageFormat::Pdf => Ok(render_pdf(&grid, config)),
            ImageFormat::Eps => Ok(render_eps(&grid, config).into_bytes()),
        }
    }
}

/// Module matrix padded with the quiet zone.
struct Grid {
    /// modules per side, margin included
    side: u32,
    margin: u32,
    width: u32,
    colors: Vec<Color>,
}

impl Grid {
    fn new(code: &QrCode, margin: u32) -> Self {
        let width = code.width() as u32;
        Grid {
            side: width + 2 * margin,
            margin,
            width,
            colors: code.to_colors(),
        }
    }

    /// `(x, y)` of every dark module in padded coordinates, top-left origin.
    fn dark(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.colors
            .iter()
            .enumerate()
            .filter(|(_, color)| **color == Color::Dark)
            .map(|(i, _)| {
                let i = i as u32;
                (i % self.width + self.margin, i / self.width + self.margin)
            })
    }

    /// length of one module in output units
    fn scale(&self, size: u32) -> f64 {
        f64::from(size) / f64::from(self.side)
    }
}

fn render_png(code: &QrCode, grid: &Grid, config: &ImageConfig) -> Result<Vec<u8>> {
    let module_px = (config.size / grid.side).max(1);
    let qrcode_img = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(module_px, module_px)
        .build();

    let pixel_len = grid.side * module_px;
    let mut canvas = GrayImage::from_pixel(pixel_len, pixel_len, Luma([255]));
    let offset = grid.margin * module_px;
    overlay(&mut canvas, &qrcode_img, offset.into(), offset.into());

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ColorType::L8,
    )?;
    Ok(bytes)
}

fn render_svg(grid: &Grid, config: &ImageConfig) -> String {
    let side = grid.side;
    let mut svg = format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{size}" height="{size}" viewBox="0 0 {side} {side}" shape-rendering="crispEdges">
<rect width="{side}" height="{side}" fill="#ffffff"/>
<path fill="#000000" d=""##,
        size = config.size,
    );
    for (x, y) in grid.dark() {
        let _ = write!(svg, "M{x} {y}h1v1h-1z");
    }
    svg.push_str("\"/>\n</svg>\n");
    svg
}

fn render_eps(grid: &Grid, config: &ImageConfig) -> String {
    let scale = grid.scale(config.size);
    let mut eps = format!(
        "%!PS-Adobe-3.0 EPSF-3.0\n\
         %%BoundingBox: 0 0 {size} {size}\n\
         %%Creator: urlqr\n\
         %%EndComments\n\
         {scale:.6} {scale:.6} scale\n\
         1 setgray 0 0 {side} {side} rectfill\n\
         0 setgray\n",
        size = config.size,
        side = grid.side,
    );
    // PostScript counts rows from the bottom
    for (x, y) in grid.dark() {
        let _ = writeln!(eps, "{x} {} 1 1 rectfill", grid.side - 1 - y);
    }
    eps.push_str("showpage\n%%EOF\n");
    eps
}

fn render_pdf(grid: &Grid, config: &ImageConfig) -> Vec<u8> {
    let scale = grid.scale(config.size);
    let mut content = format!(
        "q {scale:.6} 0 0 {scale:.6} 0 0 cm\n1 g 0 0 {side} {side} re f\n0 g\n",
        side = grid.side,
    );
    for (x, y) in grid.dark() {
        let _ = writeln!(content, "{x} {} 1 1 re", grid.side - 1 - y);
    }
    content.push_str("f Q\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {size} {size}] /Contents 4 0 R >>",
            size = config.size
        ),
        format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        let _ = write!(pdf, "{} 0 obj\n{object}\nendobj\n", i + 1);
    }

    let xref = pdf.len();
    let _ = write!(pdf, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(pdf, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        pdf,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    );
    pdf.into_bytes()
}
