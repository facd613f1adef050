use std::io::{BufRead, Seek, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageResult};

/// Container codec able to both decode and encode an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Jpeg,
    Png,
}

impl Codec {
    fn image_format(self) -> image::ImageFormat {
        match self {
            Codec::Jpeg => image::ImageFormat::Jpeg,
            Codec::Png => image::ImageFormat::Png,
        }
    }

    /// Decode with this codec. The stream is trusted to be in this format,
    /// content is never sniffed.
    pub fn decode<R: BufRead + Seek>(self, reader: R) -> ImageResult<DynamicImage> {
        image::load(reader, self.image_format())
    }

    pub fn encode<W: Write>(self, img: &DynamicImage, writer: W) -> ImageResult<()> {
        match self {
            Codec::Jpeg => {
                // JPEG has no alpha channel
                let rgb = img.to_rgb8();
                let mut encoder = JpegEncoder::new(writer);
                encoder.encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
            }
            Codec::Png => img.write_with_encoder(PngEncoder::new(writer)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Codec::Jpeg => "JPEG",
            Codec::Png => "PNG",
        }
    }
}

/// Supported format tokens. A new format is one entry here plus a `Codec` variant.
const REGISTRY: &[(&str, Codec)] = &[
    ("jpg", Codec::Jpeg),
    ("jpeg", Codec::Jpeg),
    ("png", Codec::Png),
];

/// A supported format token together with the codec it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    token: &'static str,
    codec: Codec,
}

impl Format {
    /// Case-sensitive lookup: "PNG" is not "png".
    pub fn lookup(token: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|(t, _)| *t == token)
            .map(|&(token, codec)| Format { token, codec })
    }

    pub fn token(&self) -> &'static str {
        self.token
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Canonical extension, e.g. ".jpg".
    pub fn extension(&self) -> String {
        normalize(self.token)
    }

    /// Whether the file name ends in this format's extension. Everything
    /// after the last '.' counts, so a bare ".png" is a png file too.
    pub fn matches(&self, path: &Path) -> bool {
        file_extension(path) == Some(self.token)
    }
}

/// Text after the last '.' of the file name, the name's own leading dot
/// included.
fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.rfind('.').map(|i| &name[i + 1..])
}

pub fn is_supported(token: &str) -> bool {
    Format::lookup(token).is_some()
}

/// Prefix the extension separator if it is missing. Case is left alone.
pub fn normalize(token: &str) -> String {
    if token.starts_with('.') {
        token.to_string()
    } else {
        format!(".{token}")
    }
}
