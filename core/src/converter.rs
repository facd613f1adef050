use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::format::Format;

/// Sibling path of `source` with the `input` suffix swapped for `output`'s.
pub fn output_path(source: &Path, input: Format, output: Format) -> PathBuf {
    let swapped = source
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(input.extension().as_str()))
        .map(|stem| format!("{stem}{}", output.extension()));

    match swapped {
        Some(name) => source.with_file_name(name),
        None => source.with_extension(output.token()),
    }
}

/// Convert a single image: decode `source` as `input`, write it next to
/// itself as `output`. An existing file at the destination is overwritten.
///
/// Returns the path that was written.
pub fn convert_one(source: &Path, input: Format, output: Format) -> Result<PathBuf, ConvertError> {
    let file = File::open(source).map_err(|e| ConvertError::FileOpen {
        path: source.to_path_buf(),
        source: e,
    })?;

    let img = input
        .codec()
        .decode(BufReader::new(file))
        .map_err(|e| ConvertError::Decode {
            path: source.to_path_buf(),
            source: e,
        })?;

    log::debug!(
        "Decoded {}: {}x{} pixels, converting to {}",
        source.display(),
        img.width(),
        img.height(),
        output.codec().as_str()
    );

    let destination = output_path(source, input, output);
    let file = File::create(&destination).map_err(|e| ConvertError::FileCreate {
        path: destination.clone(),
        source: e,
    })?;

    let mut writer = BufWriter::new(file);
    output
        .codec()
        .encode(&img, &mut writer)
        .and_then(|()| writer.flush().map_err(image::ImageError::IoError))
        .map_err(|e| ConvertError::Encode {
            path: destination.clone(),
            source: e,
        })?;

    Ok(destination)
}
