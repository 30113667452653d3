//! JPEG segment splicing
//!
//! Only the marker segments before SOS are touched. Everything from SOS
//! onwards (entropy-coded pixel data, EOI, trailing bytes) is copied as is.

use crate::error::{CropError, Result};

const MARKER_SOI: u8 = 0xD8;
const MARKER_SOS: u8 = 0xDA;
const MARKER_EOI: u8 = 0xD9;
const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;

pub const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Largest payload an APP segment can carry (length field counts itself)
pub const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

pub fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == MARKER_SOI
}

struct Segment<'a> {
    marker: u8,
    bytes: &'a [u8],
}

impl Segment<'_> {
    fn payload(&self) -> &[u8] {
        self.bytes.get(4..).unwrap_or(&[])
    }

    fn is_exif(&self) -> bool {
        self.marker == MARKER_APP1 && self.payload().starts_with(EXIF_HEADER)
    }
}

// Header segments plus the untouched remainder starting at SOS
fn split(jpeg: &[u8]) -> Result<(Vec<Segment<'_>>, &[u8])> {
    if !is_jpeg(jpeg) {
        return Err(CropError::UnsupportedFormat("not a JPEG stream".into()));
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        if pos >= jpeg.len() {
            return Err(CropError::Metadata("JPEG ends before image data".into()));
        }
        if jpeg[pos] != 0xFF {
            return Err(CropError::Metadata(format!("expected marker at offset {}", pos)));
        }

        let start = pos;
        // Fill bytes
        while pos < jpeg.len() && jpeg[pos] == 0xFF {
            pos += 1;
        }
        let Some(&marker) = jpeg.get(pos) else {
            return Err(CropError::Metadata("truncated marker".into()));
        };
        pos += 1;

        match marker {
            MARKER_SOS | MARKER_EOI => return Ok((segments, &jpeg[start..])),
            0x01 | 0xD0..=0xD7 => {
                segments.push(Segment { marker, bytes: &jpeg[start..pos] });
            }
            _ => {
                let len_bytes = jpeg
                    .get(pos..pos + 2)
                    .ok_or_else(|| CropError::Metadata("truncated segment length".into()))?;
                let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
                if len < 2 {
                    return Err(CropError::Metadata(format!("bad segment length {}", len)));
                }
                let end = pos + len;
                if end > jpeg.len() {
                    return Err(CropError::Metadata("segment runs past end of file".into()));
                }
                // Normalize away fill bytes so the segment starts at FF xx
                segments.push(Segment { marker, bytes: &jpeg[pos - 2..end] });
                pos = end;
            }
        }
    }
}

/// Build an APP1 Exif segment around raw TIFF data.
fn exif_segment(tiff: &[u8]) -> Result<Vec<u8>> {
    let payload_len = EXIF_HEADER.len() + tiff.len();
    if payload_len > MAX_SEGMENT_PAYLOAD {
        return Err(CropError::Metadata(format!(
            "EXIF block of {} bytes exceeds the {} byte segment limit",
            payload_len, MAX_SEGMENT_PAYLOAD
        )));
    }

    let mut segment = Vec::with_capacity(payload_len + 4);
    segment.extend_from_slice(&[0xFF, MARKER_APP1]);
    segment.extend_from_slice(&((payload_len + 2) as u16).to_be_bytes());
    segment.extend_from_slice(EXIF_HEADER);
    segment.extend_from_slice(tiff);
    Ok(segment)
}

/// Replace any Exif APP1 segments with one carrying `tiff`.
///
/// The new segment goes right after SOI, or after the JFIF APP0 segments
/// when the file starts with them.
pub fn replace_exif(jpeg: &[u8], tiff: &[u8]) -> Result<Vec<u8>> {
    let (segments, rest) = split(jpeg)?;
    let new_segment = exif_segment(tiff)?;

    let mut out = Vec::with_capacity(jpeg.len() + new_segment.len());
    out.extend_from_slice(&[0xFF, MARKER_SOI]);

    let mut kept = segments.iter().filter(|s| !s.is_exif()).peekable();
    while let Some(segment) = kept.next_if(|s| s.marker == MARKER_APP0) {
        out.extend_from_slice(segment.bytes);
    }
    out.extend_from_slice(&new_segment);
    for segment in kept {
        out.extend_from_slice(segment.bytes);
    }
    out.extend_from_slice(rest);

    Ok(out)
}

/// Number of Exif APP1 segments in a JPEG stream
pub fn count_exif_segments(jpeg: &[u8]) -> Result<usize> {
    let (segments, _) = split(jpeg)?;
    Ok(segments.iter().filter(|s| s.is_exif()).count())
}
