//! EXIF UserComment encoding
//!
//! The comment starts with an 8 byte character code. We write `ASCII` for
//! plain JSON and `UNICODE` (UTF-16 in the TIFF byte order) when names
//! carry umlauts. Reading also accepts the all-zero "undefined" code, which
//! is treated as UTF-8.

use crate::error::{CropError, Result};
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::io::Cursor;

const CODE_ASCII: &[u8; 8] = b"ASCII\0\0\0";
const CODE_UNICODE: &[u8; 8] = b"UNICODE\0";
const CODE_UNDEFINED: &[u8; 8] = &[0; 8];

/// The crate writes big-endian TIFF
const LITTLE_ENDIAN: bool = false;

pub fn encode_user_comment(text: &str, little_endian: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + text.len() * 2);

    if text.is_ascii() {
        out.extend_from_slice(CODE_ASCII);
        out.extend_from_slice(text.as_bytes());
    } else {
        out.extend_from_slice(CODE_UNICODE);
        for unit in text.encode_utf16() {
            let bytes = if little_endian {
                unit.to_le_bytes()
            } else {
                unit.to_be_bytes()
            };
            out.extend_from_slice(&bytes);
        }
    }

    out
}

/// Decode a UserComment value, `None` for codes we do not read (JIS).
pub fn decode_user_comment(raw: &[u8], little_endian: bool) -> Option<String> {
    if raw.len() < 8 {
        return None;
    }
    let (code, body) = raw.split_at(8);

    let text = if code == CODE_ASCII || code == CODE_UNDEFINED {
        String::from_utf8_lossy(body).into_owned()
    } else if code == CODE_UNICODE {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| {
                if little_endian {
                    u16::from_le_bytes([pair[0], pair[1]])
                } else {
                    u16::from_be_bytes([pair[0], pair[1]])
                }
            })
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        return None;
    };

    Some(text.trim_end_matches(['\0', ' ']).to_string())
}

/// Serialize a TIFF block holding only the UserComment field.
pub fn build_tiff(comment: &str) -> Result<Vec<u8>> {
    let field = Field {
        tag: Tag::UserComment,
        ifd_num: In::PRIMARY,
        value: Value::Undefined(encode_user_comment(comment, LITTLE_ENDIAN), 0),
    };

    let mut writer = Writer::new();
    writer.push_field(&field);

    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, LITTLE_ENDIAN)?;
    Ok(buf.into_inner())
}

/// UserComment text from a parsed EXIF block
pub fn user_comment(data: &exif::Exif) -> Result<Option<String>> {
    let Some(field) = data.get_field(Tag::UserComment, In::PRIMARY) else {
        return Ok(None);
    };

    match &field.value {
        Value::Undefined(raw, _) => Ok(decode_user_comment(raw, data.little_endian())),
        other => Err(CropError::Metadata(format!(
            "UserComment has unexpected type {:?}",
            other
        ))),
    }
}
