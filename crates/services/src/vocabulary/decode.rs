use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::error::IngestError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Bytes that cp1252 leaves unassigned; a strict decoder refuses them.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Character encodings the ingestion ladder knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// Strict UTF-8 without a byte-order mark.
    Utf8,
    /// UTF-8 with an optional leading byte-order mark, which is stripped.
    Utf8Sig,
    Windows1252,
    Latin1,
}

/// UTF-8 first, then the two legacy Western code pages.
pub const DEFAULT_LADDER: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Utf8Sig,
    TextEncoding::Windows1252,
    TextEncoding::Latin1,
];

impl TextEncoding {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Windows1252 => "cp1252",
            TextEncoding::Latin1 => "iso-8859-1",
        }
    }

    /// Accepts the common spellings of each label, case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Some(TextEncoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Some(TextEncoding::Utf8Sig),
            "cp1252" | "windows-1252" => Some(TextEncoding::Windows1252),
            "iso-8859-1" | "latin-1" | "latin1" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }

    /// Decode without replacement characters; `None` on any invalid sequence.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    return None;
                }
                UTF_8
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|text| text.into_owned())
            }
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8
                    .decode_without_bom_handling_and_without_replacement(body)
                    .map(|text| text.into_owned())
            }
            TextEncoding::Windows1252 => {
                if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
                    return None;
                }
                WINDOWS_1252
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|text| text.into_owned())
            }
            TextEncoding::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        }
    }
}

/// Decode `bytes` with the first encoding in `ladder` that accepts them.
///
/// # Errors
///
/// Returns `IngestError::Encoding` listing every label tried when none succeeds.
pub fn decode_with_ladder(
    bytes: &[u8],
    ladder: &[TextEncoding],
) -> Result<(String, TextEncoding), IngestError> {
    ladder
        .iter()
        .find_map(|&encoding| encoding.decode(bytes).map(|text| (text, encoding)))
        .ok_or_else(|| IngestError::Encoding {
            tried: ladder.iter().map(|encoding| encoding.label()).collect(),
        })
}
