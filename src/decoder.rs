use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use flate2::read::{DeflateDecoder, GzDecoder};
use std::io::Read;

pub const ENC_IDENTITY: &str = "identity";
pub const ENC_GZIP: &str = "gzip";
pub const ENC_DEFLATE: &str = "deflate";
pub const ENC_ZSTD: &str = "zstd";

pub fn decode_gzip(data: &[u8]) -> Result<Bytes> {
    let mut decoder = GzDecoder::new(data);
    let mut decoded_data = Vec::new();
    decoder.read_to_end(&mut decoded_data)?;
    Ok(Bytes::from(decoded_data))
}

pub fn decode_deflate(data: &[u8]) -> Result<Bytes> {
    let mut decoder = DeflateDecoder::new(data);
    let mut decoded_data = Vec::new();
    decoder.read_to_end(&mut decoded_data)?;
    Ok(Bytes::from(decoded_data))
}

pub fn decode_zstd(data: &[u8]) -> Result<Bytes> {
    let decoded_data = zstd::decode_all(data)?;
    Ok(Bytes::from(decoded_data))
}

/// Undo one `Content-Encoding`. Unknown codings are an error, not a passthrough.
///
/// An empty body stays empty whatever the header says (HEAD, 204 and 304 replies).
pub fn decompress(data: Bytes, content_encoding: Option<&str>) -> Result<Bytes> {
    if data.is_empty() {
        return Ok(data);
    }
    let encoding = content_encoding.map(|e| e.trim().to_ascii_lowercase());
    match encoding.as_deref() {
        None | Some("") | Some(ENC_IDENTITY) => Ok(data),
        Some(ENC_GZIP) | Some("x-gzip") => decode_gzip(&data).context("Failed to decode gzip body"),
        Some(ENC_DEFLATE) => decode_deflate(&data).context("Failed to decode deflate body"),
        Some(ENC_ZSTD) => decode_zstd(&data).context("Failed to decode zstd body"),
        Some(other) => Err(anyhow!("Unsupported content encoding: {other}")),
    }
}

/// Pull the `charset=` parameter out of a content-type value.
fn charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Decodes body bytes to text using the declared charset, lossy UTF-8 otherwise.
pub fn decode_text(data: &[u8], content_type: &str) -> String {
    let encoding = charset(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(data);
    text.into_owned()
}

pub fn decode_body(data: Bytes, content_encoding: Option<&str>, content_type: &str) -> Result<String> {
    let body_bytes = decompress(data, content_encoding)?;
    Ok(decode_text(&body_bytes, content_type))
}
