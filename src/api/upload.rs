//! `multipart/form-data` submissions.
//!
//! Browsers attach the proof file as a `proofFile` part next to a
//! `deliverableLink` text part. The file is kept as a `data:` URL so the
//! stored proof reference is self-contained.

use super::{dto::SubmitTaskBody, error::ApiError};
use actix_multipart::Multipart;
use actix_web::{guard::GuardContext, http::header, web::BytesMut};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures_util::TryStreamExt;

/// Largest accepted proof file.
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

/// Largest accepted text part.
const MAX_TEXT_BYTES: usize = 8 * 1024;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Matches requests whose body is `multipart/form-data`.
pub fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

/// Reads a submission form into the same body the JSON route accepts.
///
/// Unknown parts are drained and ignored. An empty file part counts as no
/// proof, matching an empty `deliverableLink`.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] when the form is malformed, a text part
/// is not UTF-8, or a part exceeds its size limit.
pub async fn read_submit_form(mut form: Multipart) -> Result<SubmitTaskBody, ApiError> {
    let mut body = SubmitTaskBody::default();

    while let Some(mut field) = form.try_next().await.map_err(malformed)? {
        let name = field.name().map(str::to_owned);
        let mime = field
            .content_type()
            .map_or_else(|| FALLBACK_MIME.to_owned(), |value| value.essence_str().to_owned());

        match name.as_deref() {
            Some("deliverableLink") => {
                let bytes = read_part(&mut field, MAX_TEXT_BYTES).await?;
                body.deliverable_link = Some(text_part("deliverableLink", &bytes)?);
            }
            Some("proofBase64") => {
                let bytes = read_part(&mut field, MAX_PROOF_BYTES).await?;
                body.proof_base64 = Some(text_part("proofBase64", &bytes)?);
            }
            Some("proofFile") => {
                let bytes = read_part(&mut field, MAX_PROOF_BYTES).await?;
                if !bytes.is_empty() {
                    body.proof_base64 = Some(data_url(&mime, &bytes));
                }
            }
            _ => {
                while field.try_next().await.map_err(malformed)?.is_some() {}
            }
        }
    }

    Ok(body)
}

async fn read_part(
    field: &mut actix_multipart::Field,
    limit: usize,
) -> Result<BytesMut, ApiError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if buffer.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::BadRequest(format!(
                "form part exceeds {limit} bytes"
            )));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

fn text_part(name: &str, bytes: &[u8]) -> Result<String, ApiError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| ApiError::BadRequest(format!("form part '{name}' is not UTF-8 text")))
}

/// Encodes `bytes` as an RFC 2397 `data:` URL.
#[must_use]
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn malformed(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("malformed multipart body: {err}"))
}
