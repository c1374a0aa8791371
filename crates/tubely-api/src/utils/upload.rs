//! Multipart upload helpers

use axum::extract::Multipart;
use bytes::BytesMut;
use tubely_core::AppError;

use crate::error::multipart_error;
use crate::services::ingest::UploadedFile;

/// Read the file sent in multipart field `field_name`.
///
/// The field is consumed chunk by chunk and buffering stops once
/// `max_bytes + 1` bytes are held: enough for the size check to reject an
/// oversized file without reading it whole. Other fields are skipped.
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    let limit = max_bytes.saturating_add(1);

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = field.file_name().map(str::to_string);

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if !append_capped(&mut buffer, &chunk, limit) {
                tracing::debug!(field = field_name, limit, "Upload exceeds size limit");
                break;
            }
        }

        return Ok(UploadedFile {
            bytes: buffer.freeze(),
            content_type,
            file_name,
        });
    }

    Err(AppError::BadRequest(format!(
        "Unable to parse form file: missing field '{}'",
        field_name
    )))
}

/// Append as much of `chunk` as fits under `limit`. Returns `false` once the
/// limit is reached.
fn append_capped(buffer: &mut BytesMut, chunk: &[u8], limit: usize) -> bool {
    let room = limit.saturating_sub(buffer.len());
    if chunk.len() < room {
        buffer.extend_from_slice(chunk);
        true
    } else {
        buffer.extend_from_slice(&chunk[..room]);
        false
    }
}
