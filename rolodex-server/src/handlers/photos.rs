use std::time::UNIX_EPOCH;

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
};
use httpdate::{fmt_http_date, parse_http_date};
use tracing::debug;

use rolodex_core::Photo;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

const PHOTO_CACHE_CONTROL: &str = "no-cache";

/// PUT /contacts/photo - multipart form with an `id` text field and a
/// `file` part. Responds with the stored photo's URL as plain text.
pub async fn upload_photo_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<String> {
    let mut id: Option<String> = None;
    let mut file: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("id") => id = Some(field.text().await?),
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                file = Some((file_name, bytes));
            }
            other => {
                debug!(field = ?other, "ignoring unexpected multipart field");
            }
        }
    }

    let id = id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing multipart field `id`"))?;
    let (file_name, bytes) = file.ok_or_else(|| {
        AppError::bad_request("Missing multipart field `file`")
    })?;

    let url = state
        .contacts()
        .upload_photo(&id, file_name.as_deref(), &bytes)
        .await?;
    Ok(url)
}

/// GET /contacts/image/{filename} - raw photo bytes with revalidation
/// headers.
pub async fn get_photo_handler(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let photo = state.contacts().get_photo(&filename).await?;

    let etag = photo_etag(&photo);
    let last_modified = photo.modified.map(fmt_http_date);

    if let Some(if_none_match) = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
    {
        if if_none_match
            .split(',')
            .any(|t| t.trim() == etag || t.trim() == "*")
        {
            return Ok(not_modified(etag, last_modified));
        }
    } else if let Some(modified) = photo.modified
        && let Some(since) = headers
            .get(header::IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
        && let Ok(since_time) = parse_http_date(since)
        && truncate_to_secs(modified) <= since_time
    {
        return Ok(not_modified(etag, last_modified));
    }

    let mut response_headers = vec![
        (header::CONTENT_TYPE, photo.content_type.to_string()),
        (header::ETAG, etag),
        (header::CACHE_CONTROL, PHOTO_CACHE_CONTROL.to_string()),
    ];
    if let Some(last_modified) = last_modified {
        response_headers.push((header::LAST_MODIFIED, last_modified));
    }

    Ok((
        StatusCode::OK,
        AppendHeaders(response_headers),
        photo.bytes,
    )
        .into_response())
}

fn not_modified(etag: String, last_modified: Option<String>) -> Response {
    let mut response_headers = vec![
        (header::ETAG, etag),
        (header::CACHE_CONTROL, PHOTO_CACHE_CONTROL.to_string()),
    ];
    if let Some(last_modified) = last_modified {
        response_headers.push((header::LAST_MODIFIED, last_modified));
    }
    (StatusCode::NOT_MODIFIED, AppendHeaders(response_headers)).into_response()
}

/// Weak validator from size and mtime; a re-upload changes at least one.
fn photo_etag(photo: &Photo) -> String {
    match photo
        .modified
        .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
    {
        Some(age) => format!(
            "W/\"{}-{}.{}\"",
            photo.bytes.len(),
            age.as_secs(),
            age.subsec_nanos()
        ),
        None => format!("W/\"{}\"", photo.bytes.len()),
    }
}

fn truncate_to_secs(time: std::time::SystemTime) -> std::time::SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(age) => UNIX_EPOCH + std::time::Duration::from_secs(age.as_secs()),
        Err(_) => time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn photo(len: usize, modified: Option<std::time::SystemTime>) -> Photo {
        Photo {
            filename: "c-1.png".into(),
            bytes: vec![0; len],
            content_type: "image/png",
            modified,
        }
    }

    #[test]
    fn etag_changes_with_size_and_mtime() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let a = photo_etag(&photo(10, Some(t)));
        let b = photo_etag(&photo(11, Some(t)));
        let c = photo_etag(&photo(10, Some(t + Duration::from_millis(5))));

        assert!(a.starts_with("W/\""));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(photo_etag(&photo(3, None)), "W/\"3\"");
    }

    #[test]
    fn http_dates_compare_at_second_precision() {
        let t = UNIX_EPOCH + Duration::new(1_700_000_000, 750_000_000);
        let header = fmt_http_date(t);
        let parsed = parse_http_date(&header).unwrap();
        assert!(truncate_to_secs(t) <= parsed);
    }
}
