//! Upload ingestion.
//!
//! `POST /` accepts two body shapes:
//!
//! - `multipart/form-data` with a `file` part (its own content type is the declared media
//!   type) and text parts `folder1`, `folder2`, `folder3`, `fileName`
//! - any other body, taken as the raw file bytes; the request `Content-Type` is the declared
//!   media type and the address comes from the query string
//!
//! [`StoreUpload`] normalises both into a single [`StoreRequest`], so the handler and the store
//! never branch on transport format.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Query, Request};
use axum::http::header;
use pdfstore_files::StoreRequest;
use serde::Deserialize;

use crate::error::ApiError;

/// Extractor yielding the normalised upload.
#[derive(Debug)]
pub struct StoreUpload(pub StoreRequest);

/// Address fields carried in the query string of a raw-binary upload.
#[derive(Debug, Default, Deserialize)]
struct AddressQuery {
    folder1: Option<String>,
    folder2: Option<String>,
    folder3: Option<String>,
    #[serde(rename = "fileName")]
    file_name: Option<String>,
}

#[axum::async_trait]
impl<S> FromRequest<S> for StoreUpload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if content_type.as_deref().is_some_and(is_multipart) {
            let multipart = Multipart::from_request(req, state).await?;
            return read_multipart(multipart).await.map(Self);
        }

        let Query(address) = Query::<AddressQuery>::try_from_uri(req.uri())?;
        let payload = Bytes::from_request(req, state).await?;

        Ok(Self(StoreRequest {
            folder1: address.folder1,
            folder2: address.folder2,
            folder3: address.folder3,
            file_name: address.file_name,
            payload: Some(payload.to_vec()),
            media_type: content_type,
        }))
    }
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("multipart/form-data"))
}

async fn read_multipart(mut multipart: Multipart) -> Result<StoreRequest, ApiError> {
    let mut request = StoreRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "file" => {
                request.media_type = field.content_type().map(str::to_owned);
                request.payload = Some(field.bytes().await?.to_vec());
            }
            "folder1" => request.folder1 = Some(field.text().await?),
            "folder2" => request.folder2 = Some(field.text().await?),
            "folder3" => request.folder3 = Some(field.text().await?),
            "fileName" => request.file_name = Some(field.text().await?),
            _ => tracing::debug!(field = %name, "ignoring unexpected multipart field"),
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_multipart() {
        assert!(is_multipart("multipart/form-data; boundary=abc"));
        assert!(is_multipart("Multipart/Form-Data;boundary=abc"));
        assert!(!is_multipart("application/pdf"));
        assert!(!is_multipart("multipart/mixed; boundary=abc"));
    }
}
