//! Multipart file upload with progress events.
//!
//! The file body is streamed in chunks; each chunk handed to reqwest
//! advances a [`ProgressTracker`]. Percentages are emitted on an unbounded
//! channel whose receiver is the returned event stream.

use crate::widget_api_client::{WidgetApiClient, error_from_response, transport_error};
use futures::channel::mpsc::{self, UnboundedSender};
use futures::{StreamExt, stream};
use ragwidget_core::WidgetError;
use ragwidget_core::backend::{
    ProgressTracker, UploadEvent, UploadEventStream, UploadFile, UploadReceipt,
};
use reqwest::Body;
use reqwest::multipart::{Form, Part};
use std::sync::{Arc, Mutex};

const CHUNK_SIZE: usize = 16 * 1024;

/// Builds the lazy event stream. Nothing is sent until the stream is first polled.
pub(crate) fn upload_stream(client: WidgetApiClient, file: UploadFile) -> UploadEventStream {
    stream::once(async move {
        let (tx, rx) = mpsc::unbounded();
        tokio::spawn(run_upload(client, file, tx));
        rx
    })
    .flatten()
    .boxed()
}

async fn run_upload(client: WidgetApiClient, file: UploadFile, tx: UnboundedSender<UploadEvent>) {
    let file_name = file.file_name.clone();
    let terminal = match send_upload(&client, file, &tx).await {
        Ok(receipt) => {
            tracing::info!("[WidgetApi] Uploaded {} as {}", receipt.filename, receipt.format);
            UploadEvent::Completed(receipt)
        }
        Err(e) => {
            tracing::warn!("[WidgetApi] Upload of {} failed: {}", file_name, e);
            UploadEvent::Failed(e.detail().map(str::to_string))
        }
    };
    let _ = tx.unbounded_send(terminal);
}

fn report(
    tracker: &Mutex<ProgressTracker>,
    tx: &UnboundedSender<UploadEvent>,
    step: impl FnOnce(&mut ProgressTracker) -> Option<u8>,
) {
    if let Ok(mut tracker) = tracker.lock()
        && let Some(percent) = step(&mut tracker)
    {
        let _ = tx.unbounded_send(UploadEvent::Progress(percent));
    }
}

async fn send_upload(
    client: &WidgetApiClient,
    file: UploadFile,
    tx: &UnboundedSender<UploadEvent>,
) -> ragwidget_core::Result<UploadReceipt> {
    let total = file.len() as u64;
    let tracker = Arc::new(Mutex::new(ProgressTracker::new(total)));
    report(&tracker, tx, ProgressTracker::start);

    let mime = file.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&file.file_name)
            .first_or_octet_stream()
            .to_string()
    });

    let chunks: Vec<Vec<u8>> = file.bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let body_tracker = tracker.clone();
    let body_tx = tx.clone();
    let mut loaded = 0u64;
    let body = stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        report(&body_tracker, &body_tx, |t| t.advance(loaded));
        Ok::<_, std::io::Error>(chunk)
    });

    let part = Part::stream_with_length(Body::wrap_stream(body), total)
        .file_name(file.file_name.clone())
        .mime_str(&mime)
        .map_err(|e| WidgetError::internal(format!("Invalid content type {}: {}", mime, e)))?;

    let form = Form::new()
        .part("file", part)
        .text("store_in_knowledge", "true");

    // The backend reads the flag from the query string; the form field is
    // kept for handlers that read the body.
    let request = client
        .client
        .post(client.url("/upload-file"))
        .query(&[("store_in_knowledge", "true")])
        .multipart(form);

    let response = client
        .authorize(request)
        .send()
        .await
        .map_err(transport_error)?;

    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let receipt = response
        .json::<UploadReceipt>()
        .await
        .map_err(|e| WidgetError::Serialization {
            format: "JSON".to_string(),
            message: e.to_string(),
        })?;

    report(&tracker, tx, ProgressTracker::finish);
    Ok(receipt)
}
