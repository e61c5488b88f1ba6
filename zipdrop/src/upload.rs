#![doc = "File host client: bridges the core `ArchiveUploader` trait to a multipart HTTP POST."]
//
//! # Upload client
//!
//! [`FileHostClient`] sends each archive as a `multipart/form-data` POST with a
//! single `file` field and the filename repeated as the `title` query parameter.
//!
//! - Non-2xx answers become [`UploadError::Status`] with the response body.
//! - Connection, DNS, timeout and reset failures become [`UploadError::Transport`]
//!   with the full cause chain in the message.
//! - A 2xx body is handed to [`resolve_reference`]; a missing link is an
//!   `Unresolved` result, never an error.
//!
//! Nothing is retried.

use std::error::Error as _;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use zipdrop_core::contract::{Archive, ArchiveUploader, UploadResult};
use zipdrop_core::error::UploadError;
use zipdrop_core::reference::resolve_reference;

use crate::load_config::UploadConfig;

const ZIP_CONTENT_TYPE: &str = "application/zip";

pub struct FileHostClient {
    http: reqwest::Client,
    endpoint: String,
}

impl FileHostClient {
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("zipdrop/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build HTTP client")?;
        tracing::info!(
            endpoint = %config.endpoint,
            timeout = ?config.request_timeout,
            "Initialized FileHostClient"
        );
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl ArchiveUploader for FileHostClient {
    async fn upload(&self, archive: Archive) -> Result<UploadResult, UploadError> {
        let Archive { filename, bytes } = archive;
        tracing::info!(
            filename = %filename,
            bytes = bytes.len(),
            endpoint = %self.endpoint,
            "Uploading archive"
        );

        let part = Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str(ZIP_CONTENT_TYPE)
            .map_err(transport_error)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("title", filename.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, filename = %filename, "Upload request failed");
                transport_error(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = ?e, filename = %filename, "Failed to read upload response");
            transport_error(e)
        })?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                filename = %filename,
                "Upload rejected by endpoint"
            );
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result = resolve_reference(&body);
        tracing::info!(
            filename = %filename,
            reference = result.reference(),
            "Upload finished"
        );
        Ok(result)
    }
}

/// Flattens a reqwest error and its sources into one message.
fn transport_error(err: reqwest::Error) -> UploadError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    UploadError::Transport { message }
}
