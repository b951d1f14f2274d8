//! PDF rasterization port and its HTTP adapter.
//!
//! The adapter targets a Gotenberg-compatible Chromium endpoint: the HTML is
//! posted as `index.html` in a multipart form together with the page settings.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::errors::AppError;
use crate::render::PageOptions;

#[async_trait]
pub trait PdfRasterizer: Send + Sync {
    async fn rasterize(
        &self,
        html: &str,
        template_name: &str,
        options: &PageOptions,
    ) -> Result<Bytes, AppError>;
}

const CONVERT_PATH: &str = "/forms/chromium/convert/html";

pub struct HttpPdfRasterizer {
    client: Client,
    endpoint: String,
}

impl HttpPdfRasterizer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}{CONVERT_PATH}", base_url.trim_end_matches('/')),
        })
    }
}

/// Text fields of the conversion form, in inches.
fn page_fields(options: &PageOptions) -> Vec<(&'static str, String)> {
    let (width, height) = options.paper.inches();
    let margin = options.margin_inches.to_string();
    vec![
        ("paperWidth", width.to_string()),
        ("paperHeight", height.to_string()),
        ("marginTop", margin.clone()),
        ("marginBottom", margin.clone()),
        ("marginLeft", margin.clone()),
        ("marginRight", margin),
        ("printBackground", options.print_background.to_string()),
        ("preferCssPageSize", "false".to_string()),
    ]
}

#[async_trait]
impl PdfRasterizer for HttpPdfRasterizer {
    async fn rasterize(
        &self,
        html: &str,
        template_name: &str,
        options: &PageOptions,
    ) -> Result<Bytes, AppError> {
        let document = Part::bytes(html.as_bytes().to_vec())
            .file_name("index.html")
            .mime_str("text/html")
            .map_err(|e| AppError::Pdf(format!("Invalid document part: {e}")))?;
        let form = page_fields(options)
            .into_iter()
            .fold(Form::new().part("files", document), |form, (name, value)| {
                form.text(name, value)
            });

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Pdf(format!("PDF service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Pdf(format!(
                "PDF service returned {status} for template '{template_name}': {message}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Pdf(format!("Failed to read PDF body: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Pdf("PDF service returned an empty document".to_string()));
        }
        debug!("Rasterized '{template_name}' template: {} bytes", bytes.len());
        Ok(bytes)
    }
}
