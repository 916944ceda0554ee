// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use invoicedesk_app::{
    ArchiveOutcome, AssigneeFilter, InvoiceFields, RowId, RowService, RowSets, SelectedFile,
    UploadResponse,
};
use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

const PDF_MIME: &str = "application/pdf";

/// Blocking client for the invoice backend's `/api` routes.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("server.base_url must not be empty");
        }
        let base_url = Url::parse(trimmed)
            .with_context(|| format!("server.base_url {trimmed:?} is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "server.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }
        if base_url.cannot_be_a_base() {
            bail!("server.base_url {trimmed:?} cannot carry a path");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read the rows once to confirm the server answers.
    pub fn ping(&self) -> Result<()> {
        let rows = self.fetch_rows(&AssigneeFilter::All)?;
        debug!(rows = rows.len(), "server reachable");
        Ok(())
    }

    pub fn fetch_rows(&self, assignees: &AssigneeFilter) -> Result<RowSets> {
        let mut url = self.endpoint(&["api", "rows"])?;
        if let Some(value) = assignees.query_value() {
            url.query_pairs_mut().append_pair("assigned_to", &value);
        }
        let response = self.send(self.http.get(url))?;
        response.json().context("decode row listing")
    }

    pub fn upload(&self, files: &[SelectedFile]) -> Result<UploadResponse> {
        let mut form = Form::new();
        for file in files {
            let part = Part::file(&file.path)
                .with_context(|| format!("open {} for upload", file.path.display()))?
                .file_name(file.name.clone())
                .mime_str(PDF_MIME)
                .context("set upload content type")?;
            form = form.part("files", part);
        }
        let url = self.endpoint(&["api", "upload"])?;
        let response = self.send(self.http.post(url).multipart(form))?;
        response.json().context("decode upload response")
    }

    pub fn delete_row(&self, id: &RowId) -> Result<()> {
        let url = self.row_endpoint(id, None)?;
        self.send(self.http.delete(url)).map(drop)
    }

    pub fn unarchive_row(&self, id: &RowId) -> Result<()> {
        let url = self.row_endpoint(id, Some("unarchive"))?;
        self.send(self.http.post(url)).map(drop)
    }

    pub fn set_notes(&self, id: &RowId, notes: &str) -> Result<()> {
        self.post_row(id, "notes", &NotesBody { notes })
    }

    pub fn set_starred(&self, id: &RowId, starred: bool) -> Result<()> {
        self.post_row(id, "starred", &StarredBody { starred })
    }

    pub fn set_assignee(&self, id: &RowId, assignee: &str) -> Result<()> {
        self.post_row(
            id,
            "assigned_to",
            &AssigneeBody {
                assigned_to: assignee,
            },
        )
    }

    pub fn set_archive_outcome(&self, id: &RowId, outcome: ArchiveOutcome) -> Result<()> {
        self.post_row(
            id,
            "archive_result",
            &OutcomeBody {
                archive_result: outcome.as_str(),
            },
        )
    }

    pub fn archive_row(&self, id: &RowId, outcome: ArchiveOutcome, assignee: &str) -> Result<()> {
        self.post_row(
            id,
            "archive",
            &ArchiveBody {
                archive_result: outcome.as_str(),
                assigned_to: assignee,
            },
        )
    }

    pub fn edit_row(&self, id: &RowId, fields: &InvoiceFields) -> Result<()> {
        let url = self.row_endpoint(id, Some("edit"))?;
        self.submit(url, fields)
    }

    pub fn create_row(&self, fields: &InvoiceFields) -> Result<()> {
        let url = self.endpoint(&["api", "manual_entry"])?;
        self.submit(url, fields)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("server.base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn row_endpoint(&self, id: &RowId, action: Option<&str>) -> Result<Url> {
        let mut segments = vec!["api", "row", id.as_str()];
        segments.extend(action);
        self.endpoint(&segments)
    }

    fn post_row(&self, id: &RowId, action: &str, body: &impl Serialize) -> Result<()> {
        let url = self.row_endpoint(id, Some(action))?;
        self.send(self.http.post(url).json(body)).map(drop)
    }

    /// Edit and manual entry answer `{success, error?}` even on 200.
    fn submit(&self, url: Url, fields: &InvoiceFields) -> Result<()> {
        let response = self.send(self.http.post(url).json(fields))?;
        let parsed: SubmitResponse = response.json().context("decode save response")?;
        if !parsed.success {
            let message = parsed
                .error
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| "the server did not save the invoice".to_owned());
            bail!("{message}");
        }
        Ok(())
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|error| connection_error(self.base_url.as_str(), error))?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "api response");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }
}

impl RowService for Client {
    fn fetch_rows(&mut self, assignees: &AssigneeFilter) -> Result<RowSets> {
        Client::fetch_rows(self, assignees)
    }

    fn upload(&mut self, files: &[SelectedFile]) -> Result<UploadResponse> {
        Client::upload(self, files)
    }

    fn delete_row(&mut self, id: &RowId) -> Result<()> {
        Client::delete_row(self, id)
    }

    fn unarchive_row(&mut self, id: &RowId) -> Result<()> {
        Client::unarchive_row(self, id)
    }

    fn set_notes(&mut self, id: &RowId, notes: &str) -> Result<()> {
        Client::set_notes(self, id, notes)
    }

    fn set_starred(&mut self, id: &RowId, starred: bool) -> Result<()> {
        Client::set_starred(self, id, starred)
    }

    fn set_assignee(&mut self, id: &RowId, assignee: &str) -> Result<()> {
        Client::set_assignee(self, id, assignee)
    }

    fn set_archive_outcome(&mut self, id: &RowId, outcome: ArchiveOutcome) -> Result<()> {
        Client::set_archive_outcome(self, id, outcome)
    }

    fn archive_row(&mut self, id: &RowId, outcome: ArchiveOutcome, assignee: &str) -> Result<()> {
        Client::archive_row(self, id, outcome, assignee)
    }

    fn edit_row(&mut self, id: &RowId, fields: &InvoiceFields) -> Result<()> {
        Client::edit_row(self, id, fields)
    }

    fn create_row(&mut self, fields: &InvoiceFields) -> Result<()> {
        Client::create_row(self, fields)
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!(
            "{base_url} did not answer in time -- raise [server].timeout or check the server ({error})"
        );
    }
    anyhow!(
        "cannot reach {base_url} -- check [server].base_url and that the invoice server is running ({error})"
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.error.or(parsed.message)
        && !message.trim().is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message.trim());
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('<') && !body.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), body);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Serialize)]
struct NotesBody<'a> {
    notes: &'a str,
}

#[derive(Debug, Serialize)]
struct StarredBody {
    starred: bool,
}

#[derive(Debug, Serialize)]
struct AssigneeBody<'a> {
    assigned_to: &'a str,
}

#[derive(Debug, Serialize)]
struct OutcomeBody<'a> {
    archive_result: &'a str,
}

#[derive(Debug, Serialize)]
struct ArchiveBody<'a> {
    archive_result: &'a str,
    assigned_to: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
