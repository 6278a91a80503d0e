//! Drive-backed [`ObjectStore`] over HTTP.
//!
//! Talks to the Drive v3 REST surface: name queries against `/files`,
//! `alt=media` downloads, and multipart-related uploads (metadata part plus
//! JSON payload part) that create or patch in place. Endpoints come from
//! config so tests and proxies can point elsewhere.

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;

use super::object::{ObjectStore, RemoteObject};
use crate::config::PromptzConfig;
use crate::error::Result;

const MULTIPART_BOUNDARY: &str = "-------314159265358979323846";

pub struct HttpStore {
    client: Client,
    token: String,
    api_base: String,
    upload_base: String,
    revoke_url: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileMeta>,
}

#[derive(Deserialize)]
struct FileMeta {
    id: String,
    #[serde(rename = "modifiedTime")]
    modified_time: Option<String>,
}

fn multipart_body(metadata: &str, payload: &str) -> String {
    let delimiter = format!("\r\n--{}\r\n", MULTIPART_BOUNDARY);
    let close_delim = format!("\r\n--{}--", MULTIPART_BOUNDARY);
    format!(
        "{}Content-Type: application/json; charset=UTF-8\r\n\r\n{}{}Content-Type: application/json\r\n\r\n{}{}",
        delimiter, metadata, delimiter, payload, close_delim
    )
}

impl HttpStore {
    pub fn new(token: &str, config: &PromptzConfig) -> Self {
        Self {
            client: Client::new(),
            token: token.to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
            revoke_url: config.revoke_url.clone(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl ObjectStore for HttpStore {
    fn find(&self, name: &str) -> Result<Option<RemoteObject>> {
        let query = format!("name='{}' and trashed=false", name);
        let response = self
            .client
            .get(format!("{}/files", self.api_base))
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name,modifiedTime)"),
            ])
            .header(AUTHORIZATION, self.bearer())
            .send()?
            .error_for_status()?;
        let list: FileList = response.json()?;
        Ok(list.files.into_iter().next().map(|f| RemoteObject {
            id: f.id,
            modified: f.modified_time,
        }))
    }

    fn download(&self, id: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/files/{}", self.api_base, id))
            .query(&[("alt", "media")])
            .header(AUTHORIZATION, self.bearer())
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.text()?))
    }

    fn upload(&self, id: Option<&str>, name: &str, body: &str) -> Result<String> {
        let metadata =
            serde_json::json!({ "name": name, "mimeType": "application/json" }).to_string();
        let request = match id {
            Some(id) => self
                .client
                .patch(format!("{}/files/{}", self.upload_base, id)),
            None => self.client.post(format!("{}/files", self.upload_base)),
        };
        let response = request
            .query(&[("uploadType", "multipart")])
            .header(AUTHORIZATION, self.bearer())
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(multipart_body(&metadata, body))
            .send()?
            .error_for_status()?;
        let meta: FileMeta = response.json()?;
        Ok(meta.id)
    }

    fn revoke(&self) -> Result<()> {
        self.client
            .post(&self.revoke_url)
            .query(&[("token", self.token.as_str())])
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_layout() {
        let body = multipart_body(r#"{"name":"db.json"}"#, r#"{"prompts":[]}"#);
        let expected = concat!(
            "\r\n---------314159265358979323846\r\n",
            "Content-Type: application/json; charset=UTF-8\r\n\r\n",
            r#"{"name":"db.json"}"#,
            "\r\n---------314159265358979323846\r\n",
            "Content-Type: application/json\r\n\r\n",
            r#"{"prompts":[]}"#,
            "\r\n---------314159265358979323846--",
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn endpoint_bases_are_trimmed() {
        let config = PromptzConfig {
            api_base: "https://example.test/drive/".to_string(),
            ..Default::default()
        };
        let store = HttpStore::new("tok", &config);
        assert_eq!(store.api_base, "https://example.test/drive");
    }
}
