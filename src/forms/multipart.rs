use std::collections::HashMap;

use axum::{body::Bytes, extract::Multipart};

use crate::error::{AppError, Result};

pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/jpg",
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "application/pdf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Video,
    Pdf,
}

/// A file part held fully in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn kind(&self) -> Option<FileKind> {
        if self.content_type.starts_with("image/") {
            Some(FileKind::Image)
        } else if self.content_type.starts_with("video/") {
            Some(FileKind::Video)
        } else if self.content_type == "application/pdf" {
            Some(FileKind::Pdf)
        } else {
            None
        }
    }
}

/// Text fields and files of a multipart body.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid value for field '{}': {}", name, e))
                })?;
                form.insert_text(name, value);
                continue;
            };

            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
                return Err(AppError::BadRequest(
                    "Invalid file type. Only image, video or PDF allowed".to_string(),
                ));
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

            if data.len() > MAX_FILE_SIZE {
                return Err(AppError::BadRequest(format!(
                    "File '{}' exceeds the {}MB limit",
                    file_name,
                    MAX_FILE_SIZE / 1024 / 1024
                )));
            }

            form.push_file(UploadedFile {
                field: name,
                file_name,
                content_type,
                data,
            });
        }

        Ok(form)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn push_file(&mut self, file: UploadedFile) {
        self.files.push(file);
    }

    /// Raw value, present even when empty.
    pub fn take_raw(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Value with surrounding whitespace removed, `None` when blank.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.take_raw(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn take_files(&mut self, field: &str) -> Vec<UploadedFile> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.field == field);
        self.files = rest;
        taken
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Fails on any file part that no `take_files` call claimed.
    pub fn ensure_no_files_left(&self) -> Result<()> {
        match self.files.first() {
            Some(file) => Err(AppError::BadRequest(format!(
                "Unexpected file field '{}'",
                file.field
            ))),
            None => Ok(()),
        }
    }
}

/// Decodes a JSON-encoded array field; malformed input names the field.
pub fn parse_json_list<T: serde::de::DeserializeOwned>(
    form: &mut MultipartForm,
    field: &str,
) -> Result<Option<Vec<T>>> {
    let Some(raw) = form.take_raw(field).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid {} format", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(field: &str, name: &str) -> UploadedFile {
        UploadedFile {
            field: field.into(),
            file_name: name.into(),
            content_type: "image/png".into(),
            data: Bytes::from_static(b"png"),
        }
    }

    #[test]
    fn take_text_trims_and_drops_blank_values() {
        let mut form = MultipartForm::default();
        form.insert_text("title", "  Desk Lamp ");
        form.insert_text("subtitle", "   ");

        assert_eq!(form.take_text("title").as_deref(), Some("Desk Lamp"));
        assert_eq!(form.take_text("subtitle"), None);
        assert_eq!(form.take_text("missing"), None);
    }

    #[test]
    fn take_files_only_claims_matching_field() {
        let mut form = MultipartForm::default();
        form.push_file(file("images", "a.png"));
        form.push_file(file("videos", "b.png"));
        form.push_file(file("images", "c.png"));

        let images = form.take_files("images");

        assert_eq!(images.len(), 2);
        assert_eq!(images[1].file_name, "c.png");
        assert_eq!(form.file_count(), 1);
        assert!(form.ensure_no_files_left().is_err());
    }

    #[test]
    fn malformed_json_list_names_the_field() {
        let mut form = MultipartForm::default();
        form.insert_text("removeImages", "[\"a\",");

        let err = parse_json_list::<String>(&mut form, "removeImages").unwrap_err();

        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid removeImages format"));
    }

    #[test]
    fn empty_json_list_is_treated_as_absent() {
        let mut form = MultipartForm::default();
        form.insert_text("removeVideos", "");

        assert!(parse_json_list::<String>(&mut form, "removeVideos").unwrap().is_none());
    }

    #[test]
    fn file_kind_follows_mime_type() {
        let mut pdf = file("files", "manual.pdf");
        pdf.content_type = "application/pdf".into();
        let mut video = file("files", "clip.mp4");
        video.content_type = "video/mp4".into();

        assert_eq!(file("files", "a.png").kind(), Some(FileKind::Image));
        assert_eq!(video.kind(), Some(FileKind::Video));
        assert_eq!(pdf.kind(), Some(FileKind::Pdf));
    }
}
