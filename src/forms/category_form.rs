use crate::error::{AppError, Result};

use super::{FileKind, MultipartForm, UploadedFile};

#[derive(Debug)]
pub struct NewCategory {
    pub name: String,
    pub image: UploadedFile,
}

impl NewCategory {
    pub fn from_form(mut form: MultipartForm) -> Result<Self> {
        let name = form.take_text("categoryname").ok_or_else(|| {
            AppError::BadRequest("Parent category is required".to_string())
        })?;

        let mut images = form.take_files("images");
        form.ensure_no_files_left()?;

        let image = match images.len() {
            0 => {
                return Err(AppError::BadRequest(
                    "Exactly one image is required".to_string(),
                ));
            }
            1 => images.remove(0),
            _ => {
                return Err(AppError::BadRequest(
                    "Only one image is allowed".to_string(),
                ));
            }
        };

        Ok(Self {
            name,
            image: check_image(image)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub status: Option<bool>,
    pub image: Option<UploadedFile>,
}

impl CategoryUpdate {
    pub fn from_form(mut form: MultipartForm) -> Result<Self> {
        let mut images = form.take_files("images");
        form.ensure_no_files_left()?;

        if images.len() > 1 {
            return Err(AppError::BadRequest(
                "Only one image is allowed".to_string(),
            ));
        }

        let status = match form.take_text("status").as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                return Err(AppError::BadRequest("Invalid status value".to_string()));
            }
        };

        Ok(Self {
            name: form.take_text("categoryname"),
            status,
            image: images.pop().map(check_image).transpose()?,
        })
    }
}

fn check_image(image: UploadedFile) -> Result<UploadedFile> {
    if image.data.is_empty() || image.kind() != Some(FileKind::Image) {
        return Err(AppError::BadRequest("Invalid image file".to_string()));
    }
    Ok(image)
}
