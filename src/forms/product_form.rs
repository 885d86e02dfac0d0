use std::str::FromStr;

use crate::{
    error::{AppError, Result},
    models::{ParameterGroup, ProductStatus},
};

use super::{FileKind, MultipartForm, UploadedFile, parse_json_list, parse_parameters};

pub const MAX_FEATURE_PICTURES: usize = 10;
const MAX_MULTIPLE_FILES: usize = 10;

/// Flavours of the product create endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateVariant {
    CreateProduct,
    Single,
    Multiple,
}

impl FromStr for CreateVariant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "createproduct" => Ok(CreateVariant::CreateProduct),
            "single" => Ok(CreateVariant::Single),
            "multiple" => Ok(CreateVariant::Multiple),
            other => Err(AppError::NotFound(format!("Unknown route '{}'", other))),
        }
    }
}

impl CreateVariant {
    fn legacy_field(self) -> Option<&'static str> {
        match self {
            CreateVariant::CreateProduct => None,
            CreateVariant::Single => Some("file"),
            CreateVariant::Multiple => Some("files"),
        }
    }

    fn check_file_count(self, count: usize) -> Result<()> {
        match self {
            CreateVariant::Single if count > 1 => Err(AppError::BadRequest(
                "Only one file is allowed".to_string(),
            )),
            CreateVariant::Multiple if count > MAX_MULTIPLE_FILES => {
                Err(AppError::BadRequest(format!(
                    "Maximum {} files allowed",
                    MAX_MULTIPLE_FILES
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProductFiles {
    pub images: Vec<UploadedFile>,
    pub feature_pictures: Vec<UploadedFile>,
    pub videos: Vec<UploadedFile>,
    pub quickstart_pdfs: Vec<UploadedFile>,
    pub download_pdfs: Vec<UploadedFile>,
}

impl ProductFiles {
    fn take(form: &mut MultipartForm, legacy_field: Option<&str>) -> Result<Self> {
        let mut files = Self {
            images: form.take_files("images"),
            feature_pictures: form.take_files("featurePictures"),
            videos: form.take_files("videos"),
            quickstart_pdfs: form.take_files("quickstartpdfs"),
            download_pdfs: form.take_files("downloadpdfs"),
        };

        if let Some(field) = legacy_field {
            for file in form.take_files(field) {
                match file.kind() {
                    Some(FileKind::Image) => files.images.push(file),
                    Some(FileKind::Video) => files.videos.push(file),
                    Some(FileKind::Pdf) => files.download_pdfs.push(file),
                    None => {
                        return Err(AppError::BadRequest(
                            "Invalid file type. Only image, video or PDF allowed".to_string(),
                        ));
                    }
                }
            }
        }

        form.ensure_no_files_left()?;
        Ok(files)
    }

    pub fn len(&self) -> usize {
        self.images.len()
            + self.feature_pictures.len()
            + self.videos.len()
            + self.quickstart_pdfs.len()
            + self.download_pdfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct NewProduct {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: String,
    pub usp_points: Vec<String>,
    pub parent_category: String,
    pub sub_category: Option<String>,
    pub status: ProductStatus,
    pub featured: bool,
    pub parameters: Vec<ParameterGroup>,
    pub files: ProductFiles,
}

impl NewProduct {
    pub fn from_form(variant: CreateVariant, mut form: MultipartForm) -> Result<Self> {
        let title = form.take_text("title");
        let description = take_untrimmed(&mut form, "description");
        let parent_category = form.take_text("parentCategory");

        let (Some(title), Some(description), Some(parent_category)) =
            (title, description, parent_category)
        else {
            return Err(AppError::BadRequest(
                "Title, description & parent category are required".to_string(),
            ));
        };

        let files = ProductFiles::take(&mut form, variant.legacy_field())?;
        variant.check_file_count(files.len())?;

        if files.feature_pictures.len() > MAX_FEATURE_PICTURES {
            return Err(feature_picture_limit());
        }

        Ok(Self {
            title,
            subtitle: form.take_text("subtitle"),
            description,
            usp_points: take_usp_points(&mut form)?.unwrap_or_default(),
            parent_category,
            sub_category: form.take_text("subCategory"),
            status: take_status(&mut form)?.unwrap_or_default(),
            featured: take_featured(&mut form).unwrap_or(false),
            parameters: take_parameters(&mut form)?.unwrap_or_default(),
            files,
        })
    }
}

/// Partial update of a product; absent fields leave the stored value alone.
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub parent_category: Option<String>,
    pub sub_category: Option<String>,
    pub status: Option<ProductStatus>,
    pub usp_points: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub parameters: Option<Vec<ParameterGroup>>,
    pub remove_images: Vec<String>,
    pub remove_feature_pictures: Vec<String>,
    pub remove_videos: Vec<String>,
    pub remove_quickstart_indices: Vec<usize>,
    pub remove_download_indices: Vec<usize>,
    pub files: ProductFiles,
}

impl ProductUpdate {
    pub fn from_form(mut form: MultipartForm) -> Result<Self> {
        let files = ProductFiles::take(&mut form, None)?;

        Ok(Self {
            title: form.take_text("title"),
            subtitle: form.take_text("subtitle"),
            description: take_untrimmed(&mut form, "description"),
            parent_category: form.take_text("parentCategory"),
            sub_category: form.take_text("subCategory"),
            status: take_status(&mut form)?,
            usp_points: take_usp_points(&mut form)?,
            featured: take_featured(&mut form),
            parameters: take_parameters(&mut form)?,
            remove_images: parse_json_list(&mut form, "removeImages")?.unwrap_or_default(),
            remove_feature_pictures: parse_json_list(&mut form, "removeFeaturePictures")?
                .unwrap_or_default(),
            remove_videos: parse_json_list(&mut form, "removeVideos")?.unwrap_or_default(),
            remove_quickstart_indices: parse_json_list(&mut form, "removeQuickstartIndices")?
                .unwrap_or_default(),
            remove_download_indices: parse_json_list(&mut form, "removeDownloadIndices")?
                .unwrap_or_default(),
            files,
        })
    }
}

pub fn feature_picture_limit() -> AppError {
    AppError::BadRequest(format!(
        "Maximum {} feature pictures allowed",
        MAX_FEATURE_PICTURES
    ))
}

fn take_untrimmed(form: &mut MultipartForm, name: &str) -> Option<String> {
    form.take_raw(name).filter(|v| !v.trim().is_empty())
}

fn take_usp_points(form: &mut MultipartForm) -> Result<Option<Vec<String>>> {
    let points: Option<Vec<String>> = parse_json_list(form, "uspPoints")?;
    Ok(points.map(|points| points.into_iter().map(|p| p.trim().to_string()).collect()))
}

fn take_status(form: &mut MultipartForm) -> Result<Option<ProductStatus>> {
    form.take_text("status")
        .map(|s| s.parse().map_err(AppError::BadRequest))
        .transpose()
}

fn take_featured(form: &mut MultipartForm) -> Option<bool> {
    form.take_raw("featured").map(|v| v == "true")
}

fn take_parameters(form: &mut MultipartForm) -> Result<Option<Vec<ParameterGroup>>> {
    form.take_raw("parameters")
        .map(|raw| parse_parameters(&raw))
        .transpose()
}
