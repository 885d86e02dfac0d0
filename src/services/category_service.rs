use chrono::Utc;

use crate::{
    error::{AppError, Result},
    forms::{CategoryUpdate, NewCategory, UploadedFile},
    models::{MediaImage, ParentCategory},
    services::media::{MediaChanges, MediaRef, MediaServices},
    utils::slug::slugify,
};

pub async fn build_category(
    media: &MediaServices,
    new: NewCategory,
) -> Result<(ParentCategory, MediaChanges)> {
    let mut changes = MediaChanges::default();
    let image = upload_image(media, &new.image, &new.name, &mut changes).await?;

    Ok((ParentCategory::new(new.name, image), changes))
}

/// Renames, toggles and swaps the image of a category in memory.
///
/// A replaced image is only staged for deletion; it is destroyed when the
/// returned changes are committed.
pub async fn apply_update(
    media: &MediaServices,
    category: &mut ParentCategory,
    update: CategoryUpdate,
) -> Result<MediaChanges> {
    let mut changes = MediaChanges::default();

    if let Some(name) = update.name {
        category.name = name;
    }
    if let Some(status) = update.status {
        category.status = status;
    }

    if let Some(file) = update.image {
        let image = upload_image(media, &file, &category.name, &mut changes).await?;
        let previous = std::mem::replace(&mut category.image.0, image);
        if !previous.public_id.is_empty() {
            changes.detach(MediaRef::Cdn(previous.public_id));
        }
    }

    category.updated_at = Utc::now();

    Ok(changes)
}

async fn upload_image(
    media: &MediaServices,
    file: &UploadedFile,
    category_name: &str,
    changes: &mut MediaChanges,
) -> Result<MediaImage> {
    let folder = format!("category/images/{}", slugify(category_name));

    media
        .upload_images(std::slice::from_ref(file), &folder, changes)
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Image upload failed".to_string()))
}
