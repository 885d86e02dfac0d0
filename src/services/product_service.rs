use chrono::Utc;

use crate::{
    error::Result,
    forms::{MAX_FEATURE_PICTURES, NewProduct, ProductFiles, ProductUpdate, feature_picture_limit},
    models::{MediaImage, Product, StoredFile},
    services::media::{MediaChanges, MediaError, MediaRef, MediaServices},
    utils::slug::slugify,
};

/// Uploads the media of a new product and returns the unsaved document.
///
/// The returned changes must be committed once the document is stored, or
/// rolled back if storing it fails.
pub async fn build_product(
    media: &MediaServices,
    new: NewProduct,
) -> Result<(Product, MediaChanges)> {
    let mut product = Product::new(new.title, new.description, new.parent_category);
    product.subtitle = new.subtitle;
    product.usp_points = new.usp_points;
    product.sub_category = new.sub_category;
    product.status = new.status;
    product.featured = new.featured;
    product.parameters.0 = new.parameters;

    let mut changes = MediaChanges::default();

    if let Err(e) = attach_uploads(media, &mut product, &new.files, &mut changes).await {
        changes.rollback(media).await;
        return Err(e.into());
    }

    Ok((product, changes))
}

/// Applies a partial update in memory, uploading new media and staging removals.
///
/// Limits are checked before anything is touched, so a rejected update leaves
/// `product` as it was.
pub async fn apply_update(
    media: &MediaServices,
    product: &mut Product,
    update: ProductUpdate,
) -> Result<MediaChanges> {
    let ProductUpdate {
        title,
        subtitle,
        description,
        parent_category,
        sub_category,
        status,
        usp_points,
        featured,
        parameters,
        remove_images,
        remove_feature_pictures,
        remove_videos,
        remove_quickstart_indices,
        remove_download_indices,
        files,
    } = update;

    if !files.feature_pictures.is_empty() {
        let remaining = product
            .feature_pictures
            .iter()
            .filter(|picture| !remove_feature_pictures.contains(&picture.public_id))
            .count();

        if remaining + files.feature_pictures.len() > MAX_FEATURE_PICTURES {
            return Err(feature_picture_limit());
        }
    }

    if let Some(title) = title {
        product.title = title;
    }
    if let Some(subtitle) = subtitle {
        product.subtitle = Some(subtitle);
    }
    if let Some(description) = description {
        product.description = description;
    }
    if let Some(parent_category) = parent_category {
        product.parent_category = parent_category;
    }
    if let Some(sub_category) = sub_category {
        product.sub_category = Some(sub_category);
    }
    if let Some(status) = status {
        product.status = status;
    }
    if let Some(usp_points) = usp_points {
        product.usp_points = usp_points;
    }
    if let Some(featured) = featured {
        product.featured = featured;
    }
    if let Some(parameters) = parameters {
        product.parameters.0 = parameters;
    }

    let mut changes = MediaChanges::default();

    detach_images(&mut product.images.0, &remove_images, &mut changes);
    detach_images(
        &mut product.feature_pictures.0,
        &remove_feature_pictures,
        &mut changes,
    );

    let video_paths: Vec<String> = remove_videos
        .iter()
        .filter_map(|reference| media.storage.resolve_path(reference))
        .collect();
    detach_files(&mut product.videos.0, &mut changes, |_, file| {
        video_paths.contains(&file.path)
    });

    detach_files(&mut product.pdf.quickstartpdfs, &mut changes, |index, _| {
        remove_quickstart_indices.contains(&index)
    });
    detach_files(&mut product.pdf.downloadpdfs, &mut changes, |index, _| {
        remove_download_indices.contains(&index)
    });

    if let Err(e) = attach_uploads(media, product, &files, &mut changes).await {
        changes.rollback(media).await;
        return Err(e.into());
    }

    product.updated_at = Utc::now();

    Ok(changes)
}

async fn attach_uploads(
    media: &MediaServices,
    product: &mut Product,
    files: &ProductFiles,
    changes: &mut MediaChanges,
) -> std::result::Result<(), MediaError> {
    let slug = slugify(&product.title);

    let images = media
        .upload_images(&files.images, &format!("products/images/{}", slug), changes)
        .await?;
    product.images.extend(images);

    let feature_pictures = media
        .upload_images(
            &files.feature_pictures,
            &format!("products/featurepictures/{}", slug),
            changes,
        )
        .await?;
    product.feature_pictures.extend(feature_pictures);

    let videos = media
        .upload_files(&files.videos, &format!("products/{}/videos", slug), changes)
        .await?;
    product.videos.extend(videos);

    let quickstart = media
        .upload_files(
            &files.quickstart_pdfs,
            &format!("products/{}/quickstart", slug),
            changes,
        )
        .await?;
    product.pdf.quickstartpdfs.extend(quickstart);

    let download = media
        .upload_files(
            &files.download_pdfs,
            &format!("products/{}/download", slug),
            changes,
        )
        .await?;
    product.pdf.downloadpdfs.extend(download);

    Ok(())
}

fn detach_images(images: &mut Vec<MediaImage>, public_ids: &[String], changes: &mut MediaChanges) {
    images.retain(|image| {
        let remove = public_ids.contains(&image.public_id);
        if remove {
            changes.detach(MediaRef::Cdn(image.public_id.clone()));
        }
        !remove
    });
}

fn detach_files<F>(files: &mut Vec<StoredFile>, changes: &mut MediaChanges, mut remove: F)
where
    F: FnMut(usize, &StoredFile) -> bool,
{
    let mut index = 0;
    files.retain(|file| {
        let drop = remove(index, file);
        index += 1;
        if drop {
            changes.detach(MediaRef::Storage(file.path.clone()));
        }
        !drop
    });
}
