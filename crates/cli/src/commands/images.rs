//! Image feed, tag search, hearts, and uploads.

use std::path::Path;

use spark_canvas_client::core::{Image, ImageId, ImageUpload, Page, parse_tags};

use super::{CommandError, Context};

#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context, page: Page) -> Result<(), CommandError> {
    ctx.visit("/");
    let images = ctx.client.list_images(page).await?;
    if images.is_empty() {
        println!("No images yet");
    }
    for image in &images {
        print_image(ctx, image);
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: ImageId) -> Result<(), CommandError> {
    ctx.visit("/");
    let image = ctx.client.get_image(id).await?;
    print_image(ctx, &image);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn by_tag(ctx: &Context, tag: &str, page: Page) -> Result<(), CommandError> {
    ctx.visit("/");
    let images = ctx.client.images_by_tag(tag, page).await?;
    if images.is_empty() {
        println!("No images tagged #{tag}");
    }
    for image in &images {
        print_image(ctx, image);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn heart(ctx: &Context, id: ImageId) -> Result<(), CommandError> {
    ctx.visit("/");
    let user = ctx.current_user()?;
    let count = ctx.client.heart_image(id, user.id).await?;
    println!("Image {id} now has {} hearts", count.hearts);
    Ok(())
}

/// Upload a file from disk as the logged-in user.
#[allow(clippy::print_stdout)]
pub async fn upload(
    ctx: &Context,
    file: &Path,
    caption: Option<String>,
    tags: Option<&str>,
    content_type: Option<String>,
) -> Result<(), CommandError> {
    ctx.visit("/upload");
    let user = ctx.current_user()?;

    let bytes = tokio::fs::read(file)
        .await
        .map_err(|source| CommandError::ReadFile {
            path: file.to_path_buf(),
            source,
        })?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut upload = ImageUpload::new(file_name, bytes, user.id)?
        .with_tags(tags.map(parse_tags).unwrap_or_default());
    if let Some(caption) = caption {
        upload = upload.with_caption(caption);
    }
    if let Some(content_type) = content_type.or_else(|| guess_content_type(file)) {
        upload = upload.with_content_type(content_type);
    }

    let created = ctx.client.upload_image(&upload).await?;
    println!("Uploaded image {}", created.id);
    if let Some(url) = created.url {
        println!("  {}", ctx.gateway.display_url(&url));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub(super) fn print_image(ctx: &Context, image: &Image) {
    println!(
        "#{} {} [{} hearts] by user {}",
        image.id,
        image.alt_text(),
        image.hearts,
        image.uploaded_by
    );
    println!("  {}", ctx.gateway.display_url(&image.url));
    if !image.tags.is_empty() {
        println!("  tags: {}", image.tags.join(", "));
    }
}

fn guess_content_type(file: &Path) -> Option<String> {
    let extension = file.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime.to_owned())
}
