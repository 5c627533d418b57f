//! Collection commands.

use spark_canvas_client::core::{CollectionId, NewCollection};

use super::images::print_image;
use super::{CommandError, Context};

#[allow(clippy::print_stdout)]
pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    ctx.visit("/collections");
    let collections = ctx.client.list_collections().await?;
    if collections.is_empty() {
        println!("No collections yet");
    }
    for collection in collections {
        if collection.description.is_empty() {
            println!("#{} {}", collection.id, collection.title);
        } else {
            println!(
                "#{} {} - {}",
                collection.id, collection.title, collection.description
            );
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, id: CollectionId) -> Result<(), CommandError> {
    ctx.visit(&id.screen_path());
    let detail = ctx.client.get_collection(id).await?;
    println!("{}", detail.collection.title);
    if !detail.collection.description.is_empty() {
        println!("{}", detail.collection.description);
    }
    for image in &detail.images {
        print_image(ctx, image);
    }
    Ok(())
}

/// Create a collection and move to its screen.
#[allow(clippy::print_stdout)]
pub async fn create(ctx: &Context, title: &str, description: &str) -> Result<(), CommandError> {
    ctx.visit("/collections/new");
    let new = NewCollection::new(title, description)?;
    let created = ctx.client.create_collection(&new).await?;

    let screen = created.id.screen_path();
    ctx.visit(&screen);
    println!("Created collection {} at {screen}", created.id);
    Ok(())
}
