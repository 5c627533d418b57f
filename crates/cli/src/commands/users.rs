//! User profile commands.

use spark_canvas_client::core::UserId;

use super::images::print_image;
use super::{CommandError, Context};

#[allow(clippy::print_stdout)]
pub async fn show(ctx: &Context, id: UserId) -> Result<(), CommandError> {
    ctx.visit(&format!("/users/{id}"));
    let user = ctx.client.get_user(id).await?;
    println!("{} (id {})", user.username, user.id);
    if let Some(avatar) = user.avatar_url {
        println!("  avatar: {}", ctx.gateway.display_url(&avatar));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn images(ctx: &Context, id: UserId) -> Result<(), CommandError> {
    ctx.visit(&format!("/users/{id}"));
    let images = ctx.client.user_images(id).await?;
    if images.is_empty() {
        println!("User {id} has not uploaded anything yet");
    }
    for image in &images {
        print_image(ctx, image);
    }
    Ok(())
}
