//! Tag commands.

use super::{CommandError, Context};

#[allow(clippy::print_stdout)]
pub async fn trending(ctx: &Context) -> Result<(), CommandError> {
    ctx.visit("/");
    let tags = ctx.client.trending_tags().await?;
    if tags.is_empty() {
        println!("No tags yet");
    }
    for tag in tags {
        println!("#{} ({})", tag.tag, tag.count);
    }
    Ok(())
}
