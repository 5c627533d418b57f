//! Session commands: login, register, logout, whoami.

use secrecy::{ExposeSecret, SecretString};
use spark_canvas_client::core::{Credentials, Registration};
use spark_canvas_client::navigation::REDIRECT_PARAM;
use spark_canvas_client::post_login_destination;

use super::{CommandError, Context};

/// Log in, optionally returning to the screen given by `from`.
#[allow(clippy::print_stdout)]
pub async fn login(
    ctx: &Context,
    username: &str,
    password: &SecretString,
    from: Option<&str>,
) -> Result<(), CommandError> {
    let location = login_location(&ctx.login_path, from);
    ctx.visit(&location);

    let credentials = Credentials::new(username, password.expose_secret())?;
    let response = ctx.client.login(&credentials).await?;

    let name = response
        .profile()
        .map_or_else(|_| username.to_owned(), |user| user.username);
    let destination = post_login_destination(&location);
    ctx.visit(&destination);

    println!("Logged in as {name}");
    println!("Continue at {destination}");
    Ok(())
}

/// Create an account and log into it.
#[allow(clippy::print_stdout)]
pub async fn register(
    ctx: &Context,
    username: &str,
    password: &SecretString,
    avatar_url: Option<String>,
) -> Result<(), CommandError> {
    ctx.visit(&ctx.login_path);

    let registration = Registration::new(username, password.expose_secret(), avatar_url)?;
    let response = ctx.client.register(&registration).await?;

    let name = response
        .profile()
        .map_or_else(|_| username.to_owned(), |user| user.username);
    ctx.visit("/");

    println!("Registered and logged in as {name}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    ctx.client.logout()?;
    println!("Logged out");
    Ok(())
}

/// Show the stored profile. Makes no request.
#[allow(clippy::print_stdout)]
pub fn whoami(ctx: &Context) -> Result<(), CommandError> {
    match ctx.current_user() {
        Ok(user) => {
            println!("{} (id {})", user.username, user.id);
            if let Some(avatar) = user.avatar_url {
                println!("  avatar: {}", ctx.gateway.display_url(&avatar));
            }
            Ok(())
        }
        Err(CommandError::NotLoggedIn) => {
            println!("Not logged in");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn login_location(login_path: &str, from: Option<&str>) -> String {
    match from {
        Some(from) => format!(
            "{login_path}?{REDIRECT_PARAM}={}",
            urlencoding::encode(from)
        ),
        None => login_path.to_owned(),
    }
}
