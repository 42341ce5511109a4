//! Login, registration, OTP verification and logout screens.
//!
//! # Usage
//!
//! ```bash
//! warung login --phone 081234567890 --password rahasia123
//!
//! # Registers 6281234567890, then asks for the OTP
//! warung register --name "Sari" --phone 0812-3456-7890 --password rahasia123
//!
//! warung logout
//! ```
//!
//! The pending registration lives only as long as the process, so
//! `verify-otp` on its own always redirects to registration.

use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use warung_client::services::AuthService;
use warung_client::session::{OtpGate, Session};
use warung_core::PhoneNumber;

use super::{CommandError, Context};
use crate::render;

pub async fn login(ctx: &Context, phone: &str, password: SecretString) -> Result<(), CommandError> {
    let auth = AuthService::new(&ctx.api);
    let mut session = Session::new(&auth);

    let route = session.login(phone, &password).await?;
    render::notice("Signed in");
    render::route(route);
    Ok(())
}

pub async fn register(
    ctx: &Context,
    name: &str,
    phone: &str,
    password: SecretString,
    otp: Option<String>,
) -> Result<(), CommandError> {
    let phone = PhoneNumber::parse(phone)?.to_international();
    let auth = AuthService::new(&ctx.api);
    let mut session = Session::new(&auth);

    let route = session.register(name, &phone, &password).await?;
    render::notice(&format!("Account created; an OTP was sent to {phone}"));
    render::route(route);

    otp_screen(&mut session, otp).await
}

pub async fn verify_otp(ctx: &Context, otp: &str) -> Result<(), CommandError> {
    let auth = AuthService::new(&ctx.api);
    let mut session = Session::restore(&auth, ctx.api.store())?;
    otp_screen(&mut session, Some(otp.to_string())).await
}

pub async fn logout(ctx: &Context) -> Result<(), CommandError> {
    let auth = AuthService::new(&ctx.api);
    let mut session = Session::restore(&auth, ctx.api.store())?;

    let outcome = session.logout().await;
    if let Some(e) = &outcome.server_error {
        render::notice(&format!("Signed out on this device (server said: {e})"));
    } else {
        render::notice("Signed out");
    }
    render::route(outcome.route);
    Ok(())
}

/// The OTP screen: submits for the pending phone, or redirects when there
/// is none.
async fn otp_screen(session: &mut Session<'_>, otp: Option<String>) -> Result<(), CommandError> {
    let phone = match session.otp_gate() {
        OtpGate::Ready(phone) => phone,
        OtpGate::Redirect(route) => {
            return Err(CommandError::Redirect {
                route,
                reason: "No registration is awaiting verification",
            });
        }
    };

    let otp = match otp {
        Some(otp) => otp,
        None => prompt(&format!("OTP for {phone}: ")).await?,
    };
    let otp = otp.trim();
    if otp.is_empty() {
        return Err(CommandError::InvalidArgument("OTP is required".to_string()));
    }

    let route = session.verify_otp(otp).await?;
    render::notice("Phone number verified; you can sign in now");
    render::route(route);
    Ok(())
}

async fn prompt(label: &str) -> Result<String, CommandError> {
    let mut stderr = tokio::io::stderr();
    stderr.write_all(label.as_bytes()).await?;
    stderr.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    Ok(lines.next_line().await?.unwrap_or_default())
}
