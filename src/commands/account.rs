//! Account commands: stores, prices, password recovery and the contact form.

use owo_colors::OwoColorize;
use serde_json::json;
use url::Url;

use super::{CommandOutput, connect, connect_anonymous, print_json};
use crate::api::{Backend, ContactForm, NewStore};
use crate::display::{print_price, print_store_table};
use crate::error::{DeskError, Result};

/// Shortest password accepted by `password update`
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_new_store(name: &str, url: Option<&str>) -> Result<NewStore> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DeskError::Validation("Store name cannot be empty".to_string()));
    }
    let url = match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(u) => {
            Url::parse(u)
                .map_err(|_| DeskError::Validation(format!("Store URL '{u}' is not valid")))?;
            Some(u.to_string())
        }
        None => None,
    };
    Ok(NewStore {
        name: name.to_string(),
        url,
    })
}

pub fn validate_password_update(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(DeskError::Validation("Passwords do not match".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DeskError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_contact(name: &str, email: &str, message: &str) -> Result<ContactForm> {
    let (name, email, message) = (name.trim(), email.trim(), message.trim());
    if name.is_empty() {
        return Err(DeskError::Validation("Name cannot be empty".to_string()));
    }
    if email.is_empty() {
        return Err(DeskError::Validation("Email cannot be empty".to_string()));
    }
    if !email.contains('@') {
        return Err(DeskError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    if message.is_empty() {
        return Err(DeskError::Validation("Message cannot be empty".to_string()));
    }
    Ok(ContactForm {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

pub async fn cmd_stores_ls(output_json: bool) -> Result<()> {
    let conn = connect()?;
    let stores = conn.backend.list_stores(&conn.session).await?;
    if output_json {
        return print_json(&json!(stores));
    }
    print_store_table(&stores);
    Ok(())
}

pub async fn cmd_stores_create(name: &str, url: Option<&str>, output_json: bool) -> Result<()> {
    let store = validate_new_store(name, url)?;
    let conn = connect()?;
    let created = conn.backend.create_store(&conn.session, &store).await?;
    tracing::info!(store_id = %created.store_id, "store created");

    CommandOutput::new(json!(created))
        .with_text(format!(
            "Created store {} ({})",
            created.name.bold(),
            created.store_id.cyan()
        ))
        .print(output_json)
}

pub async fn cmd_price(currency: &str, fiat: Option<&str>, output_json: bool) -> Result<()> {
    let currency = currency.trim().to_uppercase();
    if currency.is_empty() {
        return Err(DeskError::Validation("Currency cannot be empty".to_string()));
    }
    let conn = connect()?;
    let fiat = fiat
        .map(|f| f.trim().to_uppercase())
        .unwrap_or_else(|| conn.config.default_fiat.clone());

    let price = conn
        .backend
        .currency_price(&conn.session, &currency, &fiat)
        .await?;
    if output_json {
        return print_json(&json!(price));
    }
    print_price(&price);
    Ok(())
}

pub async fn cmd_password_check(recovery_token: &str) -> Result<()> {
    let recovery_token = recovery_token.trim();
    if recovery_token.is_empty() {
        return Err(DeskError::Validation("Recovery token cannot be empty".to_string()));
    }
    let backend = connect_anonymous()?;
    backend.check_recovery_token(recovery_token).await?;
    println!("{}", "Recovery token is valid".green());
    Ok(())
}

pub async fn cmd_password_update(
    recovery_token: &str,
    password: &str,
    confirmation: &str,
) -> Result<()> {
    validate_password_update(password, confirmation)?;
    let backend = connect_anonymous()?;
    backend.update_password(recovery_token.trim(), password).await?;
    tracing::info!("password updated");
    println!("{}", "Password updated".green());
    Ok(())
}

pub async fn cmd_contact(name: &str, email: &str, message: &str) -> Result<()> {
    let form = validate_contact(name, email, message)?;
    let backend = connect_anonymous()?;
    backend.submit_contact(&form).await?;
    println!("Thanks {}, we will get back to you at {}", form.name, form.email.cyan());
    Ok(())
}
