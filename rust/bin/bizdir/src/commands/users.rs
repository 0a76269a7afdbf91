//! Account administration: `migrate-users`, `create-superuser`, `grant`.

use crate::context::Context;

/// Copy legacy accounts into the user store and print the counts.
pub fn migrate(ctx: &Context) -> anyhow::Result<()> {
    let auth = ctx.auth()?;
    let report = auth.migrate_legacy_users()?;
    println!(
        "created={}, emails_updated={}, already_existing={}",
        report.created, report.emails_updated, report.already_existing
    );
    Ok(())
}

/// Resolve the password from the flag or an interactive prompt.
pub fn read_password(password: Option<String>) -> anyhow::Result<String> {
    if let Some(p) = password {
        if p.is_empty() {
            anyhow::bail!("Password cannot be empty.");
        }
        return Ok(p);
    }
    let pw = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Password (again): ")?;
    if pw != confirm {
        anyhow::bail!("Passwords do not match.");
    }
    if pw.is_empty() {
        anyhow::bail!("Password cannot be empty.");
    }
    Ok(pw)
}

pub fn create_superuser(ctx: &Context, username: &str, email: &str, password: &str) -> anyhow::Result<()> {
    let user = ctx.auth()?.create_superuser(username, email, password)?;
    println!("Superuser {} created.", user.username);
    Ok(())
}

/// Grant `permission` to a user, or to a group with `group = true`.
pub fn grant(ctx: &Context, name: &str, permission: &str, group: bool) -> anyhow::Result<()> {
    let auth = ctx.auth()?;
    if group {
        auth.grant_group_permission(name, permission)?;
        println!("Granted {} to group {}.", permission, name);
    } else {
        auth.grant_user_permission(name, permission)?;
        println!("Granted {} to user {}.", permission, name);
    }
    Ok(())
}
