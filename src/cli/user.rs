//! User CLI commands
//!
//! Maintains the directory used to resolve revision authors.

use clap::Subcommand;

use crate::display::format_user_list;
use crate::error::{AuditError, AuditResult};
use crate::models::{UserId, UserProfile};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Add or replace a user
    Add {
        /// User ID as stored on revisions
        id: UserId,
        /// Username shown as the author
        #[arg(short, long)]
        username: Option<String>,
        /// System identifier used when the username is empty
        #[arg(short, long)]
        system_id: Option<String>,
    },
    /// List all users
    List,
}

/// Handle a user command
pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> AuditResult<()> {
    match cmd {
        UserCommands::Add {
            id,
            username,
            system_id,
        } => {
            if username.is_none() && system_id.is_none() {
                return Err(AuditError::Validation(
                    "Provide --username or --system-id".into(),
                ));
            }

            let user = UserProfile::new(id, username, system_id);
            let shown_as = user.display_name().map(str::to_string);
            storage.users.upsert(user)?;
            storage.users.save()?;

            match shown_as {
                Some(name) => println!("Saved user {} (shown as {})", id, name),
                None => println!("Saved user {} (no usable name, shown as Unknown)", id),
            }
        }

        UserCommands::List => {
            let users = storage.users.get_all()?;
            print!("{}", format_user_list(&users));
        }
    }

    Ok(())
}
