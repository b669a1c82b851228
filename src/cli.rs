use clap::{Parser, Subcommand};

use crate::db::{AccountStorage, CreateUser, DeleteUser};
use crate::error::VaultError;

/// Wallet account server and user-management tool. Without a
/// subcommand, runs the HTTP server.
#[derive(Debug, Parser)]
#[command(name = "phantom-vault")]
pub struct Cli {
    /// Port to serve on (overrides VAULT_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all users
    List,
    /// Create a user
    Create { username: String, password: String },
    /// Delete a user
    Delete { username: String },
}

/// Run an admin subcommand against the storage layer. Expected
/// conflicts (duplicate, missing user) print a message and return Ok;
/// only real storage failures propagate.
pub async fn run(storage: &AccountStorage, command: Command) -> Result<(), VaultError> {
    match command {
        Command::List => {
            let users = storage.list_users().await?;
            if users.is_empty() {
                println!("No users in the database");
            } else {
                println!("Users in the database:");
                for user in users {
                    println!("ID: {}, Username: {}", user.id, user.username);
                }
            }
        }
        Command::Create { username, password } => {
            match storage.create_user(&username, &password).await? {
                CreateUser::Created => println!("User '{username}' created"),
                CreateUser::AlreadyExists => println!("Error: user '{username}' already exists"),
            }
        }
        Command::Delete { username } => match storage.delete_user(&username).await? {
            DeleteUser::Deleted => println!("User '{username}' deleted"),
            DeleteUser::NotFound => println!("Error: user '{username}' not found"),
        },
    }
    Ok(())
}
