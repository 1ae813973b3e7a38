use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swapshare_core::{
    ensure_data_dir, get_default_store_path, Item, ItemStore, ProxyClient, SupabaseClient,
    SupabaseConfig, SwapBadge, CATEGORIES,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const ENV_PROXY_URL: &str = "SWAPSHARE_PROXY_URL";
const ENV_API_KEY: &str = "SWAPSHARE_API_KEY";

/// Swap & Share CLI - browse local items and manage your account
#[derive(Parser)]
#[command(name = "swapshare")]
#[command(about = "Swap & Share command-line client", long_about = None)]
struct Cli {
    /// Item store path (defaults to the platform data directory)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the browse categories
    Categories,

    /// Manage locally stored items
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },

    /// Show the number of new swap notifications
    Badge {
        /// Current user's ID
        #[arg(long)]
        user_id: String,

        /// Session token for row-level reads
        #[arg(long)]
        access_token: Option<String>,
    },

    /// Show the account behind a session token
    Whoami {
        #[arg(long)]
        access_token: String,

        /// Proxy base URL
        #[arg(long, env = ENV_PROXY_URL, default_value = "http://localhost:5000")]
        proxy_url: String,
    },

    /// Ask for a sign-in link by email
    MagicLink {
        #[arg(long)]
        email: String,

        /// Proxy base URL
        #[arg(long, env = ENV_PROXY_URL, default_value = "http://localhost:5000")]
        proxy_url: String,
    },

    /// Delete an account and all of its data through the proxy
    DeleteAccount {
        #[arg(long)]
        user_id: String,

        /// Proxy base URL
        #[arg(long, env = ENV_PROXY_URL, default_value = "http://localhost:5000")]
        proxy_url: String,

        /// Shared secret for the proxy
        #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
        api_key: Option<String>,
    },
}

#[derive(Subcommand)]
enum ItemsAction {
    /// Insert the preview items
    Seed,

    /// List items, newest first
    List {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one item
    Show {
        #[arg(long)]
        id: i64,
    },

    /// Add an item
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Remove every item
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Categories => {
            for category in CATEGORIES {
                println!("{}", category);
            }
        }
        Commands::Items { action } => {
            let store = open_store(cli.database)?;
            run_items(&store, action)?;
        }
        Commands::Badge {
            user_id,
            access_token,
        } => {
            let mut config = SupabaseConfig::from_env()?;
            config.access_token = access_token;
            let backend = SupabaseClient::new(&config)?;

            info!("Fetching new swaps for {}", user_id);
            let badge = SwapBadge::new();
            let count = badge.refresh(&backend, Some(user_id.as_str())).await;
            println!("New swaps: {}", count);
        }
        Commands::Whoami {
            access_token,
            proxy_url,
        } => {
            let client = ProxyClient::new(&proxy_url, None)?;
            let user = client.auth_user(&access_token).await?;
            println!("{}", user.id);
            if let Some(email) = user.email {
                println!("  email: {}", email);
            }
            if let Some(last) = user.last_sign_in_at {
                println!("  last sign-in: {}", last);
            }
        }
        Commands::MagicLink { email, proxy_url } => {
            let client = ProxyClient::new(&proxy_url, None)?;
            client.request_magic_link(&email, None).await?;
            println!("Magic link sent to {}", email);
        }
        Commands::DeleteAccount {
            user_id,
            proxy_url,
            api_key,
        } => {
            info!("Deleting account {}", user_id);
            let client = ProxyClient::new(&proxy_url, api_key)?;
            let response = client.delete_user(&user_id).await?;
            println!("{}", response.message);
            for step in response.failed_steps {
                println!(
                    "  skipped {}.{}: {}",
                    step.table,
                    step.column,
                    step.error.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Result<ItemStore> {
    let path = match path {
        Some(path) => path,
        None => {
            ensure_data_dir()?;
            get_default_store_path()
        }
    };
    info!("Using item store at {}", path.display());
    Ok(ItemStore::open(&path)?)
}

fn run_items(store: &ItemStore, action: ItemsAction) -> Result<()> {
    match action {
        ItemsAction::Seed => {
            let inserted = store.seed_preview()?;
            println!("Inserted {} preview items", inserted);
        }
        ItemsAction::List { category } => {
            let items = match category {
                Some(category) => store.items_in_category(&category)?,
                None => store.list_items()?,
            };
            if items.is_empty() {
                println!("No items");
            }
            for item in items {
                println!(
                    "#{} {} [{}] {} ({})",
                    item.item_id.unwrap_or_default(),
                    item.name,
                    item.category,
                    item.description,
                    item.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
        }
        ItemsAction::Show { id } => {
            let item = store.get_item(id)?;
            println!("#{} {} [{}]", id, item.name, item.category);
            if !item.description.is_empty() {
                println!("  {}", item.description);
            }
            println!("  added {}", item.timestamp.format("%Y-%m-%d %H:%M"));
        }
        ItemsAction::Add {
            name,
            category,
            description,
        } => {
            if !CATEGORIES.contains(&category.as_str()) {
                tracing::warn!("{} is not one of the browse categories", category);
            }
            let id = store.add_item(&Item::new(&name, &category, &description))?;
            println!("Added item #{}", id);
        }
        ItemsAction::Clear => {
            let removed = store.clear()?;
            println!("Removed {} items", removed);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn items_commands_work_against_a_store() {
        let store = ItemStore::in_memory().unwrap();
        run_items(&store, ItemsAction::Seed).unwrap();
        run_items(
            &store,
            ItemsAction::Add {
                name: "Kettle".to_string(),
                category: "Home Appliances".to_string(),
                description: String::new(),
            },
        )
        .unwrap();
        assert_eq!(store.count_items().unwrap(), 11);

        run_items(&store, ItemsAction::Clear).unwrap();
        assert_eq!(store.count_items().unwrap(), 0);
    }

    #[test]
    fn show_reports_missing_item() {
        let store = ItemStore::in_memory().unwrap();
        let id = store
            .add_item(&Item::new("Kettle", "Home Appliances", "Barely used"))
            .unwrap();
        run_items(&store, ItemsAction::Show { id }).unwrap();
        assert!(run_items(&store, ItemsAction::Show { id: id + 1 }).is_err());
    }

    #[test]
    fn parses_whoami() {
        let cli = Cli::try_parse_from(["swapshare", "whoami", "--access-token", "token"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Whoami { access_token, .. } if access_token == "token"
        ));
    }

    #[test]
    fn parses_global_database_flag() {
        let cli = Cli::try_parse_from([
            "swapshare",
            "items",
            "list",
            "--category",
            "Books",
            "--database",
            "/tmp/items.db",
        ])
        .unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/items.db")));
        assert!(matches!(
            cli.command,
            Commands::Items {
                action: ItemsAction::List { category: Some(_) }
            }
        ));
    }
}
