use crate::api::ListApi;
use crate::controller::ListSyncController;
use crate::errors::SyncError;
use crate::events::UiEvent;
use crate::ui::{ListView, Section};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shopping-list")]
#[command(about = "Keep a shopping list in sync with its REST backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the API, overrides SHOPPING_LIST_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Answer yes to confirmation prompts.
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the list.
    List,
    /// Show the in-store view with quantities, prices and progress.
    Market,
    Summary {
        /// Ask the server for its own aggregate instead of deriving it locally.
        #[arg(long)]
        remote: bool,
    },
    Categories,
    Add {
        name: String,
        category: String,
    },
    Buy {
        id: i64,
    },
    Unbuy {
        id: i64,
    },
    Qty {
        id: i64,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    Price {
        id: i64,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    Rename {
        id: i64,
        name: String,
    },
    Move {
        id: i64,
        category: String,
    },
    Remove {
        id: i64,
    },
    Clear,
}

impl Command {
    pub fn event(&self) -> Option<UiEvent> {
        let event = match self {
            Command::List | Command::Categories => return None,
            Command::Market => UiEvent::OpenMarket,
            Command::Summary { remote: true } => UiEvent::FetchRemoteSummary,
            Command::Summary { remote: false } => UiEvent::ShowSummary,
            Command::Add { name, category } => UiEvent::AddItem {
                name: name.clone(),
                category: category.clone(),
            },
            Command::Buy { id } => UiEvent::SetPurchased { id: *id, checked: true },
            Command::Unbuy { id } => UiEvent::SetPurchased { id: *id, checked: false },
            Command::Qty { id, value } => UiEvent::SetQuantity {
                id: *id,
                raw: value.clone(),
            },
            Command::Price { id, value } => UiEvent::SetUnitPrice {
                id: *id,
                raw: value.clone(),
            },
            Command::Rename { id, name } => UiEvent::Rename {
                id: *id,
                name: name.clone(),
            },
            Command::Move { id, category } => UiEvent::Recategorize {
                id: *id,
                category: category.clone(),
            },
            Command::Remove { id } => UiEvent::Delete { id: *id },
            Command::Clear => UiEvent::ClearList,
        };
        Some(event)
    }

    /// Screen sections worth printing once the command has run.
    pub fn sections(&self) -> &'static [Section] {
        match self {
            Command::List | Command::Add { .. } | Command::Rename { .. } | Command::Move { .. } => {
                &[Section::Items]
            }
            Command::Categories => &[Section::Categories],
            Command::Summary { .. } => &[Section::Summary],
            Command::Market
            | Command::Buy { .. }
            | Command::Unbuy { .. }
            | Command::Qty { .. }
            | Command::Price { .. } => &[Section::Market, Section::Summary],
            Command::Remove { .. } | Command::Clear => &[Section::Items, Section::Summary],
        }
    }
}

/// Loads what the command needs, then feeds it to the controller as an event.
pub async fn run<A: ListApi, V: ListView>(
    controller: &ListSyncController<A, V>,
    command: &Command,
) -> Result<(), SyncError> {
    match command {
        Command::Categories => controller.load_categories().await.map(drop),
        Command::Summary { remote: true } => controller.fetch_remote_summary().await.map(drop),
        _ => {
            controller.load_items().await?;
            match command.event() {
                Some(event) => controller.dispatch(event).await,
                None => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands_into_events() {
        let cli = Cli::try_parse_from(["shopping-list", "qty", "3", "-1"]).unwrap();
        assert_eq!(
            cli.command.event(),
            Some(UiEvent::SetQuantity {
                id: 3,
                raw: "-1".to_string()
            })
        );

        let cli = Cli::try_parse_from(["shopping-list", "--yes", "remove", "7"]).unwrap();
        assert!(cli.yes);
        assert_eq!(cli.command.event(), Some(UiEvent::Delete { id: 7 }));
        assert_eq!(cli.command.sections(), &[Section::Items, Section::Summary]);
    }

    #[test]
    fn list_needs_no_event() {
        let cli = Cli::try_parse_from(["shopping-list", "list"]).unwrap();
        assert_eq!(cli.command.event(), None);
        assert_eq!(cli.log_level, "warn");
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn summary_flag_selects_remote_aggregate() {
        let cli = Cli::try_parse_from(["shopping-list", "summary", "--remote"]).unwrap();
        assert_eq!(cli.command.event(), Some(UiEvent::FetchRemoteSummary));
    }

    #[test]
    fn add_requires_both_arguments() {
        assert!(Cli::try_parse_from(["shopping-list", "add", "Leite"]).is_err());
    }
}
