use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Night Leech commands:")]
pub enum Command {
    #[command(description = "show the main menu.")]
    Start,
    #[command(description = "show this help.")]
    Help,
    #[command(description = "search all indexers.")]
    Search(String),
    // Sent by inline suggestions; behaves like /search.
    #[command(description = "search by title.")]
    Imdb(String),
    #[command(description = "list transfers.")]
    Downloads,
    #[command(description = "download client totals.")]
    Status,
}

impl Command {
    /// The search text for search-like commands.
    pub fn query(&self) -> Option<&str> {
        match self {
            Command::Search(q) | Command::Imdb(q) => Some(q.trim()),
            _ => None,
        }
    }
}
