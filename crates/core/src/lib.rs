pub mod catalog;
pub mod config;
pub mod format;
pub mod navigation;
pub mod results;
pub mod searcher;
pub mod session;
pub mod testing;
pub mod title;
pub mod torrent_client;

pub use catalog::{CatalogError, ImdbClient, TitleSuggestion};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, NavigationConfig,
    SanitizedConfig,
};
pub use navigation::{
    paginate, resolve_view, Mode, NavigationState, PageInfo, Row, Transition, ViewDescriptor,
    ViewKind,
};
pub use results::{aggregate, Item, Locator, LocatorError, ResultSet, SortMode};
pub use searcher::{
    IndexerDirectory, IndexerEntry, IndexerStatus, JackettSearcher, RawResult, SearchError,
    SearchOutcome, SearchQuery, Searcher,
};
pub use session::{Conversation, Generation, SessionStore, TransitionOutcome};
pub use title::{classify, EpisodeTag, ParsedTitle, Quality};
pub use torrent_client::{
    QBittorrentClient, TorrentClient, TorrentClientError, TorrentState, TransferFile,
    TransferInfo, TransferStats,
};
