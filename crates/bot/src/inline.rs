//! Inline-mode title suggestions.

use nightleech_core::TitleSuggestion;
use teloxide::types::{
    InlineQueryResult, InlineQueryResultArticle, InputMessageContent, InputMessageContentText,
};

/// Seconds Telegram may cache an inline answer.
pub const CACHE_SECS: u32 = 300;

/// One article per suggestion. Picking one posts `/imdb <title> <year>`.
pub fn articles(suggestions: &[TitleSuggestion]) -> Vec<InlineQueryResult> {
    suggestions
        .iter()
        .map(|s| {
            let content = InputMessageContent::Text(InputMessageContentText::new(format!(
                "/imdb {}",
                s.search_text()
            )));
            let mut article = InlineQueryResultArticle::new(s.id.clone(), s.display(), content)
                .description("🎬 Tap to search");

            if let Some(url) = s
                .poster_url
                .as_deref()
                .and_then(|u| reqwest::Url::parse(u).ok())
            {
                article = article.thumbnail_url(url);
            }

            InlineQueryResult::Article(article)
        })
        .collect()
}
