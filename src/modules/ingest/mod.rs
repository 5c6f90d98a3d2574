//! News ingestion: scheduled RSS pulls and admin-triggered manual imports,
//! both feeding the DRAFT moderation queue.

pub mod classify;
pub mod rss;
pub mod scrape;

use chrono::Utc;
use sea_orm::*;
use serde::Serialize;

use crate::models::post::{self, Entity as Post};
use crate::services::ServiceError;
use crate::utils::slug::slugify;

#[derive(Debug, Default, Serialize)]
pub struct IngestSummary {
    pub imported: usize,
    pub skipped: usize,
    pub discarded: usize,
    pub errors: Vec<String>,
}

async fn slug_exists(db: &DatabaseConnection, slug: &str) -> Result<bool, DbErr> {
    let count = Post::find()
        .filter(post::Column::Slug.eq(slug))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Pull every configured feed and insert DRAFT posts for the newest
/// items. One feed failing is recorded and the rest continue.
pub async fn ingest_feeds(db: &DatabaseConnection) -> IngestSummary {
    let mut summary = IngestSummary::default();

    for url in rss::feed_urls() {
        let items = match rss::fetch_feed(&url).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Feed {} failed: {}", url, e);
                summary.errors.push(format!("{}: {}", url, e));
                continue;
            }
        };

        let source_name = reqwest::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()));

        for item in items.into_iter().take(rss::ITEMS_PER_FEED) {
            match ingest_item(db, item, source_name.as_deref()).await {
                Ok(ItemOutcome::Imported) => summary.imported += 1,
                Ok(ItemOutcome::Skipped) => summary.skipped += 1,
                Ok(ItemOutcome::Discarded) => summary.discarded += 1,
                Err(e) => summary.errors.push(e.to_string()),
            }
        }
    }

    tracing::info!(
        "News ingest done: {} imported, {} skipped, {} discarded, {} errors",
        summary.imported,
        summary.skipped,
        summary.discarded,
        summary.errors.len()
    );
    summary
}

enum ItemOutcome {
    Imported,
    Skipped,
    Discarded,
}

async fn ingest_item(
    db: &DatabaseConnection,
    item: rss::FeedItem,
    source_name: Option<&str>,
) -> Result<ItemOutcome, DbErr> {
    let slug = slugify(&item.title);
    if slug.is_empty() || slug_exists(db, &slug).await? {
        return Ok(ItemOutcome::Skipped);
    }

    // The cron path only keeps articles it can tag with a game
    let haystack = format!("{} {}", item.title, item.description.as_deref().unwrap_or(""));
    let game = match classify::classify_game(&haystack) {
        Some(game) => game,
        None => return Ok(ItemOutcome::Discarded),
    };

    let description = item.description.unwrap_or_default();
    let plain = scrape::strip_tags(&description);
    let excerpt: String = plain.chars().take(200).collect();
    let now = Utc::now().to_rfc3339();

    let new_post = post::ActiveModel {
        title: Set(item.title),
        slug: Set(slug),
        content: Set(description),
        excerpt: Set((!excerpt.is_empty()).then_some(excerpt)),
        thumbnail: Set(item.thumbnail),
        game: Set(Some(game.to_string())),
        source_url: Set(item.link),
        source_name: Set(source_name.map(|s| s.to_string())),
        status: Set("DRAFT".to_string()),
        views: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    new_post.insert(db).await?;

    Ok(ItemOutcome::Imported)
}

/// Manual import of a single article URL. Unlike the cron path an
/// unclassified article is kept (game stays null); a slug collision
/// is a conflict, not a silent skip.
pub async fn import_article(
    db: &DatabaseConnection,
    url: &str,
) -> Result<post::Model, ServiceError> {
    let article = scrape::scrape_article(url)
        .await
        .map_err(ServiceError::Validation)?;

    let slug = slugify(&article.title);
    if slug.is_empty() {
        return Err(ServiceError::Validation(
            "Không xác định được tiêu đề bài viết".to_string(),
        ));
    }
    if slug_exists(db, &slug).await? {
        return Err(ServiceError::Conflict(
            "Bài viết này đã tồn tại".to_string(),
        ));
    }

    let haystack = format!("{} {}", article.title, article.content);
    let game = classify::classify_game(&haystack);

    let source_name = reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()));
    let now = Utc::now().to_rfc3339();

    let new_post = post::ActiveModel {
        title: Set(article.title),
        slug: Set(slug),
        content: Set(article.content),
        excerpt: Set(article.excerpt),
        thumbnail: Set(article.thumbnail),
        game: Set(game.map(|g| g.to_string())),
        source_url: Set(Some(url.to_string())),
        source_name: Set(source_name),
        status: Set("DRAFT".to_string()),
        views: Set(0),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(new_post.insert(db).await?)
}
