//! # Blog Example
//!
//! Scheduled blog posts and a site-wide announcement flag:
//! - datetime publish column with recent/upcoming listings
//! - boolean publish column toggled on and off
//! - query-string style arguments normalized into scopes
//!
//! Runs entirely in memory; set `PUBLISHABLE_CONFIG` to a TOML file to
//! override the column binding options.

use chrono::Duration;
use publishable::prelude::*;

/// Blog post that goes live at `published_at`
#[model]
#[table(name = "posts")]
pub struct Post {
    #[primary_key]
    pub id: i64,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Banner shown while `published` is on
#[model]
#[table(name = "announcements")]
pub struct Announcement {
    #[primary_key]
    pub id: i64,
    pub message: String,
    pub published: bool,
}

fn print_posts(heading: &str, posts: &[Post]) {
    println!("{}", heading);
    for post in posts {
        match post.published_at {
            Some(at) => println!("   - {} ({})", post.title, at.format("%Y-%m-%d %H:%M")),
            None => println!("   - {} (draft)", post.title),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("📝 publishable Blog Example (v{})", publishable::VERSION);
    println!("===============================");

    // 1. Binding options: config file if present, defaults otherwise
    let options = match AppConfig::load() {
        Ok(config) => BindOptions::from_config(&config.publishable),
        Err(_) => BindOptions::new(),
    };

    let posts = Publisher::<Post>::new(&options)?;
    let announcements = Publisher::<Announcement>::new(&BindOptions::new())?;
    println!(
        "✅ Bound posts.{} ({:?}) and announcements.{} ({:?})",
        posts.column(),
        posts.kind(),
        announcements.column(),
        announcements.kind()
    );

    // 2. Seed posts around the current moment
    let now = posts.now();
    let post_store = MemoryStore::with_records(vec![
        Post {
            id: 1,
            title: "Hello, world".to_string(),
            published_at: Some(now - Duration::days(7)),
        },
        Post {
            id: 2,
            title: "Release notes".to_string(),
            published_at: Some(now - Duration::days(1)),
        },
        Post {
            id: 3,
            title: "Roadmap".to_string(),
            published_at: Some(now + Duration::days(2)),
        },
        Post {
            id: 4,
            title: "Half-written idea".to_string(),
            published_at: None,
        },
    ]);

    // 3. Publish the draft right away and persist it
    let mut draft = post_store
        .find(QueryBuilder::new().filter(QueryFilter::is_null("published_at")))
        .await?
        .remove(0);
    posts.publish_and_save(&mut draft, &post_store).await?;
    println!("🚀 Published '{}'", draft.title);

    // 4. Listings
    let temporal = posts
        .temporal()
        .ok_or_else(|| anyhow::anyhow!("posts need a temporal publish column"))?;

    let recent = post_store.find(temporal.recent(Some(3))).await?;
    print_posts("📰 Recent posts:", &recent);

    let upcoming = post_store.find(temporal.upcoming(None)).await?;
    print_posts("📅 Upcoming posts:", &upcoming);

    // 5. Query-string style filtering: ?published=0
    let arg = PublishArg::parse("0", &posts.kind().column_kind())?;
    let unpublished = post_store.find(posts.scope_for(&arg)?).await?;
    print_posts("🕒 Not yet published:", &unpublished);

    // 6. Announcement flag
    let announcement_store = MemoryStore::new();
    let mut banner = Announcement {
        id: 1,
        message: "Scheduled maintenance on Sunday".to_string(),
        published: false,
    };
    announcements.publish_and_save(&mut banner, &announcement_store).await?;
    let live = announcement_store.find(announcements.published()).await?;
    println!("📣 Live announcements: {}", live.len());

    announcements.unpublish_and_save(&mut banner, &announcement_store).await?;
    let live = announcement_store.find(announcements.published()).await?;
    println!("📣 Live announcements after unpublish: {}", live.len());

    println!("🎉 Done");
    Ok(())
}
