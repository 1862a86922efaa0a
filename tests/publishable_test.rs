use async_trait::async_trait;
use chrono::{Duration, TimeZone};
use publishable::prelude::*;

#[model]
#[table(name = "albums")]
pub struct Album {
    #[primary_key]
    pub id: i64,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[model]
#[table(name = "features")]
pub struct Feature {
    #[primary_key]
    pub id: i64,
    pub public_since: Option<DateTime<Utc>>,
}

#[model]
#[table(name = "posts")]
pub struct Post {
    #[primary_key]
    pub id: i64,
    pub title: String,
    pub published: bool,
}

#[model]
#[table(name = "events")]
pub struct Event {
    #[primary_key]
    pub id: i64,
    pub published_on: Option<NaiveDate>,
}

#[model]
#[table(name = "notes")]
pub struct Note {
    #[primary_key]
    pub id: i64,
    pub published: String,
}

#[model]
#[table(name = "pages")]
pub struct Page {
    #[primary_key]
    pub id: i64,
    pub published_at: DateTime<Utc>,
}

#[model]
#[table(name = "drafts")]
pub struct Draft {
    #[primary_key]
    pub id: i64,
    pub title: String,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn album(id: i64, published_at: Option<DateTime<Utc>>) -> Album {
    Album {
        id,
        title: format!("Album {}", id),
        published_at,
    }
}

fn albums() -> Publisher<Album> {
    Publisher::<Album>::new(&BindOptions::new())
        .unwrap()
        .with_clock(FixedClock(now()))
}

fn album_ids(albums: Vec<Album>) -> Vec<i64> {
    albums.into_iter().map(|album| album.id).collect()
}

fn four_albums() -> MemoryStore<Album> {
    MemoryStore::with_records(vec![
        album(1, None),
        album(2, Some(now() - Duration::seconds(60))),
        album(3, Some(now())),
        album(4, Some(now() + Duration::seconds(60))),
    ])
}

#[test]
fn album_binds_published_at_by_default() {
    let publisher = albums();
    assert_eq!(publisher.column(), "published_at");
    assert_eq!(publisher.kind(), PublishKind::DateTime);
}

#[test]
fn album_is_not_published_without_moment_or_in_future() {
    let publisher = albums();

    let mut album = album(1, None);
    assert!(!publisher.is_published(&album));
    assert!(publisher.is_unpublished(&album));

    album.published_at = Some(now() + Duration::seconds(60));
    assert!(!publisher.is_published(&album));
    assert!(publisher.is_unpublished(&album));
}

#[test]
fn album_is_published_now_and_in_the_past() {
    let publisher = albums();

    let mut album = album(1, Some(now()));
    assert!(publisher.is_published(&album));

    album.published_at = Some(now() - Duration::seconds(60));
    assert!(publisher.is_published(&album));
    assert!(!publisher.is_unpublished(&album));
}

#[test]
fn publishing_sets_the_current_moment_once() {
    let publisher = albums();
    let mut album = album(1, None);

    assert!(publisher.publish(&mut album));
    assert!(publisher.is_published(&album));
    assert_eq!(album.published_at, Some(now()));

    let later = publisher.clone().with_clock(FixedClock(now() + Duration::hours(1)));
    assert!(!later.publish(&mut album));
    assert_eq!(album.published_at, Some(now()));
}

#[test]
fn publish_at_a_future_moment_schedules_the_record() {
    let publisher = albums();
    let mut album = album(1, None);
    let tomorrow = now() + Duration::days(1);

    assert!(publisher.publish_at(&mut album, tomorrow));
    assert!(publisher.is_unpublished(&album));
    assert!(publisher.is_published_at(&album, tomorrow));
}

#[tokio::test]
async fn published_scope_finds_past_and_present_records() {
    let store = four_albums();
    let found = store.find(albums().published()).await.unwrap();
    assert_eq!(album_ids(found), vec![2, 3]);
}

#[tokio::test]
async fn unpublished_scope_finds_unset_and_future_records() {
    let store = four_albums();
    let found = store.find(albums().unpublished()).await.unwrap();
    assert_eq!(album_ids(found), vec![1, 4]);
}

#[tokio::test]
async fn scopes_at_an_explicit_moment() {
    let store = four_albums();
    let publisher = albums();

    let found = store
        .find(publisher.published_at(now() + Duration::seconds(60)))
        .await
        .unwrap();
    assert_eq!(album_ids(found), vec![2, 3, 4]);

    let found = store
        .find(publisher.unpublished_at(now() - Duration::seconds(60)))
        .await
        .unwrap();
    assert_eq!(album_ids(found), vec![1, 3, 4]);
}

#[tokio::test]
async fn other_column_scopes() {
    let publisher = Publisher::<Feature>::new(&BindOptions::new().on("public_since"))
        .unwrap()
        .with_clock(FixedClock(now()));

    let mut feature = Feature {
        id: 9,
        public_since: None,
    };
    assert!(!publisher.is_published(&feature));
    publisher.publish(&mut feature);
    assert!(publisher.is_published(&feature));

    let store = MemoryStore::with_records(vec![
        Feature {
            id: 1,
            public_since: None,
        },
        Feature {
            id: 2,
            public_since: Some(now() - Duration::seconds(60)),
        },
        Feature {
            id: 3,
            public_since: Some(now()),
        },
        Feature {
            id: 4,
            public_since: Some(now() + Duration::seconds(60)),
        },
    ]);
    let ids = |features: Vec<Feature>| features.into_iter().map(|f| f.id).collect::<Vec<_>>();

    assert_eq!(
        ids(store.find(publisher.published()).await.unwrap()),
        vec![2, 3]
    );
    assert_eq!(
        ids(store.find(publisher.unpublished()).await.unwrap()),
        vec![1, 4]
    );
}

#[tokio::test]
async fn recent_and_upcoming_order_and_truncate() {
    let mut records = Vec::new();
    for hours in 1..=6 {
        records.push(album(hours, Some(now() - Duration::hours(hours))));
    }
    for hours in 1..=3 {
        records.push(album(100 + hours, Some(now() + Duration::hours(hours))));
    }
    records.push(album(200, None));
    // Shuffle insertion order so ordering comes from the scope
    records.reverse();
    let store = MemoryStore::with_records(records);

    let publisher = albums();
    let temporal = publisher.temporal().expect("datetime column has ordering scopes");

    let recent = store.find(temporal.recent(Some(2))).await.unwrap();
    assert_eq!(album_ids(recent), vec![1, 2]);

    let recent = store.find(temporal.recent(None)).await.unwrap();
    assert_eq!(album_ids(recent), vec![1, 2, 3, 4, 5, 6]);

    let upcoming = store.find(temporal.upcoming(Some(2))).await.unwrap();
    assert_eq!(album_ids(upcoming), vec![101, 102]);

    let upcoming = store.find(temporal.upcoming(None)).await.unwrap();
    assert_eq!(album_ids(upcoming), vec![101, 102, 103]);
}

#[tokio::test]
async fn publish_and_save_persists_the_record() {
    let store = MemoryStore::with_records(vec![album(1, None)]);
    let publisher = albums();

    let mut album = store.all().remove(0);
    let changed = publisher.publish_and_save(&mut album, &store).await.unwrap();
    assert!(changed);
    assert_eq!(store.all()[0].published_at, Some(now()));

    let changed = publisher.unpublish_and_save(&mut album, &store).await.unwrap();
    assert!(changed);
    assert_eq!(store.all()[0].published_at, None);
}

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

struct FailingStore;

#[async_trait]
impl RecordStore<Album> for FailingStore {
    type Error = DiskFull;

    async fn save(&self, _record: &Album) -> Result<(), DiskFull> {
        Err(DiskFull)
    }

    async fn find(&self, _query: QueryBuilder) -> Result<Vec<Album>, DiskFull> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn save_failures_are_returned_unchanged() {
    let publisher = albums();
    let mut album = album(1, None);

    let err = publisher
        .publish_and_save(&mut album, &FailingStore)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "disk full");
    // The in-memory change stays; only persistence failed
    assert_eq!(album.published_at, Some(now()));
}

#[tokio::test]
async fn save_happens_even_without_a_change() {
    let publisher = albums();
    let mut album = album(1, Some(now() - Duration::days(1)));

    let result = publisher.publish_and_save(&mut album, &FailingStore).await;
    assert!(result.is_err());
}

fn post(id: i64, published: bool) -> Post {
    Post {
        id,
        title: format!("Post {}", id),
        published,
    }
}

#[tokio::test]
async fn boolean_column_flags() {
    let publisher = Publisher::<Post>::new(&BindOptions::new()).unwrap();
    assert_eq!(publisher.kind(), PublishKind::Flag);
    assert!(publisher.temporal().is_none());

    let mut entry = post(1, false);
    assert!(publisher.is_unpublished(&entry));

    publisher.publish(&mut entry);
    publisher.publish(&mut entry);
    assert!(publisher.is_published(&entry));
    assert!(entry.published);

    publisher.unpublish(&mut entry);
    publisher.unpublish(&mut entry);
    assert!(publisher.is_unpublished(&entry));
    assert!(!entry.published);

    let store = MemoryStore::with_records(vec![post(1, true), post(2, false), post(3, true)]);
    let ids = |posts: Vec<Post>| posts.into_iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids(store.find(publisher.published()).await.unwrap()), vec![1, 3]);
    assert_eq!(ids(store.find(publisher.unpublished()).await.unwrap()), vec![2]);

    let arg = PublishArg::parse("0", &ColumnKind::Boolean).unwrap();
    let scope = publisher.scope_for(&arg).unwrap();
    assert_eq!(ids(store.find(scope).await.unwrap()), vec![2]);
}

#[tokio::test]
async fn date_column_compares_calendar_days() {
    let publisher = Publisher::<Event>::new(&BindOptions::new().on("published_on"))
        .unwrap()
        .with_clock(FixedClock(now()));
    assert_eq!(publisher.kind(), PublishKind::Date);

    let today = now().date_naive();
    let mut event = Event {
        id: 1,
        published_on: None,
    };
    assert!(publisher.publish(&mut event));
    assert_eq!(event.published_on, Some(today));
    assert!(publisher.is_published(&event));

    let store = MemoryStore::with_records(vec![
        Event {
            id: 1,
            published_on: today.pred_opt(),
        },
        Event {
            id: 2,
            published_on: Some(today),
        },
        Event {
            id: 3,
            published_on: today.succ_opt(),
        },
        Event {
            id: 4,
            published_on: None,
        },
    ]);
    let ids = |events: Vec<Event>| events.into_iter().map(|e| e.id).collect::<Vec<_>>();

    assert_eq!(ids(store.find(publisher.published()).await.unwrap()), vec![1, 2]);
    assert_eq!(ids(store.find(publisher.unpublished()).await.unwrap()), vec![3, 4]);

    let arg = PublishArg::parse("2024-05-02", &ColumnKind::Date).unwrap();
    let scope = publisher.scope_for(&arg).unwrap();
    assert_eq!(ids(store.find(scope).await.unwrap()), vec![1, 2, 3]);
}

#[test]
fn unsupported_column_type_fails_to_bind() {
    let err = bind::<Note>(&BindOptions::new()).unwrap_err();
    assert!(matches!(err, PublishableError::Configuration { .. }));

    let err = bind::<Note>(&BindOptions::new().skip_missing()).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn non_nullable_moment_column_fails_to_bind() {
    let err = Publisher::<Page>::new(&BindOptions::new()).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("published_at"));

    let err = bind::<Page>(&BindOptions::new().skip_missing()).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn missing_column_fails_unless_skipping() {
    let err = bind::<Draft>(&BindOptions::new()).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("drafts"));

    assert!(bind::<Draft>(&BindOptions::new().skip_missing()).unwrap().is_none());
}

#[test]
fn binding_from_toml_configuration() {
    let config = AppConfig::from_toml_str(
        r#"
        [publishable]
        column = "public_since"
        on_missing_column = "skip"
        "#,
    )
    .unwrap();
    let options = BindOptions::from_config(&config.publishable);

    assert!(bind::<Feature>(&options).unwrap().is_some());
    assert!(bind::<Album>(&options).unwrap().is_none());
}

#[test]
fn rebinding_is_independent() {
    let first = albums();
    let second = albums();
    assert_eq!(first.binding(), second.binding());

    let mut album = album(1, None);
    first.publish(&mut album);
    assert!(second.is_published(&album));
}

#[test]
fn version_is_exposed() {
    assert_eq!(publishable::VERSION, env!("CARGO_PKG_VERSION"));
}
