mod support;

use monotable::{Error, KeyValue, Store};
use support::*;

async fn seeded_store(db: &TestDb) -> Store {
    let (store, _) = test_store(db);
    let (musician, song1, song2) = a_musician_with_two_songs(db);

    store
        .put(&db.musician.key(&musician).unwrap(), &musician)
        .await
        .unwrap();
    store.put(&db.song.key(&song1).unwrap(), &song1).await.unwrap();
    store.put(&db.song.key(&song2).unwrap(), &song2).await.unwrap();

    store
}

fn partition_key(db: &TestDb) -> KeyValue {
    db.partition.key(&serde_json::json!({ "id": "1" })).unwrap()
}

#[tokio::test]
async fn query_returns_every_variant_in_the_partition() {
    let db = test_db();
    let store = seeded_store(&db).await;

    let page = store
        .query(partition_key(&db))
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 3);
    assert!(page.cursor.is_none());
    assert!(matches!(page.items[0], TestItem::Musician { .. }));
    assert!(matches!(page.items[1], TestItem::Song { ref id, .. } if id == "2"));
    assert!(matches!(page.items[2], TestItem::Song { ref id, .. } if id == "3"));
}

#[tokio::test]
async fn sort_key_begins_with_narrows_to_one_variant() {
    let db = test_db();
    let store = seeded_store(&db).await;

    let page = store
        .query(partition_key(&db))
        .sort_key_begins_with(db.song.sort_key_prefix())
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert!(page
        .items
        .iter()
        .all(|item| matches!(item, TestItem::Song { .. })));
}

#[tokio::test]
async fn sort_key_equals_selects_one_item() {
    let db = test_db();
    let store = seeded_store(&db).await;
    let (musician, _, _) = a_musician_with_two_songs(&db);

    let sort = db.musician.key(&musician).unwrap().sort().clone();
    let page = store
        .query(partition_key(&db))
        .sort_key_equals(sort)
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(matches!(page.items[0], TestItem::Musician { .. }));
}

#[tokio::test]
async fn sort_key_between_is_inclusive() {
    let db = test_db();
    let store = seeded_store(&db).await;
    let (_, song1, song2) = a_musician_with_two_songs(&db);

    let lower = db.song.key(&song1).unwrap().sort().clone();
    let upper = db.song.key(&song2).unwrap().sort().clone();
    let page = store
        .query(partition_key(&db))
        .sort_key_between(lower, upper)
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn pagination_stops_at_each_page_until_resumed() {
    let db = test_db();
    let store = seeded_store(&db).await;

    let first = store
        .query(partition_key(&db))
        .limit(2)
        .exec::<TestItem>()
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    let cursor = first.cursor.expect("more items remain");

    let second = store
        .query(partition_key(&db))
        .limit(2)
        .start_at(cursor)
        .exec::<TestItem>()
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(second.cursor.is_none());
    assert!(matches!(second.items[0], TestItem::Song { ref id, .. } if id == "3"));
}

#[tokio::test]
async fn descending_reverses_sort_order() {
    let db = test_db();
    let store = seeded_store(&db).await;

    let page = store
        .query(partition_key(&db))
        .descending()
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 3);
    assert!(matches!(page.items[0], TestItem::Song { ref id, .. } if id == "3"));
    assert!(matches!(page.items[2], TestItem::Musician { .. }));
}

#[tokio::test]
async fn gsi_queries_project_by_their_own_keys() {
    let db = test_db();
    let store = seeded_store(&db).await;

    let page = store
        .query(db.by_model_and_id.key("song"))
        .index(&db.by_model_and_id)
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert!(matches!(page.items[0], TestItem::Song { ref id, .. } if id == "2"));

    let page = store
        .query(db.by_name_and_id.key("Bob Marley"))
        .index(&db.by_name_and_id)
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(matches!(page.items[0], TestItem::Musician { .. }));
}

#[tokio::test]
async fn gsi_sort_conditions_use_the_index_sort_key() {
    let db = test_db();
    let store = seeded_store(&db).await;

    let page = store
        .query(db.by_model_and_id.key("song"))
        .index(&db.by_model_and_id)
        .sort_key_equals(KeyValue::new("id", "3"))
        .exec::<TestItem>()
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(matches!(page.items[0], TestItem::Song { ref id, .. } if id == "3"));
}

#[tokio::test]
async fn foreign_sort_attribute_fails_before_any_request() {
    let db = test_db();
    let store = seeded_store(&db).await;

    // `id` is a GSI sort key, not the base table's.
    let result = store
        .query(partition_key(&db))
        .sort_key_equals(KeyValue::new("id", "2"))
        .exec::<TestItem>()
        .await;
    assert!(matches!(result, Err(Error::InvalidQuery(_))));

    // And the base table's `sk` is foreign to the index.
    let result = store
        .query(db.by_model_and_id.key("song"))
        .index(&db.by_model_and_id)
        .sort_key_equals(KeyValue::new("sk", "song|2"))
        .exec::<TestItem>()
        .await;
    assert!(matches!(result, Err(Error::InvalidQuery(_))));
}
