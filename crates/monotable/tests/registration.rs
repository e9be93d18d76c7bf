mod support;

use monotable::{CIPHER_METADATA_ATTRIBUTE, DISCRIMINANT_ATTRIBUTE};
use support::*;

#[test]
fn blacklist_covers_keys_discriminant_metadata_and_gsi_sources() {
    let db = test_db();
    let blacklist = db.table.encryption_blacklist();

    for attribute in ["pk", "sk", DISCRIMINANT_ATTRIBUTE, CIPHER_METADATA_ATTRIBUTE, "name", "id"] {
        assert!(blacklist.contains(attribute), "missing `{attribute}`");
    }
    assert_eq!(blacklist.len(), 6);
}

#[test]
fn partition_groups_models_in_registration_order() {
    let db = test_db();

    assert_eq!(db.partition.model_types(), ["musician", "song"]);
}

#[test]
fn gsis_record_their_participants_and_key_pair() {
    let db = test_db();

    assert_eq!(db.by_model_and_id.name(), "byModelAndId");
    assert_eq!(db.by_model_and_id.partition_key_name(), "model");
    assert_eq!(db.by_model_and_id.sort_key_name(), "id");
    assert_eq!(db.by_model_and_id.model_types(), ["musician", "song"]);

    assert_eq!(db.by_name_and_id.model_types(), ["musician"]);
}

#[test]
fn create_stamps_the_discriminant() {
    let db = test_db();
    let musician = db.musician.create(MusicianFields {
        id: "1".to_string(),
        name: "Bob Marley".to_string(),
    });

    assert_eq!(musician.model, ModelType::Musician);

    let item = monotable::to_item(&musician).unwrap();
    assert_eq!(item.get(DISCRIMINANT_ATTRIBUTE).unwrap(), "musician");
}

#[test]
fn model_keys_resolve_prefix_and_field() {
    let db = test_db();
    let (_, song, _) = a_musician_with_two_songs(&db);

    let key = db.song.key(&song).unwrap();
    assert_eq!(key.partition().attribute_name(), "pk");
    assert_eq!(key.partition().value(), "musician|1");
    assert_eq!(key.sort().attribute_name(), "sk");
    assert_eq!(key.sort().value(), "song|2");
}

#[test]
fn partition_key_follows_the_first_grouped_model() {
    let db = test_db();

    let key = db
        .partition
        .key(&serde_json::json!({ "id": "1" }))
        .unwrap();
    assert_eq!(key.attribute_name(), "pk");
    assert_eq!(key.value(), "musician|1");
}
