#![allow(dead_code)]

use std::sync::Arc;

use monotable::{Entity, Gsi, MemoryStorage, Model, Partition, Store, Table};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    #[serde(rename = "musician")]
    Musician,
    #[serde(rename = "song")]
    Song,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Musician {
    pub model: ModelType,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MusicianFields {
    pub id: String,
    pub name: String,
}

impl Entity for Musician {
    type Fields = MusicianFields;

    fn create(fields: MusicianFields) -> Musician {
        Musician {
            model: ModelType::Musician,
            id: fields.id,
            name: fields.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub model: ModelType,
    #[serde(rename = "musicianId")]
    pub musician_id: String,
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongFields {
    pub musician_id: String,
    pub id: String,
    pub title: String,
}

impl Entity for Song {
    type Fields = SongFields;

    fn create(fields: SongFields) -> Song {
        Song {
            model: ModelType::Song,
            musician_id: fields.musician_id,
            id: fields.id,
            title: fields.title,
        }
    }
}

/// The union of variants stored in the test table's partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum TestItem {
    #[serde(rename = "musician")]
    Musician {
        id: String,
        name: String,
    },
    #[serde(rename = "song")]
    Song {
        #[serde(rename = "musicianId")]
        musician_id: String,
        id: String,
        title: String,
    },
}

pub struct TestDb {
    pub table: Table,
    pub musician: Model<Musician>,
    pub song: Model<Song>,
    pub partition: Partition<TestItem>,
    pub by_model_and_id: Gsi,
    pub by_name_and_id: Gsi,
}

/// The registration fixture: two variants sharing one partition, plus two
/// indexes whose key sources must land on the encryption blacklist.
pub fn test_db() -> TestDb {
    let mut table = Table::new("TestTable", "pk", "sk");

    let musician = table
        .model::<Musician>("musician")
        .partition_key("musician", "id")
        .sort_key("musician", "id");

    let song = table
        .model::<Song>("song")
        .partition_key("musician", "musicianId")
        .sort_key("song", "id");

    let partition = table.partition::<TestItem>(&musician, &[&song]);

    let by_model_and_id = table
        .gsi("byModelAndId")
        .models(&[&musician, &song])
        .partition_key("model")
        .sort_key("id");

    let by_name_and_id = table
        .gsi("byNameAndId")
        .models(&[&musician])
        .partition_key("name")
        .sort_key("id");

    TestDb {
        table,
        musician,
        song,
        partition,
        by_model_and_id,
        by_name_and_id,
    }
}

/// A store over a fresh in-memory collaborator, returning the collaborator
/// handle so tests can inspect the stored wire shape.
pub fn test_store(db: &TestDb) -> (Store, Arc<MemoryStorage>) {
    test_store_with(db, MemoryStorage::new())
}

pub fn test_store_with(db: &TestDb, storage: MemoryStorage) -> (Store, Arc<MemoryStorage>) {
    storage.create_table(db.table.name(), db.table.partition_key_name(), db.table.sort_key_name());
    let storage = Arc::new(storage);
    let store = Store::new(db.table.clone(), storage.clone());
    (store, storage)
}

pub fn a_musician_with_two_songs(db: &TestDb) -> (Musician, Song, Song) {
    let musician = db.musician.create(MusicianFields {
        id: "1".to_string(),
        name: "Bob Marley".to_string(),
    });

    let song1 = db.song.create(SongFields {
        musician_id: "1".to_string(),
        id: "2".to_string(),
        title: "Buffalo Soldier".to_string(),
    });

    let song2 = db.song.create(SongFields {
        musician_id: "1".to_string(),
        id: "3".to_string(),
        title: "No Woman, No Cry".to_string(),
    });

    (musician, song1, song2)
}
