use serde::de::Error as _;
use serde::{ Deserialize, Deserializer, Serialize, Serializer };
use std::collections::HashMap;

/// Wire value marking a key as a file rather than a subdirectory.
pub const LEAF_MARKER: &str = "F";

/// One node of a directory listing.
///
/// On the wire a file is the string `"F"` and a directory is an object mapping
/// entry names to nodes. Keys are not ordered; consumers sort them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingTree {
    File,
    Directory(HashMap<String, ListingTree>),
}

impl ListingTree {
    /// Number of files reachable from this node.
    pub fn file_count(&self) -> usize {
        match self {
            ListingTree::File => 1,
            ListingTree::Directory(entries) => entries.values().map(ListingTree::file_count).sum(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Marker(String),
    Directory(HashMap<String, ListingTree>),
}

impl<'de> Deserialize<'de> for ListingTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawEntry::deserialize(deserializer)? {
            RawEntry::Marker(marker) if marker == LEAF_MARKER => Ok(ListingTree::File),
            RawEntry::Marker(other) =>
                Err(
                    D::Error::custom(
                        format!("expected leaf marker {:?} or an object, got string {:?}", LEAF_MARKER, other)
                    )
                ),
            RawEntry::Directory(entries) => Ok(ListingTree::Directory(entries)),
        }
    }
}

impl Serialize for ListingTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ListingTree::File => serializer.serialize_str(LEAF_MARKER),
            ListingTree::Directory(entries) => entries.serialize(serializer),
        }
    }
}

/// Root of a listing document. Unlike an inner node, the root is always a
/// directory.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Listing {
    pub entries: HashMap<String, ListingTree>,
}

impl Listing {
    pub fn new(entries: HashMap<String, ListingTree>) -> Self {
        Listing { entries }
    }
}

impl From<Listing> for ListingTree {
    fn from(listing: Listing) -> Self {
        ListingTree::Directory(listing.entries)
    }
}
