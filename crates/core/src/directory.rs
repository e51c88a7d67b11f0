//! Zip code to coordinate lookup.
//!
//! [`ZipDirectory`] is the seam between the pricing rule and wherever the
//! geocoding table lives. The storefront loads the rows it needs from
//! `PostgreSQL` into an [`InMemoryZipDirectory`] per request.
//!
//! The table is not unique on `zip`. When a postal code appears more than
//! once, the record with the lowest ID is authoritative and the rest are
//! ignored. This is a known data limitation, not something lookups correct.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::catalog::ZipCodeRecord;
use crate::types::{Coordinate, ZipCode};

/// Resolves a postal code to a representative point.
pub trait ZipDirectory {
    /// Look up the coordinate for `zip`, or `None` if it is not on file.
    fn locate(&self, zip: &ZipCode) -> Option<Coordinate>;
}

impl<D: ZipDirectory + ?Sized> ZipDirectory for &D {
    fn locate(&self, zip: &ZipCode) -> Option<Coordinate> {
        (**self).locate(zip)
    }
}

/// A [`ZipDirectory`] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryZipDirectory {
    records: HashMap<ZipCode, ZipCodeRecord>,
}

impl InMemoryZipDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record unless a record with a lower ID already covers its zip.
    ///
    /// Returns `true` if the record became authoritative for its zip.
    pub fn insert(&mut self, record: ZipCodeRecord) -> bool {
        match self.records.entry(record.zip.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(mut slot) => {
                if record.id < slot.get().id {
                    slot.insert(record);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// The authoritative record for `zip`.
    #[must_use]
    pub fn get(&self, zip: &ZipCode) -> Option<&ZipCodeRecord> {
        self.records.get(zip)
    }

    /// Number of distinct zip codes on file.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no zip codes are on file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ZipCodeRecord> for InMemoryZipDirectory {
    fn from_iter<I: IntoIterator<Item = ZipCodeRecord>>(iter: I) -> Self {
        let mut directory = Self::new();
        directory.extend(iter);
        directory
    }
}

impl Extend<ZipCodeRecord> for InMemoryZipDirectory {
    fn extend<I: IntoIterator<Item = ZipCodeRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl ZipDirectory for InMemoryZipDirectory {
    fn locate(&self, zip: &ZipCode) -> Option<Coordinate> {
        self.get(zip).map(ZipCodeRecord::coordinate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ZipCodeId;

    fn record(id: i32, zip: &str, lat: f64, lon: f64) -> ZipCodeRecord {
        ZipCodeRecord {
            id: ZipCodeId::new(id),
            zip: ZipCode::parse(zip).unwrap(),
            city: "Somewhere".to_string(),
            state: "CA".to_string(),
            coordinate: Coordinate::new(lat, lon).unwrap(),
        }
    }

    #[test]
    fn test_locate_known_zip() {
        let directory: InMemoryZipDirectory = [record(1, "94103", 37.77, -122.41)]
            .into_iter()
            .collect();
        let coordinate = directory.locate(&ZipCode::parse("94103").unwrap()).unwrap();
        assert!((coordinate.latitude() - 37.77).abs() < f64::EPSILON);
    }

    #[test]
    fn test_locate_unknown_zip() {
        let directory = InMemoryZipDirectory::new();
        assert!(directory.is_empty());
        assert!(directory.locate(&ZipCode::parse("00000").unwrap()).is_none());
    }

    #[test]
    fn test_duplicate_zip_first_record_wins() {
        let mut directory = InMemoryZipDirectory::new();
        assert!(directory.insert(record(1, "94103", 37.77, -122.41)));
        assert!(!directory.insert(record(2, "94103", 40.71, -74.00)));
        assert_eq!(directory.len(), 1);

        let coordinate = directory.locate(&ZipCode::parse("94103").unwrap()).unwrap();
        assert!((coordinate.longitude() + 122.41).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_zip_lowest_id_wins_regardless_of_insert_order() {
        let directory: InMemoryZipDirectory = [
            record(9, "10001", 40.71, -74.00),
            record(3, "10001", 40.75, -73.99),
        ]
        .into_iter()
        .collect();

        let kept = directory.get(&ZipCode::parse("10001").unwrap()).unwrap();
        assert_eq!(kept.id, ZipCodeId::new(3));
    }

    #[test]
    fn test_reference_implements_directory() {
        fn lookup(directory: impl ZipDirectory, zip: &ZipCode) -> Option<Coordinate> {
            directory.locate(zip)
        }

        let directory: InMemoryZipDirectory = [record(1, "94103", 37.77, -122.41)]
            .into_iter()
            .collect();
        assert!(lookup(&directory, &ZipCode::parse("94103").unwrap()).is_some());
    }
}
