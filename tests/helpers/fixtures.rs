//! Fixture data for the integration tests

use chrono::NaiveDate;
use fake::faker::name::en::{FirstName, Name};
use fake::Fake;

use kindergarten_office::models::{Child, Group, GroupType};

use super::memory_store::MemoryStores;

pub const KINDERGARTEN: &str = "Сонечко";

/// 2024-09-02 00:00:00 UTC
pub const MONDAY_TS: i64 = 1_725_235_200;

pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

pub fn child_name(index: usize) -> String {
    format!("{} {}", FirstName().fake::<String>(), index)
}

pub fn parent_name() -> String {
    Name().fake()
}

/// A group of `KINDERGARTEN` with its children
pub struct SeededGroup {
    pub group: Group,
    pub children: Vec<Child>,
}

/// Seed `groups` groups of `children_per_group` children each
pub fn seed_kindergarten(stores: &MemoryStores, groups: usize, children_per_group: usize) -> Vec<SeededGroup> {
    (0..groups)
        .map(|g| {
            let group = stores.groups.seed(KINDERGARTEN, &format!("Група {}", g + 1), GroupType::Young);
            let children = (0..children_per_group)
                .map(|c| stores.children.seed(&child_name(c), &parent_name(), group.id))
                .collect();
            SeededGroup { group, children }
        })
        .collect()
}
