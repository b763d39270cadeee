use indexmap::IndexMap;
use skrt_stdx::path::PathExt;
use std::fmt::Debug;

use crate::{
	dataset::{group_key, Groups, Item, PatientDataset},
	error::Error,
};

/// Expands patient folders into the items a splitter partitions.
pub trait ItemDiscovery: Debug {
	fn enumerate(&self, dataset: &PatientDataset) -> Result<Groups, Error>;
}

/// Items supplied up front, keyed by patient id (the folder name).
///
/// Ids are looked up exactly first and then ignoring ASCII case, since
/// configuration sources may fold the case of table keys.
#[derive(Debug, Clone, Copy)]
pub struct Listed<'a> {
	pub items_by_id: &'a IndexMap<String, Vec<Item>>,
}

impl<'a> Listed<'a> {
	pub fn new(items_by_id: &'a IndexMap<String, Vec<Item>>) -> Self {
		Self { items_by_id }
	}

	fn lookup(&self, id: &str) -> Option<&'a Vec<Item>> {
		self.items_by_id.get(id).or_else(|| {
			self.items_by_id
				.iter()
				.find(|(key, _)| key.eq_ignore_ascii_case(id))
				.map(|(_, items)| items)
		})
	}
}

impl ItemDiscovery for Listed<'_> {
	fn enumerate(&self, dataset: &PatientDataset) -> Result<Groups, Error> {
		dataset
			.iter()
			.map(|path| {
				let id = path.entity_name();
				let items = self
					.lookup(&id)
					.ok_or_else(|| Error::Config(format!("no items listed for patient `{id}`")))?;
				Ok((group_key(path), items.clone()))
			})
			.collect()
	}
}
