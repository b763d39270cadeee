use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::{
	dataset::{Groups, Item},
	error::Error,
};

/// Target number of items per partition. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PartitionSize(NonZeroUsize);

impl PartitionSize {
	pub const ONE: Self = Self(NonZeroUsize::MIN);

	pub fn new(size: usize) -> Result<Self, Error> {
		NonZeroUsize::new(size).map(Self).ok_or(Error::InvalidPartitionSize(0))
	}

	pub fn get(self) -> usize {
		self.0.get()
	}
}

impl Default for PartitionSize {
	fn default() -> Self {
		Self::ONE
	}
}

impl TryFrom<i64> for PartitionSize {
	type Error = Error;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		usize::try_from(value)
			.ok()
			.and_then(NonZeroUsize::new)
			.map(Self)
			.ok_or(Error::InvalidPartitionSize(value))
	}
}

impl From<PartitionSize> for i64 {
	fn from(size: PartitionSize) -> Self {
		i64::try_from(size.get()).unwrap_or(i64::MAX)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionOptions {
	pub size: PartitionSize,
	/// Forbid items of two owning keys from sharing a partition.
	pub separate_entities: bool,
}

impl PartitionOptions {
	pub fn new(size: PartitionSize, separate_entities: bool) -> Self {
		Self { size, separate_entities }
	}
}

/// The items of one owning key that were assigned to a partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slice {
	pub key: String,
	pub items: Vec<Item>,
}

/// One subjob's worth of work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
	pub slices: Vec<Slice>,
}

impl Partition {
	pub fn single(key: impl Into<String>, items: Vec<Item>) -> Self {
		Self {
			slices: vec![Slice { key: key.into(), items }],
		}
	}

	fn push(&mut self, key: &str, items: &[Item]) {
		self.slices.push(Slice {
			key: key.to_string(),
			items: items.to_vec(),
		});
	}

	/// Number of items, summed over all slices.
	pub fn len(&self) -> usize {
		self.slices.iter().map(|s| s.items.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.slices.iter().all(|s| s.items.is_empty())
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.slices.iter().map(|s| s.key.as_str())
	}

	pub fn items(&self) -> impl Iterator<Item = &Item> {
		self.slices.iter().flat_map(|s| s.items.iter())
	}
}

impl<K: Into<String>> FromIterator<(K, Vec<Item>)> for Partition {
	fn from_iter<T: IntoIterator<Item = (K, Vec<Item>)>>(iter: T) -> Self {
		Self {
			slices: iter
				.into_iter()
				.map(|(key, items)| Slice { key: key.into(), items })
				.collect(),
		}
	}
}

/// Splits `groups` into partitions of at most `options.size` items.
///
/// With `separate_entities` every group is chunked on its own, so each
/// group may end in one short partition. Otherwise items are packed across
/// group boundaries and only the final partition may be short.
#[tracing::instrument(level = "debug", skip(groups), fields(groups = groups.len()))]
pub fn partition(groups: &Groups, options: &PartitionOptions) -> Vec<Partition> {
	let size = options.size.get();
	let partitions = if options.separate_entities {
		groups
			.iter()
			.flat_map(|(key, items)| items.chunks(size).map(move |chunk| Partition::single(key.as_str(), chunk.to_vec())))
			.collect()
	} else {
		pack(groups, size)
	};
	tracing::debug!("produced {} partitions", partitions.len());
	partitions
}

fn pack(groups: &Groups, size: usize) -> Vec<Partition> {
	let mut partitions = Vec::new();
	let mut current = Partition::default();
	let mut filled = 0;

	for (key, items) in groups {
		let mut rest = items.as_slice();
		while !rest.is_empty() {
			let (head, tail) = rest.split_at((size - filled).min(rest.len()));
			current.push(key, head);
			filled += head.len();
			rest = tail;
			if filled == size {
				partitions.push(std::mem::take(&mut current));
				filled = 0;
			}
		}
	}

	if filled > 0 {
		partitions.push(current);
	}
	partitions
}
