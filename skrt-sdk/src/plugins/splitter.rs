use dyn_clone::DynClone;
use dyn_eq::DynEq;
use std::fmt::Debug;

use crate::{
	dataset::{Partition, PatientDataset},
	error::Error,
};

dyn_clone::clone_trait_object!(Splitter);
dyn_eq::eq_trait_object!(Splitter);

#[typetag::serde(tag = "type")]
pub trait Splitter: DynEq + DynClone + Sync + Send + Debug {
	fn name(&self) -> &str;

	/// Option under which each subjob receives its patient id to items map,
	/// or `None` when subjobs only need their patient folders.
	fn option_name(&self) -> Option<&'static str> {
		None
	}

	fn split(&self, dataset: &PatientDataset) -> Result<Vec<Partition>, Error>;
}
