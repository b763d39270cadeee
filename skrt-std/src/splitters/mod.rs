mod image;
mod patient;
mod scan;

pub use image::ImageSplitter;
pub use patient::PatientSplitter;
pub use scan::ScanSplitter;

fn default_true() -> bool {
	true
}
