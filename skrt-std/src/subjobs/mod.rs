mod manifest;

pub use manifest::{ManifestFactory, MANIFEST_NAME};
