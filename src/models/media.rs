use serde::{Deserialize, Serialize};

/// An asset hosted on the image CDN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaImage {
    pub url: String,
    pub public_id: String,
}

/// An object kept in the storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub url: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfAssets {
    #[serde(default)]
    pub quickstartpdfs: Vec<StoredFile>,
    #[serde(default)]
    pub downloadpdfs: Vec<StoredFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterGroup {
    pub title: String,
    pub items: Vec<ParameterItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterItem {
    pub title: String,
    pub subtitle: String,
}
