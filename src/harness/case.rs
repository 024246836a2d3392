//! The fixed description of the embedding ingest case

/// Metadata fields that vary between runs and are excluded from the output
const METADATA_EXCLUDE: &[&str] = &[
    "coordinates",
    "filename",
    "file_directory",
    "metadata.data_source.date_created",
    "metadata.data_source.date_modified",
    "metadata.data_source.date_processed",
    "metadata.last_modified",
    "metadata.detection_class_prob",
    "metadata.parent_id",
    "metadata.category_depth",
];

/// What the ingestion tool is asked to do, independent of the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestCase {
    /// Folder name shared by the output dir, work dir and expected-output baseline
    pub folder_name: &'static str,
    /// Input document, relative to the repository root
    pub input_path: &'static str,
    /// Source connector subcommand of the ingestion tool
    pub connector: &'static str,
    pub embedding_provider: &'static str,
    /// Environment variable holding the provider credential
    pub credential_var: &'static str,
    pub metadata_exclude: &'static [&'static str],
}

impl IngestCase {
    pub fn octoai() -> Self {
        Self {
            folder_name: "embed-octoai",
            input_path: "example-docs/book-war-and-peace-1p.txt",
            connector: "local",
            embedding_provider: "octoai",
            credential_var: "OCTOAI_API_KEY",
            metadata_exclude: METADATA_EXCLUDE,
        }
    }

    /// Comma-joined form accepted by `--metadata-exclude`
    pub fn metadata_exclude_arg(&self) -> String {
        self.metadata_exclude.join(",")
    }
}

impl Default for IngestCase {
    fn default() -> Self {
        Self::octoai()
    }
}
