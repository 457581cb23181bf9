//! reqwest client for the folder listing endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use foldertree_core::config::listing::{ListingApi, ListingConfig};
use foldertree_core::error::AppError;
use foldertree_core::result::AppResult;
use foldertree_core::types::PageRequest;
use foldertree_entity::folder::{FolderItem, ManagerKind};

use crate::keys;
use crate::source::FolderSource;

/// Folder uid the browse endpoint uses for the top level.
const GENERAL_FOLDER_UID: &str = "general";

/// One hit of the browse (search) endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    uid: String,
    title: String,
    #[serde(default)]
    folder_uid: Option<String>,
    #[serde(default)]
    managed_by: Option<ManagerKind>,
}

impl From<SearchHit> for FolderItem {
    fn from(hit: SearchHit) -> Self {
        Self {
            uid: hit.uid,
            title: hit.title,
            managed_by: hit.managed_by,
            parent_uid: hit
                .folder_uid
                .filter(|uid| !uid.is_empty() && uid != GENERAL_FOLDER_UID),
        }
    }
}

/// Listing source talking to a remote folder API.
#[derive(Debug, Clone)]
pub struct HttpFolderSource {
    /// Shared HTTP client.
    client: Client,
    /// Base URL, always ending in `/`.
    base_url: Url,
    /// Which endpoint to call.
    api: ListingApi,
}

impl HttpFolderSource {
    /// Create a source from configuration.
    pub fn new(config: &ListingConfig) -> AppResult<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            AppError::configuration(format!("Invalid listing.base_url '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        info!(base_url = %base_url, api = ?config.api, "Initialized HTTP folder source");
        Ok(Self {
            client,
            base_url,
            api: config.api,
        })
    }

    /// Build the endpoint URL for a page request.
    fn endpoint(&self, request: &PageRequest) -> AppResult<Url> {
        let path = match self.api {
            ListingApi::Legacy => "api/folders",
            ListingApi::Browse => "api/search",
        };
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| AppError::internal(format!("Failed to build listing URL: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            match self.api {
                ListingApi::Legacy => {
                    if let Some(parent) = &request.parent_uid {
                        query.append_pair("parentUid", parent);
                    }
                }
                ListingApi::Browse => {
                    query.append_pair("type", "dash-folder");
                    query.append_pair(
                        "folderUIDs",
                        request.parent_uid.as_deref().unwrap_or(GENERAL_FOLDER_UID),
                    );
                }
            }
            query.append_pair("page", &request.page.to_string());
            query.append_pair("limit", &request.limit.to_string());
            if let Some(permission) = request.permission {
                query.append_pair("permission", permission.as_str());
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl FolderSource for HttpFolderSource {
    async fn list_folders(&self, request: &PageRequest) -> AppResult<Vec<FolderItem>> {
        let url = self.endpoint(request)?;
        debug!(key = %keys::page_key(request), %url, "Requesting folder page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Listing service returned {status} for {}: {body}",
                keys::page_key(request)
            )));
        }

        let items = match self.api {
            ListingApi::Legacy => response.json::<Vec<FolderItem>>().await?,
            ListingApi::Browse => response
                .json::<Vec<SearchHit>>()
                .await?
                .into_iter()
                .map(FolderItem::from)
                .collect(),
        };
        Ok(items)
    }
}
