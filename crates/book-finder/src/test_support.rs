//! Test doubles for the search seam.

use crate::api::{SearchBackend, SearchRequest, Volume, VolumeInfo};
use async_trait::async_trait;
use shared::{FinderError, FinderResult};
use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Mutex;

/// Backend that replays canned responses and records every request
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<FinderResult<Vec<Volume>>>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<FinderResult<Vec<Volume>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, request: &SearchRequest) -> FinderResult<Vec<Volume>> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FinderError::transport("no scripted response left")))
    }
}

pub fn volume(id: &str, language: &str, categories: &[&str]) -> Volume {
    Volume {
        id: id.to_string(),
        volume_info: VolumeInfo {
            title: format!("Title {}", id),
            authors: vec![format!("Author {}", id)],
            categories: categories.iter().map(|c| c.to_string()).collect(),
            language: language.to_string(),
            ..Default::default()
        },
    }
}

/// Volumes `{prefix}-{n}` for every n in `range`
pub fn page(prefix: &str, range: Range<u32>, language: &str) -> Vec<Volume> {
    range
        .map(|n| volume(&format!("{}-{}", prefix, n), language, &[]))
        .collect()
}
