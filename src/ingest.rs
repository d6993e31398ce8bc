//! Text source for the layout
//!
//! The résumé is converted offline into `assets/resume.json`, a list of
//! `{ tag, text }` blocks, which is fetched and split into `TextElement`s.

use crate::error::LoadError;
use crate::layout::TextElement;

/// The only asset paths the loader may fetch
pub const ALLOWED_ASSET_PATHS: [&str; 2] = ["assets/resume.json", "./assets/resume.json"];

/// Default text source
pub const RESUME_ASSET_PATH: &str = "assets/resume.json";

/// Separators inside a converted block: line breaks and bullets
const BLOCK_SEPARATORS: [char; 2] = ['\n', '•'];

pub fn is_allowed_asset_path(path: &str) -> bool {
    ALLOWED_ASSET_PATHS.contains(&path)
}

/// Reject paths outside the allow-list before fetching
pub fn check_asset_path(path: &str) -> Result<(), LoadError> {
    if is_allowed_asset_path(path) {
        Ok(())
    } else {
        Err(LoadError::DisallowedAsset(path.to_string()))
    }
}

/// Split one converted block into elements
pub fn split_blocks(tag: Option<&str>, text: &str) -> Vec<TextElement> {
    text.split(BLOCK_SEPARATORS)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| TextElement {
            tag: tag.map(str::to_string),
            text: block.to_string(),
        })
        .collect()
}

/// Parse `resume.json` (`[{ "tag": ..., "text": ... }]`)
///
/// Blocks are split on line breaks and bullets; whitespace-only pieces are
/// dropped.
pub fn elements_from_json(json: &str) -> Result<Vec<TextElement>, LoadError> {
    let blocks: Vec<TextElement> = serde_json::from_str(json)?;
    let total = blocks.len();
    let elements: Vec<TextElement> = blocks
        .iter()
        .flat_map(|b| split_blocks(b.tag.as_deref(), &b.text))
        .collect();
    log::debug!("resume.json: {} blocks, {} elements", total, elements.len());
    Ok(elements)
}
