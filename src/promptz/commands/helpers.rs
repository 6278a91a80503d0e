use crate::api::PromptzApp;
use crate::error::Result;
use crate::selector::{self, PromptSelector};
use crate::store::KvBackend;

/// Resolve every selector before mutating anything, so positions stay
/// stable while a batch runs.
pub fn resolve_all<B: KvBackend>(
    app: &PromptzApp<B>,
    selectors: &[PromptSelector],
) -> Result<Vec<(PromptSelector, i64)>> {
    let mut resolved = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let id = selector::resolve(app.repo.data(), selector)?;
        resolved.push((*selector, id));
    }
    Ok(resolved)
}

/// The listing label a prompt currently carries.
pub fn label_for<B: KvBackend>(app: &PromptzApp<B>, id: i64) -> String {
    selector::selector_for(app.repo.data(), id)
        .map(|s| s.to_string())
        .unwrap_or_else(|| id.to_string())
}
