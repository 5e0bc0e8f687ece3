//! Process-wide completion corpus

use editor_core::KeywordSet;
use std::sync::{Arc, OnceLock};

static PYTHON: OnceLock<Arc<KeywordSet>> = OnceLock::new();

/// The Python corpus, built on first use and shared by every tab
pub fn shared() -> Arc<KeywordSet> {
    PYTHON
        .get_or_init(|| {
            let set = KeywordSet::python();
            tracing::debug!(words = set.len(), "keyword corpus built");
            Arc::new(set)
        })
        .clone()
}
