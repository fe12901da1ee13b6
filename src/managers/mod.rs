// ReadStash state managers
// Managers handle stateful storage operations: the article library and the
// per-article highlight records.

pub mod article_manager;
pub mod highlight_store;
