//! Task services sitting between the transport and the store.

mod mutation;
mod query;

pub use mutation::TaskMutationService;
pub use query::TaskQueryService;
