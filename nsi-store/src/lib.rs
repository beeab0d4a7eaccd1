//! Storage boundary for the NSI record-linkage engine: repository traits,
//! an in-memory reference implementation of each, a progress-event channel,
//! and a cooperative cancellation token.

pub mod benchmark;
pub mod cancellation;
pub mod classifier_source;
pub mod error;
pub mod events;
pub mod repository;

pub use benchmark::{BenchmarkFinder, CachedBenchmarkFinder, InMemoryBenchmarkFinder};
pub use cancellation::CancellationToken;
pub use classifier_source::{build_tree, ClassifierTreeSource, StaticClassifierTreeSource, TreeLoadError};
pub use error::StoreError;
pub use events::{event_channel, EventSender};
pub use repository::{CounterpartyRepository, InMemoryStore, TransactionHandle};
