pub mod http;
pub mod reconciler;
pub mod store;
pub mod sync;
pub mod traits;

pub use http::HttpReorderSink;
pub use reconciler::{ReconcileOutcome, Reconciler, Submission};
pub use store::*;
pub use sync::SyncedBoard;
pub use traits::*;
