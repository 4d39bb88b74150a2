//! Async client for the RAD remote-administration REST protocol.
//!
//! The crate maps RAD's href-addressed objects onto typed Rust values:
//!
//! - [`Session`] authenticates against one endpoint and caches the login
//!   across process invocations.
//! - [`Href`] parses and renders `api/{namespace}/{version}/{collection}[/{id}]`.
//! - [`RadObject`] is one collection or instance of an [`Interface`] kind,
//!   resolved through [`Session::list_objects`] / [`Session::get_object`],
//!   exposing [`RadObject::rad_method`] for remote procedure calls.
//!
//! Protocol failures surface as [`Error`]; transport failures pass through
//! as [`Error::Transport`].

pub mod cache;
pub mod error;
pub mod href;
pub mod object;
pub mod response;
pub mod session;
pub mod transport;

pub use cache::CACHE_FORMAT_VERSION;
pub use error::{Error, STATUS_NOT_FOUND};
pub use href::{Href, Target};
pub use object::{Interface, RadObject};
pub use response::{RadResponse, STATUS_SUCCESS};
pub use session::{
    Authentication, DEFAULT_PORT, Endpoint, Lookup, Protocol, Session, SessionConfig,
    SessionState, default_cache_dir,
};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, Transport, TransportState};
