//! Synchronous object driver for action-parameter JSON endpoints.
//!
//! # Overview
//! Maps load / list / create / commit / delete on typed objects onto HTTP GET
//! requests of the form `<base>/<Resource><ext>?_action=<Action>&k=v...` and
//! hydrates objects from the `resultSets` rows the server answers with.
//!
//! # Design
//! - Resource types implement `ObjectContract` (and `BoundObject` to be
//!   constructed by the driver); the driver never sees concrete fields.
//! - Each operation is split into `Endpoint::build_*` (produces a request)
//!   and `response::parse_*` (consumes a response). Both halves are pure;
//!   only the `Transport` touches the network.
//! - `try_*` operations return `Result`; the plain ones collapse failures to
//!   the historical defaults.
//!
//! # Example
//! ```ignore
//! let config = DriverConfig::from_env()?;
//! let driver = ObjectDriver::connect(&config)?;
//! let widget = driver.load(Widget::new_bound(&driver), id);
//! let (code, message) = driver.commit_changes(&widget);
//! driver.close();
//! ```

pub mod action;
pub mod config;
pub mod driver;
pub mod error;
pub mod http;
pub mod object;
pub mod request;
pub mod response;
pub mod transport;

pub use action::{Action, ACTION_PARAM};
pub use config::DriverConfig;
pub use driver::ObjectDriver;
pub use error::{DriverError, Result};
pub use http::{HttpRequest, HttpResponse};
pub use object::{BoundObject, HydrationMap, ObjectContract};
pub use request::Endpoint;
pub use response::{to_canonical_string, ResultStatus};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use transport::{ScriptedTransport, Transport, TransportError};
