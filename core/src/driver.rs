//! Object operations mapped onto query-string GET requests.
//!
//! # Design
//! `ObjectDriver` pairs an immutable `Endpoint` with one owned transport.
//! Each operation builds its request with `Endpoint::build_*`, sends it, and
//! parses the reply with `response::parse_*`. Two surfaces sit on top:
//!
//! - `try_*` methods return `Result` and keep every failure class distinct.
//! - The plain methods keep the historical contract: reads fall back to the
//!   unmodified object or an empty list, writes fall back to
//!   `(-1, "Invalid response")`. The swallowed failure is logged.
//!
//! The transport sits behind a mutex, so clones of a driver (including the
//! ones handed to objects through `BoundObject::new_bound`) share it and
//! requests never overlap. Batches are sent one request at a time.

use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::{DriverError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::object::{BoundObject, ObjectContract};
use crate::request::Endpoint;
use crate::response::{self, ResultStatus};
use crate::transport::Transport;

#[cfg(feature = "ureq")]
use crate::config::DriverConfig;
#[cfg(feature = "ureq")]
use crate::transport::UreqTransport;

type SharedTransport = Arc<Mutex<Option<Box<dyn Transport>>>>;

/// Client-side driver for the action-parameter object API.
#[derive(Clone)]
pub struct ObjectDriver {
    endpoint: Endpoint,
    transport: SharedTransport,
}

impl fmt::Debug for ObjectDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDriver")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ObjectDriver {
    pub fn new(endpoint: Endpoint, transport: impl Transport + 'static) -> Self {
        Self {
            endpoint,
            transport: Arc::new(Mutex::new(Some(Box::new(transport)))),
        }
    }

    /// Driver over a blocking `ureq` agent, configured from `config`.
    #[cfg(feature = "ureq")]
    pub fn connect(config: &DriverConfig) -> Result<Self> {
        if config.endpoint_base.trim().is_empty() {
            return Err(DriverError::Config("endpoint base is empty".to_string()));
        }
        Ok(Self::new(
            config.endpoint(),
            UreqTransport::new(config.timeout),
        ))
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Release the transport. Every later request fails with
    /// `DriverError::Closed`. Closing twice is a no-op.
    pub fn close(&self) {
        if let Some(mut transport) = self.lock_transport().take() {
            transport.close();
            debug!(base = self.endpoint.base(), "object driver closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock_transport().is_none()
    }

    /// Send one request and return the response as data, whatever its status.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(action = %request.action, url = %request.url, "sending request");
        let response = self.dispatch(&request.url)?;
        debug!(action = %request.action, status = response.status, "response received");
        Ok(response)
    }

    /// Raw `(code, headers, body)` for an arbitrary URL. `code` is the HTTP
    /// status when the transport succeeded, otherwise the transport's own
    /// code (`-1` once the driver is closed).
    pub fn perform_request(&self, url: &str) -> (i64, String, String) {
        match self.dispatch(url) {
            Ok(response) => (
                i64::from(response.status),
                response.header_text(),
                response.body,
            ),
            Err(err) => (err.raw_code(), String::new(), String::new()),
        }
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Load `object` by primary key. Only the first row is applied.
    pub fn try_load<T: ObjectContract>(&self, object: &mut T, id: Uuid) -> Result<()> {
        let request = self.endpoint.build_load(&*object, id);
        self.hydrate_first(object, &request)
    }

    pub fn load<T: ObjectContract>(&self, mut object: T, id: Uuid) -> T {
        if let Err(err) = self.try_load(&mut object, id) {
            swallowed("load", &err);
        }
        object
    }

    /// Load `object` by any field the server treats as unique.
    pub fn try_load_by_field<T: ObjectContract>(
        &self,
        object: &mut T,
        (field, value): (&str, &str),
    ) -> Result<()> {
        let request = self
            .endpoint
            .build_load_by_field(object.resource_name(), field, value);
        self.hydrate_first(object, &request)
    }

    pub fn load_by_field<T: ObjectContract>(&self, mut object: T, unique: (&str, &str)) -> T {
        if let Err(err) = self.try_load_by_field(&mut object, unique) {
            swallowed("load_by_field", &err);
        }
        object
    }

    /// Every row of the resource, one fresh object per row, in server order.
    pub fn try_list<T: BoundObject>(&self) -> Result<Vec<T>> {
        self.fetch_all(None)
    }

    pub fn list<T: BoundObject>(&self) -> Vec<T> {
        self.try_list().unwrap_or_else(|err| {
            swallowed("list", &err);
            Vec::new()
        })
    }

    /// Rows matching a single `(field, value)` criterion.
    pub fn try_list_where<T: BoundObject>(&self, criterion: (&str, &str)) -> Result<Vec<T>> {
        self.fetch_all(Some(criterion))
    }

    pub fn list_where<T: BoundObject>(&self, criterion: (&str, &str)) -> Vec<T> {
        self.try_list_where(criterion).unwrap_or_else(|err| {
            swallowed("list_where", &err);
            Vec::new()
        })
    }

    /// Rows of `T` pointing at `object` through an `id_<resource>` column.
    /// `name` only labels the join in logs; the listed resource is `T`'s.
    pub fn try_join_table<T: BoundObject>(
        &self,
        object: &dyn ObjectContract,
        name: &str,
    ) -> Result<Vec<T>> {
        let key = format!("id_{}", object.resource_name());
        let value = object.object_id().to_string();
        debug!(join = name, key = %key, "listing joined rows");
        self.try_list_where((key.as_str(), value.as_str()))
    }

    pub fn join_table<T: BoundObject>(&self, object: &dyn ObjectContract, name: &str) -> Vec<T> {
        self.try_join_table(object, name).unwrap_or_else(|err| {
            swallowed("join_table", &err);
            Vec::new()
        })
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Create a new `T` server-side from `fields` and hydrate it from the
    /// first returned row.
    pub fn try_create<T, K, V>(&self, fields: &[(K, V)]) -> Result<T>
    where
        T: BoundObject,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut object = T::new_bound(self);
        let request = self.endpoint.build_create(object.resource_name(), fields);
        self.hydrate_first(&mut object, &request)?;
        Ok(object)
    }

    /// On failure the result is a blank object, exactly as constructed.
    pub fn create<T, K, V>(&self, fields: &[(K, V)]) -> T
    where
        T: BoundObject,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.try_create(fields).unwrap_or_else(|err| {
            swallowed("create", &err);
            T::new_bound(self)
        })
    }

    pub fn try_delete(&self, object: &dyn ObjectContract) -> Result<ResultStatus> {
        let request = self.endpoint.build_delete(object);
        let response = self.send(&request)?;
        response::parse_status(&response)
    }

    pub fn delete(&self, object: &dyn ObjectContract) -> (i64, String) {
        status_pair("delete", self.try_delete(object))
    }

    /// Send the object's dirty fields, keyed by its primary key.
    pub fn try_commit_changes(&self, object: &dyn ObjectContract) -> Result<ResultStatus> {
        let request = self.endpoint.build_commit(object);
        let response = self.send(&request)?;
        response::parse_status(&response)
    }

    pub fn commit_changes(&self, object: &dyn ObjectContract) -> (i64, String) {
        status_pair("commit_changes", self.try_commit_changes(object))
    }

    /// One commit round trip per object, in order. A failed commit does not
    /// stop the ones after it.
    // TODO: a single Commit request carrying every object needs a server-side
    // wire format for multiple rows first.
    pub fn try_commit_all(&self, objects: &[&dyn ObjectContract]) -> Vec<Result<ResultStatus>> {
        objects
            .iter()
            .map(|object| self.try_commit_changes(*object))
            .collect()
    }

    pub fn commit_all(&self, objects: &[&dyn ObjectContract]) -> Vec<(i64, String)> {
        objects
            .iter()
            .map(|object| self.commit_changes(*object))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn dispatch(&self, url: &str) -> Result<HttpResponse> {
        let mut guard = self.lock_transport();
        let transport = guard.as_mut().ok_or(DriverError::Closed)?;
        Ok(transport.perform(url)?)
    }

    fn hydrate_first(&self, object: &mut dyn ObjectContract, request: &HttpRequest) -> Result<()> {
        let response = self.send(request)?;
        let row = response::parse_first_row(&response)?;
        response::hydrate(object, &row);
        Ok(())
    }

    fn fetch_all<T: BoundObject>(&self, criterion: Option<(&str, &str)>) -> Result<Vec<T>> {
        let mut next = T::new_bound(self);
        let request = self.endpoint.build_list(next.resource_name(), criterion);
        let response = self.send(&request)?;

        let mut objects = Vec::new();
        for (index, row) in response::parse_rows(&response)?.into_iter().enumerate() {
            let Some(row) = row else {
                debug!(index, "skipping result row that is not an object");
                continue;
            };
            response::hydrate(&mut next, &row);
            objects.push(mem::replace(&mut next, T::new_bound(self)));
        }
        Ok(objects)
    }

    fn lock_transport(&self) -> MutexGuard<'_, Option<Box<dyn Transport>>> {
        // A transport that panicked mid-request is still safe to reuse or close.
        self.transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn swallowed(operation: &'static str, err: &DriverError) {
    match err {
        DriverError::InvalidResultCode(_) => {
            error!(operation, error = %err, "server violated the status envelope contract")
        }
        _ => warn!(operation, error = %err, "request failed; returning default"),
    }
}

fn status_pair(operation: &'static str, result: Result<ResultStatus>) -> (i64, String) {
    result
        .unwrap_or_else(|err| {
            swallowed(operation, &err);
            ResultStatus::invalid()
        })
        .into_pair()
}
