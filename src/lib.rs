//! # address-book
//!
//! A small HTTP service holding an in-memory list of postal addresses.
//!
//! Reads are open. Writes need `Authorization: Bearer <API_TOKEN>`.
//!
//! | Route | Does |
//! |---|---|
//! | `GET /address` | list every address in insertion order |
//! | `POST /address` | validate and store a new address |
//! | `DELETE /address/{id}` | remove one address |
//!
//! ## Layout
//!
//! The address core has no HTTP in it:
//!
//! - [`validate()`] turns an untrusted [`NewAddress`] into an [`Address`]
//! - [`AddressStore`] assigns ids and keeps records in order
//! - [`AccessGuard`] checks the bearer token
//!
//! Around it sits a thin hyper-based host: [`Router`], [`Server`],
//! [`middleware`], and the route table in [`api`].
//!
//! ## Running
//!
//! ```text
//! API_TOKEN=changeme RUST_LOG=info cargo run
//! curl localhost:8000/address
//! curl -X POST localhost:8000/address \
//!      -H 'authorization: Bearer changeme' \
//!      -H 'content-type: application/json' \
//!      -d '{"firstName":"Jane","lastName":"Doe","address1":"1 Main St",
//!           "city":"Springfield","state":"IL","zip":62704}'
//! ```

mod address;
mod error;
mod guard;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;
mod validate;

pub mod api;
pub mod config;
pub mod health;
pub mod middleware;
pub mod telemetry;

pub use address::{Address, AddressId, AddressRecord, NewAddress, Zip, ZipInput};
pub use error::Error;
pub use guard::{AccessGuard, Unauthorized};
pub use handler::Handler;
pub use method::Method;
pub use request::{MAX_BODY_BYTES, Request};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{AddressStore, NotFound};
pub use validate::{ValidationError, validate};
