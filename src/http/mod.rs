//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server: one request per connection, read in
//! a single bounded read, answered with `Connection: close`.
//!
//! # Architecture
//!
//! - **`connection`**: Drives one read/respond/close cycle on a socket
//! - **`parser`**: Parses the bytes of that read into a request
//! - **`request`**: HTTP request representation
//! - **`response`**: Status codes and the response type with its builder
//! - **`writer`**: Serializes responses to wire bytes and writes them out
//! - **`mime`**: Content type, text/binary class and cache policy by extension
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One read of at most `read_buffer_size` bytes
//!        └──────┬──────┘
//!               │ Bytes received (0 bytes → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse and route on the blocking pool
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, record access log line
//!        └──────┬───────────┘
//!               │
//!               ▼
//!             Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
