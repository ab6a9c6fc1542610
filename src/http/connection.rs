use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::logger::{AccessRecord, RequestLogger};
use crate::router::{Handled, Router, UNPARSED};

/// One client connection: a single read, a single response, then close.
pub struct Connection<S> {
    stream: S,
    peer: String,
    read_size: usize,
    router: Arc<Router>,
    logger: Arc<dyn RequestLogger>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Bytes),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        peer: impl Into<String>,
        read_size: usize,
        router: Arc<Router>,
        logger: Arc<dyn RequestLogger>,
    ) -> Self {
        Self {
            stream,
            peer: peer.into(),
            read_size,
            router,
            logger,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(raw) => ConnectionState::Processing(raw),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(raw) => {
                    let handled = Self::handle_request(self.router.clone(), raw.clone()).await;
                    let record = AccessRecord {
                        client: self.peer.clone(),
                        method: handled.method,
                        path: handled.path,
                        status: handled.response.status.as_u16(),
                    };

                    // Recorded before writing: a client that hangs up early
                    // still leaves an access line.
                    self.logger.record(&record);

                    let writer = ResponseWriter::new(&handled.response);
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // No keep-alive: every response ends the connection.
                    self.stream.shutdown().await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Takes exactly one read. Anything the client sends beyond it is ignored.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Bytes>> {
        let mut buf = BytesMut::zeroed(self.read_size);
        let n = self.stream.read(&mut buf[..]).await?;

        if n == 0 {
            // Client closed connection
            return Ok(None);
        }

        buf.truncate(n);
        Ok(Some(buf.freeze()))
    }

    /// Runs the synchronous core off the async workers. A panic in a handler
    /// still yields a 500 for the client.
    async fn handle_request(router: Arc<Router>, raw: Bytes) -> Handled {
        match tokio::task::spawn_blocking(move || router.handle(&raw)).await {
            Ok(handled) => handled,
            Err(e) => {
                tracing::error!(error = %e, "Request handler panicked");
                Handled {
                    method: UNPARSED.to_string(),
                    path: UNPARSED.to_string(),
                    response: Response::internal_error(),
                }
            }
        }
    }
}
