//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use log::{debug, error, info};

use crate::parser::{parse_request, Error as ParserError};
use crate::server::config::{ServerConfig, MAX_HEAD_SIZE};
use crate::server::error::Error;
use crate::server::handler::FileServerHandler;
use crate::server::response::{HttpResponse, StatusCode};

/// An HTTP server exposing one directory tree.
pub struct HttpServer {
    /// The server configuration.
    pub config: Arc<ServerConfig>,
    /// The handler every request is routed to.
    pub handler: Arc<FileServerHandler>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let handler = Arc::new(FileServerHandler::new(&config));
        Self {
            config: Arc::new(config),
            handler,
        }
    }

    /// Display the server banner and what is being served.
    fn display_server_info(&self) {
        let banner = include_str!("../banner.txt");
        info!("\n{banner}");
        info!("Serving {root} at /", root = self.config.root.display());
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        info!("Server listening on http://{addr}");
        Ok(listener)
    }

    /// Set up a Ctrl+C handler that asks the accept loop to stop.
    fn setup_ctrl_c_handler(shutdown_tx: mpsc::Sender<()>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, stopping server");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Spawn a task serving one accepted connection.
    fn handle_new_connection(
        mut socket: TcpStream,
        addr: SocketAddr,
        handler: Arc<FileServerHandler>,
        read_buffer_size: usize,
        tasks: &mut JoinSet<()>,
    ) {
        tasks.spawn(async move {
            debug!("Connection from {addr}");
            if let Err(e) = Self::handle_connection(&mut socket, &handler, read_buffer_size).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Log an accept failure and back off briefly before accepting again.
    async fn handle_connection_error(e: std::io::Error) {
        error!("Error accepting connection: {e}");
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    /// Start the server and listen for incoming connections.
    ///
    /// Runs until Ctrl+C. Connections still in flight at that point are
    /// aborted rather than drained.
    pub async fn start(&self) -> Result<(), Error> {
        self.display_server_info();

        let listener = self.setup_listener().await?;

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        // Use JoinSet to keep track of all spawned tasks
        let mut tasks = JoinSet::new();

        Self::setup_ctrl_c_handler(shutdown_tx, &mut tasks);

        loop {
            tokio::select! {
                Some(()) = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                self.handler.clone(),
                                self.config.read_buffer_size,
                                &mut tasks,
                            );
                        }
                        Err(e) => Self::handle_connection_error(e).await,
                    }
                }

                // Reap finished connection tasks so the set does not grow unbounded
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        tasks.shutdown().await;
        info!("Server shutdown complete");

        Ok(())
    }

    /// Read the request head, up to and including the blank line ending
    /// the headers.
    ///
    /// Reads `chunk` bytes at a time. Returns an empty buffer if the peer
    /// closed without sending anything, and fails if the stream ends before
    /// the blank line or the head grows past [`MAX_HEAD_SIZE`].
    async fn read_request_head(
        socket: &mut (impl AsyncRead + Unpin),
        chunk: usize,
    ) -> Result<Vec<u8>, Error> {
        let chunk = chunk.clamp(1, MAX_HEAD_SIZE);
        let mut buf = Vec::with_capacity(chunk);
        let mut filled = 0;

        loop {
            if filled == MAX_HEAD_SIZE {
                return Err(ParserError::HeadTooLarge(MAX_HEAD_SIZE).into());
            }

            buf.resize((filled + chunk).min(MAX_HEAD_SIZE), 0);
            let n = socket.read(&mut buf[filled..]).await?;
            if n == 0 {
                if filled == 0 {
                    buf.clear();
                    return Ok(buf);
                }
                return Err(ParserError::IncompleteRequest.into());
            }

            // A terminator may straddle the previous read
            let from = filled.saturating_sub(3);
            filled += n;

            if let Some(end) = head_end(&buf[..filled], from) {
                buf.truncate(end);
                return Ok(buf);
            }
        }
    }

    /// Answer a request that could not be parsed with 400 and close.
    async fn reject(
        socket: &mut (impl AsyncWrite + Unpin),
        e: ParserError,
    ) -> Result<(), Error> {
        let response = HttpResponse::new(StatusCode::BadRequest)
            .with_content_type("text/plain; charset=utf-8")
            .with_body_string(format!("Error parsing request: {e}"));
        response.write_to(socket, true).await?;
        socket.shutdown().await?;
        Err(Error::ParseError(e))
    }

    /// Handle a single connection: one request, one response.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        handler: &FileServerHandler,
        read_buffer_size: usize,
    ) -> Result<(), Error> {
        let head = match Self::read_request_head(socket, read_buffer_size).await {
            Ok(head) if head.is_empty() => return Ok(()), // Connection closed
            Ok(head) => head,
            Err(Error::ParseError(e)) => return Self::reject(socket, e).await,
            Err(e) => return Err(e),
        };

        let request = match parse_request(&head) {
            Ok(req) => req,
            Err(e) => return Self::reject(socket, e).await,
        };

        let response = match handler.handle(&request).await {
            Ok(response) => response,
            Err(Error::NotFound(path)) => {
                debug!("No such path: {path}");
                HttpResponse::not_found()
            }
            Err(e) => return Err(e),
        };

        info!(
            "{method} {path} -> {status}",
            method = request.method,
            path = request.path,
            status = response.status.as_u16()
        );

        response
            .write_to(socket, !request.method.is_metadata_only())
            .await?;
        socket.shutdown().await?;

        Ok(())
    }
}

/// Find the end of the request head in `buf`, searching from `from`.
///
/// Accepts a bare `\n\n` as well as `\r\n\r\n`, matching the line
/// handling of the parser.
fn head_end(buf: &[u8], from: usize) -> Option<usize> {
    buf[from..].windows(2).enumerate().find_map(|(i, w)| {
        let at = from + i;
        if w == b"\n\n" {
            Some(at + 2)
        } else if w == b"\n\r" && buf.get(at + 2) == Some(&b'\n') {
            Some(at + 3)
        } else {
            None
        }
    })
}
