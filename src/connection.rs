use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use crate::commands;
use crate::decoder;
use crate::errors::{Error, Result};
use crate::models::Load;
use crate::requests::Selector;
use crate::schema::Record;

/// Size of the chunk read from the socket per call.
const READ_BUFFER_SIZE: usize = 512;

/// Open connections to HAProxy; every command gets a connection of its own.
pub trait ConnectionBuilder {
    type Connection;

    /// Create a new connection to HAProxy.
    fn connect(&self) -> Result<Self::Connection>;
}

/// Address of an HAProxy stats socket bound to a Unix path.
///
/// The builder only remembers where the socket lives. Each `connect` opens a fresh stream for a
/// single command; HAProxy answers that command and closes it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnixSocketBuilder {
    path: PathBuf,
}

impl UnixSocketBuilder {
    /// Point at the stats socket configured with `stats socket <path>` in `haproxy.cfg`.
    ///
    /// # Examples
    /// ```no_run
    /// use hastat::{ConnectionBuilder, UnixSocketBuilder};
    ///
    /// let socket_builder = UnixSocketBuilder::new("/var/run/haproxy.sock");
    /// let connection = socket_builder.connect().expect("Failed to connect");
    /// ```
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `/var/run/haproxy.sock`, the path most distribution packages configure.
impl Default for UnixSocketBuilder {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/run/haproxy.sock"),
        }
    }
}

impl ConnectionBuilder for UnixSocketBuilder {
    type Connection = Connection<UnixStream>;

    fn connect(&self) -> Result<Self::Connection> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Connection {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty socket path"),
            });
        }

        let socket = UnixStream::connect(&self.path).map_err(|source| Error::Connection {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "connected to control socket");

        Ok(Connection::new(socket))
    }
}

impl From<PathBuf> for UnixSocketBuilder {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

/// A connection to HAProxy over any byte stream.
///
/// HAProxy closes the socket once a command's response is complete, so every method on
/// `Connection` takes `self`: the stream is dropped, and the connection closed, whether the
/// command succeeds or fails. Use a `ConnectionBuilder` to create connections for each use.
#[derive(Debug)]
pub struct Connection<T> {
    socket: T,
}

impl<T: Read + Write> Connection<T> {
    pub fn new(socket: T) -> Self {
        Self { socket }
    }

    /// Send an arbitrary command and return the raw response.
    ///
    /// A trailing newline is appended when `command` lacks one. The response is everything
    /// HAProxy writes before closing the connection.
    ///
    /// # Examples
    /// ```no_run
    /// use hastat::{ConnectionBuilder, UnixSocketBuilder};
    ///
    /// let socket_builder = UnixSocketBuilder::default();
    /// let connection = socket_builder.connect().expect("Failed to connect");
    /// let response = connection.send("show servers state\n").expect("Command failed");
    /// println!("{}", String::from_utf8_lossy(&response));
    /// ```
    pub fn send(mut self, command: &str) -> Result<Vec<u8>> {
        if command.trim_end_matches('\n').is_empty() {
            return Err(Error::Transport(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty command",
            )));
        }

        commands::raw(&mut self.socket, command)?;
        self.read_response()
    }

    /// Query HAProxy for process information (`show info`).
    pub fn show_info(mut self) -> Result<Vec<u8>> {
        commands::show_info(&mut self.socket)?;
        commands::end(&mut self.socket)?;

        self.read_response()
    }

    /// Query HAProxy for the contents of its maps (`show map`).
    pub fn show_map(mut self) -> Result<Vec<u8>> {
        commands::show_map(&mut self.socket)?;
        commands::end(&mut self.socket)?;

        self.read_response()
    }

    /// Query HAProxy for the CSV statistics of every proxy and server (`show stat`).
    pub fn show_stat(mut self) -> Result<Vec<u8>> {
        commands::show_stat(&mut self.socket)?;
        commands::end(&mut self.socket)?;

        self.read_response()
    }

    /// Query `show stat` and decode the rows picked by `selector` into `R`.
    pub fn stats<R: Record>(self, selector: &Selector) -> Result<Vec<R>> {
        let response = self.show_stat()?;
        decoder::decode(&response, selector)
    }

    /// Query the load on every server of a backend, plus the backend's aggregate row.
    ///
    /// # Examples
    /// ```no_run
    /// use hastat::{ConnectionBuilder, UnixSocketBuilder};
    ///
    /// let socket_builder = UnixSocketBuilder::default();
    /// let connection = socket_builder.connect().expect("Failed to connect");
    /// for server in connection.load("app").expect("Failed to query load") {
    ///     println!("{}: {}/{} ({})", server.name, server.current, server.max, server.health);
    /// }
    /// ```
    pub fn load(self, backend: &str) -> Result<Vec<Load>> {
        self.stats(&Selector::proxy(backend))
    }

    /// Read until HAProxy closes its end of the connection.
    fn read_response(mut self) -> Result<Vec<u8>> {
        self.socket.flush()?;

        let mut response = Vec::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            match self.socket.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => response.extend_from_slice(&buf[..n]),
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::Transport(err)),
            }
        }

        tracing::debug!(bytes = response.len(), "read response");
        Ok(response)
    }
}

/// Send one command to the Unix socket at `address` and return the raw response.
///
/// # Examples
/// ```no_run
/// let info = hastat::send("/var/run/haproxy.sock", "show info\n").expect("Command failed");
/// ```
pub fn send<P: Into<PathBuf>>(address: P, command: &str) -> Result<Vec<u8>> {
    UnixSocketBuilder::new(address).connect()?.send(command)
}
