use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use tempfile::TempDir;

use hastat::errors::SchemaError;
use hastat::models::{Load, ProxyType, Stat};
use hastat::requests::Selector;
use hastat::{ConnectionBuilder, Error, UnixSocketBuilder};

const SHOW_STAT: &[u8] = include_bytes!("data/show_stat.csv");

/// A stand-in for HAProxy's stats socket.
///
/// Answers each of a fixed number of connections with the same response: it reads one command
/// line, writes the response and closes the connection.
struct StubSocket {
    path: PathBuf,
    handle: JoinHandle<Vec<String>>,
    _dir: TempDir,
}

impl StubSocket {
    fn respond_with(response: &[u8], connections: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("haproxy.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let response = response.to_vec();

        let handle = thread::spawn(move || {
            let mut commands = Vec::new();
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let mut command = String::new();
                BufReader::new(&stream).read_line(&mut command).unwrap();
                stream.write_all(&response).unwrap();
                commands.push(command);
            }
            commands
        });

        Self {
            path,
            handle,
            _dir: dir,
        }
    }

    fn builder(&self) -> UnixSocketBuilder {
        UnixSocketBuilder::new(self.path.clone())
    }

    /// Wait for the stub to finish and return the commands it received.
    fn commands(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

#[test]
fn connection_show_info() {
    let stub = StubSocket::respond_with(b"Name: HAProxy\nVersion: 2.8.3\n", 1);
    let response = stub.builder().connect().unwrap().show_info().unwrap();

    assert_eq!(response, b"Name: HAProxy\nVersion: 2.8.3\n");
    assert_eq!(stub.commands(), vec!["show info\n"]);
}

#[test]
fn connection_show_map() {
    let stub = StubSocket::respond_with(b"# id (file) description\n", 1);
    let response = stub.builder().connect().unwrap().show_map().unwrap();

    assert_eq!(response, b"# id (file) description\n");
    assert_eq!(stub.commands(), vec!["show map\n"]);
}

#[test]
fn connection_show_stat() {
    let stub = StubSocket::respond_with(SHOW_STAT, 1);
    let response = stub.builder().connect().unwrap().show_stat().unwrap();

    assert_eq!(response, SHOW_STAT);
    assert_eq!(stub.commands(), vec!["show stat\n"]);
}

#[test]
fn send_appends_newline() {
    let stub = StubSocket::respond_with(b"ok\n", 1);
    let response = hastat::send(stub.path.clone(), "show stat").unwrap();

    assert_eq!(response, b"ok\n");
    assert_eq!(stub.commands(), vec!["show stat\n"]);
}

#[test]
fn send_reads_responses_larger_than_one_chunk() {
    let response: Vec<u8> = (0..100_000u32).map(|i| b'a' + (i % 26) as u8).collect();
    let stub = StubSocket::respond_with(&response, 1);

    assert_eq!(hastat::send(stub.path.clone(), "show stat\n").unwrap(), response);
    stub.commands();
}

#[test]
fn send_treats_immediate_close_as_empty_response() {
    let stub = StubSocket::respond_with(b"", 1);

    assert!(hastat::send(stub.path.clone(), "show map\n").unwrap().is_empty());
    stub.commands();
}

#[test]
fn send_fails_without_listener() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sock");

    match hastat::send(path.clone(), "show info\n") {
        Err(Error::Connection { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected connection error, got {:?}", other),
    }
}

#[test]
fn concurrent_sends_use_independent_connections() {
    const CLIENTS: usize = 8;
    let stub = StubSocket::respond_with(SHOW_STAT, CLIENTS);

    let clients: Vec<_> = (0..CLIENTS)
        .map(|_| {
            let path = stub.path.clone();
            thread::spawn(move || hastat::send(path, "show stat\n").unwrap())
        })
        .collect();
    for client in clients {
        assert_eq!(client.join().unwrap(), SHOW_STAT);
    }
    assert_eq!(stub.commands().len(), CLIENTS);
}

#[test]
fn connection_load() {
    let stub = StubSocket::respond_with(SHOW_STAT, 1);
    let load = stub.builder().connect().unwrap().load("elastic-ocean").unwrap();

    assert_eq!(load.len(), 6);
    assert_eq!(
        load[0],
        Load {
            name: "ocean-1".into(),
            current: 2,
            max: 14,
            health: "UP".into(),
            failed_check: "0".into(),
        }
    );
    assert_eq!(load[5].name, "BACKEND");
    assert_eq!(load[5].current, 12);
    assert_eq!(stub.commands(), vec!["show stat\n"]);
}

#[test]
fn connection_stats() {
    let stub = StubSocket::respond_with(SHOW_STAT, 1);
    let stats: Vec<Stat> = stub
        .builder()
        .connect()
        .unwrap()
        .stats(&Selector::proxy("elastic-ocean"))
        .unwrap();

    let servers: Vec<&str> = stats.iter().map(|s| s.server.as_str()).collect();
    assert_eq!(
        servers,
        vec!["ocean-1", "ocean-2", "ocean-3", "ocean-4", "ocean-5", "BACKEND"]
    );

    let down = &stats[3];
    assert_eq!(down.status, "DOWN");
    assert_eq!(down.check_status, "L4CON");
    assert_eq!(down.failed_checks, 7);
    assert_eq!(down.down_transitions, 2);
    assert_eq!(down.downtime, 90);
    assert_eq!(down.proxy_type(), Some(ProxyType::Server));

    let backend = &stats[5];
    assert_eq!(backend.proxy_type(), Some(ProxyType::Backend));
    assert_eq!(backend.active_servers, 4);
    assert_eq!(backend.bytes_out, 992_188_310);
    stub.commands();
}

#[test]
fn connection_stats_propagates_decode_errors() {
    let stub = StubSocket::respond_with(b"# pxname,svname,\napp,app-1,\n", 1);
    let result = stub.builder().connect().unwrap().load("app");

    match result {
        Err(Error::Schema(SchemaError::MissingColumn(column))) => assert_eq!(column, "scur"),
        other => panic!("expected missing column, got {:?}", other),
    }
    stub.commands();
}

#[test]
fn connection_stats_rejects_non_numeric_cells() {
    let stub = StubSocket::respond_with(
        b"# pxname,svname,scur,smax,status,chkdown,\napp,app-1,1,2,UP,0,\napp,app-2,abc,2,UP,0,\n",
        1,
    );
    let result = stub.builder().connect().unwrap().load("app");

    match result {
        Err(Error::Value { field, row, .. }) => {
            assert_eq!(field, "current");
            assert_eq!(row, 2);
        }
        other => panic!("expected value error, got {:?}", other),
    }
    stub.commands();
}
