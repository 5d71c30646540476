use std::fs::File;
use std::io::{self, Read, Write};
use std::net::TcpStream;

/// Where bytes come from in one-shot mode.
#[derive(Debug)]
pub enum Source {
    Stdin(io::Stdin),
    File(File),
}

/// Where relayed bytes go. Closed when dropped.
#[derive(Debug)]
pub enum Sink {
    Stdout(io::Stdout),
    Tcp(TcpStream),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Stdin(stdin) => stdin.read(buf),
            Source::File(file) => file.read(buf),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(stdout) => stdout.write(buf),
            Sink::Tcp(conn) => conn.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(stdout) => stdout.flush(),
            Sink::Tcp(conn) => conn.flush(),
        }
    }
}

impl Sink {
    pub fn describe(&self) -> String {
        match self {
            Sink::Stdout(_) => "stdout".to_owned(),
            Sink::Tcp(conn) => match conn.peer_addr() {
                Ok(addr) => format!("tcp://{}", addr),
                Err(_) => "tcp://<disconnected>".to_owned(),
            },
        }
    }
}
