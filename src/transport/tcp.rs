use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};

use log::debug;
use socket2::{Domain, Protocol, Socket, Type};

use crate::error::RelayError;

pub const BACKLOG: i32 = 5;

pub fn bind_listener(addr: SocketAddr) -> Result<TcpListener, RelayError> {
    let listener = listen_socket(addr).map_err(|source| RelayError::Bind { addr, source })?;
    debug!("listening on tcp://{}", addr);
    Ok(listener)
}

fn listen_socket(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;
    Ok(socket.into())
}

pub fn connect(addr: SocketAddr) -> Result<TcpStream, RelayError> {
    let conn = TcpStream::connect(addr).map_err(|source| RelayError::Connect { addr, source })?;
    debug!("connected to tcp://{}", addr);
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn listener_accepts_and_connector_reaches_it() {
        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let mut client = connect(addr).unwrap();
        let (mut served, _) = listener.accept().unwrap();
        client.write_all(b"ping").unwrap();
        drop(client);
        let mut got = Vec::new();
        served.read_to_end(&mut got).unwrap();
        assert_eq!(got, b"ping");
    }

    #[test]
    fn refused_connect_is_a_setup_error() {
        let addr = {
            let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
            listener.local_addr().unwrap()
        };
        let err = connect(addr).unwrap_err();
        assert!(matches!(err, RelayError::Connect { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn busy_port_is_a_bind_error() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();
        // SO_REUSEADDR does not permit two listeners on one port
        let err = bind_listener(addr).unwrap_err();
        assert!(matches!(err, RelayError::Bind { .. }));
    }
}
