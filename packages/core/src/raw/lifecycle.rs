use socket2::{SockAddr, Socket};

use super::system;
use crate::error::Result;

/// # Errors
///
/// `Error::System` when the OS accept call fails.
pub fn accept(listener: &Socket) -> Result<(Socket, SockAddr)> {
    listener.accept().map_err(|e| system("accept", e))
}

/// # Errors
///
/// `Error::System` when the OS listen call fails.
pub fn listen(socket: &Socket, backlog: i32) -> Result<()> {
    socket.listen(backlog).map_err(|e| system("listen", e))
}

/// Close a descriptor and report the OS result.
///
/// Dropping a `Socket` also closes it but discards the status.
///
/// # Errors
///
/// `Error::System` carrying the errno from `close(2)`.
#[cfg(unix)]
pub fn close(socket: Socket) -> Result<()> {
    use std::os::fd::IntoRawFd;

    let fd = socket.into_raw_fd();
    nix::unistd::close(fd).map_err(|errno| system("close", std::io::Error::from(errno)))
}

#[cfg(not(unix))]
pub fn close(socket: Socket) -> Result<()> {
    drop(socket);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use socket2::{Domain, Type};

    use super::*;

    #[test]
    fn test_listen_accept_close() {
        let listener = Socket::new(Domain::IPV4, Type::STREAM, None).expect("socket");
        let any: SocketAddr = "127.0.0.1:0".parse().expect("addr");
        listener.bind(&any.into()).expect("bind");
        listen(&listener, 4).expect("listen");
        let local = listener.local_addr().expect("local addr");

        let client = Socket::new(Domain::IPV4, Type::STREAM, None).expect("socket");
        client.connect(&local).expect("connect");
        let (server, peer) = accept(&listener).expect("accept");
        assert_eq!(
            peer.as_socket(),
            client.local_addr().expect("client addr").as_socket()
        );

        close(server).expect("close accepted");
        close(client).expect("close client");
        close(listener).expect("close listener");
    }
}
