use std::io::{self, Read, Write};
use std::ops::{Deref, DerefMut};

use rustls::{ConnectionCommon, SideData};
use socket2::Socket;

use super::{TlsError, TlsSession};

/// rustls connection bound to a descriptor for its whole life.
#[derive(Debug)]
pub(crate) struct RustlsSession<C> {
    conn: C,
}

impl<C, S> RustlsSession<C>
where
    C: DerefMut + Deref<Target = ConnectionCommon<S>>,
    S: SideData,
{
    /// Run the handshake to completion on `socket`.
    pub(crate) fn establish(mut conn: C, socket: &Socket) -> Result<Self, TlsError> {
        let mut io = socket;
        while conn.is_handshaking() {
            conn.complete_io(&mut io).map_err(TlsError::Handshake)?;
        }
        // Flush anything queued after the final flight (TLS 1.3 tickets).
        while conn.wants_write() {
            conn.write_tls(&mut io).map_err(TlsError::Handshake)?;
        }
        Ok(Self { conn })
    }
}

impl<C, S> TlsSession for RustlsSession<C>
where
    C: DerefMut + Deref<Target = ConnectionCommon<S>> + Send + std::fmt::Debug,
    S: SideData,
{
    fn read(&mut self, socket: &Socket, buf: &mut [u8]) -> Result<usize, TlsError> {
        let mut io = socket;
        rustls::Stream::new(&mut self.conn, &mut io)
            .read(buf)
            .map_err(TlsError::Io)
    }

    fn write(&mut self, socket: &Socket, buf: &[u8]) -> Result<usize, TlsError> {
        let mut io = socket;
        let mut stream = rustls::Stream::new(&mut self.conn, &mut io);
        let written = stream.write(buf).map_err(TlsError::Io)?;
        stream.flush().map_err(TlsError::Io)?;
        Ok(written)
    }

    fn shutdown(&mut self, socket: &Socket) -> Result<(), TlsError> {
        let mut io = socket;
        self.conn.send_close_notify();
        while self.conn.wants_write() {
            match self.conn.write_tls(&mut io) {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(TlsError::Io(e)),
            }
        }
        Ok(())
    }
}
