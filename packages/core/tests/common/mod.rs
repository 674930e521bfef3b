#![allow(dead_code)]

use std::sync::Arc;

use unisock_core::{Family, Handle, MsgFlags, Protocol, SockConfig, SockContext, SockFlags};

/// Context that resolves IPv4 only, so wildcard binds land on 0.0.0.0.
pub fn ipv4_context() -> Arc<SockContext> {
    Arc::new(SockContext::new(
        SockConfig::default().with_family(Family::Inet),
    ))
}

/// Listening handle on an ephemeral port plus that port.
pub fn listener(ctx: &SockContext, protocol: Protocol, flags: SockFlags) -> (Handle, u16) {
    let listener = ctx
        .bind(Some("127.0.0.1"), "0", protocol, flags)
        .expect("bind loopback");
    ctx.listen(&listener).expect("listen");
    let port = listener.local_port().expect("bound port");
    (listener, port)
}

pub fn write_all(handle: &mut Handle, mut data: &[u8]) {
    while !data.is_empty() {
        let n = handle.write(data, None, MsgFlags::NONE).expect("write");
        assert!(n > 0, "write made no progress");
        data = &data[n..];
    }
}

/// Read exactly `len` bytes, tolerating short reads.
pub fn read_exact(handle: &mut Handle, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut buf = vec![0u8; 4096];
    while out.len() < len {
        let want = (len - out.len()).min(buf.len());
        let n = handle
            .read(&mut buf[..want], None, MsgFlags::NONE)
            .expect("read");
        assert!(n > 0, "peer closed after {} of {len} bytes", out.len());
        out.extend_from_slice(&buf[..n]);
    }
    out
}

pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
