//! Connect/close cycles must not leak descriptors
//!
//! Kept in its own test binary so no concurrent test opens descriptors while
//! the count is sampled.
#![cfg(target_os = "linux")]

mod common;

use unisock_core::{Protocol, SockFlags};

use common::{ipv4_context, listener};

fn open_descriptors() -> usize {
    std::fs::read_dir("/proc/self/fd")
        .expect("read /proc/self/fd")
        .count()
}

#[test]
fn test_connect_close_does_not_leak() {
    let ctx = ipv4_context();
    let (listener, port) = listener(&ctx, Protocol::Tcp, SockFlags::NONE);
    let port = port.to_string();

    let before = open_descriptors();
    for _ in 0..32 {
        let client = ctx
            .connect("127.0.0.1", &port, Protocol::Tcp, SockFlags::NONE)
            .expect("connect");
        assert!(!client.flags().multicast_joined());
        let server = ctx.accept(&listener).expect("accept");
        client.close().expect("close client");
        server.close().expect("close server");
    }
    for _ in 0..32 {
        let client = ctx
            .connect("127.0.0.1", &port, Protocol::Tcp, SockFlags::NONE)
            .expect("connect");
        let server = ctx.accept(&listener).expect("accept");
        drop((client, server));
    }
    assert_eq!(open_descriptors(), before);
    listener.close().expect("close listener");
}
