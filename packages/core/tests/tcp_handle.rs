//! TCP handle lifecycle tests over loopback
//!
//! Uses .expect() for clear test failures with meaningful messages.

mod common;

use std::thread;

use unisock_core::{Error, MsgFlags, Protocol, SockFlags};

use common::{ipv4_context, listener, pattern, read_exact, write_all};

#[test]
fn test_wildcard_bind_on_ipv4_hint() {
    let ctx = ipv4_context();
    let handle = ctx
        .bind(None, "0", Protocol::Tcp, SockFlags::NONE)
        .expect("wildcard bind");
    assert_eq!(handle.local_host(), Some("0.0.0.0"));
    assert!(handle.local_port().is_some_and(|port| port != 0));
    assert!(handle.remote_addr().is_none());
    handle.close().expect("close");
}

#[test]
fn test_connect_accept_ports_mirror() {
    let ctx = ipv4_context();
    let (listener, port) = listener(&ctx, Protocol::Tcp, SockFlags::NONE);

    let client = ctx
        .connect("127.0.0.1", &port.to_string(), Protocol::Tcp, SockFlags::NONE)
        .expect("connect");
    let server = ctx.accept(&listener).expect("accept");

    assert_eq!(client.remote_port(), server.local_port());
    assert_eq!(client.local_port(), server.remote_port());
    assert_eq!(client.remote_host(), Some("127.0.0.1"));
    assert_eq!(server.protocol(), Protocol::Tcp);
    assert!(!client.flags().multicast_joined());
    assert!(client.membership().is_none());

    client.close().expect("close client");
    server.close().expect("close server");
    listener.close().expect("close listener");
}

#[test]
fn test_echo_preserves_bytes() {
    let ctx = ipv4_context();
    let (listener, port) = listener(&ctx, Protocol::Tcp, SockFlags::NONE);
    let mut client = ctx
        .connect("127.0.0.1", &port.to_string(), Protocol::Tcp, SockFlags::NONE)
        .expect("connect");
    let server = ctx.accept(&listener).expect("accept");

    const LARGE: usize = 256 * 1024;
    let echo = thread::spawn(move || {
        let mut server = server;
        for len in [1, LARGE] {
            let data = read_exact(&mut server, len);
            write_all(&mut server, &data);
        }
        server.close().expect("close server");
    });

    // A zero-length write is accepted and moves nothing.
    assert_eq!(client.write(&[], None, MsgFlags::NONE).expect("empty write"), 0);

    for len in [1, LARGE] {
        let data = pattern(len);
        write_all(&mut client, &data);
        assert_eq!(read_exact(&mut client, len), data, "echo of {len} bytes");
    }

    echo.join().expect("echo thread");
    // Peer closed: end of stream.
    let tail = client.read_vec(16, None, MsgFlags::NONE).expect("read at eof");
    assert!(tail.is_empty());
    client.close().expect("close client");
}

#[test]
fn test_set_dest_on_tcp_is_protocol_error() {
    let ctx = ipv4_context();
    let (listener, port) = listener(&ctx, Protocol::Tcp, SockFlags::NONE);
    let mut client = ctx
        .connect("127.0.0.1", &port.to_string(), Protocol::Tcp, SockFlags::NONE)
        .expect("connect");
    let before = client.remote_port();

    let elsewhere = unisock_core::parse_address("192.0.2.1", 9).expect("address");
    let err = client.set_dest(&elsewhere).expect_err("tcp set_dest");
    assert!(matches!(err, Error::Protocol { protocol: Protocol::Tcp, .. }));
    assert_eq!(client.remote_port(), before);
    assert_eq!(client.remote_host(), Some("127.0.0.1"));
    drop(listener);
}

#[test]
fn test_connect_refused_is_system_error() {
    let ctx = ipv4_context();
    // Bound but never listening: connections are refused.
    let idle = ctx
        .bind(Some("127.0.0.1"), "0", Protocol::Tcp, SockFlags::NONE)
        .expect("bind");
    let port = idle.local_port().expect("port").to_string();
    let err = ctx
        .connect("127.0.0.1", &port, Protocol::Tcp, SockFlags::NONE)
        .expect_err("refused");
    assert!(matches!(err, Error::System { .. }));
    assert!(err.os_error().is_some());
}

#[test]
fn test_reconnect_resets_cached_addresses() {
    let ctx = ipv4_context();
    let bind = || {
        ctx.bind(Some("127.0.0.1"), "0", Protocol::Udp, SockFlags::NONE)
            .expect("bind udp")
    };
    let (first, second) = (bind(), bind());
    let first_port = first.local_port().expect("port");
    let second_port = second.local_port().expect("port");

    let mut handle = ctx
        .connect("127.0.0.1", &first_port.to_string(), Protocol::Udp, SockFlags::NONE)
        .expect("connect");
    assert_eq!(handle.remote_port(), Some(first_port));

    ctx.reconnect(&mut handle, "127.0.0.1", &second_port.to_string())
        .expect("reconnect");
    assert_eq!(handle.remote_port(), Some(second_port));
}
