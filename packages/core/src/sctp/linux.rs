use std::io;
use std::mem;
use std::os::fd::AsRawFd;

use libc::{c_int, c_void, socklen_t};
use socket2::Socket;

use crate::config::SctpConfig;

const SOL_SCTP: c_int = 132;
const SCTP_INITMSG: c_int = 2;
const SCTP_EVENTS: c_int = 11;

#[repr(C)]
struct SctpInitMsg {
    num_ostreams: u16,
    max_instreams: u16,
    max_attempts: u16,
    max_init_timeo: u16,
}

// First ten fields of `struct sctp_event_subscribe`; the kernel accepts any
// prefix of the full structure.
#[repr(C)]
#[derive(Default)]
struct SctpEventSubscribe {
    data_io: u8,
    association: u8,
    address: u8,
    send_failure: u8,
    peer_error: u8,
    shutdown: u8,
    partial_delivery: u8,
    adaptation_layer: u8,
    authentication: u8,
    sender_dry: u8,
}

fn set_option<T>(socket: &Socket, name: c_int, value: &T) -> io::Result<()> {
    // SAFETY: `value` points to a live, initialized `T` of the stated length.
    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            SOL_SCTP,
            name,
            (value as *const T).cast::<c_void>(),
            mem::size_of::<T>() as socklen_t,
        )
    };
    if rc == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Apply stream counts and subscribe to per-message header delivery.
pub(crate) fn configure_listener(socket: &Socket, config: &SctpConfig) -> io::Result<()> {
    let init = SctpInitMsg {
        num_ostreams: config.out_streams,
        max_instreams: config.max_in_streams,
        max_attempts: config.max_attempts,
        max_init_timeo: config.max_init_timeout_ms,
    };
    set_option(socket, SCTP_INITMSG, &init)?;
    let events = SctpEventSubscribe {
        data_io: 1,
        ..SctpEventSubscribe::default()
    };
    set_option(socket, SCTP_EVENTS, &events)
}

#[cfg(feature = "sctp")]
pub(crate) use messages::{recv, send};

#[cfg(feature = "sctp")]
mod messages {
    use std::io;
    use std::mem;
    use std::os::fd::AsRawFd;
    use std::ptr;

    use libc::{c_int, c_uint, c_void};
    use socket2::Socket;

    use super::SOL_SCTP;
    use crate::sctp::SctpInfo;

    const SCTP_SNDRCV: c_int = 1;

    #[repr(C)]
    #[derive(Default, Clone, Copy)]
    struct SctpSndRcvInfo {
        stream: u16,
        ssn: u16,
        flags: u16,
        ppid: u32,
        context: u32,
        time_to_live: u32,
        tsn: u32,
        cum_tsn: u32,
        assoc_id: i32,
    }

    impl From<SctpSndRcvInfo> for SctpInfo {
        fn from(raw: SctpSndRcvInfo) -> Self {
            SctpInfo {
                stream: raw.stream,
                ssn: raw.ssn,
                flags: raw.flags,
                ppid: raw.ppid,
                context: raw.context,
                time_to_live: raw.time_to_live,
                tsn: raw.tsn,
                cum_tsn: raw.cum_tsn,
                assoc_id: raw.assoc_id,
            }
        }
    }

    impl From<&SctpInfo> for SctpSndRcvInfo {
        fn from(info: &SctpInfo) -> Self {
            SctpSndRcvInfo {
                stream: info.stream,
                ssn: info.ssn,
                flags: info.flags,
                ppid: info.ppid,
                context: info.context,
                time_to_live: info.time_to_live,
                tsn: info.tsn,
                cum_tsn: info.cum_tsn,
                assoc_id: info.assoc_id,
            }
        }
    }

    // Room for one cmsghdr carrying an sctp_sndrcvinfo, 8-byte aligned.
    type ControlBuf = [u64; 8];

    /// `recvmsg` that copies any `SCTP_SNDRCV` header into `info`.
    pub(crate) fn recv(
        socket: &Socket,
        buf: &mut [u8],
        info: Option<&mut SctpInfo>,
        flags: c_int,
    ) -> io::Result<usize> {
        let mut iov = libc::iovec {
            iov_base: buf.as_mut_ptr().cast::<c_void>(),
            iov_len: buf.len(),
        };
        let mut control: ControlBuf = [0; 8];
        // SAFETY: an all-zero msghdr is a valid empty header.
        let mut msg: libc::msghdr = unsafe { mem::zeroed() };
        msg.msg_iov = &mut iov;
        msg.msg_iovlen = 1;
        msg.msg_control = control.as_mut_ptr().cast::<c_void>();
        msg.msg_controllen = mem::size_of_val(&control) as _;

        // SAFETY: every pointer in `msg` refers to a live local buffer.
        let received = unsafe { libc::recvmsg(socket.as_raw_fd(), &mut msg, flags) };
        if received < 0 {
            return Err(io::Error::last_os_error());
        }

        if let Some(info) = info {
            // SAFETY: the control buffer was filled by the kernel and
            // `msg_controllen` bounds the walk.
            unsafe {
                let mut cmsg = libc::CMSG_FIRSTHDR(&msg);
                while !cmsg.is_null() {
                    if (*cmsg).cmsg_level == SOL_SCTP && (*cmsg).cmsg_type == SCTP_SNDRCV {
                        let raw =
                            ptr::read_unaligned(libc::CMSG_DATA(cmsg).cast::<SctpSndRcvInfo>());
                        *info = raw.into();
                        break;
                    }
                    cmsg = libc::CMSG_NXTHDR(&msg, cmsg);
                }
            }
        }
        Ok(received as usize)
    }

    /// `sendmsg` with a single `SCTP_SNDRCV` control message.
    pub(crate) fn send(
        socket: &Socket,
        buf: &[u8],
        info: &SctpInfo,
        flags: c_int,
    ) -> io::Result<usize> {
        let mut iov = libc::iovec {
            iov_base: buf.as_ptr() as *mut c_void,
            iov_len: buf.len(),
        };
        let mut control: ControlBuf = [0; 8];
        let payload = mem::size_of::<SctpSndRcvInfo>() as c_uint;
        // SAFETY: an all-zero msghdr is a valid empty header.
        let mut msg: libc::msghdr = unsafe { mem::zeroed() };
        msg.msg_iov = &mut iov;
        msg.msg_iovlen = 1;
        msg.msg_control = control.as_mut_ptr().cast::<c_void>();

        // SAFETY: the control buffer is larger than CMSG_SPACE(payload), so
        // CMSG_FIRSTHDR is non-null and the header plus data fit inside it.
        let sent = unsafe {
            msg.msg_controllen = libc::CMSG_SPACE(payload) as _;
            debug_assert!(msg.msg_controllen as usize <= mem::size_of_val(&control));
            let cmsg = libc::CMSG_FIRSTHDR(&msg);
            (*cmsg).cmsg_level = SOL_SCTP;
            (*cmsg).cmsg_type = SCTP_SNDRCV;
            (*cmsg).cmsg_len = libc::CMSG_LEN(payload) as _;
            ptr::write_unaligned(
                libc::CMSG_DATA(cmsg).cast::<SctpSndRcvInfo>(),
                SctpSndRcvInfo::from(info),
            );
            libc::sendmsg(socket.as_raw_fd(), &msg, flags)
        };
        if sent < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(sent as usize)
    }

}
