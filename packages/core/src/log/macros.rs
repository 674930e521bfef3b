// Crate-internal logging shorthands over `crate::log::emit`.

macro_rules! sock_log {
    ($level:expr, $($arg:tt)+) => {
        $crate::log::emit($level, format_args!($($arg)+))
    };
}

macro_rules! sock_fatal {
    ($($arg:tt)+) => { sock_log!($crate::log::Level::Fatal, $($arg)+) };
}

macro_rules! sock_error {
    ($($arg:tt)+) => { sock_log!($crate::log::Level::Error, $($arg)+) };
}

macro_rules! sock_warn {
    ($($arg:tt)+) => { sock_log!($crate::log::Level::Warn, $($arg)+) };
}

macro_rules! sock_info {
    ($($arg:tt)+) => { sock_log!($crate::log::Level::Info, $($arg)+) };
}

macro_rules! sock_debug {
    ($($arg:tt)+) => { sock_log!($crate::log::Level::Debug, $($arg)+) };
}

macro_rules! sock_verbose {
    ($($arg:tt)+) => { sock_log!($crate::log::Level::Verbose, $($arg)+) };
}
