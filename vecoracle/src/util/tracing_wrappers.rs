// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Logging macros that compile to nothing unless the `tracing` feature is enabled.

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub use tracing::{debug, error, info, instrument, trace, warn};

// Accepts the field syntax of `tracing` events and only borrows the values,
// inside a branch that never runs, so bindings used purely for logging stay
// used.
#[cfg(not(feature = "tracing"))]
macro_rules! noop_event {
    () => {};
    ($key:ident = %$value:expr $(, $($rest:tt)*)?) => {
        if false {
            let _ = &$value;
        }
        $($crate::util::tracing_wrappers::noop_event!($($rest)*);)?
    };
    ($key:ident = ?$value:expr $(, $($rest:tt)*)?) => {
        if false {
            let _ = &$value;
        }
        $($crate::util::tracing_wrappers::noop_event!($($rest)*);)?
    };
    ($key:ident = $value:expr $(, $($rest:tt)*)?) => {
        if false {
            let _ = &$value;
        }
        $($crate::util::tracing_wrappers::noop_event!($($rest)*);)?
    };
    (%$value:ident $(, $($rest:tt)*)?) => {
        if false {
            let _ = &$value;
        }
        $($crate::util::tracing_wrappers::noop_event!($($rest)*);)?
    };
    (?$value:ident $(, $($rest:tt)*)?) => {
        if false {
            let _ = &$value;
        }
        $($crate::util::tracing_wrappers::noop_event!($($rest)*);)?
    };
    ($value:ident $(, $($rest:tt)*)?) => {
        if false {
            let _ = &$value;
        }
        $($crate::util::tracing_wrappers::noop_event!($($rest)*);)?
    };
    ($message:literal $(, $arg:expr)* $(,)?) => {
        if false {
            let _ = ($(&$arg,)*);
        }
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! noop_debug {
    ($($arg:tt)*) => { $crate::util::tracing_wrappers::noop_event!($($arg)*) };
}
#[cfg(not(feature = "tracing"))]
macro_rules! noop_error {
    ($($arg:tt)*) => { $crate::util::tracing_wrappers::noop_event!($($arg)*) };
}
#[cfg(not(feature = "tracing"))]
macro_rules! noop_info {
    ($($arg:tt)*) => { $crate::util::tracing_wrappers::noop_event!($($arg)*) };
}
#[cfg(not(feature = "tracing"))]
macro_rules! noop_trace {
    ($($arg:tt)*) => { $crate::util::tracing_wrappers::noop_event!($($arg)*) };
}
#[cfg(not(feature = "tracing"))]
macro_rules! noop_warn {
    ($($arg:tt)*) => { $crate::util::tracing_wrappers::noop_event!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use {
    noop_debug as debug, noop_error as error, noop_event, noop_info as info,
    noop_trace as trace, noop_warn as warn,
};
