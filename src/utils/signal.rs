use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, info};

const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Default)]
struct Shared {
    cancelled: AtomicBool,
    wake_addr: Mutex<Option<SocketAddr>>,
}

/// Process-wide shutdown flag. Once cancelled it stays cancelled.
///
/// The acceptor registers its listening address with [`Cancellation::wake_on`]
/// so that `cancel` can unblock a pending `accept` by opening a throwaway
/// connection to it.
#[derive(Clone, Default)]
pub struct Cancellation {
    shared: Arc<Shared>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        if self.shared.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let wake_addr = match self.shared.wake_addr.lock() {
            Ok(addr) => *addr,
            Err(poisoned) => *poisoned.into_inner(),
        };
        if let Some(addr) = wake_addr {
            // the acceptor drops this connection once it sees the flag
            if let Err(e) = TcpStream::connect_timeout(&addr, WAKE_TIMEOUT) {
                debug!("wake connection to {} failed: {}", addr, e);
            }
        }
    }

    pub fn wake_on(&self, addr: SocketAddr) {
        let addr = match addr {
            SocketAddr::V4(v4) if v4.ip().is_unspecified() => SocketAddr::from((Ipv4Addr::LOCALHOST, v4.port())),
            SocketAddr::V6(v6) if v6.ip().is_unspecified() => SocketAddr::from((Ipv6Addr::LOCALHOST, v6.port())),
            other => other,
        };
        match self.shared.wake_addr.lock() {
            Ok(mut slot) => *slot = Some(addr),
            Err(poisoned) => *poisoned.into_inner() = Some(addr),
        }
    }
}

/// Routes SIGINT and SIGTERM to `cancel`.
///
/// Both signals are blocked in the calling thread, and therefore in every
/// thread it spawns later, then a watcher thread collects them with
/// `sigwait`. Must run before any other thread is started.
pub fn install(cancel: Cancellation) -> io::Result<()> {
    let mask = unsafe {
        let mut mask: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut mask);
        libc::sigaddset(&mut mask, libc::SIGINT);
        libc::sigaddset(&mut mask, libc::SIGTERM);
        mask
    };
    let rc = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &mask, std::ptr::null_mut()) };
    if rc != 0 {
        return Err(io::Error::from_raw_os_error(rc));
    }

    thread::Builder::new().name("signal-watcher".into()).spawn(move || {
        let mut sig: libc::c_int = 0;
        loop {
            if unsafe { libc::sigwait(&mask, &mut sig) } == 0 {
                info!("received signal {}, no new sessions will be accepted", sig);
                cancel.cancel();
                break;
            }
        }
    })?;
    Ok(())
}
