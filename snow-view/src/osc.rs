//! Open Sound Control input for the tint channels.
//!
//! An [`OscListener`] owns a UDP socket on a background thread. Each
//! datagram is decoded into an [`OscPacket`]; messages whose address
//! matches a route registered on the [`OscRouter`] set the corresponding
//! color channel from their first numeric argument (expected in `[0, 1]`).

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use snow_core::{Channel, ColorState};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Largest datagram we accept.
const MAX_PACKET: usize = 1536;

/// Pause after the first failed receive; doubles per consecutive failure.
const RECV_BACKOFF_MIN: Duration = Duration::from_millis(10);
/// Upper bound on the pause between failed receives.
const RECV_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Errors produced while decoding a datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OscError {
    /// The packet ended before a complete field could be read.
    #[error("packet truncated at byte {0}")]
    Truncated(usize),

    /// A string field was not valid UTF-8 or lacked its terminator.
    #[error("malformed string at byte {0}")]
    BadString(usize),

    /// The type tag string did not start with `,`.
    #[error("missing type tag string")]
    MissingTypeTags,

    /// Unsupported argument type.
    #[error("unsupported type tag '{0}'")]
    UnsupportedTag(char),

    /// Address did not start with `/` or `#bundle`.
    #[error("invalid address pattern '{0}'")]
    BadAddress(String),
}

/// One decoded argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Str(String),
    Blob(Vec<u8>),
    Bool(bool),
    Nil,
    Impulse,
}

impl OscArg {
    /// Numeric value of the argument, if it has one.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            OscArg::Int(v) => Some(v as f32),
            OscArg::Float(v) => Some(v),
            OscArg::Long(v) => Some(v as f32),
            OscArg::Double(v) => Some(v as f32),
            OscArg::Bool(v) => Some(if v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

/// A single message: address pattern plus decoded arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<OscArg>,
}

/// Top-level datagram content.
#[derive(Debug, Clone, PartialEq)]
pub enum OscPacket {
    Message(OscMessage),
    /// Bundle contents; the time tag is read but not honoured.
    Bundle(Vec<OscPacket>),
}

impl OscPacket {
    /// Visits every message, descending into bundles.
    pub fn for_each_message(&self, f: &mut impl FnMut(&OscMessage)) {
        match self {
            OscPacket::Message(msg) => f(msg),
            OscPacket::Bundle(items) => {
                for item in items {
                    item.for_each_message(f);
                }
            }
        }
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], OscError> {
        let end = self.pos.checked_add(n).ok_or(OscError::Truncated(self.pos))?;
        let bytes = self.buf.get(self.pos..end).ok_or(OscError::Truncated(self.pos))?;
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], OscError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn i32(&mut self) -> Result<i32, OscError> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    /// Null-terminated string padded to a multiple of four bytes.
    fn string(&mut self) -> Result<String, OscError> {
        let start = self.pos;
        let rest = &self.buf[start.min(self.buf.len())..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(OscError::BadString(start))?;
        let s = std::str::from_utf8(&rest[..len])
            .map_err(|_| OscError::BadString(start))?
            .to_owned();
        self.take(padded(len + 1))?;
        Ok(s)
    }

    fn blob(&mut self) -> Result<Vec<u8>, OscError> {
        let at = self.pos;
        let len = usize::try_from(self.i32()?).map_err(|_| OscError::Truncated(at))?;
        let data = self.take(len)?.to_vec();
        self.take(padded(len) - len)?;
        Ok(data)
    }
}

#[inline]
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

/// Decodes one UDP datagram.
pub fn decode_packet(buf: &[u8]) -> Result<OscPacket, OscError> {
    let mut r = Reader::new(buf);
    let head = r.string()?;

    if head == "#bundle" {
        r.take(8)?; // time tag
        let mut items = Vec::new();
        while !r.is_empty() {
            let at = r.pos;
            let size = usize::try_from(r.i32()?).map_err(|_| OscError::Truncated(at))?;
            items.push(decode_packet(r.take(size)?)?);
        }
        return Ok(OscPacket::Bundle(items));
    }

    if !head.starts_with('/') {
        return Err(OscError::BadAddress(head));
    }

    // Some senders omit the type tags for argument-less messages.
    if r.is_empty() {
        return Ok(OscPacket::Message(OscMessage {
            address: head,
            args: Vec::new(),
        }));
    }

    let tags = r.string()?;
    let Some(tags) = tags.strip_prefix(',') else {
        return Err(OscError::MissingTypeTags);
    };

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        let arg = match tag {
            'i' => OscArg::Int(r.i32()?),
            'f' => OscArg::Float(f32::from_be_bytes(r.array()?)),
            'h' => OscArg::Long(i64::from_be_bytes(r.array()?)),
            'd' => OscArg::Double(f64::from_be_bytes(r.array()?)),
            's' | 'S' => OscArg::Str(r.string()?),
            'b' => OscArg::Blob(r.blob()?),
            'T' => OscArg::Bool(true),
            'F' => OscArg::Bool(false),
            'N' => OscArg::Nil,
            'I' => OscArg::Impulse,
            other => return Err(OscError::UnsupportedTag(other)),
        };
        args.push(arg);
    }

    Ok(OscPacket::Message(OscMessage {
        address: head,
        args,
    }))
}

/// Maps exact OSC addresses to color channels.
#[derive(Clone, Debug)]
pub struct OscRouter {
    routes: HashMap<String, Vec<Channel>>,
    color: ColorState,
}

impl OscRouter {
    /// Creates a router with no routes that writes into `color`.
    pub fn new(color: ColorState) -> Self {
        Self {
            routes: HashMap::new(),
            color,
        }
    }

    /// Sends messages arriving at `address` to `channel`. An address may
    /// drive several channels.
    pub fn on_input(&mut self, address: impl Into<String>, channel: Channel) -> &mut Self {
        self.routes.entry(address.into()).or_default().push(channel);
        self
    }

    /// Applies `msg`, returning how many channels were updated.
    pub fn dispatch(&self, msg: &OscMessage) -> usize {
        let Some(channels) = self.routes.get(&msg.address) else {
            return 0;
        };
        let Some(value) = msg.args.iter().find_map(OscArg::as_f32) else {
            warn!(address = %msg.address, "routed message has no numeric argument");
            return 0;
        };
        for &channel in channels {
            self.color.set_channel(channel, value);
        }
        channels.len()
    }
}

/// Background UDP listener feeding an [`OscRouter`].
pub struct OscListener {
    local_addr: SocketAddr,
    show_messages: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

impl OscListener {
    /// Binds `addr` and starts the receive thread.
    pub fn spawn(addr: SocketAddr, router: OscRouter, show_messages: bool) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        let local_addr = socket.local_addr()?;
        let show = Arc::new(AtomicBool::new(show_messages));
        let thread_show = Arc::clone(&show);

        let handle = thread::Builder::new()
            .name("osc-in".into())
            .spawn(move || receive_loop(socket, router, thread_show))?;

        info!(%local_addr, "listening for OSC input");
        Ok(Self {
            local_addr,
            show_messages: show,
            _handle: handle,
        })
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Log every incoming message at `info`.
    pub fn show_messages(&self) {
        self.show_messages.store(true, Ordering::Relaxed);
    }

    /// Log incoming messages at `debug` only.
    pub fn hide_messages(&self) {
        self.show_messages.store(false, Ordering::Relaxed);
    }

    /// Whether incoming messages are logged at `info`.
    pub fn is_showing_messages(&self) -> bool {
        self.show_messages.load(Ordering::Relaxed)
    }
}

/// Sleep before retrying after `failures` consecutive receive errors.
fn recv_backoff(failures: u32) -> Duration {
    RECV_BACKOFF_MIN
        .saturating_mul(1u32 << failures.saturating_sub(1).min(16))
        .min(RECV_BACKOFF_MAX)
}

fn receive_loop(socket: UdpSocket, router: OscRouter, show: Arc<AtomicBool>) {
    let mut buf = [0u8; MAX_PACKET];
    let mut failures = 0u32;
    loop {
        let (len, from) = match socket.recv_from(&mut buf) {
            Ok(received) => {
                failures = 0;
                received
            }
            Err(err) => {
                failures = failures.saturating_add(1);
                let pause = recv_backoff(failures);
                warn!(%err, failures, ?pause, "OSC receive failed");
                thread::sleep(pause);
                continue;
            }
        };

        let packet = match decode_packet(&buf[..len]) {
            Ok(packet) => packet,
            Err(err) => {
                warn!(%from, %err, "dropping malformed OSC packet");
                continue;
            }
        };

        packet.for_each_message(&mut |msg| {
            if show.load(Ordering::Relaxed) {
                info!(%from, address = %msg.address, args = ?msg.args, "OSC in");
            } else {
                debug!(%from, address = %msg.address, args = ?msg.args, "OSC in");
            }
            router.dispatch(msg);
        });
    }
}
