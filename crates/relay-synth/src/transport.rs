//! Transport table.

use relay_core::DEGRADE_UNKNOWN_TRANSPORT;
use tracing::debug;

/// Wire transport of a listener or dialer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transport {
    #[default]
    Tcp,
    /// `tcp+udp`: a tcp listener on the engine side.
    TcpUdp,
    Tls,
    Mtls,
    Ws,
    Wss,
    Mws,
    Mwss,
    H2,
    H2c,
    Quic,
    Kcp,
    Grpc,
    Pht,
    Phts,
    Ssh,
    Sshd,
    Http3,
    Dtls,
    Ohttp,
    Otls,
    Redirect,
    Tun,
}

/// Static description of how a transport is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportShape {
    /// Listener and dialer `type`.
    pub kind: &'static str,
    pub requires_tls: bool,
    pub websocket: bool,
    pub kcp: bool,
}

impl Transport {
    pub const ALL: [Transport; 23] = [
        Transport::Tcp,
        Transport::TcpUdp,
        Transport::Tls,
        Transport::Mtls,
        Transport::Ws,
        Transport::Wss,
        Transport::Mws,
        Transport::Mwss,
        Transport::H2,
        Transport::H2c,
        Transport::Quic,
        Transport::Kcp,
        Transport::Grpc,
        Transport::Pht,
        Transport::Phts,
        Transport::Ssh,
        Transport::Sshd,
        Transport::Http3,
        Transport::Dtls,
        Transport::Ohttp,
        Transport::Otls,
        Transport::Redirect,
        Transport::Tun,
    ];

    /// Parse a stored transport value. An empty value is tcp.
    pub fn from_name(name: &str) -> Option<Self> {
        let transport = match name {
            "" | "tcp" => Self::Tcp,
            "tcp+udp" | "udp+tcp" => Self::TcpUdp,
            "tls" => Self::Tls,
            "mtls" => Self::Mtls,
            "ws" => Self::Ws,
            "wss" => Self::Wss,
            "mws" => Self::Mws,
            "mwss" => Self::Mwss,
            "h2" => Self::H2,
            "h2c" => Self::H2c,
            "quic" => Self::Quic,
            "kcp" => Self::Kcp,
            "grpc" => Self::Grpc,
            "pht" => Self::Pht,
            "phts" => Self::Phts,
            "ssh" => Self::Ssh,
            "sshd" => Self::Sshd,
            "http3" => Self::Http3,
            "dtls" => Self::Dtls,
            "ohttp" => Self::Ohttp,
            "otls" => Self::Otls,
            "redirect" => Self::Redirect,
            "tun" => Self::Tun,
            _ => return None,
        };
        Some(transport)
    }

    /// Parse a stored transport value, falling back to tcp for unknown
    /// values.
    pub fn normalize(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            debug!(kind = DEGRADE_UNKNOWN_TRANSPORT, transport = name, "unknown transport, using tcp");
            Self::Tcp
        })
    }

    pub const fn kind(self) -> &'static str {
        self.shape().kind
    }

    pub const fn shape(self) -> TransportShape {
        let (kind, requires_tls, websocket, kcp) = match self {
            Self::Tcp | Self::TcpUdp => ("tcp", false, false, false),
            Self::Tls => ("tls", true, false, false),
            Self::Mtls => ("mtls", true, false, false),
            Self::Ws => ("ws", false, true, false),
            Self::Wss => ("wss", true, true, false),
            Self::Mws => ("mws", false, true, false),
            Self::Mwss => ("mwss", true, true, false),
            Self::H2 => ("h2", true, false, false),
            Self::H2c => ("h2c", false, false, false),
            Self::Quic => ("quic", true, false, false),
            Self::Kcp => ("kcp", false, false, true),
            Self::Grpc => ("grpc", true, false, false),
            Self::Pht => ("pht", false, false, false),
            Self::Phts => ("phts", true, false, false),
            Self::Ssh => ("ssh", false, false, false),
            Self::Sshd => ("sshd", false, false, false),
            Self::Http3 => ("http3", true, false, false),
            Self::Dtls => ("dtls", true, false, false),
            Self::Ohttp => ("ohttp", false, false, false),
            Self::Otls => ("otls", false, false, false),
            Self::Redirect => ("redirect", false, false, false),
            Self::Tun => ("tun", false, false, false),
        };
        TransportShape {
            kind,
            requires_tls,
            websocket,
            kcp,
        }
    }
}
