//! Protocol table.
//!
//! Every protocol the engine can serve is a [`Protocol`] variant, and its
//! handler shape is an exhaustive `match`, so adding a variant without
//! describing it does not compile.

use relay_core::DEGRADE_UNKNOWN_PROTOCOL;
use tracing::debug;

/// Application protocol of a node, chain hop or tunnel service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Socks5,
    Socks4,
    Http,
    Http2,
    Shadowsocks,
    ShadowsocksUdp,
    Trojan,
    Vmess,
    Relay,
    Tcp,
    Udp,
    Rtcp,
    Rudp,
    Sni,
    Dns,
    Sshd,
    Redirect,
    Tun,
    Auto,
}

/// Which credential fields of a node the handler (and connector) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    None,
    /// References the shared `main-auth` auther when a proxy user is set.
    Auther,
    /// Cipher as username, password as password.
    Shadowsocks,
    /// Password only.
    Trojan,
    /// UUID as username.
    Vmess,
}

/// Fixed handler metadata attached by protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    None,
    /// UDP relay with bind support.
    Socks5Udp,
    VmessAlterId,
    TunNet,
}

/// Static description of how a protocol is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolShape {
    pub handler_type: &'static str,
    pub credentials: CredentialKind,
    pub metadata: MetadataKind,
    /// Listener type that replaces the transport-derived one.
    pub forced_listener: Option<&'static str>,
}

impl Protocol {
    pub const ALL: [Protocol; 19] = [
        Protocol::Socks5,
        Protocol::Socks4,
        Protocol::Http,
        Protocol::Http2,
        Protocol::Shadowsocks,
        Protocol::ShadowsocksUdp,
        Protocol::Trojan,
        Protocol::Vmess,
        Protocol::Relay,
        Protocol::Tcp,
        Protocol::Udp,
        Protocol::Rtcp,
        Protocol::Rudp,
        Protocol::Sni,
        Protocol::Dns,
        Protocol::Sshd,
        Protocol::Redirect,
        Protocol::Tun,
        Protocol::Auto,
    ];

    /// Parse a stored protocol value. An empty value is socks5.
    pub fn from_name(name: &str) -> Option<Self> {
        let protocol = match name {
            "" | "socks5" => Self::Socks5,
            "socks4" => Self::Socks4,
            "http" => Self::Http,
            "http2" => Self::Http2,
            "ss" | "shadowsocks" => Self::Shadowsocks,
            "ssu" => Self::ShadowsocksUdp,
            "trojan" => Self::Trojan,
            "vmess" => Self::Vmess,
            "relay" => Self::Relay,
            "tcp" => Self::Tcp,
            "udp" => Self::Udp,
            "rtcp" => Self::Rtcp,
            "rudp" => Self::Rudp,
            "sni" => Self::Sni,
            "dns" => Self::Dns,
            "sshd" => Self::Sshd,
            "redirect" => Self::Redirect,
            "tun" => Self::Tun,
            "auto" => Self::Auto,
            _ => return None,
        };
        Some(protocol)
    }

    /// Like [`Protocol::from_name`], logging unknown values.
    pub fn parse_logged(name: &str) -> Option<Self> {
        let parsed = Self::from_name(name);
        if parsed.is_none() {
            debug!(kind = DEGRADE_UNKNOWN_PROTOCOL, protocol = name, "unknown protocol");
        }
        parsed
    }

    pub const fn name(self) -> &'static str {
        self.shape().handler_type
    }

    pub const fn shape(self) -> ProtocolShape {
        use CredentialKind as C;
        use MetadataKind as M;

        let (handler_type, credentials, metadata, forced_listener) = match self {
            Self::Socks5 => ("socks5", C::Auther, M::Socks5Udp, None),
            Self::Socks4 => ("socks4", C::None, M::None, None),
            Self::Http => ("http", C::Auther, M::None, None),
            Self::Http2 => ("http2", C::None, M::None, None),
            Self::Shadowsocks => ("ss", C::Shadowsocks, M::None, None),
            Self::ShadowsocksUdp => ("ssu", C::Shadowsocks, M::None, None),
            Self::Trojan => ("trojan", C::Trojan, M::None, None),
            Self::Vmess => ("vmess", C::Vmess, M::VmessAlterId, None),
            Self::Relay => ("relay", C::None, M::None, None),
            Self::Tcp => ("tcp", C::None, M::None, None),
            Self::Udp => ("udp", C::None, M::None, None),
            Self::Rtcp => ("rtcp", C::None, M::None, None),
            Self::Rudp => ("rudp", C::None, M::None, None),
            Self::Sni => ("sni", C::None, M::None, None),
            Self::Dns => ("dns", C::None, M::None, None),
            Self::Sshd => ("sshd", C::Auther, M::None, Some("sshd")),
            Self::Redirect => ("redirect", C::None, M::None, Some("redirect")),
            Self::Tun => ("tun", C::None, M::TunNet, Some("tun")),
            Self::Auto => ("auto", C::None, M::None, None),
        };
        ProtocolShape {
            handler_type,
            credentials,
            metadata,
            forced_listener,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for protocol in Protocol::ALL {
            assert_eq!(Protocol::from_name(protocol.name()), Some(protocol));
        }
    }

    #[test]
    fn empty_is_socks5() {
        assert_eq!(Protocol::from_name(""), Some(Protocol::Socks5));
    }

    #[test]
    fn shadowsocks_alias() {
        assert_eq!(Protocol::from_name("shadowsocks"), Some(Protocol::Shadowsocks));
        assert_eq!(Protocol::Shadowsocks.name(), "ss");
    }

    #[test]
    fn unknown_protocol() {
        assert_eq!(Protocol::from_name("wireguard"), None);
        assert_eq!(Protocol::from_name("SOCKS5"), None);
    }

    #[test]
    fn forced_listeners() {
        let forced: Vec<_> = Protocol::ALL
            .iter()
            .filter_map(|p| p.shape().forced_listener)
            .collect();
        assert_eq!(forced, ["sshd", "redirect", "tun"]);
    }
}
