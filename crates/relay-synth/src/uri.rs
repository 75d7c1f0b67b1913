//! Connection URIs for nodes.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use relay_core::defaults::DEFAULT_SS_METHOD;
use relay_model::{Client, Node};

use crate::protocol::Protocol;

/// Client-facing URI of a node.
///
/// socks4, http and shadowsocks nodes get their own scheme; every other
/// protocol is rendered as socks5.
pub fn generate_proxy_uri(node: &Node) -> String {
    match Protocol::from_name(&node.protocol) {
        Some(Protocol::Socks4) => format!("socks4://{}", node.addr()),
        Some(Protocol::Http) => with_userinfo("http", node),
        Some(Protocol::Shadowsocks) => shadowsocks_uri(node),
        _ => with_userinfo("socks5", node),
    }
}

/// socks5 URI of a client's local proxy as reached through its node's
/// reverse tunnel port. Returns `None` when the client has no node.
pub fn generate_client_proxy_uri(client: &Client) -> Option<String> {
    let node = client.node.as_ref()?;
    Some(format_uri(
        "socks5",
        &client.proxy_user,
        &client.proxy_pass,
        &format!("{}:{}", node.host, client.remote_port),
    ))
}

fn with_userinfo(scheme: &str, node: &Node) -> String {
    format_uri(scheme, &node.proxy_user, &node.proxy_pass, &node.addr())
}

fn format_uri(scheme: &str, user: &str, pass: &str, addr: &str) -> String {
    if user.is_empty() {
        return format!("{scheme}://{addr}");
    }
    format!(
        "{scheme}://{}:{}@{addr}",
        urlencoding::encode(user),
        urlencoding::encode(pass),
    )
}

fn shadowsocks_uri(node: &Node) -> String {
    let method = if node.ss_method.is_empty() {
        DEFAULT_SS_METHOD
    } else {
        node.ss_method.as_str()
    };
    let userinfo = URL_SAFE.encode(format!("{method}:{}", node.ss_password));
    format!(
        "ss://{userinfo}@{}#{}",
        node.addr(),
        urlencoding::encode(&node.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(protocol: &str, user: &str, pass: &str) -> Node {
        Node {
            name: "edge 1".into(),
            host: "h".into(),
            port: 1,
            protocol: protocol.into(),
            proxy_user: user.into(),
            proxy_pass: pass.into(),
            ..Default::default()
        }
    }

    #[test]
    fn socks5_with_and_without_credentials() {
        assert_eq!(generate_proxy_uri(&node("socks5", "a", "b")), "socks5://a:b@h:1");
        assert_eq!(generate_proxy_uri(&node("socks5", "", "")), "socks5://h:1");
    }

    #[test]
    fn credentials_are_percent_encoded() {
        assert_eq!(
            generate_proxy_uri(&node("http", "user@corp", "p:ss/w")),
            "http://user%40corp:p%3Ass%2Fw@h:1"
        );
    }

    #[test]
    fn socks4_has_no_userinfo() {
        assert_eq!(generate_proxy_uri(&node("socks4", "a", "b")), "socks4://h:1");
    }

    #[test]
    fn shadowsocks_default_method() {
        let mut n = node("ss", "", "");
        n.ss_password = "pw".into();
        // base64url("aes-256-gcm:pw")
        assert_eq!(generate_proxy_uri(&n), "ss://YWVzLTI1Ni1nY206cHc=@h:1#edge%201");
    }

    #[test]
    fn client_uri_uses_remote_port() {
        let client = Client {
            node: Some(node("ss", "relay", "x")),
            remote_port: 40001,
            proxy_user: "office".into(),
            proxy_pass: "s3 cret".into(),
            ..Default::default()
        };
        assert_eq!(
            generate_client_proxy_uri(&client).as_deref(),
            Some("socks5://office:s3%20cret@h:40001")
        );
        assert!(generate_client_proxy_uri(&Client::default()).is_none());
    }

    #[test]
    fn other_protocols_fall_back_to_socks5() {
        assert_eq!(generate_proxy_uri(&node("vmess", "a", "b")), "socks5://a:b@h:1");
        assert_eq!(generate_proxy_uri(&node("", "", "")), "socks5://h:1");
        assert_eq!(generate_proxy_uri(&node("unknown", "", "")), "socks5://h:1");
    }
}
