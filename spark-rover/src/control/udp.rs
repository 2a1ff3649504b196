use crate::control::transport::{Connector, LinkError, LinkTarget, LinkWatch, Transport};
use bytes::Bytes;
use log::{debug, info};
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::net::{lookup_host, UdpSocket};
use tokio::task::JoinHandle;

/// Datagram link to the radio bridge in front of the motor controller.
#[derive(Debug)]
pub struct UdpLink {
    socket: Arc<UdpSocket>,
    target: LinkTarget,
    closed: bool,
    watcher: JoinHandle<()>,
}

impl Transport for UdpLink {
    async fn write(&mut self, payload: Bytes) -> Result<(), LinkError> {
        if self.closed {
            return Err(LinkError::Closed);
        }

        match self.socket.send(&payload).await {
            Ok(_) => Ok(()),
            // An ICMP port-unreachable the watcher has not consumed yet.
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                self.closed = true;
                Err(LinkError::Closed)
            }
            Err(e) => Err(LinkError::Io(e)),
        }
    }

    async fn close(&mut self) {
        if !self.closed {
            debug!("Closing link to {}", self.target.address);
            self.closed = true;
        }
        self.watcher.abort();
    }
}

impl Drop for UdpLink {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Drains whatever the bridge sends back. A refused receive means the peer is gone.
async fn watch_peer(socket: Arc<UdpSocket>, address: String, watch: LinkWatch) {
    let mut buf = [0u8; 64];
    loop {
        match socket.recv(&mut buf).await {
            Ok(n) => debug!("Ignoring {} byte(s) from {}", n, address),
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                info!("Peer {} refused the link", address);
                watch.peer_lost();
                return;
            }
            Err(e) => {
                debug!("Stopped watching {}: {}", address, e);
                return;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UdpConnector;

impl Connector for UdpConnector {
    type Link = UdpLink;

    async fn connect(&self, target: &LinkTarget, watch: LinkWatch) -> Result<UdpLink, LinkError> {
        let peer = lookup_host(target.address.as_str())
            .await?
            .next()
            .ok_or_else(|| LinkError::Unreachable(target.address.clone()))?;

        let local = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(peer).await?;
        info!("Link opened to {}", target);

        let socket = Arc::new(socket);
        let watcher = tokio::spawn(watch_peer(socket.clone(), target.address.clone(), watch));

        Ok(UdpLink {
            socket,
            target: target.clone(),
            closed: false,
            watcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn quiet() -> LinkWatch {
        LinkWatch::new(|| {})
    }

    #[tokio::test]
    async fn writes_one_datagram_per_command() -> anyhow::Result<()> {
        let bridge = UdpSocket::bind("127.0.0.1:0").await?;
        let target = LinkTarget {
            address: bridge.local_addr()?.to_string(),
            ..Default::default()
        };

        let mut link = UdpConnector.connect(&target, quiet()).await?;
        link.write(Bytes::from_static(b"FORWARD:50")).await?;
        link.write(Bytes::from_static(b"STOP:0")).await?;

        let mut buf = [0u8; 64];
        let n = bridge.recv(&mut buf).await?;
        assert_eq!(&buf[..n], b"FORWARD:50");
        let n = bridge.recv(&mut buf).await?;
        assert_eq!(&buf[..n], b"STOP:0");
        Ok(())
    }

    #[tokio::test]
    async fn closed_link_rejects_writes() -> anyhow::Result<()> {
        let bridge = UdpSocket::bind("127.0.0.1:0").await?;
        let target = LinkTarget {
            address: bridge.local_addr()?.to_string(),
            ..Default::default()
        };

        let mut link = UdpConnector.connect(&target, quiet()).await?;
        link.close().await;
        assert!(matches!(link.write(Bytes::from_static(b"STOP:0")).await, Err(LinkError::Closed)));
        Ok(())
    }

    #[tokio::test]
    async fn bad_address_fails_to_connect() {
        let target = LinkTarget {
            address: "not an address".to_string(),
            ..Default::default()
        };
        assert!(UdpConnector.connect(&target, quiet()).await.is_err());
    }

    #[tokio::test]
    async fn refused_peer_fires_the_watch() -> anyhow::Result<()> {
        let target = {
            let bridge = UdpSocket::bind("127.0.0.1:0").await?;
            LinkTarget {
                address: bridge.local_addr()?.to_string(),
                ..Default::default()
            }
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        let watch = LinkWatch::new(move || {
            let _ = tx.send(());
        });
        let mut link = UdpConnector.connect(&target, watch).await?;

        // Nobody listens any more; the port-unreachable reply reaches either the watcher or a later write.
        let mut refused_write = false;
        for _ in 0..3 {
            if matches!(link.write(Bytes::from_static(b"STOP:0")).await, Err(LinkError::Closed)) {
                refused_write = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let fired = matches!(timeout(Duration::from_millis(200), rx.recv()).await, Ok(Some(())));
        assert!(fired || refused_write);
        Ok(())
    }
}
