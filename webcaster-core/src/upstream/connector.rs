//! Transport seam for the upstream connection

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::UpstreamConfig;

/// Byte stream to the upstream server
pub trait UpstreamStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> UpstreamStream for T {}

pub type BoxedStream = Box<dyn UpstreamStream>;

/// Opens a fresh upstream stream for every connect attempt
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &UpstreamConfig) -> io::Result<BoxedStream>;
}

/// Plain TCP to `host:port`
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, config: &UpstreamConfig) -> io::Result<BoxedStream> {
        let stream = TcpStream::connect((config.host.as_str(), config.port)).await?;
        stream.set_nodelay(true)?;
        Ok(Box::new(stream))
    }
}
