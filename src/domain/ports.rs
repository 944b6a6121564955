use crate::domain::model::{Capture, ProbeReport};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait CredentialSource: Send + Sync {
    fn api_key(&self, key_name: &str) -> Result<String>;
}

/// 探測三階段：抓取、萃取、回報
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<Vec<Capture>>;
    async fn extract(&self, captures: Vec<Capture>) -> Result<ProbeReport>;
    async fn report(&self, report: ProbeReport) -> Result<String>;
}
