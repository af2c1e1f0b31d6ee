//! File management client (move, copy, fetch, delete, status)

use crate::{
    auth::Auth,
    config::{Config, Settings},
    http::{ApiResponse, HttpClient},
    types::{FmgrOp, FmgrOptions},
    util::{https_check, urlsafe_base64_encode},
    ClientError, Result,
};
use tracing::{debug, instrument};
use url::form_urlencoded;

/// Client for the `/fmgr` endpoints of the management host
#[derive(Clone, Debug)]
pub struct Fmgr {
    auth: Auth,
    http: HttpClient,
    mgr_host: String,
}

impl Fmgr {
    /// Build from settings. `mgr_url` must be set.
    pub fn new(settings: &Settings) -> Result<Self> {
        if settings.mgr_url.trim().is_empty() {
            return Err(ClientError::Config("mgr_url is not set".to_string()));
        }
        let mgr_host = https_check(settings.mgr_url.trim(), settings.ishttps)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            auth: Auth::from_settings(settings),
            http: HttpClient::new(settings)?,
            mgr_host,
        })
    }

    /// Build from the current settings of `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.settings())
    }

    pub fn mgr_host(&self) -> &str {
        &self.mgr_host
    }

    /// Move files
    pub async fn fmgr_move(&self, fops: &str, options: FmgrOptions) -> Result<ApiResponse> {
        self.fmgr_commons(FmgrOp::Move, fops, &options).await
    }

    /// Copy files
    pub async fn fmgr_copy(&self, fops: &str, options: FmgrOptions) -> Result<ApiResponse> {
        self.fmgr_commons(FmgrOp::Copy, fops, &options).await
    }

    /// Fetch remote resources into storage
    pub async fn fmgr_fetch(&self, fops: &str, options: FmgrOptions) -> Result<ApiResponse> {
        self.fmgr_commons(FmgrOp::Fetch, fops, &options).await
    }

    /// Delete files
    pub async fn fmgr_delete(&self, fops: &str, options: FmgrOptions) -> Result<ApiResponse> {
        self.fmgr_commons(FmgrOp::Delete, fops, &options).await
    }

    /// Delete an m3u8 playlist together with its segments
    pub async fn m3u8_delete(&self, fops: &str, options: FmgrOptions) -> Result<ApiResponse> {
        self.fmgr_commons(FmgrOp::DeleteM3u8, fops, &options).await
    }

    /// Delete by prefix. `reqdata` is sent as the request body unchanged.
    #[instrument(skip(self))]
    pub async fn prefix_delete(&self, reqdata: &str) -> Result<ApiResponse> {
        let url = self.op_url(FmgrOp::DeletePrefix);
        debug!("Fmgr_{} request body is: {}", FmgrOp::DeletePrefix, reqdata);
        let headers = self.auth.headers(&url, reqdata)?;
        let response = self.http.post(&url, reqdata.to_string(), headers).await?;
        debug!("The return code : {}, text : {}", response.status, response.body);
        Ok(response)
    }

    /// Query the state of a submitted task
    #[instrument(skip(self))]
    pub async fn status(&self, persistent_id: &str) -> Result<ApiResponse> {
        let id: String = form_urlencoded::byte_serialize(persistent_id.as_bytes()).collect();
        let url = format!("{}/fmgr/status?persistentId={}", self.mgr_host, id);
        debug!("Start to get status of persistentId: {}", persistent_id);
        let response = self.http.get(&url).await?;
        debug!("The return code : {}, text : {}", response.status, response.body);
        Ok(response)
    }

    #[instrument(skip(self, options))]
    async fn fmgr_commons(
        &self,
        op: FmgrOp,
        fops: &str,
        options: &FmgrOptions,
    ) -> Result<ApiResponse> {
        let url = self.op_url(op);
        let body = request_body(op, fops, options);
        debug!("Fmgr_{} request body is: {}", op, body);

        let headers = self.auth.headers(&url, &body)?;
        let response = self.http.post(&url, body, headers).await?;
        debug!("The return code : {}, text : {}", response.status, response.body);
        Ok(response)
    }

    fn op_url(&self, op: FmgrOp) -> String {
        format!("{}/fmgr/{}", self.mgr_host, op)
    }
}

/// Form body for a task: `fops`, then `notifyURL`, `separate` and (fetch
/// only) `force` when present
pub fn request_body(op: FmgrOp, fops: &str, options: &FmgrOptions) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("fops", fops);
    if let Some(notify_url) = options.notify_url.as_deref().filter(|u| !u.is_empty()) {
        form.append_pair("notifyURL", &urlsafe_base64_encode(notify_url));
    }
    if let Some(separate) = options.separate.as_deref().filter(|s| !s.is_empty()) {
        form.append_pair("separate", separate);
    }
    if op == FmgrOp::Fetch {
        if let Some(force) = options.force.as_deref().filter(|f| !f.is_empty()) {
            form.append_pair("force", force);
        }
    }
    form.finish()
}
