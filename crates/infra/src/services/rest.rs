use anyhow::anyhow;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;
use url::Url;

/// Thin json client for the bearer token authenticated Google and Slack
/// web APIs
pub struct RestApi {
    client: Client,
    base_url: String,
    access_token: String,
    /// Name used when logging failures
    service: &'static str,
}

impl RestApi {
    pub fn new(service: &'static str, base_url: impl Into<String>, access_token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            access_token,
            service,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let req = self.client.get(self.url(path)?).query(query);
        self.send(req, "GET").await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        body: &impl Serialize,
        path: &[&str],
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let req = self.client.put(self.url(path)?).query(query).json(body);
        self.send(req, "PUT").await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        body: &impl Serialize,
        path: &[&str],
    ) -> anyhow::Result<T> {
        let req = self.client.post(self.url(path)?).json(body);
        self.send(req, "POST").await
    }

    /// Appends the percent encoded `segments` to the base url. Calendar ids
    /// and sheet ranges contain characters like `@`, `#` and `!`.
    fn url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("{} is not a valid base url", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        method: &str,
    ) -> anyhow::Result<T> {
        let res = match req.bearer_auth(&self.access_token).send().await {
            Ok(res) => res,
            Err(e) => {
                error!(
                    "[Network Error] {} API {} error. Error message: {:?}",
                    self.service, method, e
                );
                return Err(anyhow::Error::new(e));
            }
        };
        let res = res.error_for_status().map_err(|e| {
            error!(
                "[Unexpected Status] {} API {} error. Error message: {:?}",
                self.service, method, e
            );
            anyhow::Error::new(e)
        })?;
        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] {} API {} error. Error message: {:?}",
                self.service, method, e
            );
            anyhow::Error::new(e)
        })
    }
}
