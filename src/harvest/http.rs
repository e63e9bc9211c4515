use crate::harvest::error::HarvestError;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Sends `request` and maps transport and non-2xx failures to [`HarvestError`].
pub(crate) async fn send(request: RequestBuilder, url: &str) -> Result<Response, HarvestError> {
    let response = request
        .send()
        .await
        .map_err(|e| HarvestError::NetworkRequest(url.to_string(), e))?;
    match response.error_for_status() {
        Ok(resp) => Ok(resp),
        Err(e) => Err(match e.status() {
            Some(status) => HarvestError::HttpStatus {
                url: url.to_string(),
                status,
                source: e,
            },
            None => HarvestError::NetworkRequest(url.to_string(), e),
        }),
    }
}

pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String, HarvestError> {
    send(client.get(url), url)
        .await?
        .text()
        .await
        .map_err(|e| HarvestError::NetworkRequest(url.to_string(), e))
}

async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, HarvestError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| HarvestError::NetworkRequest(url.to_string(), e))?;
    serde_json::from_slice(&body).map_err(|source| HarvestError::JsonParse {
        url: url.to_string(),
        source,
    })
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<T, HarvestError> {
    let response = send(client.get(url), url).await?;
    read_json(response, url).await
}

pub(crate) async fn post_form_json<F: Serialize + ?Sized, T: DeserializeOwned>(
    client: &Client,
    url: &str,
    form: &F,
) -> Result<T, HarvestError> {
    let response = send(client.post(url).form(form), url).await?;
    read_json(response, url).await
}
